//! Response DTOs for Web API.

use serde::Serialize;

use crate::access::AccessRestrictions;
use crate::catalog::CatalogRecord;
use crate::files::TreeNode;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Dataset detail page.
#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    /// The record with its data items sorted.
    pub catalog_record: CatalogRecord,
    /// Data affordances for the caller.
    pub restrictions: AccessRestrictions,
    /// Whether the caller holds a permit.
    pub has_permit: bool,
    /// Caller's permit application state.
    pub application_state: Option<String>,
    /// Top level of the file tree.
    pub tree: Vec<TreeNode>,
    /// Number of files in the dataset, `None` without IDA data.
    pub total_count: Option<u64>,
}

/// One folder of a dataset.
#[derive(Debug, Serialize)]
pub struct FolderResponse {
    /// Folder identifier.
    pub directory_id: String,
    /// Children of the folder.
    pub tree: Vec<TreeNode>,
}

/// Identifier search result.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Query to send to the search API.
    pub query: String,
    /// Whether the query is a single dataset identifier.
    pub is_identifier: bool,
}

/// Current user information.
#[derive(Debug, Default, Serialize)]
pub struct UserResponse {
    pub is_authenticated: bool,
    /// Logged in with a verified CSC account.
    pub is_authenticated_csc_user: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_csc_name: Option<String>,
    pub home_organization_id: Option<String>,
    pub home_organization_name: Option<String>,
}

/// A permit application made on the caller's behalf.
#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub application_id: u64,
}
