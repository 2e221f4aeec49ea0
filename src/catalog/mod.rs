//! Catalog and permit collaborators.
//!
//! Metax holds dataset records and their file hierarchy; REMS holds permit
//! applications. Both are reached through object-safe traits so the web layer
//! can run against the live services or against in-memory stand-ins.

mod memory;
mod metax;
mod record;
mod rems;

pub use memory::InMemoryCatalog;
pub use metax::MetaxClient;
pub use record::{CatalogRecord, ATT_CATALOG, IDA_CATALOG};
pub use rems::{normalize_state, Applicant, InMemoryPermits, PermitSource, RemsClient};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::files::DirectoryListing;
use crate::Result;

/// Source of dataset records and folder contents.
pub trait CatalogSource: Send + Sync {
    /// Fetch a catalog record with file details embedded.
    fn get_catalog_record<'a>(&'a self, cr_id: &'a str) -> BoxFuture<'a, Result<CatalogRecord>>;

    /// Fetch the direct children of one folder of a dataset.
    fn get_directory<'a>(
        &'a self,
        cr_id: &'a str,
        dir_id: &'a str,
    ) -> BoxFuture<'a, Result<DirectoryListing>>;

    /// Create a dataset from a prepared submission and return the stored record.
    fn create_dataset(&self, payload: Value) -> BoxFuture<'_, Result<CatalogRecord>>;

    /// Merge a partial submission into an existing dataset.
    fn update_dataset<'a>(
        &'a self,
        cr_id: &'a str,
        payload: Value,
    ) -> BoxFuture<'a, Result<CatalogRecord>>;

    /// Datasets whose metadata provider is `user`.
    fn get_user_datasets<'a>(
        &'a self,
        user: &'a str,
        paging: Paging,
    ) -> BoxFuture<'a, Result<DatasetPage>>;
}

/// Limit and offset for list requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// One page of datasets with the total number of matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<CatalogRecord>,
}
