//! Request DTOs for Web API.

use serde::Deserialize;

use crate::web::error::ApiError;

/// Identifier search query.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Raw search box text.
    #[serde(default)]
    pub q: String,
}

/// Paging for the Qvain dataset list.
#[derive(Debug, Default, Deserialize)]
pub struct DatasetsQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Download request.
///
/// `file_id` and `dir_id` may repeat, so this is parsed from the raw query
/// string rather than through `Query`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DownloadQuery {
    /// Catalog record identifier.
    pub cr_id: String,
    /// Files to download.
    pub file_ids: Vec<String>,
    /// Directories to download.
    pub dir_ids: Vec<String>,
}

impl DownloadQuery {
    /// Parse a raw query string.
    pub fn parse(query: Option<&str>) -> Result<Self, ApiError> {
        let mut cr_id = None;
        let mut file_ids = Vec::new();
        let mut dir_ids = Vec::new();

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or("").as_bytes()) {
            match key.as_ref() {
                "cr_id" => cr_id = Some(value.into_owned()),
                "file_id" => file_ids.push(value.into_owned()),
                "dir_id" => dir_ids.push(value.into_owned()),
                _ => {}
            }
        }

        let cr_id = cr_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::bad_request("cr_id is required"))?;

        Ok(Self {
            cr_id,
            file_ids,
            dir_ids,
        })
    }
}
