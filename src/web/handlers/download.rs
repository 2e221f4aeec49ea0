//! Download handlers.

use axum::{
    extract::{RawQuery, State},
    response::Redirect,
};
use std::sync::Arc;

use crate::web::dto::DownloadQuery;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::OptionalAuthUser;

/// Download service URL for a dataset and optional files and directories.
pub fn download_url(base_url: &str, cr_id: &str, file_ids: &[String], dir_ids: &[String]) -> String {
    let mut url = format!("{}/{}", base_url.trim_end_matches('/'), urlencoding::encode(cr_id));

    let params: Vec<String> = file_ids
        .iter()
        .map(|id| format!("file={}", urlencoding::encode(id)))
        .chain(dir_ids.iter().map(|id| format!("dir={}", urlencoding::encode(id))))
        .collect();
    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.join("&"));
    }
    url
}

/// GET /api/download - Redirect to the download service if the caller may download.
pub async fn download(
    State(state): State<Arc<AppState>>,
    user: OptionalAuthUser,
    RawQuery(query): RawQuery,
) -> Result<Redirect, ApiError> {
    let query = DownloadQuery::parse(query.as_deref())?;

    let record = state.catalog.get_catalog_record(&query.cr_id).await?;
    let (restrictions, _) = state.restrictions(&record, user.0.as_ref()).await;

    if !restrictions.allows_download() {
        tracing::info!(cr_id = %query.cr_id, "Download refused");
        return Err(ApiError::forbidden("Not authorized"));
    }

    let url = download_url(
        &state.download_base_url,
        &query.cr_id,
        &query.file_ids,
        &query.dir_ids,
    );
    tracing::debug!(%url, "Redirecting to download service");
    Ok(Redirect::temporary(&url))
}
