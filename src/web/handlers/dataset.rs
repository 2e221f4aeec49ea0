//! Dataset and folder handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::files::{build, collapse_synthetic, count_files, Entry, TreeNode, TOTAL_ITEM_LIMIT};
use crate::web::dto::{ApiResponse, DatasetResponse, FolderResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::OptionalAuthUser;

fn build_nodes(entries: Vec<Entry>) -> Result<Vec<TreeNode>, ApiError> {
    build(entries).map_err(|e| {
        tracing::error!(error = %e, "Failed to build file tree");
        ApiError::from(crate::EtsinError::from(e))
    })
}

/// GET /api/datasets/:cr_id - Dataset detail with file tree and restrictions.
pub async fn get_dataset(
    State(state): State<Arc<AppState>>,
    user: OptionalAuthUser,
    Path(cr_id): Path<String>,
) -> Result<Json<ApiResponse<DatasetResponse>>, ApiError> {
    tracing::info!(
        %cr_id,
        user = user.0.as_ref().map(|c| c.sub.as_str()).unwrap_or("UNAUTHENTICATED"),
        "Dataset requested"
    );

    let mut record = state.catalog.get_catalog_record(&cr_id).await?;
    record.sort_data_items();

    let (restrictions, permit) = state.restrictions(&record, user.0.as_ref()).await;
    record.strip_sensitive(user.is_authenticated());
    if !restrictions.allow_data_ida_info_button {
        record.hide_access_urls();
    }

    let tree = build_nodes(record.entries(&state.language)?)?;
    let total_count = if record.has_ida_data() && !tree.is_empty() {
        Some(count_files(&tree).map_err(crate::EtsinError::from)?)
    } else {
        None
    };

    Ok(Json(ApiResponse::new(DatasetResponse {
        catalog_record: record,
        restrictions,
        has_permit: permit.has_permit,
        application_state: permit.application_state,
        tree,
        total_count,
    })))
}

/// GET /api/datasets/:cr_id/folders/:dir_id - Children of one folder.
pub async fn get_folder(
    State(state): State<Arc<AppState>>,
    user: OptionalAuthUser,
    Path((cr_id, dir_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<FolderResponse>>, ApiError> {
    tracing::info!(
        %cr_id,
        %dir_id,
        user = user.0.as_ref().map(|c| c.sub.as_str()).unwrap_or("UNAUTHENTICATED"),
        "Folder requested"
    );

    let record = state.catalog.get_catalog_record(&cr_id).await?;
    let (restrictions, _) = state.restrictions(&record, user.0.as_ref()).await;

    let mut listing = state.catalog.get_directory(&cr_id, &dir_id).await?;
    listing.sort_and_limit(TOTAL_ITEM_LIMIT);
    if !restrictions.allow_data_ida_info_button {
        listing.hide_access_urls();
    }

    let entries = listing
        .into_entries(&state.language)
        .map_err(crate::EtsinError::from)?;
    let tree = collapse_synthetic(build_nodes(entries)?);

    Ok(Json(ApiResponse::new(FolderResponse {
        directory_id: dir_id,
        tree,
    })))
}
