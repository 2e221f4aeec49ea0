//! Qvain handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::catalog::{CatalogRecord, DatasetPage, Paging};
use crate::files::TOTAL_ITEM_LIMIT;
use crate::qvain::{prepare_submission, prepare_update, MISSING_PROVIDER};
use crate::web::dto::{ApiResponse, DatasetsQuery};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/qvain/datasets - Submit a dataset to the catalog.
pub async fn create_dataset(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(form): Json<Value>,
) -> Result<(StatusCode, Json<ApiResponse<CatalogRecord>>), ApiError> {
    let provider = claims.metadata_provider();
    let payload = prepare_submission(form, provider.as_ref())?;

    let record = state.catalog.create_dataset(payload).await?;
    tracing::info!(
        cr_id = record.identifier().unwrap_or(""),
        user = %claims.sub,
        "Dataset submitted"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::new(record))))
}

/// PATCH /api/qvain/datasets/:cr_id - Update a dataset the caller submitted.
pub async fn update_dataset(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(cr_id): Path<String>,
    Json(form): Json<Value>,
) -> Result<Json<ApiResponse<CatalogRecord>>, ApiError> {
    let provider = claims.metadata_provider();
    let payload = prepare_update(form, provider.as_ref())?;

    let existing = state.catalog.get_catalog_record(&cr_id).await?;
    if existing.metadata_provider_user() != provider.as_ref().map(|p| p.user.as_str()) {
        tracing::warn!(%cr_id, user = %claims.sub, "Refusing update of another user's dataset");
        return Err(ApiError::forbidden("Not authorized"));
    }

    let record = state.catalog.update_dataset(&cr_id, payload).await?;
    tracing::info!(%cr_id, user = %claims.sub, "Dataset updated");

    Ok(Json(ApiResponse::new(record)))
}

/// GET /api/qvain/datasets - Datasets the caller has submitted.
pub async fn get_user_datasets(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<DatasetsQuery>,
) -> Result<Json<ApiResponse<DatasetPage>>, ApiError> {
    let Some(user) = claims.csc_name.as_deref() else {
        return Err(ApiError::unauthorized(MISSING_PROVIDER));
    };

    let paging = Paging {
        limit: Some(query.limit.unwrap_or(TOTAL_ITEM_LIMIT).min(TOTAL_ITEM_LIMIT)),
        offset: query.offset,
    };
    let mut page = state.catalog.get_user_datasets(user, paging).await?;
    page.results.truncate(TOTAL_ITEM_LIMIT);
    tracing::debug!(user, count = page.count, "User datasets listed");

    Ok(Json(ApiResponse::new(page)))
}
