//! Permit application handler.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::web::dto::{ApiResponse, ApplicationResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;
use crate::EtsinError;

/// POST /api/rems/:cr_id/applications - Apply for a permit to a dataset.
pub async fn apply_for_permit(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(cr_id): Path<String>,
) -> Result<Json<ApiResponse<ApplicationResponse>>, ApiError> {
    let Some(permits) = &state.permits else {
        return Err(ApiError::not_found("Permit applications are not enabled"));
    };

    let record = state.catalog.get_catalog_record(&cr_id).await?;
    if !record.is_rems_managed() {
        return Err(EtsinError::Validation(
            "dataset access is not granted through permits".to_string(),
        )
        .into());
    }

    let application_id = permits.apply(&record, &claims.applicant()).await?;
    tracing::info!(%cr_id, application_id, user = %claims.sub, "Permit applied for");

    Ok(Json(ApiResponse::new(ApplicationResponse { application_id })))
}
