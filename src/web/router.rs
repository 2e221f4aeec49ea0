//! Router configuration for Web API.

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    apply_for_permit, create_dataset, download, get_dataset, get_folder, get_user,
    get_user_datasets, search_identifier, update_dataset, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, redact_token, security_headers, JwtState};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let dataset_routes = Router::new()
        .route("/:cr_id", get(get_dataset))
        .route("/:cr_id/folders/:dir_id", get(get_folder));

    let qvain_routes = Router::new()
        .route("/datasets", get(get_user_datasets).post(create_dataset))
        .route("/datasets/:cr_id", patch(update_dataset));

    let api_routes = Router::new()
        .nest("/datasets", dataset_routes)
        .nest("/qvain", qvain_routes)
        .route("/search/identifier", get(search_identifier))
        .route("/rems/:cr_id/applications", post(apply_for_permit))
        .route("/user", get(get_user))
        .route("/download", get(download));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %redact_token(request.uri()),
                    )
                }))
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
