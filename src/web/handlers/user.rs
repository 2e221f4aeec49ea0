//! User handlers for Web API.

use axum::Json;

use crate::web::dto::{ApiResponse, UserResponse};
use crate::web::middleware::OptionalAuthUser;

/// GET /api/user - Current user, anonymous callers included.
pub async fn get_user(OptionalAuthUser(claims): OptionalAuthUser) -> Json<ApiResponse<UserResponse>> {
    let response = match claims {
        Some(claims) => UserResponse {
            is_authenticated: true,
            is_authenticated_csc_user: claims.csc_name.is_some(),
            user_csc_name: claims.csc_name,
            home_organization_id: claims.home_org_id,
            home_organization_name: claims.home_org_name,
        },
        None => UserResponse::default(),
    };
    Json(ApiResponse::new(response))
}
