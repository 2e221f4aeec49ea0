//! Search handlers.

use axum::{extract::Query, Json};

use crate::search::{identifier_token, transform};
use crate::web::dto::{ApiResponse, SearchQuery, SearchResponse};

/// GET /api/search/identifier?q= - Rewrite a query that is a dataset identifier.
pub async fn search_identifier(
    Query(params): Query<SearchQuery>,
) -> Json<ApiResponse<SearchResponse>> {
    Json(ApiResponse::new(SearchResponse {
        is_identifier: identifier_token(&params.q).is_some(),
        query: transform(&params.q),
    }))
}
