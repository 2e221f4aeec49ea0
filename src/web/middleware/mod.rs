//! Middleware for Web API.

pub mod auth;
pub mod cors;
pub mod security;

pub use auth::{jwt_auth, redact_token, AuthUser, JwtClaims, JwtState, OptionalAuthUser};
pub use cors::create_cors_layer;
pub use security::security_headers;
