//! Bearer token authentication.
//!
//! Tokens are issued by the Fairdata authentication proxy; this service only
//! verifies them and reads the user attributes they carry.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request, Uri},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::Applicant;
use crate::qvain::MetadataProvider;
use crate::web::error::ApiError;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (federated user ID, also the REMS user ID).
    pub sub: String,
    /// CSC account name, absent for users without a verified account.
    #[serde(default)]
    pub csc_name: Option<String>,
    /// Home organization identifier.
    #[serde(default)]
    pub home_org_id: Option<String>,
    /// Home organization display name.
    #[serde(default)]
    pub home_org_name: Option<String>,
    /// Display name of the user.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address of the user.
    #[serde(default)]
    pub email: Option<String>,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
}

impl JwtClaims {
    /// Metadata provider for Qvain submissions, if the token names both parts.
    pub fn metadata_provider(&self) -> Option<MetadataProvider> {
        MetadataProvider::from_parts(self.csc_name.as_deref(), self.home_org_id.as_deref())
    }

    /// The user as a REMS applicant, named by display name, CSC name or subject.
    pub fn applicant(&self) -> Applicant {
        let name = self
            .name
            .as_deref()
            .or(self.csc_name.as_deref())
            .unwrap_or(&self.sub);
        Applicant {
            user_id: self.sub.clone(),
            name: name.to_string(),
            email: self.email.clone(),
        }
    }
}

/// Application state for JWT authentication.
#[derive(Clone)]
pub struct JwtState {
    /// Decoding key for JWT verification.
    pub decoding_key: DecodingKey,
    /// Validation settings.
    pub validation: Validation,
}

impl JwtState {
    /// Create a new JWT state from a secret key.
    pub fn new(secret: &str) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key,
            validation,
        }
    }

    fn verify(&self, token: &str) -> Option<JwtClaims> {
        match decode::<JwtClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("JWT validation failed: {}", e);
                None
            }
        }
    }
}

/// Token from the `Authorization: Bearer` header, or the `token` query
/// parameter used by download links.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(header) = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        return header.strip_prefix("Bearer ").map(str::to_string);
    }

    url::form_urlencoded::parse(parts.uri.query().unwrap_or("").as_bytes())
        .find(|(key, _)| key == TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Query parameter carrying a token on download links.
const TOKEN_PARAM: &str = "token";

/// The request URI with any `token` query value masked, for logging.
pub fn redact_token(uri: &Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.to_string();
    };
    let mut pairs = url::form_urlencoded::parse(query.as_bytes());
    if !pairs.any(|(key, _)| key == TOKEN_PARAM) {
        return uri.to_string();
    }

    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(url::form_urlencoded::parse(query.as_bytes()).map(|(key, value)| {
            if key == TOKEN_PARAM {
                (key, "REDACTED".into())
            } else {
                (key, value)
            }
        }))
        .finish();
    format!("{}?{}", uri.path(), query)
}

/// Extractor for authenticated users.
///
/// Rejects the request with 401 unless a valid token is present.
#[derive(Debug, Clone)]
pub struct AuthUser(pub JwtClaims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token =
                extract_token(parts).ok_or_else(|| ApiError::unauthorized("Not logged in"))?;

            // Set by the jwt_auth middleware
            let jwt_state = parts
                .extensions
                .get::<Arc<JwtState>>()
                .ok_or_else(|| ApiError::internal("JWT state not configured"))?;

            jwt_state
                .verify(&token)
                .map(AuthUser)
                .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))
        })
    }
}

/// Optional authentication extractor.
///
/// A missing or invalid token yields an anonymous caller instead of an error.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<JwtClaims>);

impl OptionalAuthUser {
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let Some(token) = extract_token(parts) else {
                return Ok(OptionalAuthUser(None));
            };
            let Some(jwt_state) = parts.extensions.get::<Arc<JwtState>>() else {
                return Ok(OptionalAuthUser(None));
            };
            Ok(OptionalAuthUser(jwt_state.verify(&token)))
        })
    }
}

/// Middleware function to inject JWT state into request extensions.
pub async fn jwt_auth(
    jwt_state: Arc<JwtState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(jwt_state);
    next.run(request).await
}
