//! Test helpers for web API tests.
//!
//! Provides a TestServer backed by in-memory collaborators, token helpers,
//! and catalog record fixtures.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use etsin::access::ACCESS_TYPE_URI_PREFIX;
use etsin::catalog::{InMemoryCatalog, InMemoryPermits};
use etsin::web::handlers::AppState;
use etsin::web::middleware::{JwtClaims, JwtState};
use etsin::web::router::{create_health_router, create_router};

/// JWT secret shared by the server and the token helpers.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// Download service base URL used by test servers.
pub const DOWNLOAD_BASE: &str = "https://download.example.org/api/v1/dataset";

/// Create a test server around an in-memory catalog.
pub fn create_test_server(catalog: InMemoryCatalog) -> TestServer {
    build_server(AppState::new(Arc::new(catalog)))
}

/// Create a test server with permit lookups enabled.
pub fn create_test_server_with_permits(
    catalog: InMemoryCatalog,
    permits: InMemoryPermits,
) -> TestServer {
    build_server(AppState::new(Arc::new(catalog)).with_permits(Arc::new(permits)))
}

fn build_server(app_state: AppState) -> TestServer {
    let app_state = Arc::new(app_state.with_download_base_url(DOWNLOAD_BASE));
    let jwt_state = Arc::new(JwtState::new(TEST_SECRET));
    let router = create_router(app_state, jwt_state, &[]).merge(create_health_router());

    TestServer::new(router).expect("Failed to create test server")
}

/// Claims of a fully verified CSC user.
pub fn csc_user(sub: &str) -> JwtClaims {
    let now = chrono::Utc::now().timestamp() as u64;
    JwtClaims {
        sub: sub.to_string(),
        csc_name: Some("teppo".to_string()),
        home_org_id: Some("csc.fi".to_string()),
        home_org_name: Some("CSC - IT Center for Science".to_string()),
        name: Some("Teppo Testaaja".to_string()),
        email: Some("teppo@example.org".to_string()),
        iat: now,
        exp: now + 3600,
    }
}

/// Sign claims with the test secret.
pub fn token_for(claims: &JwtClaims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}

/// `Authorization` header value for a CSC user.
pub fn bearer(sub: &str) -> String {
    format!("Bearer {}", token_for(&csc_user(sub)))
}

/// Access-rights block for a type code.
pub fn access_rights(code: &str) -> Value {
    json!({
        "access_type": { "identifier": format!("{ACCESS_TYPE_URI_PREFIX}{code}") }
    })
}

/// A minimal record with the given access rights and no data.
pub fn record(cr_id: &str, access_rights: Value) -> Value {
    json!({
        "identifier": cr_id,
        "research_dataset": {
            "preferred_identifier": format!("urn:nbn:fi:att:{cr_id}"),
            "title": { "en": "Test dataset" },
            "access_rights": access_rights
        }
    })
}

/// An open IDA dataset with a nested folder structure.
///
/// `data/raw` is an explicit folder; `data` and `docs` are only implied
/// by the paths beneath them.
pub fn ida_record(cr_id: &str) -> Value {
    json!({
        "identifier": cr_id,
        "research_dataset": {
            "preferred_identifier": format!("urn:nbn:fi:att:{cr_id}"),
            "title": { "en": "IDA dataset" },
            "access_rights": access_rights("open"),
            "files": [
                {
                    "identifier": "f-readme",
                    "title": "Readme",
                    "details": { "file_path": "/docs/readme.txt", "file_name": "readme.txt", "byte_size": 120 }
                },
                {
                    "identifier": "f-extra",
                    "title": "Extra",
                    "details": { "file_path": "/data/raw/extra.csv", "file_name": "extra.csv", "byte_size": 30 }
                }
            ],
            "directories": [
                {
                    "identifier": "d-raw",
                    "title": "Raw data",
                    "details": {
                        "directory_path": "/data/raw",
                        "directory_name": "raw",
                        "file_count": 12,
                        "byte_size": 4096
                    }
                }
            ]
        }
    })
}

/// A dataset with remote resources only.
pub fn remote_record(cr_id: &str) -> Value {
    json!({
        "identifier": cr_id,
        "research_dataset": {
            "preferred_identifier": format!("urn:nbn:fi:att:{cr_id}"),
            "access_rights": access_rights("open"),
            "remote_resources": [
                { "title": "Zeta" },
                { "title": "Alpha" }
            ]
        }
    })
}
