//! API handlers for the Etsin web API.

pub mod dataset;
pub mod download;
pub mod permit;
pub mod qvain;
pub mod search;
pub mod user;

pub use dataset::*;
pub use download::*;
pub use permit::*;
pub use qvain::*;
pub use search::*;
pub use user::*;

use std::sync::Arc;

use chrono_tz::Tz;

use crate::access::{compute_restrictions, AccessRestrictions, PermitStatus};
use crate::catalog::{CatalogRecord, CatalogSource, PermitSource};
use crate::datetime::DEFAULT_TIMEZONE;
use crate::web::middleware::JwtClaims;

/// Shared state of the web API.
pub struct AppState {
    /// Dataset records and folder contents.
    pub catalog: Arc<dyn CatalogSource>,
    /// Permit lookups, `None` when REMS is disabled.
    pub permits: Option<Arc<dyn PermitSource>>,
    /// Language for reference-data labels.
    pub language: String,
    /// Timezone for embargo dates without an offset.
    pub timezone: Tz,
    /// Base URL of the download service.
    pub download_base_url: String,
}

impl AppState {
    /// Create a new application state.
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            catalog,
            permits: None,
            language: "en".to_string(),
            timezone: DEFAULT_TIMEZONE,
            download_base_url: String::new(),
        }
    }

    /// Enable permit lookups.
    pub fn with_permits(mut self, permits: Arc<dyn PermitSource>) -> Self {
        self.permits = Some(permits);
        self
    }

    /// Set the label language and embargo timezone.
    pub fn with_locale(mut self, language: &str, timezone: Tz) -> Self {
        self.language = language.to_string();
        self.timezone = timezone;
        self
    }

    /// Set the download service base URL.
    pub fn with_download_base_url(mut self, base_url: &str) -> Self {
        self.download_base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Permit status of the caller for a record.
    ///
    /// Only REMS-managed records are looked up, and only for logged in users.
    /// A failed lookup is logged and treated as no permit.
    pub async fn permit_status(
        &self,
        record: &CatalogRecord,
        user: Option<&JwtClaims>,
    ) -> PermitStatus {
        let (Some(permits), Some(user)) = (&self.permits, user) else {
            return PermitStatus::none();
        };
        if !record.is_rems_managed() {
            return PermitStatus::none();
        }

        match permits.permit_status(record, &user.sub).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(
                    cr_id = record.identifier().unwrap_or(""),
                    error = %e,
                    "Permit lookup failed"
                );
                PermitStatus::none()
            }
        }
    }

    /// Restrictions of a record for the caller.
    pub async fn restrictions(
        &self,
        record: &CatalogRecord,
        user: Option<&JwtClaims>,
    ) -> (AccessRestrictions, PermitStatus) {
        let permit = self.permit_status(record, user).await;
        let restrictions = compute_restrictions(
            &record.access_rights(),
            permit.has_permit,
            permit.application_state.as_deref(),
            user.is_some(),
            self.timezone,
        );
        (restrictions, permit)
    }
}
