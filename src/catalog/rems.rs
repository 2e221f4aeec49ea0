//! REMS permit lookups and applications.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;

use super::CatalogRecord;
use crate::access::{PermitStatus, APPROVED_STATE};
use crate::config::RemsConfig;
use crate::{EtsinError, Result};

/// Prefix REMS puts in front of application states.
const STATE_PREFIX: &str = "application.state/";

/// States after which a new application is needed.
const FINISHED_STATES: [&str; 3] = ["closed", "rejected", "revoked"];

/// State of a freshly created application.
const SUBMITTED_STATE: &str = "submitted";

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// A user applying for a permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applicant {
    #[serde(rename = "userid")]
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
}

/// Source of the caller's permit application state.
pub trait PermitSource: Send + Sync {
    /// State of the user's application for the record's REMS resource, if any.
    fn application_state<'a>(
        &'a self,
        record: &'a CatalogRecord,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>>>;

    /// Apply for a permit to the record's REMS resource.
    ///
    /// Returns the id of the applicant's open application, creating one if
    /// there is none.
    fn apply<'a>(
        &'a self,
        record: &'a CatalogRecord,
        applicant: &'a Applicant,
    ) -> BoxFuture<'a, Result<u64>>;

    /// Permit status of the user for the record.
    fn permit_status<'a>(
        &'a self,
        record: &'a CatalogRecord,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<PermitStatus>> {
        Box::pin(async move {
            let state = self.application_state(record, user_id).await?;
            Ok(PermitStatus::from_application_state(state))
        })
    }
}

/// Drop the `application.state/` prefix REMS uses.
pub fn normalize_state(state: &str) -> &str {
    state.strip_prefix(STATE_PREFIX).unwrap_or(state)
}

fn rems_resource(record: &CatalogRecord) -> Result<&str> {
    record.rems_identifier().ok_or_else(|| {
        tracing::warn!(
            pref_id = record.preferred_identifier().unwrap_or(""),
            "No rems_identifier found for resource"
        );
        EtsinError::Upstream("no rems_identifier found for resource".to_string())
    })
}

#[derive(Debug, Deserialize)]
struct Application {
    #[serde(rename = "application/id", default)]
    id: Option<u64>,
    #[serde(rename = "application/state", default)]
    state: Option<String>,
    #[serde(rename = "application/resources", default)]
    resources: Vec<ApplicationResource>,
}

impl Application {
    fn is_for(&self, resource: &str) -> bool {
        self.resources
            .iter()
            .any(|r| r.ext_id.as_deref() == Some(resource))
    }

    fn normalized_state(&self) -> Option<&str> {
        self.state.as_deref().map(normalize_state)
    }
}

#[derive(Debug, Deserialize)]
struct ApplicationResource {
    #[serde(rename = "resource/ext-id", default)]
    ext_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogueItem {
    #[serde(rename = "catalogue-item/id", alias = "id")]
    id: u64,
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    success: bool,
    #[serde(rename = "application-id", default)]
    application_id: Option<u64>,
}

/// Pick the state for `resource` among the user's applications.
///
/// An approved application wins; otherwise the last listed one counts.
fn state_for_resource(applications: &[Application], resource: &str) -> Option<String> {
    let states: Vec<&str> = applications
        .iter()
        .filter(|app| app.is_for(resource))
        .filter_map(Application::normalized_state)
        .collect();

    states
        .iter()
        .find(|s| **s == APPROVED_STATE)
        .or(states.last())
        .map(|s| s.to_string())
}

/// Last application for `resource` that has not been finished.
fn open_application(applications: &[Application], resource: &str) -> Option<u64> {
    applications
        .iter()
        .filter(|app| app.is_for(resource))
        .filter(|app| {
            !app.normalized_state()
                .is_some_and(|state| FINISHED_STATES.contains(&state))
        })
        .filter_map(|app| app.id)
        .last()
}

/// Client for the REMS application API.
pub struct RemsClient {
    client: Client,
    base_url: String,
    api_key: String,
    owner_id: String,
}

impl RemsClient {
    /// Create a client from configuration.
    pub fn new(config: &RemsConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EtsinError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            owner_id: config.owner_id.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        user_id: &str,
        what: &str,
    ) -> Result<T> {
        let response = request
            .header("x-rems-api-key", &self.api_key)
            .header("x-rems-user-id", user_id)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, what, "REMS returned an unsuccessful status code");
            return Err(EtsinError::Upstream(format!("REMS returned {status} for {what}")));
        }
        Ok(response.json().await?)
    }

    async fn my_applications(&self, user_id: &str) -> Result<Vec<Application>> {
        self.send(self.client.get(self.url("my-applications")), user_id, "my-applications")
            .await
    }

    async fn create_user(&self, applicant: &Applicant) -> Result<()> {
        let response: CommandResponse = self
            .send(
                self.client.post(self.url("users")).json(applicant),
                &self.owner_id,
                "users",
            )
            .await?;
        if !response.success {
            return Err(EtsinError::Upstream("could not create REMS user".to_string()));
        }
        Ok(())
    }

    async fn catalogue_item(&self, resource: &str, user_id: &str) -> Result<u64> {
        let request = self
            .client
            .get(self.url("catalogue-items"))
            .query(&[("resource", resource)]);
        let items: Vec<CatalogueItem> = self.send(request, user_id, "catalogue-items").await?;

        items.first().map(|item| item.id).ok_or_else(|| {
            tracing::warn!(resource, "No catalogue item found for resource");
            EtsinError::Upstream("no catalogue item found for resource".to_string())
        })
    }

    async fn create_application(&self, catalogue_item: u64, user_id: &str) -> Result<u64> {
        let request = self
            .client
            .post(self.url("applications/create"))
            .json(&json!({ "catalogue-item-ids": [catalogue_item] }));
        let response: CommandResponse = self.send(request, user_id, "applications/create").await?;

        match response {
            CommandResponse {
                success: true,
                application_id: Some(id),
            } => Ok(id),
            _ => Err(EtsinError::Upstream("failed to create application".to_string())),
        }
    }
}

impl PermitSource for RemsClient {
    fn application_state<'a>(
        &'a self,
        record: &'a CatalogRecord,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            let Some(resource) = record.rems_identifier() else {
                tracing::warn!(
                    cr_id = record.identifier().unwrap_or(""),
                    "No rems_identifier found for resource"
                );
                return Ok(None);
            };

            let applications = self.my_applications(user_id).await?;
            Ok(state_for_resource(&applications, resource))
        })
    }

    fn apply<'a>(
        &'a self,
        record: &'a CatalogRecord,
        applicant: &'a Applicant,
    ) -> BoxFuture<'a, Result<u64>> {
        Box::pin(async move {
            let resource = rems_resource(record)?;
            let user_id = applicant.user_id.as_str();

            self.create_user(applicant).await?;

            let applications = self.my_applications(user_id).await?;
            if let Some(id) = open_application(&applications, resource) {
                tracing::info!(application_id = id, resource, "Using existing application");
                return Ok(id);
            }

            let catalogue_item = self.catalogue_item(resource, user_id).await?;
            let id = self.create_application(catalogue_item, user_id).await?;
            tracing::info!(
                application_id = id,
                pref_id = record.preferred_identifier().unwrap_or(""),
                "Created permit application"
            );
            Ok(id)
        })
    }
}

#[derive(Debug, Clone)]
struct StoredApplication {
    id: u64,
    state: String,
}

fn next_id<'a>(applications: impl Iterator<Item = &'a StoredApplication>) -> u64 {
    applications.map(|app| app.id).max().unwrap_or(0) + 1
}

/// A [`PermitSource`] backed by a map of `(user, resource)` to application.
#[derive(Debug, Default)]
pub struct InMemoryPermits {
    applications: RwLock<HashMap<(String, String), StoredApplication>>,
}

impl InMemoryPermits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an application state for a user and REMS resource.
    pub fn with_state(mut self, user_id: &str, resource: &str, state: &str) -> Self {
        let applications = self.applications.get_mut();
        let id = next_id(applications.values());
        applications.insert(
            (user_id.to_string(), resource.to_string()),
            StoredApplication {
                id,
                state: normalize_state(state).to_string(),
            },
        );
        self
    }
}

impl PermitSource for InMemoryPermits {
    fn application_state<'a>(
        &'a self,
        record: &'a CatalogRecord,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            let Some(resource) = record.rems_identifier() else {
                return Ok(None);
            };
            Ok(self
                .applications
                .read()
                .await
                .get(&(user_id.to_string(), resource.to_string()))
                .map(|app| app.state.clone()))
        })
    }

    fn apply<'a>(
        &'a self,
        record: &'a CatalogRecord,
        applicant: &'a Applicant,
    ) -> BoxFuture<'a, Result<u64>> {
        Box::pin(async move {
            let key = (applicant.user_id.clone(), rems_resource(record)?.to_string());
            let mut applications = self.applications.write().await;

            if let Some(app) = applications.get(&key) {
                if !FINISHED_STATES.contains(&app.state.as_str()) {
                    return Ok(app.id);
                }
            }

            let id = next_id(applications.values());
            applications.insert(
                key,
                StoredApplication {
                    id,
                    state: SUBMITTED_STATE.to_string(),
                },
            );
            Ok(id)
        })
    }
}
