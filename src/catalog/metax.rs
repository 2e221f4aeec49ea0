//! Metax REST client.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::{CatalogRecord, CatalogSource, DatasetPage, Paging};
use crate::config::MetaxConfig;
use crate::files::DirectoryListing;
use crate::{EtsinError, Result};

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// User agent string for catalog requests.
const USER_AGENT: &str = "Etsin/0.1 (Metax client)";

/// Client for the Metax catalog API.
pub struct MetaxClient {
    client: Client,
    base_url: String,
    user: String,
    password: String,
}

impl MetaxClient {
    /// Create a client from configuration.
    pub fn new(config: &MetaxConfig) -> Result<Self> {
        Url::parse(&config.base_url)
            .map_err(|e| EtsinError::Config(format!("invalid metax.base_url: {e}")))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| EtsinError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    /// URL of a catalog record with file details embedded.
    pub fn dataset_url(&self, cr_id: &str) -> String {
        format!(
            "{}/rest/datasets/{}?file_details",
            self.base_url,
            urlencoding::encode(cr_id)
        )
    }

    /// URL of one folder's contents, scoped to a catalog record.
    pub fn directory_url(&self, cr_id: &str, dir_id: &str) -> String {
        format!(
            "{}/rest/directories/{}/files?cr_identifier={}",
            self.base_url,
            urlencoding::encode(dir_id),
            urlencoding::encode(cr_id)
        )
    }

    fn datasets_url(&self) -> String {
        format!("{}/rest/datasets", self.base_url)
    }

    fn update_url(&self, cr_id: &str) -> String {
        format!("{}/{}", self.datasets_url(), urlencoding::encode(cr_id))
    }

    /// URL listing the datasets a user has submitted.
    pub fn user_datasets_url(&self, user: &str, paging: Paging) -> String {
        let mut url = format!(
            "{}?metadata_provider_user={}",
            self.datasets_url(),
            urlencoding::encode(user)
        );
        if let Some(limit) = paging.limit {
            url.push_str(&format!("&limit={limit}"));
        }
        if let Some(offset) = paging.offset {
            url.push_str(&format!("&offset={offset}"));
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        if self.user.is_empty() {
            request
        } else {
            request.basic_auth(&self.user, Some(&self.password))
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(EtsinError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            tracing::warn!(%status, what, "Metax returned an unsuccessful status code");
            return Err(EtsinError::Upstream(format!("metax returned {status} for {what}")));
        }

        Ok(response.json().await?)
    }
}

impl CatalogSource for MetaxClient {
    fn get_catalog_record<'a>(&'a self, cr_id: &'a str) -> BoxFuture<'a, Result<CatalogRecord>> {
        Box::pin(async move {
            let url = self.dataset_url(cr_id);
            tracing::debug!(%url, "Fetching catalog record");
            let value: Value = self.send(self.client.get(&url), "catalog record").await?;
            Ok(CatalogRecord::new(value))
        })
    }

    fn get_directory<'a>(
        &'a self,
        cr_id: &'a str,
        dir_id: &'a str,
    ) -> BoxFuture<'a, Result<DirectoryListing>> {
        Box::pin(async move {
            let url = self.directory_url(cr_id, dir_id);
            tracing::debug!(%url, "Fetching directory");
            self.send(self.client.get(&url), "directory").await
        })
    }

    fn create_dataset(&self, payload: Value) -> BoxFuture<'_, Result<CatalogRecord>> {
        Box::pin(async move {
            let request = self.client.post(self.datasets_url()).json(&payload);
            let value: Value = self.send(request, "datasets endpoint").await?;
            if let Some(id) = value.get("identifier").and_then(Value::as_str) {
                tracing::info!(cr_id = id, "Dataset created");
            }
            Ok(CatalogRecord::new(value))
        })
    }

    fn update_dataset<'a>(
        &'a self,
        cr_id: &'a str,
        payload: Value,
    ) -> BoxFuture<'a, Result<CatalogRecord>> {
        Box::pin(async move {
            let request = self.client.patch(self.update_url(cr_id)).json(&payload);
            let value: Value = self.send(request, "catalog record").await?;
            tracing::info!(cr_id, "Dataset updated");
            Ok(CatalogRecord::new(value))
        })
    }

    fn get_user_datasets<'a>(
        &'a self,
        user: &'a str,
        paging: Paging,
    ) -> BoxFuture<'a, Result<DatasetPage>> {
        Box::pin(async move {
            let url = self.user_datasets_url(user, paging);
            tracing::debug!(%url, "Fetching user datasets");
            self.send(self.client.get(&url), "user datasets").await
        })
    }
}
