//! In-memory catalog.

use std::collections::HashMap;

use futures::future::BoxFuture;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CatalogRecord, CatalogSource, DatasetPage, Paging};
use crate::files::DirectoryListing;
use crate::search::ATT_URN_PREFIX;
use crate::{EtsinError, Result};

/// A [`CatalogSource`] backed by maps, for tests and local development.
#[derive(Default)]
pub struct InMemoryCatalog {
    records: RwLock<HashMap<String, CatalogRecord>>,
    directories: RwLock<HashMap<(String, String), DirectoryListing>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, keyed by its `identifier`.
    pub fn with_record(mut self, record: Value) -> Self {
        let record = CatalogRecord::new(record);
        let id = record.identifier().unwrap_or_default().to_string();
        self.records.get_mut().insert(id, record);
        self
    }

    /// Add the contents of one folder of a record.
    pub fn with_directory(mut self, cr_id: &str, dir_id: &str, listing: DirectoryListing) -> Self {
        self.directories
            .get_mut()
            .insert((cr_id.to_string(), dir_id.to_string()), listing);
        self
    }

}

/// Keys a partial update may not overwrite.
const PROTECTED_KEYS: [&str; 2] = ["identifier", "metadata_provider_user"];

fn merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge(existing, value)
                    }
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

impl CatalogSource for InMemoryCatalog {
    fn get_catalog_record<'a>(&'a self, cr_id: &'a str) -> BoxFuture<'a, Result<CatalogRecord>> {
        Box::pin(async move {
            self.records
                .read()
                .await
                .get(cr_id)
                .cloned()
                .ok_or_else(|| EtsinError::NotFound("catalog record".to_string()))
        })
    }

    fn get_directory<'a>(
        &'a self,
        cr_id: &'a str,
        dir_id: &'a str,
    ) -> BoxFuture<'a, Result<DirectoryListing>> {
        Box::pin(async move {
            self.directories
                .read()
                .await
                .get(&(cr_id.to_string(), dir_id.to_string()))
                .cloned()
                .ok_or_else(|| EtsinError::NotFound("directory".to_string()))
        })
    }

    fn create_dataset(&self, mut payload: Value) -> BoxFuture<'_, Result<CatalogRecord>> {
        Box::pin(async move {
            let Some(object) = payload.as_object_mut() else {
                return Err(EtsinError::Validation("dataset must be a JSON object".to_string()));
            };

            let id = Uuid::new_v4().to_string();
            object.insert("identifier".to_string(), json!(id));
            let research_dataset = object
                .entry("research_dataset")
                .or_insert_with(|| json!({}));
            if let Some(rd) = research_dataset.as_object_mut() {
                rd.insert(
                    "preferred_identifier".to_string(),
                    json!(format!("{ATT_URN_PREFIX}{id}")),
                );
            }

            let record = CatalogRecord::new(payload);
            self.records.write().await.insert(id, record.clone());
            Ok(record)
        })
    }

    fn update_dataset<'a>(
        &'a self,
        cr_id: &'a str,
        mut payload: Value,
    ) -> BoxFuture<'a, Result<CatalogRecord>> {
        Box::pin(async move {
            let Some(object) = payload.as_object_mut() else {
                return Err(EtsinError::Validation("dataset must be a JSON object".to_string()));
            };
            for key in PROTECTED_KEYS {
                object.remove(key);
            }
            if let Some(rd) = object.get_mut("research_dataset").and_then(Value::as_object_mut) {
                rd.remove("preferred_identifier");
            }

            let mut records = self.records.write().await;
            let stored = records
                .remove(cr_id)
                .ok_or_else(|| EtsinError::NotFound("catalog record".to_string()))?;

            let mut value = stored.into_value();
            merge(&mut value, payload);
            let record = CatalogRecord::new(value);
            records.insert(cr_id.to_string(), record.clone());
            Ok(record)
        })
    }

    fn get_user_datasets<'a>(
        &'a self,
        user: &'a str,
        paging: Paging,
    ) -> BoxFuture<'a, Result<DatasetPage>> {
        Box::pin(async move {
            let records = self.records.read().await;
            let mut matches: Vec<&CatalogRecord> = records
                .values()
                .filter(|r| r.metadata_provider_user() == Some(user))
                .collect();
            matches.sort_by(|a, b| a.identifier().cmp(&b.identifier()));

            let count = matches.len() as u64;
            let results = matches
                .into_iter()
                .skip(paging.offset.unwrap_or(0))
                .take(paging.limit.unwrap_or(usize::MAX))
                .cloned()
                .collect();
            Ok(DatasetPage { count, results })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_catalog_record() {
        let catalog = InMemoryCatalog::new().with_record(json!({ "identifier": "cr1" }));

        let record = catalog.get_catalog_record("cr1").await.unwrap();
        assert_eq!(record.identifier(), Some("cr1"));

        let missing = catalog.get_catalog_record("nope").await;
        assert!(matches!(missing, Err(EtsinError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_directory() {
        let catalog = InMemoryCatalog::new().with_directory("cr1", "d1", DirectoryListing::default());

        let listing = catalog.get_directory("cr1", "d1").await.unwrap();
        assert!(listing.files.is_empty());
        assert!(listing.directories.is_empty());
        assert!(catalog.get_directory("cr2", "d1").await.is_err());
    }

    #[tokio::test]
    async fn test_create_dataset_assigns_identifiers() {
        let catalog = InMemoryCatalog::new();

        let record = catalog
            .create_dataset(json!({ "research_dataset": { "title": { "en": "Test" } } }))
            .await
            .unwrap();

        let id = record.identifier().unwrap().to_string();
        assert_eq!(record.preferred_identifier(), Some(format!("urn:nbn:fi:att:{id}").as_str()));
        assert_eq!(record.into_value()["research_dataset"]["title"]["en"], "Test");

        assert!(catalog.get_catalog_record(&id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_dataset_merges_and_keeps_identifiers() {
        let catalog = InMemoryCatalog::new().with_record(json!({
            "identifier": "cr1",
            "metadata_provider_user": "teppo",
            "research_dataset": {
                "preferred_identifier": "urn:nbn:fi:att:cr1",
                "title": { "en": "Old", "fi": "Vanha" }
            }
        }));

        let record = catalog
            .update_dataset(
                "cr1",
                json!({
                    "identifier": "other",
                    "metadata_provider_user": "mallory",
                    "research_dataset": {
                        "preferred_identifier": "urn:nbn:fi:att:other",
                        "title": { "en": "New" }
                    }
                }),
            )
            .await
            .unwrap();

        assert_eq!(record.identifier(), Some("cr1"));
        assert_eq!(record.metadata_provider_user(), Some("teppo"));
        assert_eq!(record.preferred_identifier(), Some("urn:nbn:fi:att:cr1"));
        let value = record.clone().into_value();
        let title = &value["research_dataset"]["title"];
        assert_eq!(title["en"], "New");
        assert_eq!(title["fi"], "Vanha");

        let stored = catalog.get_catalog_record("cr1").await.unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_update_dataset_errors() {
        let catalog = InMemoryCatalog::new().with_record(json!({ "identifier": "cr1" }));

        let missing = catalog.update_dataset("nope", json!({})).await;
        assert!(matches!(missing, Err(EtsinError::NotFound(_))));

        let invalid = catalog.update_dataset("cr1", json!("title")).await;
        assert!(matches!(invalid, Err(EtsinError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_user_datasets_pages() {
        let catalog = InMemoryCatalog::new()
            .with_record(json!({ "identifier": "c", "metadata_provider_user": "teppo" }))
            .with_record(json!({ "identifier": "a", "metadata_provider_user": "teppo" }))
            .with_record(json!({ "identifier": "b", "metadata_provider_user": "teppo" }))
            .with_record(json!({ "identifier": "x", "metadata_provider_user": "matti" }));

        let all = catalog.get_user_datasets("teppo", Paging::default()).await.unwrap();
        assert_eq!(all.count, 3);
        let ids: Vec<_> = all.results.iter().filter_map(|r| r.identifier()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let page = catalog
            .get_user_datasets(
                "teppo",
                Paging {
                    limit: Some(1),
                    offset: Some(1),
                },
            )
            .await
            .unwrap();
        assert_eq!(page.count, 3);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].identifier(), Some("b"));

        let none = catalog.get_user_datasets("nobody", Paging::default()).await.unwrap();
        assert_eq!(none, DatasetPage::default());
    }

    #[tokio::test]
    async fn test_create_dataset_rejects_non_object() {
        let catalog = InMemoryCatalog::new();
        let result = catalog.create_dataset(json!([1, 2, 3])).await;
        assert!(matches!(result, Err(EtsinError::Validation(_))));
    }
}
