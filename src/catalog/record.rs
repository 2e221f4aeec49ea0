//! Read-only view over a Metax catalog record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::access::{AccessRights, AccessType};
use crate::files::{combine, DirectoryRecord, Entry, FileRecord};
use crate::{EtsinError, Result};

/// Catalog for datasets whose data lives in IDA.
pub const IDA_CATALOG: &str = "urn:nbn:fi:att:data-catalog-ida";

/// Catalog for datasets with remote resources or no data.
pub const ATT_CATALOG: &str = "urn:nbn:fi:att:data-catalog-att";

/// A dataset record as stored in Metax.
///
/// The record is kept as JSON so fields this crate does not know about pass
/// through to clients unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogRecord(Value);

impl CatalogRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Metax identifier of the record.
    pub fn identifier(&self) -> Option<&str> {
        self.0.get("identifier").and_then(Value::as_str)
    }

    fn research_dataset(&self) -> Option<&Value> {
        self.0.get("research_dataset")
    }

    /// Persistent identifier of the dataset.
    pub fn preferred_identifier(&self) -> Option<&str> {
        self.research_dataset()?
            .get("preferred_identifier")
            .and_then(Value::as_str)
    }

    /// User id of whoever submitted the dataset through Qvain.
    pub fn metadata_provider_user(&self) -> Option<&str> {
        self.0.get("metadata_provider_user").and_then(Value::as_str)
    }

    /// Identifier of the matching REMS resource.
    pub fn rems_identifier(&self) -> Option<&str> {
        self.0.get("rems_identifier").and_then(Value::as_str)
    }

    /// Access-rights descriptor; empty (and thus restricted) if absent or malformed.
    pub fn access_rights(&self) -> AccessRights {
        let Some(value) = self.research_dataset().and_then(|rd| rd.get("access_rights")) else {
            return AccessRights::default();
        };
        AccessRights::deserialize(value).unwrap_or_else(|e| {
            tracing::warn!(cr_id = self.identifier().unwrap_or(""), error = %e, "Malformed access rights");
            AccessRights::default()
        })
    }

    /// Whether access is managed through REMS permits.
    pub fn is_rems_managed(&self) -> bool {
        self.access_rights().access_type() == Some(AccessType::Permit)
    }

    fn list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.research_dataset().and_then(|rd| rd.get(key)) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => Vec::<T>::deserialize(value)
                .map_err(|e| EtsinError::Upstream(format!("malformed {key} in catalog record: {e}"))),
        }
    }

    /// Files embedded in the record.
    pub fn files(&self) -> Result<Vec<FileRecord>> {
        self.list("files")
    }

    /// Directories embedded in the record.
    pub fn directories(&self) -> Result<Vec<DirectoryRecord>> {
        self.list("directories")
    }

    /// Whether the record has IDA files or directories.
    pub fn has_ida_data(&self) -> bool {
        ["files", "directories"].into_iter().any(|key| {
            self.research_dataset()
                .and_then(|rd| rd.get(key))
                .and_then(Value::as_array)
                .is_some_and(|items| !items.is_empty())
        })
    }

    /// Remove personal contact details unless the caller is logged in.
    ///
    /// Contact fields are dropped at any depth of the research dataset, and
    /// the REMS access granter goes with them.
    pub fn strip_sensitive(&mut self, is_authenticated: bool) {
        if is_authenticated {
            return;
        }
        if let Some(rd) = self.0.get_mut("research_dataset") {
            remove_keys(rd, &CONTACT_KEYS);
        }
        if let Some(record) = self.0.as_object_mut() {
            record.remove("access_granter");
        }
    }

    /// Drop the access URLs of embedded files and directories.
    pub fn hide_access_urls(&mut self) {
        let Some(rd) = self.0.get_mut("research_dataset") else {
            return;
        };
        for key in ["files", "directories"] {
            if let Some(Value::Array(items)) = rd.get_mut(key) {
                for item in items.iter_mut().filter_map(Value::as_object_mut) {
                    item.remove("access_url");
                }
            }
        }
    }

    /// Sort remote resources by title, directories and files by name.
    pub fn sort_data_items(&mut self) {
        let Some(rd) = self.0.get_mut("research_dataset") else {
            return;
        };
        for (key, pointer) in [
            ("remote_resources", "/title"),
            ("directories", "/details/directory_name"),
            ("files", "/details/file_name"),
        ] {
            if let Some(Value::Array(items)) = rd.get_mut(key) {
                items.sort_by(|a, b| sort_key(a, pointer).cmp(&sort_key(b, pointer)));
            }
        }
    }

    /// Embedded files and directories as tree entries, files first.
    pub fn entries(&self, language: &str) -> Result<Vec<Entry>> {
        Ok(combine(self.files()?, self.directories()?, language)?)
    }
}

/// Keys holding personal contact details.
const CONTACT_KEYS: [&str; 3] = ["email", "telephone", "phone"];

fn remove_keys(value: &mut Value, keys: &[&str]) {
    match value {
        Value::Object(map) => {
            for key in keys {
                map.remove(*key);
            }
            for child in map.values_mut() {
                remove_keys(child, keys);
            }
        }
        Value::Array(items) => {
            for item in items {
                remove_keys(item, keys);
            }
        }
        _ => {}
    }
}

fn sort_key<'a>(item: &'a Value, pointer: &str) -> Option<&'a str> {
    item.pointer(pointer).and_then(Value::as_str)
}
