//! Qvain dataset submission.
//!
//! The authoring form is posted as JSON. Before it goes to the catalog the
//! submission is assigned a data catalog and stamped with the metadata
//! provider taken from the caller's token. Field-level validation of the
//! form is left to the catalog.

use serde_json::{json, Map, Value};

use crate::catalog::{ATT_CATALOG, IDA_CATALOG};
use crate::{EtsinError, Result};

/// Error message for submissions without a known provider.
pub const MISSING_PROVIDER: &str = "The Metadata provider is not specified";

/// User and organization that provide a dataset's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataProvider {
    pub user: String,
    pub organization: String,
}

impl MetadataProvider {
    /// Build a provider if both parts are known and non-empty.
    pub fn from_parts(user: Option<&str>, organization: Option<&str>) -> Option<Self> {
        match (user, organization) {
            (Some(user), Some(organization)) if !user.is_empty() && !organization.is_empty() => {
                Some(Self {
                    user: user.to_string(),
                    organization: organization.to_string(),
                })
            }
            _ => None,
        }
    }
}

fn has(form: &Map<String, Value>, key: &str) -> bool {
    form.get(key).is_some_and(|v| !v.is_null())
}

/// Choose the data catalog for a submission.
///
/// Remote resources alone go to ATT, IDA files or directories alone go to
/// IDA. A dataset with no data, or with both kinds, goes to ATT.
pub fn select_data_catalog(form: &Map<String, Value>) -> &'static str {
    let remote = has(form, "remote_resources");
    let ida = has(form, "files") || has(form, "directories");

    match (remote, ida) {
        (false, true) => IDA_CATALOG,
        _ => ATT_CATALOG,
    }
}

/// Turn a form into a catalog payload.
///
/// # Errors
///
/// * `Validation` if the form is not a JSON object
/// * `Auth` with [`MISSING_PROVIDER`] if no provider is known
pub fn prepare_submission(form: Value, provider: Option<&MetadataProvider>) -> Result<Value> {
    let Value::Object(form) = form else {
        return Err(EtsinError::Validation("dataset form must be a JSON object".to_string()));
    };
    let Some(provider) = provider else {
        tracing::warn!("{MISSING_PROVIDER}");
        return Err(EtsinError::Auth(MISSING_PROVIDER.to_string()));
    };

    let data_catalog = select_data_catalog(&form);
    tracing::debug!(data_catalog, user = %provider.user, "Preparing dataset submission");

    Ok(json!({
        "data_catalog": data_catalog,
        "metadata_provider_user": provider.user,
        "metadata_provider_org": provider.organization,
        "research_dataset": Value::Object(form),
    }))
}

/// Turn a Qvain edit form into a partial update of an existing dataset.
///
/// Same as [`prepare_submission`] except that the data catalog is left as
/// stored, since a dataset cannot move between catalogs.
pub fn prepare_update(form: Value, provider: Option<&MetadataProvider>) -> Result<Value> {
    let mut payload = prepare_submission(form, provider)?;
    if let Some(object) = payload.as_object_mut() {
        object.remove("data_catalog");
    }
    Ok(payload)
}
