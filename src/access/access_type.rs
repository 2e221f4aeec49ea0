//! Access type codes and the access-rights descriptor.

use serde::{Deserialize, Serialize};

/// Common prefix of the Fairdata access type code URIs.
pub const ACCESS_TYPE_URI_PREFIX: &str = "http://uri.suomi.fi/codelist/fairdata/access_type/code/";

/// The five canonical access types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessType {
    Open,
    Login,
    Embargo,
    Restricted,
    Permit,
}

impl AccessType {
    /// All access types.
    pub const ALL: [AccessType; 5] = [
        AccessType::Open,
        AccessType::Login,
        AccessType::Embargo,
        AccessType::Restricted,
        AccessType::Permit,
    ];

    /// Short code word.
    pub fn code(&self) -> &'static str {
        match self {
            AccessType::Open => "open",
            AccessType::Login => "login",
            AccessType::Embargo => "embargo",
            AccessType::Restricted => "restricted",
            AccessType::Permit => "permit",
        }
    }

    /// Full code URI as used by the catalog.
    pub fn uri(&self) -> String {
        format!("{}{}", ACCESS_TYPE_URI_PREFIX, self.code())
    }

    /// Parse a code URI or a bare code word.
    ///
    /// Returns `None` for anything else; callers treat that as restricted.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let code = identifier
            .strip_prefix(ACCESS_TYPE_URI_PREFIX)
            .unwrap_or(identifier);
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

/// Reference to an access type code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTypeRef {
    #[serde(default)]
    pub identifier: Option<String>,
}

/// Access-rights descriptor of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRights {
    #[serde(default)]
    pub access_type: Option<AccessTypeRef>,
    /// Embargo end date.
    #[serde(default)]
    pub available: Option<String>,
}

impl AccessRights {
    /// Descriptor with the given access type.
    pub fn new(access_type: AccessType) -> Self {
        Self {
            access_type: Some(AccessTypeRef {
                identifier: Some(access_type.uri()),
            }),
            available: None,
        }
    }

    /// Embargoed descriptor available from `available`.
    pub fn embargo(available: impl Into<String>) -> Self {
        Self {
            available: Some(available.into()),
            ..Self::new(AccessType::Embargo)
        }
    }

    /// Raw access type identifier.
    pub fn access_type_identifier(&self) -> Option<&str> {
        self.access_type
            .as_ref()
            .and_then(|t| t.identifier.as_deref())
    }

    /// Recognized access type, `None` if missing or unknown.
    pub fn access_type(&self) -> Option<AccessType> {
        self.access_type_identifier()
            .and_then(AccessType::from_identifier)
    }
}
