//! Permit status of the caller.

use serde::Serialize;

/// Application state that grants a permit.
pub const APPROVED_STATE: &str = "approved";

/// Whether the caller holds a permit, and the state of their application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermitStatus {
    pub has_permit: bool,
    /// Opaque application state from REMS.
    pub application_state: Option<String>,
}

impl PermitStatus {
    /// No application and no permit.
    pub fn none() -> Self {
        Self::default()
    }

    /// Derive the status from an application state.
    pub fn from_application_state(state: Option<String>) -> Self {
        Self {
            has_permit: state.as_deref() == Some(APPROVED_STATE),
            application_state: state,
        }
    }
}
