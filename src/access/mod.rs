//! Dataset access control.
//!
//! This module decides which data affordances a caller gets for a dataset:
//! - Access type codes and the access-rights descriptor from the catalog
//! - The restrictions state machine (open, login, embargo, restricted, permit)
//! - Permit status derived from the caller's REMS application

mod access_type;
mod permit;
mod restrictions;

pub use access_type::{AccessRights, AccessType, AccessTypeRef, ACCESS_TYPE_URI_PREFIX};
pub use permit::{PermitStatus, APPROVED_STATE};
pub use restrictions::{compute_restrictions, compute_restrictions_at, AccessRestrictions};
