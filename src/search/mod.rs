//! Search query handling.

mod query;

pub use query::{identifier_token, transform, ATT_URN_PREFIX};
