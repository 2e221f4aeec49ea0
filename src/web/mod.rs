//! Web API module for Etsin.
//!
//! REST endpoints for dataset pages, folder drill-down, identifier search,
//! downloads and Qvain submissions.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
