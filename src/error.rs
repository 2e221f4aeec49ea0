//! Error types for Etsin.

use thiserror::Error;

use crate::files::TreeError;

/// Common error type for Etsin.
#[derive(Error, Debug)]
pub enum EtsinError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A collaborator service (Metax, REMS, download service) failed.
    ///
    /// These are surfaced to the caller as-is; nothing in the crate retries them.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// File tree construction error.
    #[error("file tree error: {0}")]
    Tree(#[from] TreeError),
}

impl From<reqwest::Error> for EtsinError {
    fn from(e: reqwest::Error) -> Self {
        EtsinError::Upstream(e.to_string())
    }
}

/// Result type alias for Etsin operations.
pub type Result<T> = std::result::Result<T, EtsinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = EtsinError::Auth("token expired".to_string());
        assert_eq!(err.to_string(), "authentication error: token expired");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = EtsinError::NotFound("catalog record".to_string());
        assert_eq!(err.to_string(), "catalog record not found");
    }

    #[test]
    fn test_upstream_error_display() {
        let err = EtsinError::Upstream("metax returned 503".to_string());
        assert_eq!(err.to_string(), "upstream error: metax returned 503");
    }

    #[test]
    fn test_tree_error_conversion() {
        let err: EtsinError = TreeError::EmptyTree.into();
        assert!(matches!(err, EtsinError::Tree(TreeError::EmptyTree)));
        assert!(err.to_string().starts_with("file tree error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EtsinError = io_err.into();
        assert!(matches!(err, EtsinError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(EtsinError::Validation("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
