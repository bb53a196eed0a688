//! Error types and handlers for retag operations

pub mod handlers;

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RetagError>;

#[derive(Debug, Error)]
pub enum RetagError {
    /// Credential store exists but could not be read or parsed
    #[error("Credential resolution error at {}: {message}", .path.display())]
    Resolution { path: PathBuf, message: String },

    /// Transport-level failure reaching the registry
    #[error("Network error: {0}")]
    Network(String),

    /// Registry answered with an unexpected HTTP status
    #[error("Registry error during {operation}: HTTP {status} - {message}")]
    Protocol {
        operation: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },

    /// Response body is not a schema 2 manifest
    #[error("Manifest decode error: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(String),

    /// A single target failed to receive the manifest
    #[error("Failed to publish {target}: {source}")]
    Publish {
        target: String,
        #[source]
        source: Box<RetagError>,
    },

    #[error("Upload worker failed: {0}")]
    Worker(String),
}

impl RetagError {
    /// HTTP status carried by the error, looking through publish wrappers
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            RetagError::Protocol { status, .. } => Some(*status),
            RetagError::Publish { source, .. } => source.status(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RetagError {
    fn from(err: std::io::Error) -> Self {
        RetagError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for RetagError {
    fn from(err: reqwest::Error) -> Self {
        RetagError::Network(err.to_string())
    }
}

impl From<url::ParseError> for RetagError {
    fn from(err: url::ParseError) -> Self {
        RetagError::Validation(err.to_string())
    }
}

impl From<tokio::task::JoinError> for RetagError {
    fn from(err: tokio::task::JoinError) -> Self {
        RetagError::Worker(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_through_publish_wrapper() {
        let err = RetagError::Publish {
            target: "registry.example.com/app:v2".to_string(),
            source: Box::new(RetagError::Protocol {
                operation: "manifest publish",
                status: StatusCode::FORBIDDEN,
                message: "denied".to_string(),
            }),
        };
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert!(err.to_string().contains("registry.example.com/app:v2"));
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_resolution_display_includes_path() {
        let err = RetagError::Resolution {
            path: PathBuf::from("/home/ci/.docker/config.json"),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.to_string().contains("/home/ci/.docker/config.json"));
        assert_eq!(err.status(), None);
    }
}
