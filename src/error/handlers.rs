//! Standardized mapping of registry HTTP responses to errors

use crate::error::RetagError;
use reqwest::StatusCode;

/// Standard error handler for HTTP responses
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Handle registry-related HTTP errors, keeping the status and a short operator hint
    pub fn handle_registry_error(
        status: StatusCode,
        error_text: &str,
        operation: &'static str,
    ) -> RetagError {
        let hint = match status.as_u16() {
            401 => "unauthorized, check credentials for this registry",
            403 => "forbidden, insufficient permissions",
            404 => "manifest or repository not found",
            429 => "rate limited by registry",
            500 => "registry server error",
            502..=504 => "registry unavailable",
            _ => "unexpected status",
        };

        let message = if error_text.trim().is_empty() {
            hint.to_string()
        } else {
            format!("{}: {}", hint, error_text.trim())
        };

        RetagError::Protocol {
            operation,
            status,
            message,
        }
    }

    /// Transport failures carry the operation for context
    pub fn handle_network_error(err: &reqwest::Error, operation: &str) -> RetagError {
        if err.is_connect() {
            RetagError::Network(format!("Connection failed during {}: {}", operation, err))
        } else if err.is_timeout() {
            RetagError::Network(format!("Timed out during {}: {}", operation, err))
        } else {
            RetagError::Network(format!("{} failed: {}", operation, err))
        }
    }
}
