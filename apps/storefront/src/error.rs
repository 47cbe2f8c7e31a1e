//! # View Error Type
//!
//! Unified error type for view actions.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  View action (submit, delete, purchase, ...)                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Validation Error? ─── ValidationError ─────────┐                      │
//! │         │               (no request issued)     │                      │
//! │         ▼                                       ▼                      │
//! │  Gateway Error? ────── ClientError ──────────► ViewError ──► Notice    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ─────────────────────────────────────────────────► Notice     │
//! │                                                                         │
//! │  Errors never leave the view that triggered them.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use sweetshop_client::ClientError;
use sweetshop_core::ValidationError;

/// Result type alias for view actions.
pub type ViewResult<T> = Result<T, ViewError>;

/// Why a view action did not complete.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Rejected before any request was issued.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The gateway call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The user declined the confirmation prompt.
    #[error("Cancelled")]
    Cancelled,
}

impl ViewError {
    /// Text shown after a notice prefix such as "Error saving sweet: ".
    ///
    /// Prefers the server's own explanation when it sent one.
    pub fn detail(&self) -> String {
        match self {
            ViewError::Client(err) => err
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string()),
            other => other.to_string(),
        }
    }

    /// True when no request reached the network.
    pub fn is_local(&self) -> bool {
        matches!(self, ViewError::Validation(_) | ViewError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_prefers_server_message() {
        let err: ViewError = ClientError::Status {
            status: 400,
            message: Some("Name already exists".into()),
        }
        .into();
        assert_eq!(err.detail(), "Name already exists");
        assert!(!err.is_local());

        let err: ViewError = ClientError::Transport("connection refused".into()).into();
        assert_eq!(err.detail(), "Network error: connection refused");
    }

    #[test]
    fn test_validation_detail() {
        let err: ViewError = ValidationError::Required {
            field: "name".into(),
        }
        .into();
        assert_eq!(err.detail(), "name is required");
        assert!(err.is_local());
    }
}
