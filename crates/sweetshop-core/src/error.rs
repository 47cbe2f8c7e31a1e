//! # Error Types
//!
//! Domain-specific error types for sweetshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sweetshop-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Form input rejected before any request         │
//! │                                                                         │
//! │  sweetshop-client errors (separate crate)                              │
//! │  └── ClientError      - Transport, HTTP status, decoding, config       │
//! │                                                                         │
//! │  storefront errors (app)                                               │
//! │  └── ViewError        - What the notice banner shows                   │
//! │                                                                         │
//! │  Flow: ValidationError → ViewError ← ClientError                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors that are not tied to a single form field.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Role string from the backend that the storefront does not know.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by [`crate::validation`] before the gateway is ever touched, so a
/// rejected form never costs a round trip.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters long")]
    TooShort { field: String, min: usize },

    /// Value must be positive.
    #[error("{field} must be at least 1")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g. "abc" typed into a price field).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree do not.
    #[error("{field} do not match")]
    Mismatch { field: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
