//! Error types for the injection client.

use thiserror::Error;

use prefix_inject_core::{SigningError, ValidationError};

/// Transport-level failures for one request/reply exchange.
///
/// These never propagate out of [`crate::InjectionClient::insert`]; they are
/// converted into a failed [`crate::InsertionResult`] at that boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request was negatively acknowledged by the network.
    #[error("negative acknowledgement (reason {reason})")]
    Nack { reason: u64 },

    /// No reply arrived within the request lifetime.
    #[error("request timed out")]
    Timeout,

    /// The awaited reply was cancelled by the caller.
    #[error("request cancelled")]
    Cancelled,

    /// The reply failed transport-level validation.
    #[error("reply failed validation: {0}")]
    ValidationFailure(String),
}

/// Errors that [`crate::InjectionClient::insert`] raises to the caller.
///
/// Only malformed input and signer failure raise; every network outcome is
/// surfaced as a result value instead.
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("signing error: {0}")]
    Signing(#[from] SigningError),
}

/// Result type for injection operations.
pub type Result<T> = std::result::Result<T, InjectError>;
