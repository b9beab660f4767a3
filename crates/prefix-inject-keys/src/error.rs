//! Error types for key and certificate text parsing.

use thiserror::Error;

use prefix_inject_core::{CoreError, SigningError, ValidationError};

/// Errors raised while parsing key/certificate text or pairing them.
///
/// All of these are local validation failures: they occur before any
/// network call is attempted.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("malformed key text: {0}")]
    Malformed(String),

    #[error("missing header field: {0}")]
    MissingHeader(&'static str),

    #[error("unsupported signature type: {0}")]
    UnsupportedSigType(String),

    #[error("certificate does not match key: key={key}, cert signer={cert_signer}")]
    CertKeyMismatch { key: String, cert_signer: String },

    #[error("invalid base64 body: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid name in header: {0}")]
    Name(#[from] ValidationError),

    #[error("key body is not a valid data packet: {0}")]
    KeyData(#[from] CoreError),

    #[error("key material rejected: {0}")]
    Signing(#[from] SigningError),
}

/// Result type for key operations.
pub type Result<T> = std::result::Result<T, KeyError>;
