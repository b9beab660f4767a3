//! Error types for the prefix-inject core.

use thiserror::Error;

/// Errors raised while encoding or decoding TLV structures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("truncated TLV header")]
    TruncatedHeader,

    #[error("truncated TLV value: need {need} bytes, have {have}")]
    TruncatedValue { need: usize, have: usize },

    #[error("unexpected TLV type: expected {expected:#x}, got {got:#x}")]
    UnexpectedType { expected: u64, got: u64 },

    #[error("invalid non-negative integer length: {0}")]
    InvalidIntegerLength(usize),

    #[error("malformed data packet: {0}")]
    MalformedData(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Validation errors for names and response schemas.
///
/// These are the only decode-side errors that propagate to callers of the
/// injection client; everything network-related is recovered into a result.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("malformed name: {0}")]
    MalformedName(String),

    #[error("malformed name component: {0}")]
    MalformedComponent(String),

    #[error("response schema mismatch: {0}")]
    ResponseSchema(String),
}

/// Errors raised when a signer cannot produce a signature.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("signature generation failed: {0}")]
    SignatureFailed(String),

    #[error("unsupported signature type: {0}")]
    UnsupportedSigType(String),

    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),
}

impl From<CoreError> for ValidationError {
    fn from(e: CoreError) -> Self {
        ValidationError::ResponseSchema(e.to_string())
    }
}
