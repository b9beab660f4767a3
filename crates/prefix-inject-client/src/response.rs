//! Forwarder management responses.
//!
//! The forwarder answers every insertion command with a ControlResponse:
//! `{status_code, status_text}`. 200 means the command was accepted; any
//! other code is a rejection the caller may retry explicitly. The schema is
//! externally fixed; it is decoded here but not defined here.

use std::fmt;

use prefix_inject_core::{tlv, TlvReader, ValidationError};

use crate::error::TransportError;

/// ControlResponse outer element.
pub const TLV_CONTROL_RESPONSE: u64 = 0x65;
/// StatusCode field.
pub const TLV_STATUS_CODE: u64 = 0x66;
/// StatusText field.
pub const TLV_STATUS_TEXT: u64 = 0x67;

/// Status code for an accepted command.
pub const STATUS_OK: u64 = 200;

/// A decoded forwarder control response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlResponse {
    pub status_code: u64,
    pub status_text: String,
}

impl ControlResponse {
    /// Encode as a reply payload (used by test forwarders).
    pub fn encode(&self) -> Vec<u8> {
        let mut inner = Vec::new();
        tlv::write_uint_tlv(&mut inner, TLV_STATUS_CODE, self.status_code);
        tlv::write_tlv(&mut inner, TLV_STATUS_TEXT, self.status_text.as_bytes());
        let mut out = Vec::new();
        tlv::write_tlv(&mut out, TLV_CONTROL_RESPONSE, &inner);
        out
    }

    /// Decode a reply payload.
    ///
    /// A payload that does not match the response schema raises
    /// [`ValidationError`]; this is a local decoding failure, distinct from
    /// the transport-level outcomes that are recovered into results.
    pub fn decode(bytes: &[u8]) -> Result<Self, ValidationError> {
        let mut outer = TlvReader::new(bytes);
        let inner = outer.expect_element(TLV_CONTROL_RESPONSE)?;

        let mut reader = TlvReader::new(inner);
        let status_code = tlv::decode_uint(reader.expect_element(TLV_STATUS_CODE)?)?;
        let text_bytes = reader.expect_element(TLV_STATUS_TEXT)?;
        let status_text = std::str::from_utf8(text_bytes)
            .map_err(|_| ValidationError::ResponseSchema("status text is not UTF-8".into()))?
            .to_string();

        Ok(Self { status_code, status_text })
    }
}

/// Outcome of one insertion command.
///
/// Every call produces one of these; rejections and transport failures are
/// values, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionResult {
    /// Status code from the forwarder, or 0 when no reply arrived.
    pub status_code: u64,
    /// Human-readable diagnostic.
    pub status_text: String,
    /// True only for status code 200.
    pub succeeded: bool,
}

impl InsertionResult {
    /// Result from a decoded forwarder response.
    pub fn from_response(response: ControlResponse) -> Self {
        Self {
            succeeded: response.status_code == STATUS_OK,
            status_code: response.status_code,
            status_text: response.status_text,
        }
    }

    /// Failed result from a transport-level outcome.
    pub fn from_transport_failure(error: &TransportError) -> Self {
        Self {
            status_code: 0,
            status_text: error.to_string(),
            succeeded: false,
        }
    }
}

impl fmt::Display for InsertionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.succeeded {
            write!(f, "accepted: {} {}", self.status_code, self.status_text)
        } else if self.status_code == 0 {
            write!(f, "failed: {}", self.status_text)
        } else {
            write!(f, "rejected: {} {}", self.status_code, self.status_text)
        }
    }
}
