//! Fenced text blocks for keys and certificates.
//!
//! The external format is a PEM-like block:
//!
//! ```text
//! -----BEGIN NDN KEY-----
//! Name: /alice/KEY/1
//! SigType: Ed25519
//!
//! <base64 body>
//! -----END NDN KEY-----
//! ```
//!
//! Certificates additionally carry `SignerKey:` and `Validity:` headers.
//! The base64 body of a key is a data packet wrapping the secret; the body
//! of a certificate is the certificate packet itself, usable directly as
//! stapling material.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use prefix_inject_core::Name;

use crate::error::{KeyError, Result};

const KEY_BEGIN: &str = "-----BEGIN NDN KEY-----";
const KEY_END: &str = "-----END NDN KEY-----";
const CERT_BEGIN: &str = "-----BEGIN NDN CERT-----";
const CERT_END: &str = "-----END NDN CERT-----";

/// A parsed key block.
#[derive(Debug, Clone)]
pub struct KeyText {
    /// The key's name.
    pub name: Name,
    /// Signature algorithm, e.g. `Ed25519`.
    pub sig_type: String,
    /// The decoded body: a data packet wrapping the secret bytes.
    pub data: Vec<u8>,
}

impl KeyText {
    /// Parse a key block.
    pub fn parse(text: &str) -> Result<Self> {
        let block = parse_block(text, KEY_BEGIN, KEY_END)?;
        Ok(Self {
            name: block.require_name()?,
            sig_type: block.require_sig_type()?,
            data: block.data,
        })
    }
}

/// A parsed certificate block.
#[derive(Debug, Clone)]
pub struct CertText {
    /// The certificate's name (becomes the key locator when paired).
    pub name: Name,
    /// Signature algorithm of the certified key.
    pub sig_type: String,
    /// Name of the key this certificate certifies.
    pub signer_key: Option<Name>,
    /// Validity period, uninterpreted.
    pub validity: Option<String>,
    /// The decoded body: the certificate packet, ready for stapling.
    pub data: Vec<u8>,
}

impl CertText {
    /// Parse a certificate block.
    pub fn parse(text: &str) -> Result<Self> {
        let block = parse_block(text, CERT_BEGIN, CERT_END)?;
        let signer_key = match &block.signer_key {
            Some(s) => Some(Name::from_uri(s)?),
            None => None,
        };
        Ok(Self {
            name: block.require_name()?,
            sig_type: block.require_sig_type()?,
            signer_key,
            validity: block.validity.clone(),
            data: block.data,
        })
    }
}

struct RawBlock {
    name: Option<String>,
    sig_type: Option<String>,
    signer_key: Option<String>,
    validity: Option<String>,
    data: Vec<u8>,
}

impl RawBlock {
    fn require_name(&self) -> Result<Name> {
        let name = self.name.as_deref().ok_or(KeyError::MissingHeader("Name"))?;
        Ok(Name::from_uri(name)?)
    }

    fn require_sig_type(&self) -> Result<String> {
        self.sig_type.clone().ok_or(KeyError::MissingHeader("SigType"))
    }
}

fn parse_block(text: &str, begin: &str, end: &str) -> Result<RawBlock> {
    let normalized = text.replace("\r\n", "\n");
    let mut lines: Vec<&str> = normalized.trim().split('\n').collect();

    // Fences are stripped when present, tolerated when absent
    if lines.first() == Some(&begin) {
        if lines.last() != Some(&end) {
            return Err(KeyError::Malformed(format!("missing {end:?} fence")));
        }
        lines = lines[1..lines.len() - 1].to_vec();
    }

    let mut block = RawBlock {
        name: None,
        sig_type: None,
        signer_key: None,
        validity: None,
        data: Vec::new(),
    };
    let mut body = String::new();

    for line in lines {
        if let Some(v) = line.strip_prefix("Name: ") {
            block.name = Some(v.to_string());
        } else if let Some(v) = line.strip_prefix("SigType: ") {
            block.sig_type = Some(v.to_string());
        } else if let Some(v) = line.strip_prefix("SignerKey: ") {
            block.signer_key = Some(v.to_string());
        } else if let Some(v) = line.strip_prefix("Validity: ") {
            block.validity = Some(v.to_string());
        } else {
            body.push_str(line.trim());
        }
    }

    if body.is_empty() {
        return Err(KeyError::Malformed("empty base64 body".into()));
    }
    block.data = STANDARD.decode(&body)?;
    Ok(block)
}
