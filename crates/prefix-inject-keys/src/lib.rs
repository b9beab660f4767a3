//! # Prefix Inject Keys
//!
//! Parsing for the external key/certificate text format and construction of
//! the signer capability the injection client consumes.
//!
//! A key block carries `Name:` and `SigType:` headers and a base64 body
//! wrapping the secret; a certificate block additionally carries
//! `SignerKey:` and `Validity:`. A certificate's `SignerKey` must name the
//! key it is paired with; mismatches are rejected before any network call.

pub mod error;
pub mod signer;
pub mod text;

pub use error::{KeyError, Result};
pub use signer::{signer_from_text, stapled_cert_bytes};
pub use text::{CertText, KeyText};
