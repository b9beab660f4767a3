//! # Prefix Inject Core
//!
//! Pure primitives for the prefix-injection protocol: the TLV codec,
//! hierarchical names, signer capabilities, and the signed data envelope.
//!
//! This crate contains no I/O and no networking. It is pure computation
//! over binary structures.
//!
//! ## Key Types
//!
//! - [`Name`] / [`Component`] - hierarchical identifiers for routes and commands
//! - [`Signer`] - capability producing a signature bound to a key-locator name
//! - [`Data`] / [`make_data`] - the signed envelope carrying one command
//! - [`TlvReader`] - sequential TLV decoding

pub mod data;
pub mod error;
pub mod name;
pub mod sign;
pub mod tlv;

pub use data::{make_data, Data, MetaInfo, CONTENT_TYPE_OPAQUE};
pub use error::{CoreError, SigningError, ValidationError};
pub use name::{Component, Name};
pub use sign::{verify_ed25519, Ed25519Signer, NullSigner, SignatureType, Signer};
pub use tlv::TlvReader;
