//! # Prefix Inject Testkit
//!
//! Testing utilities for the prefix-injection crates.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known commands with expected object encodings for
//!   cross-implementation verification
//! - **Generators**: Proptest strategies for names, commands, and signers
//! - **Fixtures**: Deterministic signers, key/cert text, and preconfigured
//!   clients
//!
//! ## Golden Vectors
//!
//! ```rust
//! use prefix_inject_testkit::vectors::verify_all_vectors;
//!
//! let failures = verify_all_vectors();
//! assert!(failures.is_empty(), "{}", failures.join("\n"));
//! ```
//!
//! ## Fixtures
//!
//! ```rust
//! use prefix_inject_client::MemoryForwarder;
//! use prefix_inject_testkit::fixtures::{no_jitter_client, object_signer};
//!
//! let client = no_jitter_client(MemoryForwarder::accepting());
//! let signer = object_signer(1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{cert_file_text, key_file_text, no_jitter_client, object_signer};
pub use vectors::{all_vectors, verify_all_vectors, verify_vector, GoldenVector};
