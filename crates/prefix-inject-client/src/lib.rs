//! # Prefix Inject Client
//!
//! The prefix-injection protocol: install or withdraw a forwarding route in
//! a named-data forwarder's routing table by sending a signed command over
//! the network's request/reply transport.
//!
//! ## Pipeline
//!
//! ```text
//! caller
//!   |-- reserve ordering token ----- CommandSequencer
//!   |-- build signed object -------- build_insertion_object
//!   |-- append trust material ------ staple_certificates
//!   |-- one signed request --------> forwarder (/routing/insert)
//!   |<- one structured reply ------- ControlResponse
//!   '-- InsertionResult
//! ```
//!
//! ## Key Properties
//!
//! - **Strict ordering**: markers issued by one client strictly increase,
//!   even with concurrent callers or a stalled clock
//! - **Idempotent**: resending the same logical command is always safe;
//!   every call gets a fresh marker
//! - **No silent failures**: rejections and transport failures are values
//!   ([`InsertionResult`]); only malformed input or signer failure raises
//!
//! ## Usage
//!
//! ```rust,no_run
//! use prefix_inject_client::{InjectionClient, RouteCommand};
//! use prefix_inject_core::{Name, NullSigner, Ed25519Signer};
//!
//! async fn example(transport: impl prefix_inject_client::CommandTransport) {
//!     let client = InjectionClient::new(transport);
//!     let target = Name::from_uri("/foo/bar/baz").unwrap();
//!     let object_signer =
//!         Ed25519Signer::generate(Name::from_uri("/ops/KEY/1").unwrap());
//!
//!     let result = client
//!         .insert(
//!             &target,
//!             &NullSigner,
//!             &object_signer,
//!             RouteCommand::Install { ttl_ms: 86_400_000, cost: 5 },
//!             &[],
//!         )
//!         .await
//!         .unwrap();
//!     println!("{result}");
//! }
//! ```

pub mod client;
pub mod error;
pub mod insertion;
pub mod response;
pub mod sequencer;
pub mod transport;

pub use client::{ClientConfig, InjectionClient, DEFAULT_LIFETIME, DEFAULT_TTL_MS};
pub use error::{InjectError, Result, TransportError};
pub use insertion::{
    build_insertion_object, decode_route_parameters, encode_route_parameters,
    staple_certificates, strip_stapled_certificates, RouteCommand, INSERTION_MARKER,
    TLV_COST, TLV_EXPIRATION, TLV_STAPLED_CERT,
};
pub use response::{ControlResponse, InsertionResult, STATUS_OK};
pub use sequencer::{CommandSequencer, SequencerConfig};
pub use transport::{memory::MemoryForwarder, memory::RecordedRequest, CommandTransport};
