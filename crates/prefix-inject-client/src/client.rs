//! The injection client.
//!
//! Orchestrates one command per call: reserve an ordering token, build the
//! signed insertion object, staple trust material, send it as the payload of
//! one authenticated request to the fixed command name, and decode the
//! forwarder's structured reply.

use std::time::Duration;

use prefix_inject_core::{Component, Name, Signer};

use crate::error::Result;
use crate::insertion::{build_insertion_object, staple_certificates, RouteCommand};
use crate::response::{ControlResponse, InsertionResult};
use crate::sequencer::{CommandSequencer, SequencerConfig};
use crate::transport::CommandTransport;

/// Default route time-to-live: 24 hours in milliseconds.
pub const DEFAULT_TTL_MS: u64 = 24 * 3_600_000;

/// Default request lifetime.
pub const DEFAULT_LIFETIME: Duration = Duration::from_millis(1000);

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The fixed command name insertion requests are addressed to.
    pub command_name: Name,
    /// Lifetime of each request.
    pub lifetime: Duration,
    /// Route time-to-live used by [`InjectionClient::install`].
    pub default_ttl_ms: u64,
    /// Sequencer behavior.
    pub sequencer: SequencerConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            command_name: Name::from_components(vec![
                Component::generic(b"routing".to_vec()),
                Component::generic(b"insert".to_vec()),
            ]),
            lifetime: DEFAULT_LIFETIME,
            default_ttl_ms: DEFAULT_TTL_MS,
            sequencer: SequencerConfig::default(),
        }
    }
}

/// Client for installing and withdrawing forwarding routes.
///
/// One client owns one [`CommandSequencer`]; all commands issued through it
/// carry strictly increasing generation markers. Each call is one state
/// machine pass, build then send then decode, with no automatic retry: a
/// failed result is returned to the caller, who re-invokes explicitly.
pub struct InjectionClient<T> {
    transport: T,
    sequencer: CommandSequencer,
    config: ClientConfig,
}

impl<T: CommandTransport> InjectionClient<T> {
    /// Client with default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Client with explicit configuration.
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            sequencer: CommandSequencer::with_config(config.sequencer.clone()),
            config,
        }
    }

    /// Issue one route command.
    ///
    /// Repeating the identical logical command is always safe: each call
    /// reserves a fresh generation marker, and the remote side converges to
    /// the same state regardless of retransmission count.
    ///
    /// Transport outcomes (nack, timeout, cancellation, reply validation
    /// failure) and remote rejections are returned as failed results, never
    /// raised. Only malformed input, a response-schema mismatch, or signer
    /// failure raises.
    pub async fn insert(
        &self,
        target: &Name,
        envelope_signer: &dyn Signer,
        object_signer: &dyn Signer,
        command: RouteCommand,
        stapled_certs: &[Vec<u8>],
    ) -> Result<InsertionResult> {
        let marker = self.sequencer.reserve().await;
        tracing::debug!(target = %target, marker, withdraw = command.is_withdraw(), "issuing route command");

        let object = build_insertion_object(target, object_signer, &command, marker)?;
        let payload = staple_certificates(object, stapled_certs);

        let reply = self
            .transport
            .express(&self.config.command_name, &payload, envelope_signer, self.config.lifetime)
            .await;

        match reply {
            Ok(reply) => {
                let result = InsertionResult::from_response(ControlResponse::decode(&reply)?);
                if result.succeeded {
                    tracing::info!(target = %target, marker, "insertion accepted: {}", result.status_text);
                } else {
                    tracing::warn!(
                        target = %target,
                        marker,
                        code = result.status_code,
                        "insertion rejected: {}",
                        result.status_text
                    );
                }
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(target = %target, marker, "insertion failed: {e}");
                Ok(InsertionResult::from_transport_failure(&e))
            }
        }
    }

    /// Install a route with the configured default time-to-live.
    pub async fn install(
        &self,
        target: &Name,
        envelope_signer: &dyn Signer,
        object_signer: &dyn Signer,
        cost: u64,
        stapled_certs: &[Vec<u8>],
    ) -> Result<InsertionResult> {
        let command = RouteCommand::Install { ttl_ms: self.config.default_ttl_ms, cost };
        self.insert(target, envelope_signer, object_signer, command, stapled_certs).await
    }

    /// Withdraw a previously installed route.
    pub async fn withdraw(
        &self,
        target: &Name,
        envelope_signer: &dyn Signer,
        object_signer: &dyn Signer,
        stapled_certs: &[Vec<u8>],
    ) -> Result<InsertionResult> {
        self.insert(target, envelope_signer, object_signer, RouteCommand::Withdraw, stapled_certs)
            .await
    }

    /// The transport this client sends through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The last generation marker issued by this client, 0 if none.
    pub async fn last_marker(&self) -> u64 {
        self.sequencer.last_marker().await
    }
}
