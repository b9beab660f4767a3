//! Transport abstraction for command exchange.
//!
//! The transport already provides signed request/reply exchange with opaque
//! binary payloads; implementations wrap a real forwarder face. The
//! [`memory::MemoryForwarder`] is a scriptable in-process stand-in for
//! tests.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use prefix_inject_core::{Name, Signer};

use crate::error::TransportError;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// One authenticated request/reply exchange.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Send one signed request to `name` carrying `app_param` and await
    /// exactly one reply payload.
    ///
    /// The envelope signer authorizes the outer request; it is independent
    /// of whatever signature the payload itself carries.
    async fn express(
        &self,
        name: &Name,
        app_param: &[u8],
        envelope_signer: &dyn Signer,
        lifetime: Duration,
    ) -> Result<Bytes>;
}

/// An in-process forwarder for testing.
pub mod memory {
    use super::*;
    use prefix_inject_core::tlv::types;
    use prefix_inject_core::Data;
    use tokio::sync::Mutex;

    use crate::response::{ControlResponse, STATUS_OK};

    /// One request as the fake forwarder saw it.
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub name: Name,
        pub app_param: Vec<u8>,
        pub envelope_key_locator: Option<Name>,
        pub lifetime: Duration,
    }

    impl RecordedRequest {
        /// Extract the generation marker from the payload's object name.
        pub fn generation_marker(&self) -> Option<u64> {
            let (data, _) = Data::decode(&self.app_param).ok()?;
            data.name
                .components()
                .iter()
                .rev()
                .find(|c| c.typ() == types::VERSION_COMPONENT)
                .and_then(|c| c.as_uint().ok())
        }
    }

    type ReplyFn = dyn Fn(&Name, &[u8]) -> Result<Vec<u8>> + Send + Sync;

    /// Scriptable fake forwarder.
    ///
    /// Records every request and answers it through a programmable reply
    /// function; canned constructors cover the common accept/reject/nack
    /// cases.
    pub struct MemoryForwarder {
        reply: Box<ReplyFn>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MemoryForwarder {
        /// Forwarder with a custom reply function.
        pub fn new<F>(reply: F) -> Self
        where
            F: Fn(&Name, &[u8]) -> Result<Vec<u8>> + Send + Sync + 'static,
        {
            Self { reply: Box::new(reply), requests: Mutex::new(Vec::new()) }
        }

        /// Forwarder that accepts every command with 200 OK.
        pub fn accepting() -> Self {
            Self::new(|_, _| {
                Ok(ControlResponse { status_code: STATUS_OK, status_text: "OK".into() }.encode())
            })
        }

        /// Forwarder that rejects every command with the given status.
        pub fn rejecting(status_code: u64, status_text: &str) -> Self {
            let status_text = status_text.to_string();
            Self::new(move |_, _| {
                Ok(ControlResponse { status_code, status_text: status_text.clone() }.encode())
            })
        }

        /// Forwarder that NACKs every request.
        pub fn nacking(reason: u64) -> Self {
            Self::new(move |_, _| Err(TransportError::Nack { reason }))
        }

        /// Forwarder that lets every request time out.
        pub fn timing_out() -> Self {
            Self::new(|_, _| Err(TransportError::Timeout))
        }

        /// Forwarder whose awaited reply is cancelled.
        pub fn cancelling() -> Self {
            Self::new(|_, _| Err(TransportError::Cancelled))
        }

        /// Forwarder whose replies fail transport-level validation.
        pub fn failing_validation(detail: &str) -> Self {
            let detail = detail.to_string();
            Self::new(move |_, _| Err(TransportError::ValidationFailure(detail.clone())))
        }

        /// Requests recorded so far.
        pub async fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().await.clone()
        }
    }

    #[async_trait]
    impl CommandTransport for MemoryForwarder {
        async fn express(
            &self,
            name: &Name,
            app_param: &[u8],
            envelope_signer: &dyn Signer,
            lifetime: Duration,
        ) -> Result<Bytes> {
            self.requests.lock().await.push(RecordedRequest {
                name: name.clone(),
                app_param: app_param.to_vec(),
                envelope_key_locator: envelope_signer.key_locator().cloned(),
                lifetime,
            });
            (self.reply)(name, app_param).map(Bytes::from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryForwarder;
    use super::*;
    use prefix_inject_core::NullSigner;

    use crate::response::ControlResponse;

    #[tokio::test]
    async fn test_accepting_forwarder_replies_ok() {
        let forwarder = MemoryForwarder::accepting();
        let name = Name::from_uri("/routing/insert").unwrap();

        let reply = forwarder
            .express(&name, b"payload", &NullSigner, Duration::from_millis(1000))
            .await
            .unwrap();

        let response = ControlResponse::decode(&reply).unwrap();
        assert_eq!(response.status_code, 200);

        let requests = forwarder.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, name);
        assert_eq!(requests[0].app_param, b"payload");
        assert!(requests[0].envelope_key_locator.is_none());
    }

    #[tokio::test]
    async fn test_nacking_forwarder() {
        let forwarder = MemoryForwarder::nacking(150);
        let name = Name::from_uri("/routing/insert").unwrap();

        let result = forwarder
            .express(&name, b"", &NullSigner, Duration::from_millis(1000))
            .await;
        assert!(matches!(result, Err(TransportError::Nack { reason: 150 })));

        // The request is still recorded
        assert_eq!(forwarder.requests().await.len(), 1);
    }
}
