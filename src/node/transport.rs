//! Peer Transport
//!
//! The node only ever needs one capability from the network: "send this
//! message to that address and don't wait for it". `PeerTransport` is that
//! seam. `HttpTransport` is the production implementation; tests plug in an
//! in-process mesh.

use super::protocol::{ENDPOINT_REQUEST, ENDPOINT_RESPONSE};
use super::types::PeerMessage;

use anyhow::Result;
use std::time::Duration;

/// Fire-and-forget delivery of peer messages.
///
/// Implementations must return without waiting for delivery and must not
/// report failures to the caller; a lost message is indistinguishable from
/// a peer that does not hold the key.
pub trait PeerTransport: Send + Sync {
    fn send(&self, addr: &str, message: PeerMessage);
}

const SEND_TIMEOUT: Duration = Duration::from_millis(500);
const INITIAL_BACKOFF_MS: u64 = 150;
const MAX_BACKOFF_MS: u64 = 1200;

/// Posts peer messages as JSON over HTTP, one spawned task per message.
///
/// With more than one attempt configured, failed posts are retried with
/// exponential backoff. Re-sends are harmless: peers drop request ids they
/// have already seen and the origin ignores responses it no longer awaits.
#[derive(Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    attempts: usize,
}

impl HttpTransport {
    pub fn new(attempts: usize) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            attempts: attempts.max(1),
        }
    }

    async fn deliver(&self, addr: &str, message: &PeerMessage) -> Result<()> {
        let response = match message {
            PeerMessage::Request(request) => {
                self.post_with_retry(url(addr, ENDPOINT_REQUEST), request)
                    .await?
            }
            PeerMessage::Response(response) => {
                self.post_with_retry(url(addr, ENDPOINT_RESPONSE), response)
                    .await?
            }
        };

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Peer {} answered {}", addr, response.status()));
        }
        Ok(())
    }

    async fn post_with_retry<T: serde::Serialize>(
        &self,
        url: String,
        payload: &T,
    ) -> Result<reqwest::Response> {
        let mut delay_ms = INITIAL_BACKOFF_MS;

        for attempt in 0..self.attempts {
            let response = self
                .http_client
                .post(url.clone())
                .json(payload)
                .timeout(SEND_TIMEOUT)
                .send()
                .await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt + 1 == self.attempts {
                        return Err(anyhow::anyhow!(e));
                    }
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(MAX_BACKOFF_MS);
                }
            }
        }

        Err(anyhow::anyhow!("Retry attempts exhausted"))
    }
}

impl PeerTransport for HttpTransport {
    fn send(&self, addr: &str, message: PeerMessage) {
        let transport = self.clone();
        let addr = addr.to_string();

        tokio::spawn(async move {
            if let Err(e) = transport.deliver(&addr, &message).await {
                tracing::warn!("Failed to deliver message to {}: {}", addr, e);
            }
        });
    }
}

fn url(addr: &str, endpoint: &str) -> String {
    format!("http://{}{}", addr, endpoint)
}
