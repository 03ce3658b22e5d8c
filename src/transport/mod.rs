//! Transport Module
//!
//! The HTTP collaborator used by REST calls and uploads. It exposes a single
//! operation, `send`, which POSTs a body to a host and path and hands back the
//! raw status and response bytes. No retries and no timeouts are applied here.

mod reqwest_transport;

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

pub use reqwest_transport::ReqwestTransport;

/// Request headers, ordered by name.
pub type Headers = BTreeMap<String, String>;

// == Transport Response ==
/// Status code and body returned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// == Transport Trait ==
/// Sends a POST and returns whatever the server answered.
///
/// Faults are reported as `FlickrError::Transport` and passed to the caller
/// unchanged.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        host: &str,
        path: &str,
        headers: &Headers,
        body: Bytes,
    ) -> Result<TransportResponse>;
}
