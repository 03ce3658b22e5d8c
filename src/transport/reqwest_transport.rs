//! reqwest-backed transport.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::error::{FlickrError, Result};
use crate::transport::{Headers, Transport, TransportResponse};

// == Reqwest Transport ==
/// Sends requests with a shared `reqwest::Client`. HTTPS unless told otherwise.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    scheme: String,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_scheme("https")
    }

    /// Uses `scheme` (`http` or `https`) for every request.
    pub fn with_scheme(scheme: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            scheme: scheme.into(),
        }
    }

    fn url(&self, host: &str, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}://{}{}", self.scheme, host, path)
        } else {
            format!("{}://{}/{}", self.scheme, host, path)
        }
    }
}

fn header_map(headers: &Headers) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| FlickrError::Transport(format!("invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| FlickrError::Transport(format!("invalid header value: {}", e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        host: &str,
        path: &str,
        headers: &Headers,
        body: Bytes,
    ) -> Result<TransportResponse> {
        let url = self.url(host, path);
        debug!(%url, bytes = body.len(), "POST");

        let response = self
            .client
            .post(&url)
            .headers(header_map(headers)?)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(TransportResponse { status, body })
    }
}
