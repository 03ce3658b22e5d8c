//! REST Client
//!
//! Calls Flickr methods over the REST endpoint, optionally answering repeat
//! calls from a response cache.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, error};

use crate::cache::SimpleCache;
use crate::config::Config;
use crate::error::{FlickrError, Result};
use crate::rest::{clean_content, Params, RequestSigner, Unsigned};
use crate::transport::{Headers, Transport, TransportResponse};

/// Path of the REST endpoint.
pub const REST_PATH: &str = "/services/rest/";

/// Cache of raw REST responses keyed by [`Params::cache_key`].
pub type ResponseCache = SimpleCache<String, TransportResponse>;

// == Rest Client ==
pub struct RestClient {
    api_key: Option<String>,
    api_secret: Option<String>,
    host: String,
    path: String,
    transport: Arc<dyn Transport>,
    signer: Arc<dyn RequestSigner>,
    cache: Option<Arc<ResponseCache>>,
}

impl RestClient {
    /// Client for `api.flickr.com` with no keys, no signer and no cache.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            api_key: None,
            api_secret: None,
            host: crate::config::DEFAULT_API_HOST.to_string(),
            path: REST_PATH.to_string(),
            transport,
            signer: Arc::new(Unsigned),
            cache: None,
        }
    }

    /// Client set up from `config`, including its cache settings.
    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let mut client = Self::new(transport).with_endpoint(config.api_host.clone(), REST_PATH);
        client.api_key = config.api_key.clone();
        client.api_secret = config.api_secret.clone();
        if config.cache_enabled {
            client.enable_cache_with(Arc::new(SimpleCache::new(
                Duration::from_secs(config.cache_timeout),
                config.cache_max_entries,
            )));
        }
        client
    }

    pub fn with_keys(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self.api_secret = Some(api_secret.into());
        self
    }

    pub fn with_endpoint(mut self, host: impl Into<String>, path: impl Into<String>) -> Self {
        self.host = host.into();
        self.path = path.into();
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = signer;
        self
    }

    // == Cache Control ==
    /// Turns caching on with a default-sized cache.
    pub fn enable_cache(&mut self) {
        self.enable_cache_with(Arc::new(ResponseCache::default()));
    }

    /// Turns caching on with a caller-provided cache, which may be shared.
    pub fn enable_cache_with(&mut self, cache: Arc<ResponseCache>) {
        self.cache = Some(cache);
    }

    pub fn disable_cache(&mut self) {
        self.cache = None;
    }

    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.cache.as_ref()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn url(&self) -> String {
        format!("https://{}{}", self.host, self.path)
    }

    fn base_params(&self, method: &str, mut params: Params) -> Result<Params> {
        let (api_key, _secret) = match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => (key, secret),
            _ => return Err(FlickrError::MissingKeys),
        };
        params.insert("api_key", api_key);
        params.insert("method", method);
        Ok(params)
    }

    // == Call ==
    /// Calls `method` and returns the cleaned JSON reply.
    ///
    /// 5xx replies become `FlickrError::Server`, replies with `stat` other
    /// than `ok` become `FlickrError::Api`.
    pub async fn call(&self, method: &str, params: Params) -> Result<Value> {
        let mut params = self.base_params(method, params)?;
        params.insert("format", "json");
        params.insert("nojsoncallback", 1);

        let response = self.execute(params).await?;

        if response.is_server_error() {
            return Err(FlickrError::Server {
                status: response.status,
                body: response.text(),
            });
        }

        let value: Value = match serde_json::from_slice(&response.body) {
            Ok(value) => value,
            Err(err) if response.is_success() => {
                error!(method, body = %response.text(), "could not parse response");
                return Err(err.into());
            }
            Err(_) => {
                return Err(FlickrError::Http {
                    status: response.status,
                    body: response.text(),
                })
            }
        };

        if value.get("stat").and_then(Value::as_str) != Some("ok") {
            return Err(api_error(&value));
        }

        Ok(clean_content(value))
    }

    /// Calls `method` and returns the reply body untouched (Flickr's XML
    /// format). No status or `stat` checks are made.
    pub async fn call_raw(&self, method: &str, params: Params) -> Result<Bytes> {
        let params = self.base_params(method, params)?;
        Ok(self.execute(params).await?.body)
    }

    async fn execute(&self, params: Params) -> Result<TransportResponse> {
        let params = self.signer.sign(&self.url(), params);

        let cache_key = match &self.cache {
            Some(cache) => {
                let key = params.cache_key();
                if let Some(hit) = cache.get(&key) {
                    debug!(cache_key = %key, "cache hit");
                    return Ok(hit);
                }
                debug!(cache_key = %key, "cache miss");
                Some(key)
            }
            None => None,
        };

        let body = params.urlencode();
        let mut headers = Headers::new();
        headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers.insert("Content-Length".to_string(), body.len().to_string());

        let response = self
            .transport
            .send(&self.host, &self.path, &headers, Bytes::from(body))
            .await?;

        if let (Some(cache), Some(key)) = (&self.cache, cache_key) {
            if response.is_success() {
                cache.set(key, response.clone());
            }
        }
        Ok(response)
    }
}

fn api_error(value: &Value) -> FlickrError {
    let code = match value.get("code") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    };
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    FlickrError::Api { code, message }
}
