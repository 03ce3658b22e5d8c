//! Multipart Module
//!
//! Encodes form fields and files as `multipart/form-data` and POSTs them
//! through a transport. Stateless: nothing here needs synchronization.

mod encoder;

use bytes::Bytes;
use tracing::info;
use url::Url;

use crate::error::{FlickrError, Result};
use crate::transport::{Headers, Transport, TransportResponse};

pub use encoder::{
    content_type_for, encode, escape_quoted, FilePart, MultipartBody, BOUNDARY,
    FALLBACK_CONTENT_TYPE,
};

// == Post ==
/// Encodes `fields` and `files` and POSTs the body to `host` + `path`.
///
/// Encoding errors are returned before any I/O. The transport's answer is
/// returned as-is, whatever its status; transport faults propagate unchanged.
pub async fn post<T>(
    transport: &T,
    host: &str,
    path: &str,
    fields: &[(String, String)],
    files: &[FilePart],
) -> Result<TransportResponse>
where
    T: Transport + ?Sized,
{
    let encoded = encode(fields, files)?;

    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), encoded.content_type.clone());
    headers.insert("Content-Length".to_string(), encoded.len().to_string());

    info!(
        host,
        path,
        fields = fields.len(),
        files = files.len(),
        bytes = encoded.len(),
        "posting multipart body"
    );
    transport
        .send(host, path, &headers, Bytes::from(encoded.body))
        .await
}

// == Post URL ==
/// Same as [`post`], taking an absolute URL. Only the host (with port) and
/// path are used; the transport picks the scheme.
pub async fn post_url<T>(
    transport: &T,
    url: &str,
    fields: &[(String, String)],
    files: &[FilePart],
) -> Result<TransportResponse>
where
    T: Transport + ?Sized,
{
    let (host, path) = split_url(url)?;
    post(transport, &host, &path, fields, files).await
}

/// Splits an absolute URL into `host[:port]` and path.
pub fn split_url(url: &str) -> Result<(String, String)> {
    let parsed = Url::parse(url).map_err(|e| FlickrError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let host = parsed.host_str().ok_or_else(|| FlickrError::InvalidUrl {
        url: url.to_string(),
        reason: "missing host".to_string(),
    })?;
    let host = match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    Ok((host, parsed.path().to_string()))
}
