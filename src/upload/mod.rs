//! Upload Module
//!
//! Photo upload and replace. These endpoints take a multipart POST instead of
//! the form-encoded REST call, and answer in XML.

mod response;

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::error::{FlickrError, Result};
use crate::multipart::{self, FilePart};
use crate::rest::{Params, RequestSigner, Unsigned};
use crate::transport::Transport;

pub use response::{parse_reply, UploadOutcome, EDIT_URL_PREFIX};

pub const UPLOAD_URL: &str = "https://api.flickr.com/services/upload/";
pub const REPLACE_URL: &str = "https://api.flickr.com/services/replace/";

/// Form field carrying the file.
const PHOTO_FIELD: &str = "photo";

// == Photo File ==
/// File to send: the name reported to Flickr and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub filename: String,
    pub data: Bytes,
}

impl PhotoFile {
    /// Uses the base name of `filename`.
    pub fn new(filename: impl AsRef<str>, data: impl Into<Bytes>) -> Self {
        let filename = filename.as_ref();
        let base = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.to_string());
        Self {
            filename: base,
            data: data.into(),
        }
    }

    /// Reads the file at `path`.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        Ok(Self::new(path.to_string_lossy(), data))
    }
}

// == Uploader ==
pub struct Uploader {
    transport: Arc<dyn Transport>,
    signer: Arc<dyn RequestSigner>,
    api_key: String,
    upload_url: String,
    replace_url: String,
}

impl Uploader {
    pub fn new(transport: Arc<dyn Transport>, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            signer: Arc::new(Unsigned),
            api_key: api_key.into(),
            upload_url: UPLOAD_URL.to_string(),
            replace_url: REPLACE_URL.to_string(),
        }
    }

    /// Signs the form fields before they are sent. The file part itself is
    /// never part of the signature.
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = signer;
        self
    }

    pub fn with_urls(mut self, upload_url: impl Into<String>, replace_url: impl Into<String>) -> Self {
        self.upload_url = upload_url.into();
        self.replace_url = replace_url.into();
        self
    }

    // == Upload ==
    /// Uploads a new photo.
    ///
    /// Recognised parameters include `title`, `description`, `tags`,
    /// `is_public`, `is_friend`, `is_family`, `safety_level`, `content_type`,
    /// `hidden` and `async` (synchronous unless set).
    pub async fn upload(&self, photo: PhotoFile, mut params: Params) -> Result<UploadOutcome> {
        params.insert_default("async", false);
        let reply = self.submit(&self.upload_url, photo, params).await?;
        parse_reply(&reply, true)
    }

    // == Replace ==
    /// Replaces the content of photo `photo_id`. Asynchronous unless `async`
    /// is set to false.
    pub async fn replace(
        &self,
        photo: PhotoFile,
        photo_id: &str,
        mut params: Params,
    ) -> Result<UploadOutcome> {
        params.insert_default("async", true);
        params.insert("photo_id", photo_id);
        let reply = self.submit(&self.replace_url, photo, params).await?;
        parse_reply(&reply, false)
    }

    async fn submit(&self, url: &str, photo: PhotoFile, mut params: Params) -> Result<String> {
        params.insert("api_key", &self.api_key);
        let params = self.signer.sign(url, params);

        let files = [FilePart::new(PHOTO_FIELD, photo.filename.clone(), photo.data)];
        info!(url, filename = %photo.filename, "uploading photo");
        let response = multipart::post_url(self.transport.as_ref(), url, &params.to_pairs(), &files).await?;

        let body = response.text();
        if response.status != 200 {
            warn!(status = response.status, "upload rejected");
            return Err(FlickrError::Http {
                status: response.status,
                body,
            });
        }
        Ok(body)
    }
}
