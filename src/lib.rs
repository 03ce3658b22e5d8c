//! flickr_api - A client for the Flickr REST API
//!
//! Provides method calls with an expiring response cache, multipart photo
//! uploads, and the metadata table describing Flickr's remote methods.

pub mod cache;
pub mod config;
pub mod error;
pub mod methods;
pub mod multipart;
pub mod rest;
pub mod transport;
pub mod upload;

pub use cache::SimpleCache;
pub use config::Config;
pub use error::{FlickrError, Result};
pub use rest::{Params, RestClient};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
pub use upload::{PhotoFile, UploadOutcome, Uploader};
