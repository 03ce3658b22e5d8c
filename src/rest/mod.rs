//! REST Module
//!
//! Calls to `https://api.flickr.com/services/rest/`: parameter handling,
//! response cleanup, the signing seam and the caching client.

mod client;
mod content;
mod params;
mod signing;

pub use client::{ResponseCache, RestClient, REST_PATH};
pub use content::clean_content;
pub use params::{IntoParam, Params, IGNORED_FIELDS};
pub use signing::{RequestSigner, Unsigned};
