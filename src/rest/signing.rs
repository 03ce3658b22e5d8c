//! Request signing seam.
//!
//! OAuth signing lives outside this crate. A signer receives the endpoint URL
//! and the full parameter set and returns the parameters to send, typically
//! with `oauth_*` fields added.

use crate::rest::Params;

pub trait RequestSigner: Send + Sync {
    fn sign(&self, url: &str, params: Params) -> Params;
}

/// Sends parameters as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsigned;

impl RequestSigner for Unsigned {
    fn sign(&self, _url: &str, params: Params) -> Params {
        params
    }
}
