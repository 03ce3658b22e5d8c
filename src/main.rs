//! flickr_api - command line front end
//!
//! Calls one Flickr method and prints the reply.
//!
//! ```text
//! flickr_api [--raw] <method> [name=value ...]
//! flickr_api flickr.photos.search text=sunset per_page=5
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flickr_api::{Config, Params, ReqwestTransport, RestClient};

/// Flickr API command line client.
#[derive(Parser, Debug)]
#[command(name = "flickr_api")]
#[command(about = "Call one Flickr API method and print the reply")]
struct Invocation {
    /// Print the response body untouched instead of cleaned JSON.
    #[arg(long)]
    raw: bool,

    /// Method to call, e.g. flickr.photos.search.
    method: String,

    /// Method arguments as name=value.
    #[arg(value_parser = parse_param)]
    params: Vec<(String, String)>,
}

impl Invocation {
    fn params(&self) -> Params {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect()
    }
}

fn parse_param(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", arg))
}

/// Main entry point for the Flickr command line client.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Parse the method and its arguments
/// 3. Load configuration from environment variables
/// 4. Build the REST client (with cache if configured)
/// 5. Call the method and print the reply
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flickr_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let invocation = Invocation::parse();

    let config = Config::from_env();
    debug!(
        "Configuration loaded: host={}, cache_enabled={}, cache_timeout={}s, cache_max_entries={}",
        config.api_host, config.cache_enabled, config.cache_timeout, config.cache_max_entries
    );

    let client = RestClient::from_config(&config, Arc::new(ReqwestTransport::new()));
    info!(method = %invocation.method, "calling");

    if invocation.raw {
        let body = client
            .call_raw(&invocation.method, invocation.params())
            .await
            .with_context(|| format!("{} failed", invocation.method))?;
        println!("{}", String::from_utf8_lossy(&body));
    } else {
        let value = client
            .call(&invocation.method, invocation.params())
            .await
            .with_context(|| format!("{} failed", invocation.method))?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation, clap::Error> {
        Invocation::try_parse_from(std::iter::once("flickr_api").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_method_and_params() {
        let invocation = parse(&["flickr.photos.search", "text=red sky", "page=2"]).unwrap();

        assert!(!invocation.raw);
        assert_eq!(invocation.method, "flickr.photos.search");
        let params = invocation.params();
        assert_eq!(params.get("text"), Some("red sky"));
        assert_eq!(params.get("page"), Some("2"));
    }

    #[test]
    fn test_parse_raw_flag_anywhere() {
        assert!(parse(&["--raw", "flickr.test.echo"]).unwrap().raw);
        assert!(parse(&["flickr.test.echo", "--raw"]).unwrap().raw);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let invocation = parse(&["m", "q=a=b"]).unwrap();
        assert_eq!(invocation.params().get("q"), Some("a=b"));
    }

    #[test]
    fn test_missing_method() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_malformed_param() {
        let err = parse(&["m", "novalue"]).unwrap_err();
        assert!(err.to_string().contains("novalue"));
    }
}
