//! Logging setup and the request/response logs written by the gateway.

use reqwest::{
    Method, StatusCode,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Bodies longer than this many bytes are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Install a subscriber that writes to stderr, leaving stdout to the views.
///
/// Logs at `warn` by default, or `debug` when `verbose` is set. `RUST_LOG`
/// takes precedence over both.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();

    if let Err(error) = result {
        eprintln!("Could not set up logging: {error}");
    }
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "fintrack=debug"
    } else {
        "fintrack=warn"
    }
}

pub(crate) fn log_request(method: &Method, url: &str, headers: &HeaderMap, body: Option<&str>) {
    let headers = redact_authorization(headers);
    let body = body.unwrap_or_default();

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending request: {method} {url} {headers:?}\nbody: {:}...",
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Sending request: {method} {url} {headers:?}\nbody: {body:?}");
    }
}

pub(crate) fn log_response(method: &Method, url: &str, status: StatusCode, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received response: {method} {url} {status}\nbody: {:}...",
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Received response: {method} {url} {status}\nbody: {body:?}");
    }
}

fn redact_authorization(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static("********"));
    }

    headers
}

/// Cut `text` to at most `limit` bytes without splitting a character.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}
