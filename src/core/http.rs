use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

pub const DEFAULT_USER_AGENT: &str = concat!("legacy-bootstrap/", env!("CARGO_PKG_VERSION"));

/// Shared client for every download. No timeout is configured: a stalled
/// transfer blocks the run.
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(user_agent)
        .default_headers(default_headers)
        .build()
}
