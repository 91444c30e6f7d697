use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

const APP_USER_AGENT: &str = "modcheck/0.1.0";

/// Conservative per-request ceiling so a stalled registry call cannot hang
/// the pipeline indefinitely.
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
}
