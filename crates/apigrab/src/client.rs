//! HTTP plumbing shared by the Giphy and Wikipedia clients
//!
//! Builds the `reqwest` client, sends GET requests with a deadline and
//! decodes JSON bodies into typed responses. Decoding failures surface as
//! [`FetchError::MalformedResponse`] rather than panics.

use crate::error::FetchError;
use crate::DEFAULT_USER_AGENT;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Connect timeout for every request
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default total timeout for an API request (headers and body)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default total timeout for a media download
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Query parameters never written to logs
const SECRET_PARAMS: &[&str] = &["api_key"];

/// Options common to both API clients
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Total timeout for API requests
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    /// Effective API request timeout
    pub fn request_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}

/// Build the HTTP client used for every request of one tool invocation
pub(crate) fn build_http_client(options: &ClientOptions) -> Result<reqwest::Client, FetchError> {
    let mut headers = HeaderMap::new();
    let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(FetchError::ClientBuildError)
}

/// Parse an endpoint override, accepting only http(s) URLs
pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url, FetchError> {
    let url =
        Url::parse(endpoint).map_err(|e| FetchError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidEndpoint(format!(
            "{endpoint}: unsupported scheme {other}"
        ))),
    }
}

/// Send a GET request and fail on transport errors or non-success status
pub(crate) async fn get(
    client: &reqwest::Client,
    url: Url,
    timeout: Duration,
) -> Result<reqwest::Response, FetchError> {
    debug!(url = %redact_url(&url), "GET");

    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(FetchError::from_reqwest)?;

    ensure_success(response)
}

/// Reject non-2xx responses
pub(crate) fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(FetchError::HttpStatus {
        status: status.as_u16(),
        url: redact_url(response.url()).into_owned(),
    })
}

/// Read the whole body and decode it as JSON
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, FetchError> {
    let body = response.bytes().await.map_err(FetchError::from_reqwest)?;
    decode_json(&body)
}

/// Decode a JSON body, mapping any failure to `MalformedResponse`
pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
}

/// Render a URL for logs and error messages with secret query values hidden
pub(crate) fn redact_url(url: &Url) -> Cow<'_, str> {
    if has_secret(url) {
        Cow::Owned(redacted_url(url).into())
    } else {
        Cow::Borrowed(url.as_str())
    }
}

/// Copy of `url` with secret query values replaced by `REDACTED`
pub(crate) fn redacted_url(url: &Url) -> Url {
    if !has_secret(url) {
        return url.clone();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if SECRET_PARAMS.contains(&name.as_ref()) {
                "REDACTED".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

fn has_secret(url: &Url) -> bool {
    url.query_pairs()
        .any(|(name, _)| SECRET_PARAMS.contains(&name.as_ref()))
}
