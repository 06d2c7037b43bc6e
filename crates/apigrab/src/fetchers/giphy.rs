//! Giphy random GIF fetcher
//!
//! Asks the random endpoint for a GIF matching a tag, then streams the
//! original image to `<tag>.gif`.

use crate::client::{
    build_http_client, ensure_success, get, parse_endpoint, read_json, ClientOptions,
    DEFAULT_DOWNLOAD_TIMEOUT,
};
use crate::download::stream_to_file;
use crate::error::FetchError;
use crate::types::SavedGif;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};
use url::Url;

/// Random GIF endpoint
pub const GIPHY_RANDOM_ENDPOINT: &str = "https://api.giphy.com/v1/gifs/random";

/// Extension of saved files
const GIF_EXTENSION: &str = "gif";

/// Giphy random endpoint response (partial)
#[derive(Debug, Deserialize)]
struct RandomResponse {
    data: RandomData,
}

/// Giphy sends an object for a hit and an empty array when nothing matches
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RandomData {
    Empty(#[allow(dead_code)] Vec<serde_json::Value>),
    Gif(RandomGif),
}

#[derive(Debug, Deserialize)]
struct RandomGif {
    image_original_url: Option<String>,
}

/// Builder for [`GiphyClient`]
#[derive(Clone, Default)]
pub struct GiphyClientBuilder {
    api_key: Option<String>,
    endpoint: Option<String>,
    options: ClientOptions,
    download_timeout: Option<Duration>,
}

impl GiphyClientBuilder {
    /// Create a builder with default endpoint and timeouts
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key (required)
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the random endpoint URL
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = Some(ua.into());
        self
    }

    /// Set the API request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Set the total timeout for the image download
    pub fn download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<GiphyClient, FetchError> {
        let api_key = self
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(FetchError::MissingApiKey)?;

        let endpoint = parse_endpoint(self.endpoint.as_deref().unwrap_or(GIPHY_RANDOM_ENDPOINT))?;

        Ok(GiphyClient {
            http: build_http_client(&self.options)?,
            api_key,
            endpoint,
            timeout: self.options.request_timeout(),
            download_timeout: self.download_timeout.unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT),
        })
    }
}

/// Configured Giphy client
#[derive(Clone)]
pub struct GiphyClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: Url,
    timeout: Duration,
    download_timeout: Duration,
}

impl fmt::Debug for GiphyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GiphyClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("download_timeout", &self.download_timeout)
            .finish()
    }
}

impl GiphyClient {
    /// Create a new client builder
    pub fn builder() -> GiphyClientBuilder {
        GiphyClientBuilder::new()
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Ask Giphy for a random GIF matching `tag` and return its original image URL
    pub async fn random_gif_url(&self, tag: &str) -> Result<Url, FetchError> {
        if tag.trim().is_empty() {
            return Err(FetchError::MissingTag);
        }

        let response = get(&self.http, self.search_url(tag), self.timeout).await?;
        let body: RandomResponse = read_json(response).await?;
        image_url(body)
    }

    /// Stream the body at `url` into `path`, returning the bytes written
    ///
    /// `path` is only created (or replaced) once the whole body has arrived.
    pub async fn download(&self, url: &Url, path: &Path) -> Result<u64, FetchError> {
        let deadline = Instant::now() + self.download_timeout;
        debug!(%url, path = %path.display(), "Downloading");

        let response = tokio::time::timeout_at(deadline, self.http.get(url.clone()).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::from_reqwest)?;
        let response = ensure_success(response)?;

        stream_to_file(response, path, deadline).await
    }

    /// Fetch a random GIF for `tag` and save it as `<dir>/<tag>.gif`
    pub async fn save_random_gif(
        &self,
        tag: &str,
        dir: impl AsRef<Path>,
    ) -> Result<SavedGif, FetchError> {
        let path = dir.as_ref().join(gif_file_name(tag)?);

        let source = self.random_gif_url(tag).await?;
        let size = self.download(&source, &path).await?;
        info!(tag, path = %path.display(), size, "Saved GIF");

        Ok(SavedGif {
            tag: tag.to_string(),
            source_url: source.into(),
            path,
            size,
        })
    }

    fn search_url(&self, tag: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("tag", tag)
            .append_pair("api_key", &self.api_key);
        url
    }
}

/// File name a GIF for `tag` is saved under
pub fn gif_file_name(tag: &str) -> Result<String, FetchError> {
    if tag.trim().is_empty() {
        return Err(FetchError::MissingTag);
    }
    if tag.contains(['/', '\\']) || tag == "." || tag == ".." {
        return Err(FetchError::InvalidTag(tag.to_string()));
    }
    Ok(format!("{tag}.{GIF_EXTENSION}"))
}

/// Pull the original image URL out of a decoded response
fn image_url(body: RandomResponse) -> Result<Url, FetchError> {
    let gif = match body.data {
        RandomData::Gif(gif) => gif,
        RandomData::Empty(_) => {
            return Err(FetchError::MalformedResponse(
                "no GIF in `data` (nothing matched the tag)".to_string(),
            ))
        }
    };

    let raw = gif.image_original_url.ok_or_else(|| {
        FetchError::MalformedResponse("missing field `data.image_original_url`".to_string())
    })?;

    let url = Url::parse(&raw).map_err(|e| {
        FetchError::MalformedResponse(format!("invalid `data.image_original_url` {raw:?}: {e}"))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(FetchError::MalformedResponse(format!(
            "`data.image_original_url` is not an http(s) URL: {raw}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::decode_json;

    fn parse(body: &str) -> Result<Url, FetchError> {
        image_url(decode_json(body.as_bytes())?)
    }

    #[test]
    fn test_image_url_present() {
        let url = parse(
            r#"{"data": {"type": "gif", "image_original_url": "https://media.giphy.com/media/abc/giphy.gif"}, "meta": {"status": 200}}"#,
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://media.giphy.com/media/abc/giphy.gif");
    }

    #[test]
    fn test_image_url_missing_field() {
        let err = parse(r#"{"data": {"type": "gif"}}"#).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("data.image_original_url"));
    }

    #[test]
    fn test_image_url_empty_data() {
        let err = parse(r#"{"data": [], "meta": {"status": 200}}"#).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_image_url_missing_data() {
        let err = parse(r#"{"meta": {"status": 200}}"#).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_image_url_not_http() {
        let err = parse(r#"{"data": {"image_original_url": "file:///etc/passwd"}}"#).unwrap_err();
        assert!(err.is_malformed());

        let err = parse(r#"{"data": {"image_original_url": ""}}"#).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_gif_file_name() {
        assert_eq!(gif_file_name("cat").unwrap(), "cat.gif");
        assert_eq!(gif_file_name("funny dog").unwrap(), "funny dog.gif");
        assert!(matches!(gif_file_name(""), Err(FetchError::MissingTag)));
        assert!(matches!(gif_file_name("  "), Err(FetchError::MissingTag)));
        assert!(matches!(
            gif_file_name("../etc"),
            Err(FetchError::InvalidTag(_))
        ));
        assert!(matches!(
            gif_file_name("a\\b"),
            Err(FetchError::InvalidTag(_))
        ));
    }

    #[test]
    fn test_builder_requires_api_key() {
        assert!(matches!(
            GiphyClient::builder().build(),
            Err(FetchError::MissingApiKey)
        ));
        assert!(matches!(
            GiphyClient::builder().api_key("   ").build(),
            Err(FetchError::MissingApiKey)
        ));
    }

    #[test]
    fn test_builder_rejects_bad_endpoint() {
        let result = GiphyClient::builder()
            .api_key("key")
            .endpoint("ftp://example.com")
            .build();
        assert!(matches!(result, Err(FetchError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_search_url() {
        let client = GiphyClient::builder().api_key("secret").build().unwrap();
        assert_eq!(client.endpoint().as_str(), GIPHY_RANDOM_ENDPOINT);

        let url = client.search_url("funny cat");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("tag".to_string(), "funny cat".to_string()),
                ("api_key".to_string(), "secret".to_string()),
            ]
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = GiphyClient::builder().api_key("secret").build().unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
