//! Wikipedia intro extract fetcher
//!
//! Queries the MediaWiki action API with `prop=extracts` and collects the
//! plain-text intro of every returned page that has one.

use crate::client::{build_http_client, get, parse_endpoint, read_json, ClientOptions};
use crate::error::FetchError;
use crate::types::{ArticleSummary, Extract};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default wiki language
pub const DEFAULT_LANGUAGE: &str = "en";

/// MediaWiki query response (partial)
#[derive(Debug, Default, Deserialize)]
pub struct QueryResponse {
    /// Absent when the API reports an error or nothing was queried
    #[serde(default)]
    pub query: Option<QueryResult>,

    /// API-level error, reported with a 200 status
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// The `query` object
#[derive(Debug, Default, Deserialize)]
pub struct QueryResult {
    /// Page id (negative for missing pages) to page object
    #[serde(default)]
    pub pages: BTreeMap<String, Page>,
}

/// A single page entry
#[derive(Debug, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub pageid: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    /// Present (as an empty string) when no page has this title
    #[serde(default)]
    pub missing: Option<serde_json::Value>,
    /// Present when the title is not a valid page name
    #[serde(default)]
    pub invalid: Option<serde_json::Value>,
    #[serde(default)]
    pub extract: Option<String>,
}

/// MediaWiki `error` object
#[derive(Debug, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub info: String,
}

/// Extracts of every page that has one, each exactly once
///
/// Pages without an `extract` (missing, invalid or special pages) are
/// skipped. A response without `query` or `query.pages` yields nothing.
pub fn extract_texts(response: &QueryResponse) -> Vec<Extract> {
    let Some(query) = &response.query else {
        return Vec::new();
    };

    query
        .pages
        .iter()
        .filter_map(|(key, page)| match &page.extract {
            Some(text) => Some(Extract {
                page_id: page.pageid,
                title: page.title.clone(),
                text: text.clone(),
            }),
            None => {
                if page.missing.is_some() || page.invalid.is_some() {
                    debug!(page = %key, title = ?page.title, "No such page");
                } else {
                    warn!(page = %key, title = ?page.title, "Page has no extract, skipping");
                }
                None
            }
        })
        .collect()
}

/// Builder for [`WikipediaClient`]
#[derive(Debug, Clone, Default)]
pub struct WikipediaClientBuilder {
    language: Option<String>,
    endpoint: Option<String>,
    follow_redirects: bool,
    options: ClientOptions,
}

impl WikipediaClientBuilder {
    /// Create a builder for English Wikipedia
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the wiki by language code (e.g. `de`)
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Override the API endpoint; takes precedence over [`language`](Self::language)
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Ask the API to resolve redirects
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = Some(ua.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<WikipediaClient, FetchError> {
        let endpoint = match self.endpoint {
            Some(endpoint) => parse_endpoint(&endpoint)?,
            None => language_endpoint(self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE))?,
        };

        Ok(WikipediaClient {
            http: build_http_client(&self.options)?,
            endpoint,
            follow_redirects: self.follow_redirects,
            timeout: self.options.request_timeout(),
        })
    }
}

/// Configured Wikipedia client
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    http: reqwest::Client,
    endpoint: Url,
    follow_redirects: bool,
    timeout: Duration,
}

impl WikipediaClient {
    /// Create a new client builder
    pub fn builder() -> WikipediaClientBuilder {
        WikipediaClientBuilder::new()
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the intro extract of every page matching `title`
    pub async fn summary(&self, title: &str) -> Result<ArticleSummary, FetchError> {
        if title.trim().is_empty() {
            return Err(FetchError::MissingTitle);
        }

        let response = get(&self.http, self.query_url(title), self.timeout).await?;
        let body: QueryResponse = read_json(response).await?;

        if let Some(ref err) = body.error {
            warn!(code = %err.code, info = %err.info, "Wikipedia API reported an error");
        }

        let extracts = extract_texts(&body);
        debug!(title, count = extracts.len(), "Collected extracts");

        Ok(ArticleSummary {
            title: title.to_string(),
            extracts,
        })
    }

    fn query_url(&self, title: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("action", "query")
                .append_pair("titles", title)
                .append_pair("prop", "extracts")
                .append_pair("exintro", "true")
                .append_pair("explaintext", "true")
                .append_pair("format", "json");
            if self.follow_redirects {
                pairs.append_pair("redirects", "1");
            }
        }
        url
    }
}

/// `https://<language>.wikipedia.org/w/api.php`
fn language_endpoint(language: &str) -> Result<Url, FetchError> {
    let valid = !language.is_empty()
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
        return Err(FetchError::InvalidEndpoint(format!(
            "unsupported language code {language:?}"
        )));
    }
    parse_endpoint(&format!("https://{language}.wikipedia.org/w/api.php"))
}
