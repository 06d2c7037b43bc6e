//! apigrab - single-shot API fetchers behind the `randomgif` and
//! `wikisummary` command line tools
//!
//! ## Fetchers
//!
//! - [`GiphyClient`] - asks Giphy for a random GIF matching a tag and
//!   streams the original image to `<tag>.gif`
//! - [`WikipediaClient`] - fetches the plain-text intro extract of every
//!   page matching a title
//!
//! Both clients are configured through builders and report failures as
//! [`FetchError`]. Transport failures and malformed bodies are distinct
//! variants; a title without any extract is an empty [`ArticleSummary`],
//! not an error.
//!
//! ```no_run
//! # async fn demo() -> Result<(), apigrab::FetchError> {
//! let wiki = apigrab::WikipediaClient::builder().build()?;
//! for extract in wiki.summary("Rust (programming language)").await?.extracts {
//!     println!("{}", extract.text);
//! }
//! # Ok(()) }
//! ```

pub mod client;
mod download;
mod error;
pub mod fetchers;
mod types;

pub use client::{ClientOptions, DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
pub use error::FetchError;
pub use fetchers::{
    extract_texts, gif_file_name, GiphyClient, GiphyClientBuilder, QueryResponse,
    WikipediaClient, WikipediaClientBuilder,
};
pub use types::{ArticleSummary, Extract, SavedGif};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = concat!("apigrab/", env!("CARGO_PKG_VERSION"));
