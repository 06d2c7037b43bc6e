//! API-specific fetchers
//!
//! Each fetcher owns one upstream API: its endpoint, its query parameters
//! and the typed shape of its response.

mod giphy;
mod wikipedia;

pub use giphy::{gif_file_name, GiphyClient, GiphyClientBuilder, GIPHY_RANDOM_ENDPOINT};
pub use wikipedia::{
    extract_texts, ApiError, Page, QueryResponse, QueryResult, WikipediaClient,
    WikipediaClientBuilder, DEFAULT_LANGUAGE,
};
