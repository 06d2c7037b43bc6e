//! Result types returned by the API clients

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A GIF downloaded for a tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGif {
    /// Tag the GIF was searched with
    pub tag: String,

    /// Original image URL reported by Giphy
    pub source_url: String,

    /// File the image was written to
    pub path: PathBuf,

    /// Bytes written
    pub size: u64,
}

/// Intro extracts for every page matching a title
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Title as requested
    pub title: String,

    /// One entry per page that carried an extract
    pub extracts: Vec<Extract>,
}

impl ArticleSummary {
    /// True if no page carried an extract
    pub fn is_empty(&self) -> bool {
        self.extracts.is_empty()
    }
}

/// Plain-text intro of a single page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extract {
    /// Wikipedia page id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<u64>,

    /// Normalized page title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Extract text
    pub text: String,
}
