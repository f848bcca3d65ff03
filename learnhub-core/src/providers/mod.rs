pub mod mapping;
pub mod open_library;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use mapping::{CoverSize, category_for_subject, cover_url, map_book_to_content};
pub use open_library::OpenLibraryProvider;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Catalog returned HTTP {status}")]
    Status { status: u16 },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// One search document as returned by the OpenLibrary search endpoint,
/// restricted to the requested `fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenLibraryBook {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: Option<Vec<String>>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub subject: Option<Vec<String>>,
    #[serde(default)]
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub ratings_average: Option<f64>,
}

/// A page of catalog search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub docs: Vec<OpenLibraryBook>,
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
}

/// External book catalog used to augment local search results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn search_books(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<CatalogPage, ProviderError>;

    /// Raw JSON document for a work key such as `/works/OL45883W`.
    async fn fetch_work(
        &self,
        key: &str,
    ) -> Result<serde_json::Value, ProviderError>;
}
