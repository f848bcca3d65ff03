use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{CatalogPage, CatalogProvider, ProviderError};

const SEARCH_FIELDS: &str =
    "key,title,author_name,first_publish_year,subject,cover_i,ratings_average";

/// OpenLibrary search client.
#[derive(Debug, Clone)]
pub struct OpenLibraryProvider {
    client: Client,
    base_url: String,
}

impl OpenLibraryProvider {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("learnhub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ProviderError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl CatalogProvider for OpenLibraryProvider {
    async fn search_books(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<CatalogPage, ProviderError> {
        let endpoint = format!("{}/search.json", self.base_url);
        debug!(query, limit, offset, "searching OpenLibrary");

        let request = self.client.get(endpoint).query(&[
            ("q", query.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
        ]);

        self.get_json(request).await
    }

    async fn fetch_work(
        &self,
        key: &str,
    ) -> Result<serde_json::Value, ProviderError> {
        if !key.starts_with('/') {
            return Err(ProviderError::InvalidRequest(format!(
                "work key must start with '/': {key}"
            )));
        }

        let request = self.client.get(format!("{}{key}.json", self.base_url));
        self.get_json(request).await
    }
}
