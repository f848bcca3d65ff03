use async_trait::async_trait;
use learnhub_model::{Content, ContentFilters, NewContent};
use uuid::Uuid;

use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn get_content(&self, id: Uuid) -> Result<Option<Content>>;

    /// Case-insensitive substring match on title, description and author,
    /// narrowed by the category / type filters and paged by limit / offset.
    async fn search_content(
        &self,
        query: &str,
        filters: &ContentFilters,
    ) -> Result<Vec<Content>>;

    /// Number of rows `search_content` would match without paging.
    async fn count_content(
        &self,
        query: &str,
        filters: &ContentFilters,
    ) -> Result<u64>;

    async fn create_content(&self, content: &NewContent) -> Result<Content>;

    async fn get_content_by_external_id(
        &self,
        external_id: &str,
        source: &str,
    ) -> Result<Option<Content>>;

    /// Insert, or refresh the row keyed by `(source, external_id)`.
    async fn upsert_external_content(
        &self,
        content: &NewContent,
    ) -> Result<Content>;
}
