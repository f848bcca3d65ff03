use async_trait::async_trait;
use learnhub_model::{ContentWithProgress, SavedContent};
use uuid::Uuid;

use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SavedContentRepository: Send + Sync {
    /// Fails with `CoreError::AlreadySaved` when the bookmark exists.
    async fn save_content(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<SavedContent>;

    /// Returns whether a bookmark was removed.
    async fn unsave_content(&self, user_id: Uuid, content_id: Uuid)
    -> Result<bool>;

    /// Saved items, newest bookmark first, with the user's progress attached.
    async fn get_saved_content(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ContentWithProgress>>;

    async fn is_content_saved(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<bool>;

    /// Subset of `content_ids` the user has bookmarked.
    async fn saved_content_ids(
        &self,
        user_id: Uuid,
        content_ids: &[Uuid],
    ) -> Result<Vec<Uuid>>;

    async fn count_saved(&self, user_id: Uuid) -> Result<u64>;
}
