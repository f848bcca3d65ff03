use async_trait::async_trait;
use learnhub_model::{Progress, ProgressPercentage, ProgressStatus};
use uuid::Uuid;

use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Upsert keyed by `(user_id, content_id)`; refreshes `last_updated`.
    async fn update_progress(
        &self,
        user_id: Uuid,
        content_id: Uuid,
        status: ProgressStatus,
        percentage: ProgressPercentage,
    ) -> Result<Progress>;

    /// All progress rows for the user, most recently updated first.
    async fn get_user_progress(&self, user_id: Uuid) -> Result<Vec<Progress>>;

    async fn get_content_progress(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<Option<Progress>>;

    async fn get_progress_for_contents(
        &self,
        user_id: Uuid,
        content_ids: &[Uuid],
    ) -> Result<Vec<Progress>>;
}
