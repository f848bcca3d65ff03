use async_trait::async_trait;
use learnhub_model::{NewUser, User};
use uuid::Uuid;

use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn create_user(&self, user: &NewUser) -> Result<User>;

    /// Get-or-create keyed by email. Existing rows are returned unchanged.
    async fn ensure_user(&self, user: &NewUser) -> Result<User>;
}
