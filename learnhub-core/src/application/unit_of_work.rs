use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::{
    infrastructure::postgres::{
        PostgresContentRepository, PostgresProgressRepository,
        PostgresSavedContentRepository, PostgresUsersRepository,
    },
    ports::{
        content::ContentRepository, progress::ProgressRepository,
        saved_content::SavedContentRepository, users::UsersRepository,
    },
    postgres::PostgresDatabase,
};

/// Aggregates the repository ports used by application services.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub users: Arc<dyn UsersRepository>,
    pub content: Arc<dyn ContentRepository>,
    pub saved_content: Arc<dyn SavedContentRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("users", &type_name_of_val(self.users.as_ref()))
            .field("content", &type_name_of_val(self.content.as_ref()))
            .field(
                "saved_content",
                &type_name_of_val(self.saved_content.as_ref()),
            )
            .field("progress", &type_name_of_val(self.progress.as_ref()))
            .finish()
    }
}

#[derive(Default)]
pub struct AppUnitOfWorkBuilder {
    users: Option<Arc<dyn UsersRepository>>,
    content: Option<Arc<dyn ContentRepository>>,
    saved_content: Option<Arc<dyn SavedContentRepository>>,
    progress: Option<Arc<dyn ProgressRepository>>,
}

impl fmt::Debug for AppUnitOfWorkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWorkBuilder")
            .field("users", &self.users.is_some())
            .field("content", &self.content.is_some())
            .field("saved_content", &self.saved_content.is_some())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl AppUnitOfWorkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, repo: Arc<dyn UsersRepository>) -> Self {
        self.users = Some(repo);
        self
    }
    pub fn with_content(mut self, repo: Arc<dyn ContentRepository>) -> Self {
        self.content = Some(repo);
        self
    }
    pub fn with_saved_content(
        mut self,
        repo: Arc<dyn SavedContentRepository>,
    ) -> Self {
        self.saved_content = Some(repo);
        self
    }
    pub fn with_progress(mut self, repo: Arc<dyn ProgressRepository>) -> Self {
        self.progress = Some(repo);
        self
    }

    /// Build a validated AppUnitOfWork. Returns a string error naming the
    /// first missing repository.
    pub fn build(self) -> Result<AppUnitOfWork, String> {
        Ok(AppUnitOfWork {
            users: self
                .users
                .ok_or_else(|| "missing UsersRepository".to_string())?,
            content: self
                .content
                .ok_or_else(|| "missing ContentRepository".to_string())?,
            saved_content: self.saved_content.ok_or_else(|| {
                "missing SavedContentRepository".to_string()
            })?,
            progress: self
                .progress
                .ok_or_else(|| "missing ProgressRepository".to_string())?,
        })
    }

    /// Populate the builder with Postgres-backed repository adapters.
    pub fn with_postgres(mut self, db: Arc<PostgresDatabase>) -> Self {
        let pool = db.pool().clone();

        let users: Arc<dyn UsersRepository> =
            Arc::new(PostgresUsersRepository::new(pool.clone()));
        self.users = Some(users);

        let content: Arc<dyn ContentRepository> =
            Arc::new(PostgresContentRepository::new(pool.clone()));
        self.content = Some(content);

        let saved_content: Arc<dyn SavedContentRepository> =
            Arc::new(PostgresSavedContentRepository::new(pool.clone()));
        self.saved_content = Some(saved_content);

        let progress: Arc<dyn ProgressRepository> =
            Arc::new(PostgresProgressRepository::new(pool));
        self.progress = Some(progress);

        self
    }
}

impl AppUnitOfWork {
    /// Convenience helper to compose all Postgres-backed repositories into a unit of work.
    pub fn from_postgres(db: Arc<PostgresDatabase>) -> Result<Self, String> {
        AppUnitOfWorkBuilder::new().with_postgres(db).build()
    }
}
