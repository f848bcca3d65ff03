//! PostgreSQL infrastructure adapters implementing the database ports.

pub mod repositories;

pub use repositories::content::PostgresContentRepository;
pub use repositories::progress::PostgresProgressRepository;
pub use repositories::saved_content::PostgresSavedContentRepository;
pub use repositories::users::PostgresUsersRepository;
