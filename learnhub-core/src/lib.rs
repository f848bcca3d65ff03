//! # LearnHub Core
//!
//! Storage, catalog lookups and application services for LearnHub, a
//! learning-content discovery and progress-tracking service.
//!
//! - [`database`]: repository ports and their PostgreSQL adapters
//! - [`providers`]: the external book catalog (OpenLibrary)
//! - [`application`]: search, library and content services composed over an
//!   [`application::unit_of_work::AppUnitOfWork`]
//! - [`api`]: route paths shared by the server and its tests
#![allow(missing_docs)]

/// Route paths exposed by the HTTP server
pub mod api;

/// Application services and repository composition
pub mod application;

/// Repository ports and PostgreSQL implementations
pub mod database;

/// Error types and error handling utilities
pub mod error;

/// External book catalog providers
pub mod providers;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use error::{CoreError, Result};
