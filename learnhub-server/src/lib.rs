//! # LearnHub Server
//!
//! HTTP API for searching learning content, bookmarking items and tracking
//! progress. Local results from PostgreSQL are merged with a live
//! OpenLibrary lookup; every request acts as a single demo user.
//!
//! The binary in `main.rs` wires configuration, the database and the
//! catalog client, then serves the router built by [`app::create_app`].

pub mod app;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use app::create_app;
pub use infra::app_state::AppState;
