//! Configuration library for LearnHub.
//!
//! Values are composed from an optional TOML file, a `.env` file and the
//! process environment (highest precedence), then checked by guard rails
//! that either reject the configuration or attach warnings for startup logs.

pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, error::ConfigLoadError};
pub use models::{
    CatalogConfig, ClientConfig, Config, ConfigMetadata, CorsConfig,
    DatabaseConfig, DemoUserConfig, ServerConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
