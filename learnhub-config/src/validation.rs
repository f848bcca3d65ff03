use axum::http::{Method, header::HeaderName};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::{
    CatalogConfig, Config, CorsConfig, DemoUserConfig, MAX_CATALOG_PAGE_SIZE,
};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern")
});

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("CORS wildcard origins are not allowed when DEV_MODE is false")]
    DangerousCorsWildcard,
    #[error("invalid CORS configuration: {reason}")]
    InvalidCorsConfig { reason: String },
    #[error("invalid catalog configuration: {reason}")]
    InvalidCatalogConfig { reason: String },
    #[error("invalid demo user configuration: {reason}")]
    InvalidDemoUser { reason: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    /// Emit every warning through `tracing`.
    pub fn log(&self) {
        for warning in &self.items {
            match &warning.hint {
                Some(hint) => {
                    tracing::warn!(hint = %hint, "{}", warning.message)
                }
                None => tracing::warn!("{}", warning.message),
            }
        }
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if !config.dev_mode && config.cors.is_wildcard_included() {
        return Err(ConfigGuardRailError::DangerousCorsWildcard);
    }

    validate_cors(&config.cors)?;
    validate_catalog(&config.catalog)?;
    validate_demo_user(&config.demo_user)?;

    if config.database.primary_url.is_none() {
        warnings.push_with_hint(
            "DATABASE_URL not configured",
            "Set DATABASE_URL, or DATABASE_HOST / DATABASE_USER / DATABASE_NAME",
        );
    }

    if !config.catalog.enabled {
        warnings.push(
            "OpenLibrary catalog disabled; searches return local content only",
        );
    }

    if let Some(dir) = &config.client.dir
        && !dir.join("index.html").exists()
    {
        warnings.push_with_hint(
            format!("client directory {} has no index.html", dir.display()),
            "Build the frontend bundle or unset CLIENT_DIR",
        );
    }

    if config.cors.allow_credentials && config.cors.is_wildcard_included() {
        warnings.push(
            "CORS credentials allowed alongside wildcard origin; browsers will reject such configuration",
        );
    }

    Ok(warnings)
}

fn validate_cors(cors: &CorsConfig) -> Result<(), ConfigGuardRailError> {
    if cors.allowed_methods.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason:
                "CORS_ALLOWED_METHODS must include at least one HTTP method"
                    .into(),
        });
    }

    for method in &cors.allowed_methods {
        Method::from_bytes(method.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!(
                    "invalid HTTP method `{method}` in CORS_ALLOWED_METHODS"
                ),
            }
        })?;
    }

    for header in &cors.allowed_headers {
        HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!(
                    "invalid header name `{header}` in CORS_ALLOWED_HEADERS"
                ),
            }
        })?;
    }

    Ok(())
}

fn validate_catalog(
    catalog: &CatalogConfig,
) -> Result<(), ConfigGuardRailError> {
    if !matches!(catalog.base_url.scheme(), "http" | "https") {
        return Err(ConfigGuardRailError::InvalidCatalogConfig {
            reason: format!(
                "base URL scheme `{}` is not http or https",
                catalog.base_url.scheme()
            ),
        });
    }
    if catalog.page_size == 0 || catalog.page_size > MAX_CATALOG_PAGE_SIZE {
        return Err(ConfigGuardRailError::InvalidCatalogConfig {
            reason: format!(
                "page size must be between 1 and {MAX_CATALOG_PAGE_SIZE}"
            ),
        });
    }
    if catalog.timeout.is_zero() {
        return Err(ConfigGuardRailError::InvalidCatalogConfig {
            reason: "timeout must be greater than zero".into(),
        });
    }
    Ok(())
}

fn validate_demo_user(
    user: &DemoUserConfig,
) -> Result<(), ConfigGuardRailError> {
    if user.name.trim().is_empty() {
        return Err(ConfigGuardRailError::InvalidDemoUser {
            reason: "name must not be empty".into(),
        });
    }
    if !EMAIL_PATTERN.is_match(user.email.trim()) {
        return Err(ConfigGuardRailError::InvalidDemoUser {
            reason: format!("`{}` is not an email address", user.email),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ClientConfig, ConfigMetadata, DatabaseConfig, ServerConfig,
    };
    use std::time::Duration;
    use url::Url;

    fn base_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 5000,
            },
            database: DatabaseConfig {
                primary_url: Some("postgres://localhost/learnhub".into()),
            },
            cors: CorsConfig {
                allowed_origins: vec!["http://localhost:5173".into()],
                allowed_methods: vec!["GET".into(), "POST".into()],
                allowed_headers: vec!["Content-Type".into()],
                allow_credentials: false,
            },
            catalog: CatalogConfig {
                enabled: true,
                base_url: Url::parse("https://openlibrary.org").unwrap(),
                timeout: Duration::from_secs(10),
                page_size: 10,
            },
            demo_user: DemoUserConfig {
                name: "Demo User".into(),
                email: "demo@learnhub.com".into(),
            },
            client: ClientConfig::default(),
            dev_mode: false,
            metadata: ConfigMetadata::default(),
        }
    }

    #[test]
    fn sane_config_has_no_warnings() {
        let warnings = apply_guard_rails(&base_config()).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn wildcard_cors_rejected_outside_dev_mode() {
        let mut config = base_config();
        config.cors.allowed_origins = vec!["*".into()];
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::DangerousCorsWildcard)
        ));

        config.dev_mode = true;
        assert!(apply_guard_rails(&config).is_ok());
    }

    #[test]
    fn catalog_limits_are_enforced() {
        let mut config = base_config();
        config.catalog.page_size = 0;
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::InvalidCatalogConfig { .. })
        ));

        let mut config = base_config();
        config.catalog.timeout = Duration::ZERO;
        assert!(apply_guard_rails(&config).is_err());

        let mut config = base_config();
        config.catalog.base_url = Url::parse("ftp://catalog.test").unwrap();
        assert!(apply_guard_rails(&config).is_err());
    }

    #[test]
    fn invalid_demo_email_rejected() {
        let mut config = base_config();
        config.demo_user.email = "not-an-email".into();
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::InvalidDemoUser { .. })
        ));
    }

    #[test]
    fn disabled_catalog_and_missing_database_warn() {
        let mut config = base_config();
        config.catalog.enabled = false;
        config.database.primary_url = None;
        let warnings = apply_guard_rails(&config).unwrap();
        assert_eq!(warnings.items.len(), 2);
    }

    #[test]
    fn bad_cors_method_rejected() {
        let mut config = base_config();
        config.cors.allowed_methods = vec!["GE T".into()];
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::InvalidCorsConfig { .. })
        ));
    }
}
