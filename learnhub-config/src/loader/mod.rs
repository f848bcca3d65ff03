pub mod db_url;
pub mod error;

use once_cell::sync::Lazy;
use std::{fs, path::PathBuf};
use url::Url;

use crate::{
    models::{
        CatalogConfig, ClientConfig, Config, ConfigMetadata, CorsConfig,
        DEFAULT_CATALOG_PAGE_SIZE, DEFAULT_CATALOG_TIMEOUT,
        DEFAULT_CATALOG_URL, DEFAULT_DEMO_USER_EMAIL, DEFAULT_DEMO_USER_NAME,
        DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DatabaseConfig,
        DemoUserConfig, ServerConfig,
        sources::{EnvConfig, FileConfig},
    },
    util::parse_duration,
    validation::{self, ConfigWarnings},
};

pub use error::ConfigLoadError;

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("learnhub.toml"),
        PathBuf::from("config/learnhub.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env_config = EnvConfig::gather();
        self.load_with_env(env_config, env_file_loaded)
    }

    /// Compose from an already-gathered environment snapshot.
    pub fn load_with_env(
        &self,
        env_config: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env_config)?;
        let (config, warnings) = compose_config(
            file_config,
            env_config,
            ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        )?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let mut source = ConfigPathSource::default();

        if let Some(explicit) = &self.options.config_path {
            source.explicit = Some(explicit.clone());
        } else if let Some(from_env) = &env_config.config_path {
            source.env = Some(from_env.clone());
        } else {
            source.default = DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
                .cloned();
        }

        let Some((path, provenance)) = source.resolved_path() else {
            return Ok((None, None));
        };

        if !path.exists() {
            if provenance.is_explicit() {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }
}

/// Merge file and environment values over the built-in defaults, then run
/// the guard rails. Environment values take precedence over the file.
pub fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if metadata.config_path.is_none() {
        warnings.push_with_hint(
            "No learnhub.toml detected; using environment variables and defaults",
            "Create learnhub.toml or set LEARNHUB_CONFIG_PATH to pin settings in a file",
        );
    }

    let FileConfig {
        server: file_server,
        database: file_database,
        cors: file_cors,
        catalog: file_catalog,
        demo_user: file_demo_user,
        client: file_client,
        dev_mode: file_dev_mode,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
        port: env
            .server_port
            .or(file_server.port)
            .unwrap_or(DEFAULT_SERVER_PORT),
    };

    let database = DatabaseConfig {
        primary_url: db_url::resolve_database_url(&env, &file_database)?,
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .clone()
            .or(file_cors.allowed_origins)
            .unwrap_or_else(default_cors_origins),
        allowed_methods: env
            .cors_allowed_methods
            .clone()
            .or(file_cors.allowed_methods)
            .unwrap_or_else(default_cors_methods),
        allowed_headers: env
            .cors_allowed_headers
            .clone()
            .or(file_cors.allowed_headers)
            .unwrap_or_else(default_cors_headers),
        allow_credentials: env
            .cors_allow_credentials
            .or(file_cors.allow_credentials)
            .unwrap_or(false),
    };

    let raw_base_url = env
        .catalog_base_url
        .clone()
        .or(file_catalog.base_url)
        .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());
    let base_url = Url::parse(raw_base_url.trim()).map_err(|source| {
        ConfigLoadError::InvalidCatalogUrl {
            value: raw_base_url.clone(),
            source,
        }
    })?;
    let timeout = match env.catalog_timeout.clone().or(file_catalog.timeout) {
        Some(raw) => parse_duration(&raw).map_err(|source| {
            ConfigLoadError::InvalidCatalogTimeout { value: raw, source }
        })?,
        None => DEFAULT_CATALOG_TIMEOUT,
    };
    let catalog = CatalogConfig {
        enabled: env
            .catalog_enabled
            .or(file_catalog.enabled)
            .unwrap_or(true),
        base_url,
        timeout,
        page_size: env
            .catalog_page_size
            .or(file_catalog.page_size)
            .unwrap_or(DEFAULT_CATALOG_PAGE_SIZE),
    };

    let demo_user = DemoUserConfig {
        name: env
            .demo_user_name
            .clone()
            .or(file_demo_user.name)
            .unwrap_or_else(|| DEFAULT_DEMO_USER_NAME.to_string()),
        email: env
            .demo_user_email
            .clone()
            .or(file_demo_user.email)
            .unwrap_or_else(|| DEFAULT_DEMO_USER_EMAIL.to_string()),
    };

    let client = ClientConfig {
        dir: env.client_dir.clone().or(file_client.dir),
    };

    let dev_mode = env.dev_mode.or(file_dev_mode).unwrap_or(false);

    let config = Config {
        server,
        database,
        cors,
        catalog,
        demo_user,
        client,
        dev_mode,
        metadata,
    };

    let guard_warnings = validation::apply_guard_rails(&config)?;
    warnings.extend(guard_warnings);

    Ok((config, warnings))
}

#[derive(Debug, Default)]
struct ConfigPathSource {
    explicit: Option<PathBuf>,
    env: Option<PathBuf>,
    default: Option<PathBuf>,
}

impl ConfigPathSource {
    fn resolved_path(&self) -> Option<(PathBuf, ConfigPathProvenance)> {
        if let Some(path) = &self.explicit {
            return Some((path.clone(), ConfigPathProvenance::Explicit));
        }
        if let Some(path) = &self.env {
            return Some((path.clone(), ConfigPathProvenance::Env));
        }
        if let Some(path) = &self.default {
            return Some((path.clone(), ConfigPathProvenance::Default));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigPathProvenance {
    Explicit,
    Env,
    Default,
}

impl ConfigPathProvenance {
    fn is_explicit(self) -> bool {
        matches!(
            self,
            ConfigPathProvenance::Explicit | ConfigPathProvenance::Env
        )
    }
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn default_cors_methods() -> Vec<String> {
    vec![
        "GET".to_string(),
        "POST".to_string(),
        "DELETE".to_string(),
        "OPTIONS".to_string(),
    ]
}

fn default_cors_headers() -> Vec<String> {
    vec!["Content-Type".to_string(), "Accept".to_string()]
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn metadata_with_file() -> ConfigMetadata {
        ConfigMetadata {
            config_path: Some(PathBuf::from("learnhub.toml")),
            env_file_loaded: false,
        }
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let (config, warnings) = compose_config(
            None,
            EnvConfig::default(),
            ConfigMetadata::default(),
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert!(config.catalog.enabled);
        assert_eq!(config.catalog.base_url.as_str(), "https://openlibrary.org/");
        assert_eq!(config.catalog.timeout, Duration::from_secs(10));
        assert_eq!(config.catalog.page_size, 10);
        assert_eq!(config.demo_user.email, "demo@learnhub.com");
        assert_eq!(config.demo_user.name, "Demo User");
        assert!(config.client.dir.is_none());
        assert!(
            warnings
                .items
                .iter()
                .any(|w| w.message.contains("No learnhub.toml"))
        );
    }

    #[test]
    fn env_overrides_file_values() {
        let file: FileConfig = toml::from_str(
            r#"
            dev_mode = true

            [server]
            port = 8080

            [catalog]
            base_url = "http://catalog.internal"
            timeout = "3s"
            page_size = 5

            [demo_user]
            name = "File User"
            "#,
        )
        .unwrap();
        let env = EnvConfig {
            server_port: Some(9090),
            catalog_page_size: Some(20),
            demo_user_email: Some("env@example.com".into()),
            ..Default::default()
        };

        let (config, _) =
            compose_config(Some(file), env, metadata_with_file()).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.catalog.page_size, 20);
        assert_eq!(config.catalog.timeout, Duration::from_secs(3));
        assert_eq!(
            config.catalog.base_url.as_str(),
            "http://catalog.internal/"
        );
        assert_eq!(config.demo_user.name, "File User");
        assert_eq!(config.demo_user.email, "env@example.com");
        assert!(config.dev_mode);
    }

    #[test]
    fn bad_catalog_timeout_fails_the_load() {
        let env = EnvConfig {
            catalog_timeout: Some("eventually".into()),
            ..Default::default()
        };
        let err = compose_config(None, env, ConfigMetadata::default())
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::InvalidCatalogTimeout { .. }));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader =
            ConfigLoader::new().with_config_path(dir.path().join("nope.toml"));
        let err = loader
            .load_with_env(EnvConfig::default(), false)
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
    }

    #[test]
    fn reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learnhub.toml");
        fs::write(
            &path,
            "[server]\nhost = \"127.0.0.1\"\n\n[client]\ndir = \"dist/public\"\n",
        )
        .unwrap();

        let load = ConfigLoader::new()
            .with_config_path(&path)
            .load_with_env(EnvConfig::default(), false)
            .unwrap();

        assert_eq!(load.config.server.host, "127.0.0.1");
        assert_eq!(load.config.metadata.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(
            load.config.client.dir.as_deref(),
            Some(std::path::Path::new("dist/public"))
        );
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learnhub.toml");
        fs::write(&path, "[server\nport = 1").unwrap();

        let err = ConfigLoader::new()
            .with_config_path(&path)
            .load_with_env(EnvConfig::default(), false)
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }
}
