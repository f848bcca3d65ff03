use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::util::{parse_bool_var, parse_csv_var, parse_var, string_var};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    #[serde(default)]
    pub catalog: FileCatalogConfig,
    #[serde(default)]
    pub demo_user: FileDemoUserConfig,
    #[serde(default)]
    pub client: FileClientConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_methods: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_headers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Humantime string (`"10s"`) or bare seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDemoUserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileClientConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub database_host: Option<String>,
    pub database_port: Option<u16>,
    pub database_user: Option<String>,
    pub database_name: Option<String>,
    pub database_password: Option<String>,
    pub database_password_file: Option<PathBuf>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub cors_allowed_methods: Option<Vec<String>>,
    pub cors_allowed_headers: Option<Vec<String>>,
    pub cors_allow_credentials: Option<bool>,
    pub catalog_enabled: Option<bool>,
    pub catalog_base_url: Option<String>,
    pub catalog_timeout: Option<String>,
    pub catalog_page_size: Option<u32>,
    pub demo_user_name: Option<String>,
    pub demo_user_email: Option<String>,
    pub client_dir: Option<PathBuf>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: string_var("LEARNHUB_CONFIG_PATH").map(PathBuf::from),
            server_host: string_var("SERVER_HOST"),
            server_port: parse_var("SERVER_PORT").or_else(|| parse_var("PORT")),
            database_url: string_var("DATABASE_URL"),
            database_host: string_var("DATABASE_HOST"),
            database_port: parse_var("DATABASE_PORT"),
            database_user: string_var("DATABASE_USER"),
            database_name: string_var("DATABASE_NAME"),
            database_password: string_var("DATABASE_PASSWORD"),
            database_password_file: string_var("DATABASE_PASSWORD_FILE")
                .map(PathBuf::from),
            cors_allowed_origins: parse_csv_var("CORS_ALLOWED_ORIGINS"),
            cors_allowed_methods: parse_csv_var("CORS_ALLOWED_METHODS"),
            cors_allowed_headers: parse_csv_var("CORS_ALLOWED_HEADERS"),
            cors_allow_credentials: parse_bool_var("CORS_ALLOW_CREDENTIALS"),
            catalog_enabled: parse_bool_var("CATALOG_ENABLED"),
            catalog_base_url: string_var("OPENLIBRARY_API_URL"),
            catalog_timeout: string_var("CATALOG_TIMEOUT"),
            catalog_page_size: parse_var("CATALOG_PAGE_SIZE"),
            demo_user_name: string_var("DEMO_USER_NAME"),
            demo_user_email: string_var("DEMO_USER_EMAIL"),
            client_dir: string_var("CLIENT_DIR").map(PathBuf::from),
            dev_mode: parse_bool_var("DEV_MODE"),
        }
    }
}
