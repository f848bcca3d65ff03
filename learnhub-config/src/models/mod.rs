pub mod sources;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 5000;
pub const DEFAULT_CATALOG_URL: &str = "https://openlibrary.org";
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CATALOG_PAGE_SIZE: u32 = 10;
pub const MAX_CATALOG_PAGE_SIZE: u32 = 50;
pub const DEFAULT_DEMO_USER_NAME: &str = "Demo User";
pub const DEFAULT_DEMO_USER_EMAIL: &str = "demo@learnhub.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub catalog: CatalogConfig,
    pub demo_user: DemoUserConfig,
    pub client: ClientConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub primary_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
    }
}

/// External book catalog settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub enabled: bool,
    pub base_url: Url,
    pub timeout: Duration,
    /// Number of catalog documents requested per search.
    pub page_size: u32,
}

#[derive(Debug, Clone)]
pub struct DemoUserConfig {
    pub name: String,
    pub email: String,
}

/// Pre-built frontend bundle served alongside the API.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
