//! # LearnHub Server
//!
//! Learning-content discovery and progress tracking.
//!
//! ## Overview
//!
//! - **Search**: substring search over stored content merged with a live
//!   OpenLibrary lookup; catalog hits are stored for later reads
//! - **Bookmarks**: save and unsave content for the demo user
//! - **Progress**: per-item status and percentage, plus dashboard stats
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - PostgreSQL for persistent storage (embedded sqlx migrations)
//! - OpenLibrary as the external book catalog

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use learnhub_config::{Config, ConfigLoad, ConfigLoader};
use learnhub_core::database::PostgresDatabase;
use learnhub_server::{
    create_app,
    infra::startup::{build_catalog_provider, wire_app_state},
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "learnhub-server")]
#[command(about = "Learning-content search, bookmarks and progress tracking")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a learnhub.toml configuration file
    #[arg(short, long, env = "LEARNHUB_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_runtime_config(&cli.serve)?;

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&config).await,
        None => run_server(config).await,
    }
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Arc<Config>> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }

    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }
    warnings.log();

    Ok(Arc::new(config))
}

async fn connect_database(config: &Config) -> anyhow::Result<PostgresDatabase> {
    let database_url = config.database.primary_url.as_deref().ok_or_else(|| {
        error!("DATABASE_URL or DATABASE_HOST/DATABASE_NAME must be provided");
        anyhow!("No PostgreSQL connection configuration found")
    })?;

    if !(database_url.starts_with("postgres://")
        || database_url.starts_with("postgresql://"))
    {
        return Err(anyhow!(
            "Invalid database URL: must start with postgres:// or postgresql://"
        ));
    }

    let postgres = PostgresDatabase::new(database_url)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!("Successfully connected to PostgreSQL");

    postgres
        .initialize_schema()
        .await
        .context("database migration failed")?;

    Ok(postgres)
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    connect_database(config).await?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(config: Arc<Config>) -> anyhow::Result<()> {
    let postgres = Arc::new(connect_database(&config).await?);
    let catalog = build_catalog_provider(&config.catalog)?;
    let state =
        wire_app_state(Arc::clone(&config), postgres, catalog).await?;

    let router = create_app(state);
    let addr = config.server.socket_addr().with_context(|| {
        format!(
            "invalid listen address {}:{}",
            config.server.host, config.server.port
        )
    })?;

    info!(
        "Starting LearnHub server on {}:{}",
        config.server.host, config.server.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
