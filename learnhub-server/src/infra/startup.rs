use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use learnhub_config::{CatalogConfig, Config};
use learnhub_core::{
    application::{AppUnitOfWork, ensure_demo_user},
    database::PostgresDatabase,
    providers::{CatalogProvider, OpenLibraryProvider},
};
use tracing::{info, warn};

use crate::infra::app_state::AppState;

/// Build the catalog client, or `None` when the lookup is disabled.
pub fn build_catalog_provider(
    catalog: &CatalogConfig,
) -> Result<Option<Arc<dyn CatalogProvider>>> {
    if !catalog.enabled {
        warn!("external catalog disabled; search returns local results only");
        return Ok(None);
    }

    let provider = OpenLibraryProvider::new(&catalog.base_url, catalog.timeout)
        .context("failed to build OpenLibrary client")?;
    info!(
        base_url = provider.base_url(),
        timeout = ?catalog.timeout,
        page_size = catalog.page_size,
        "external catalog configured"
    );
    Ok(Some(Arc::new(provider)))
}

/// Compose repositories and services over a migrated database and resolve
/// the demo user.
pub async fn wire_app_state(
    config: Arc<Config>,
    postgres: Arc<PostgresDatabase>,
    catalog: Option<Arc<dyn CatalogProvider>>,
) -> Result<AppState> {
    let unit_of_work = Arc::new(
        AppUnitOfWork::from_postgres(Arc::clone(&postgres))
            .map_err(|err| anyhow!("failed to build unit of work: {err}"))?,
    );

    let demo_user = ensure_demo_user(
        &unit_of_work,
        &config.demo_user.name,
        &config.demo_user.email,
    )
    .await
    .context("failed to ensure demo user")?;

    Ok(AppState::new(
        config,
        postgres,
        unit_of_work,
        catalog,
        demo_user,
    ))
}
