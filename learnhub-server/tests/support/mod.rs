#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum_test::TestServer;
use learnhub_config::{
    Config, ConfigMetadata,
    loader::compose_config,
    models::sources::EnvConfig,
};
use learnhub_core::{
    database::PostgresDatabase,
    providers::{CatalogPage, CatalogProvider, OpenLibraryBook, ProviderError},
};
use learnhub_model::{Category, Content, ContentType, NewContent};
use learnhub_server::{AppState, create_app, infra::startup::wire_app_state};
use sqlx::PgPool;

/// Catalog double that answers every search with the same page, or fails.
#[derive(Debug)]
pub struct StubCatalog {
    page: Option<CatalogPage>,
    calls: AtomicUsize,
}

impl StubCatalog {
    pub fn with_docs(docs: Vec<OpenLibraryBook>, num_found: u64) -> Arc<Self> {
        Arc::new(Self {
            page: Some(CatalogPage { docs, num_found }),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            page: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogProvider for StubCatalog {
    async fn search_books(
        &self,
        _query: &str,
        _limit: u32,
        _offset: u32,
    ) -> Result<CatalogPage, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.page
            .clone()
            .ok_or(ProviderError::Status { status: 503 })
    }

    async fn fetch_work(
        &self,
        key: &str,
    ) -> Result<serde_json::Value, ProviderError> {
        Err(ProviderError::InvalidRequest(format!("no work {key}")))
    }
}

pub fn book(key: &str, title: &str) -> OpenLibraryBook {
    OpenLibraryBook {
        key: key.to_string(),
        title: title.to_string(),
        author_name: Some(vec!["Jim Blandy".to_string()]),
        subject: Some(vec!["Programming languages".to_string()]),
        cover_i: Some(1234),
        ratings_average: Some(4.26),
        ..Default::default()
    }
}

fn test_config() -> Result<Config> {
    let env = EnvConfig {
        dev_mode: Some(true),
        ..Default::default()
    };
    let (config, _warnings) =
        compose_config(None, env, ConfigMetadata::default())
            .map_err(|err| anyhow!("failed to compose test config: {err}"))?;
    Ok(config)
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

pub async fn build_test_app(
    pool: PgPool,
    catalog: Option<Arc<dyn CatalogProvider>>,
) -> Result<TestApp> {
    let config = Arc::new(test_config()?);
    let postgres = Arc::new(PostgresDatabase::from_pool(pool));
    let state = wire_app_state(config, postgres, catalog).await?;

    let server = TestServer::new(create_app(state.clone()))
        .map_err(|err| anyhow!(err.to_string()))?;

    Ok(TestApp { server, state })
}

pub async fn seed_content(
    state: &AppState,
    title: &str,
    category: Category,
) -> Result<Content> {
    let content = state
        .unit_of_work
        .content
        .create_content(&NewContent {
            title: title.to_string(),
            description: Some(format!("{title} in depth")),
            url: None,
            image_url: None,
            source: learnhub_model::SOURCE_MANUAL.to_string(),
            external_id: None,
            content_type: ContentType::Article,
            category: Some(category),
            rating: None,
            author: Some("Staff Writer".to_string()),
        })
        .await?;
    Ok(content)
}
