use std::{fmt, sync::Arc};

use learnhub_config::Config;
use learnhub_core::{
    application::{
        AppUnitOfWork, ContentSearchService, ContentService, LibraryService,
        SearchSettings,
    },
    database::PostgresDatabase,
    providers::CatalogProvider,
};
use learnhub_model::User;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub postgres: Arc<PostgresDatabase>,
    pub unit_of_work: Arc<AppUnitOfWork>,
    pub search: Arc<ContentSearchService>,
    pub library: Arc<LibraryService>,
    pub content: Arc<ContentService>,
    /// Identity injected into every `/api` request.
    pub demo_user: Arc<User>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("postgres", &self.postgres)
            .field("demo_user", &self.demo_user.email)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        postgres: Arc<PostgresDatabase>,
        unit_of_work: Arc<AppUnitOfWork>,
        catalog: Option<Arc<dyn CatalogProvider>>,
        demo_user: User,
    ) -> Self {
        let settings = SearchSettings {
            external_page_size: config.catalog.page_size,
        };
        let search = Arc::new(ContentSearchService::new(
            Arc::clone(&unit_of_work),
            catalog,
            settings,
        ));
        let library = Arc::new(LibraryService::new(Arc::clone(&unit_of_work)));
        let content = Arc::new(ContentService::new(Arc::clone(&unit_of_work)));

        Self {
            config,
            postgres,
            unit_of_work,
            search,
            library,
            content,
            demo_user: Arc::new(demo_user),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
