use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use learnhub_model::{
    Category, Content, ContentFilters, ContentType, ContentWithProgress,
    Progress, SortBy,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::unit_of_work::AppUnitOfWork;
use crate::error::{CoreError, Result};
use crate::providers::{CatalogProvider, map_book_to_content};

pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
pub const MAX_SEARCH_LIMIT: u32 = 50;
pub const DEFAULT_EXTERNAL_PAGE_SIZE: u32 = 10;

/// Parsed search parameters. Blank strings have already been dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub category: Option<Category>,
    pub content_type: Option<ContentType>,
    pub sort_by: Option<SortBy>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub content: Vec<ContentWithProgress>,
    pub total: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    /// Documents requested from the catalog per search.
    pub external_page_size: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            external_page_size: DEFAULT_EXTERNAL_PAGE_SIZE,
        }
    }
}

/// Local search merged with one catalog lookup.
#[derive(Clone)]
pub struct ContentSearchService {
    uow: Arc<AppUnitOfWork>,
    catalog: Option<Arc<dyn CatalogProvider>>,
    settings: SearchSettings,
}

impl std::fmt::Debug for ContentSearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentSearchService")
            .field("catalog_enabled", &self.catalog.is_some())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Outcome of the catalog half of a search.
struct ExternalBatch {
    items: Vec<Content>,
    has_more: bool,
}

impl ContentSearchService {
    pub fn new(
        uow: Arc<AppUnitOfWork>,
        catalog: Option<Arc<dyn CatalogProvider>>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            uow,
            catalog,
            settings,
        }
    }

    pub async fn search(
        &self,
        user_id: Uuid,
        request: SearchRequest,
    ) -> Result<SearchResponse> {
        let query = request
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| {
                CoreError::InvalidInput(
                    "Query parameter 'q' is required".to_string(),
                )
            })?;
        let limit = request
            .limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);
        let offset = request.offset.unwrap_or(0);

        // One extra row tells us whether another local page exists.
        let filters = ContentFilters {
            category: request.category,
            content_type: request.content_type,
            sort_by: request.sort_by,
            ..Default::default()
        }
        .with_page(limit + 1, offset);

        let mut local = self.uow.content.search_content(query, &filters).await?;
        let local_has_more = local.len() > limit as usize;
        local.truncate(limit as usize);

        let external = self.search_catalog(query, offset).await;

        let local_count = local.len();
        let mut seen: HashSet<Uuid> = local.iter().map(|c| c.id).collect();
        let mut merged = local;
        for item in external.items {
            if seen.insert(item.id) {
                merged.push(item);
            }
        }
        let external_count = merged.len() - local_count;

        let content = self.annotate(user_id, merged).await?;

        info!(
            query,
            local = local_count,
            external = external_count,
            "content search"
        );

        Ok(SearchResponse {
            total: content.len(),
            has_more: local_has_more || external.has_more,
            content,
        })
    }

    /// Query the catalog and upsert every mapped document. Failures are
    /// logged and yield an empty batch.
    async fn search_catalog(&self, query: &str, offset: u32) -> ExternalBatch {
        let empty = ExternalBatch {
            items: Vec::new(),
            has_more: false,
        };
        let Some(catalog) = &self.catalog else {
            return empty;
        };

        let page = match catalog
            .search_books(query, self.settings.external_page_size, offset)
            .await
        {
            Ok(page) => page,
            Err(err) => {
                warn!(query, error = %err, "catalog search failed");
                return empty;
            }
        };

        let has_more =
            page.num_found > u64::from(offset) + page.docs.len() as u64;

        let mut items = Vec::with_capacity(page.docs.len());
        for doc in &page.docs {
            let mapped = map_book_to_content(doc);
            match self.uow.content.upsert_external_content(&mapped).await {
                Ok(stored) => items.push(stored),
                Err(err) => {
                    warn!(
                        external_id = %doc.key,
                        error = %err,
                        "failed to store catalog result"
                    );
                }
            }
        }

        ExternalBatch { items, has_more }
    }

    /// Attach the user's bookmark flag and progress to each item.
    pub(crate) async fn annotate(
        &self,
        user_id: Uuid,
        items: Vec<Content>,
    ) -> Result<Vec<ContentWithProgress>> {
        annotate_for_user(&self.uow, user_id, items).await
    }
}

pub(crate) async fn annotate_for_user(
    uow: &AppUnitOfWork,
    user_id: Uuid,
    items: Vec<Content>,
) -> Result<Vec<ContentWithProgress>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = items.iter().map(|c| c.id).collect();
    let saved: HashSet<Uuid> = uow
        .saved_content
        .saved_content_ids(user_id, &ids)
        .await?
        .into_iter()
        .collect();
    let mut progress: HashMap<Uuid, Progress> = uow
        .progress
        .get_progress_for_contents(user_id, &ids)
        .await?
        .into_iter()
        .map(|p| (p.content_id, p))
        .collect();

    Ok(items
        .into_iter()
        .map(|content| ContentWithProgress {
            is_saved: saved.contains(&content.id),
            progress: progress.remove(&content.id),
            content,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::unit_of_work::test_support::Mocks;
    use crate::providers::{
        CatalogPage, MockCatalogProvider, OpenLibraryBook, ProviderError,
    };
    use chrono::Utc;
    use learnhub_model::{
        NewContent, ProgressPercentage, ProgressStatus, SOURCE_MANUAL,
        SOURCE_OPENLIBRARY,
    };

    fn local(title: &str) -> Content {
        Content {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            url: None,
            image_url: None,
            source: SOURCE_MANUAL.to_string(),
            external_id: None,
            content_type: ContentType::Article,
            category: Some(Category::WebDev),
            rating: None,
            author: None,
            created_at: Utc::now(),
        }
    }

    fn stored_from(new: &NewContent, id: Uuid) -> Content {
        Content {
            id,
            title: new.title.clone(),
            description: new.description.clone(),
            url: new.url.clone(),
            image_url: new.image_url.clone(),
            source: new.source.clone(),
            external_id: new.external_id.clone(),
            content_type: new.content_type,
            category: new.category,
            rating: new.rating,
            author: new.author.clone(),
            created_at: Utc::now(),
        }
    }

    fn doc(key: &str) -> OpenLibraryBook {
        OpenLibraryBook {
            key: key.to_string(),
            title: format!("Book {key}"),
            ..Default::default()
        }
    }

    fn no_annotations(mocks: &mut Mocks) {
        mocks
            .saved_content
            .expect_saved_content_ids()
            .returning(|_, _| Ok(Vec::new()));
        mocks
            .progress
            .expect_get_progress_for_contents()
            .returning(|_, _| Ok(Vec::new()));
    }

    fn request(q: &str) -> SearchRequest {
        SearchRequest {
            query: Some(q.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let service = ContentSearchService::new(
            Mocks::default().build(),
            None,
            SearchSettings::default(),
        );

        let err = service
            .search(Uuid::nil(), request("   "))
            .await
            .unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidInput(ref m) if m == "Query parameter 'q' is required")
        );

        let err = service
            .search(Uuid::nil(), SearchRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn limit_is_clamped_and_overfetched_by_one() {
        let mut mocks = Mocks::default();
        mocks
            .content
            .expect_search_content()
            .withf(|q, f| {
                q == "rust" && f.limit == Some(51) && f.offset == Some(0)
            })
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let service = ContentSearchService::new(
            mocks.build(),
            None,
            SearchSettings::default(),
        );

        let response = service
            .search(
                Uuid::nil(),
                SearchRequest {
                    limit: Some(500),
                    ..request("rust")
                },
            )
            .await
            .unwrap();
        assert_eq!(response.total, 0);
        assert!(!response.has_more);
    }

    #[tokio::test]
    async fn merges_local_then_external_and_dedupes() {
        let mut mocks = Mocks::default();
        let shared = local("Shared item");
        let shared_id = shared.id;
        let local_rows = vec![local("Local only"), shared.clone()];
        mocks
            .content
            .expect_search_content()
            .returning(move |_, _| Ok(local_rows.clone()));
        // The first catalog document maps onto the row already returned locally.
        mocks
            .content
            .expect_upsert_external_content()
            .times(2)
            .returning(move |new| {
                let id = if new.external_id.as_deref() == Some("/works/A") {
                    shared_id
                } else {
                    Uuid::new_v4()
                };
                Ok(stored_from(new, id))
            });
        no_annotations(&mut mocks);

        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_search_books()
            .withf(|q, limit, offset| q == "rust" && *limit == 10 && *offset == 0)
            .returning(|_, _, _| {
                Ok(CatalogPage {
                    docs: vec![doc("/works/A"), doc("/works/B")],
                    num_found: 2,
                })
            });

        let service = ContentSearchService::new(
            mocks.build(),
            Some(Arc::new(catalog)),
            SearchSettings::default(),
        );
        let response = service.search(Uuid::nil(), request("rust")).await.unwrap();

        let titles: Vec<&str> = response
            .content
            .iter()
            .map(|c| c.content.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Local only", "Shared item", "Book /works/B"]);
        assert_eq!(response.total, 3);
        assert!(!response.has_more);
        assert_eq!(
            response.content[2].content.source,
            SOURCE_OPENLIBRARY.to_string()
        );
    }

    #[tokio::test]
    async fn has_more_follows_local_overflow_or_catalog_count() {
        let mut mocks = Mocks::default();
        mocks
            .content
            .expect_search_content()
            .returning(|_, f| {
                // Return exactly limit + 1 rows.
                Ok((0..f.limit.unwrap_or(0)).map(|i| local(&i.to_string())).collect())
            });
        no_annotations(&mut mocks);
        let service = ContentSearchService::new(
            mocks.build(),
            None,
            SearchSettings::default(),
        );
        let response = service
            .search(
                Uuid::nil(),
                SearchRequest {
                    limit: Some(2),
                    ..request("x")
                },
            )
            .await
            .unwrap();
        assert_eq!(response.total, 2);
        assert!(response.has_more);

        let mut mocks = Mocks::default();
        mocks
            .content
            .expect_search_content()
            .returning(|_, _| Ok(Vec::new()));
        mocks
            .content
            .expect_upsert_external_content()
            .returning(|new| Ok(stored_from(new, Uuid::new_v4())));
        no_annotations(&mut mocks);
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_search_books().returning(|_, _, _| {
            Ok(CatalogPage {
                docs: vec![doc("/works/C")],
                num_found: 40,
            })
        });
        let service = ContentSearchService::new(
            mocks.build(),
            Some(Arc::new(catalog)),
            SearchSettings::default(),
        );
        let response = service
            .search(
                Uuid::nil(),
                SearchRequest {
                    offset: Some(10),
                    ..request("x")
                },
            )
            .await
            .unwrap();
        assert_eq!(response.total, 1);
        assert!(response.has_more);
    }

    #[tokio::test]
    async fn catalog_failures_are_tolerated() {
        let mut mocks = Mocks::default();
        let row = local("Local");
        mocks
            .content
            .expect_search_content()
            .returning(move |_, _| Ok(vec![row.clone()]));
        no_annotations(&mut mocks);
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_search_books()
            .returning(|_, _, _| Err(ProviderError::Status { status: 500 }));

        let service = ContentSearchService::new(
            mocks.build(),
            Some(Arc::new(catalog)),
            SearchSettings::default(),
        );
        let response = service.search(Uuid::nil(), request("x")).await.unwrap();
        assert_eq!(response.total, 1);
        assert!(!response.has_more);
    }

    #[tokio::test]
    async fn failed_upserts_are_skipped() {
        let mut mocks = Mocks::default();
        mocks
            .content
            .expect_search_content()
            .returning(|_, _| Ok(Vec::new()));
        mocks
            .content
            .expect_upsert_external_content()
            .returning(|new| {
                if new.external_id.as_deref() == Some("/works/bad") {
                    Err(CoreError::Internal("boom".into()))
                } else {
                    Ok(stored_from(new, Uuid::new_v4()))
                }
            });
        no_annotations(&mut mocks);
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_search_books().returning(|_, _, _| {
            Ok(CatalogPage {
                docs: vec![doc("/works/bad"), doc("/works/good")],
                num_found: 2,
            })
        });

        let service = ContentSearchService::new(
            mocks.build(),
            Some(Arc::new(catalog)),
            SearchSettings::default(),
        );
        let response = service.search(Uuid::nil(), request("x")).await.unwrap();
        assert_eq!(response.total, 1);
        assert_eq!(
            response.content[0].content.external_id.as_deref(),
            Some("/works/good")
        );
    }

    #[tokio::test]
    async fn results_carry_saved_flag_and_progress() {
        let user = Uuid::new_v4();
        let saved_row = local("Saved");
        let plain_row = local("Plain");
        let saved_id = saved_row.id;
        let rows = vec![saved_row, plain_row];

        let mut mocks = Mocks::default();
        mocks
            .content
            .expect_search_content()
            .returning(move |_, _| Ok(rows.clone()));
        mocks
            .saved_content
            .expect_saved_content_ids()
            .withf(move |u, ids| *u == user && ids.len() == 2)
            .returning(move |_, _| Ok(vec![saved_id]));
        mocks
            .progress
            .expect_get_progress_for_contents()
            .returning(move |u, _| {
                Ok(vec![Progress {
                    id: Uuid::new_v4(),
                    user_id: u,
                    content_id: saved_id,
                    status: ProgressStatus::InProgress,
                    progress_percentage: ProgressPercentage::new(40).unwrap(),
                    last_updated: Utc::now(),
                }])
            });

        let service = ContentSearchService::new(
            mocks.build(),
            None,
            SearchSettings::default(),
        );
        let response = service.search(user, request("x")).await.unwrap();

        assert!(response.content[0].is_saved);
        assert_eq!(
            response.content[0].progress.as_ref().map(|p| p.status),
            Some(ProgressStatus::InProgress)
        );
        assert!(!response.content[1].is_saved);
        assert!(response.content[1].progress.is_none());
    }
}
