use std::{collections::HashMap, fmt, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    config::Config,
    error::AppResult,
    models::{CatalogPage, PosterCache, PosterCard, PosterInfo, RecommendationResult, Selection},
    services::{
        providers::{HttpBackend, MetadataProvider, RecommendationBackend, TmdbProvider},
        recommendations, title_search, CatalogLoader, PosterEnricher, SharedCatalog,
    },
};

/// Tunables for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub page_size: u32,
    pub poster_concurrency: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            page_size: 50,
            poster_concurrency: 8,
        }
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            poster_concurrency: config.poster_concurrency,
        }
    }
}

/// All state owned by one browsing session
///
/// Cheap to clone; clones share the same catalog, poster cache and selection.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    id: Uuid,
    settings: SessionSettings,
    backend: Arc<dyn RecommendationBackend>,
    enricher: PosterEnricher,
    loader: CatalogLoader,
    catalog: SharedCatalog,
    posters: RwLock<PosterCache>,
    selection: RwLock<Option<Selection>>,
    recommendations: RwLock<RecommendationResult>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id)
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates an empty session over the given services
    pub fn new(
        backend: Arc<dyn RecommendationBackend>,
        metadata: Arc<dyn MetadataProvider>,
        settings: SessionSettings,
    ) -> Self {
        let enricher = PosterEnricher::new(metadata, settings.poster_concurrency);
        let loader = CatalogLoader::new(backend.clone(), enricher.clone(), settings.page_size);

        Self {
            inner: Arc::new(SessionInner {
                id: Uuid::new_v4(),
                settings,
                backend,
                enricher,
                loader,
                catalog: SharedCatalog::new(),
                posters: RwLock::new(PosterCache::new()),
                selection: RwLock::new(None),
                recommendations: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Creates an empty session talking to the configured HTTP services
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http_client = config.http_client()?;
        let backend = HttpBackend::new(http_client.clone(), config.backend_url.clone());
        let metadata = TmdbProvider::from_config(http_client, config);

        Ok(Self::new(
            Arc::new(backend),
            Arc::new(metadata),
            SessionSettings::from(config),
        ))
    }

    /// Creates a session and loads the first catalog page
    ///
    /// A failed first load is logged; the session is still usable and the
    /// load can be retried with [`Session::load_more`].
    pub async fn open(config: &Config) -> AppResult<Self> {
        let session = Self::from_config(config)?;
        if let Err(e) = session.load_more().await {
            tracing::warn!(session_id = %session.id(), error = %e, "Initial catalog load failed");
        }
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Loads the next catalog page; `Ok(None)` if busy or exhausted
    #[tracing::instrument(name = "session", skip_all, fields(session_id = %self.inner.id))]
    pub async fn load_more(&self) -> AppResult<Option<CatalogPage>> {
        self.inner
            .loader
            .load_next_page(&self.inner.catalog, &self.inner.posters)
            .await
    }

    pub fn is_loading(&self) -> bool {
        self.inner.catalog.is_loading()
    }

    pub async fn is_exhausted(&self) -> bool {
        self.inner.catalog.read().await.is_exhausted()
    }

    /// Every title loaded so far
    pub async fn catalog_titles(&self) -> Vec<String> {
        self.inner.catalog.read().await.titles().to_vec()
    }

    /// Candidates offered before the user types anything
    pub async fn default_options(&self) -> Vec<Selection> {
        let catalog = self.inner.catalog.read().await;
        title_search::default_options(&catalog, self.inner.settings.page_size as usize)
    }

    /// Selection candidates for a free-text query
    #[tracing::instrument(name = "session", skip_all, fields(session_id = %self.inner.id))]
    pub async fn search(&self, query: &str) -> Vec<Selection> {
        let defaults = self.default_options().await;
        title_search::search_titles(self.inner.backend.as_ref(), query, defaults).await
    }

    pub async fn select(&self, selection: Option<Selection>) {
        *self.inner.selection.write().await = selection;
    }

    pub async fn selection(&self) -> Option<Selection> {
        self.inner.selection.read().await.clone()
    }

    /// Fetches recommendations for the current selection
    ///
    /// Does nothing and returns an empty result when nothing is selected.
    #[tracing::instrument(name = "session", skip_all, fields(session_id = %self.inner.id))]
    pub async fn recommend(&self) -> RecommendationResult {
        let Some(selection) = self.selection().await else {
            tracing::debug!("No title selected");
            return Vec::new();
        };

        let titles = recommendations::get_recommendations(
            self.inner.backend.as_ref(),
            &self.inner.enricher,
            &selection,
            &self.inner.posters,
        )
        .await;

        *self.inner.recommendations.write().await = titles.clone();
        titles
    }

    /// The last recommendations, each with the poster to show for it
    pub async fn recommendation_cards(&self) -> Vec<PosterCard> {
        let titles = self.inner.recommendations.read().await.clone();
        self.cards(&titles).await
    }

    /// Pairs titles with their cached posters, falling back to the placeholder
    pub async fn cards(&self, titles: &[String]) -> Vec<PosterCard> {
        let posters = self.inner.posters.read().await;
        titles
            .iter()
            .map(|title| PosterCard {
                title: title.clone(),
                poster: posters.poster_or_default(title),
            })
            .collect()
    }

    /// Enriches arbitrary titles through this session's cache
    pub async fn enrich(&self, titles: &[String]) -> HashMap<String, PosterInfo> {
        self.inner.enricher.enrich(titles, &self.inner.posters).await
    }

    pub async fn poster(&self, title: &str) -> PosterInfo {
        self.inner.posters.read().await.poster_or_default(title)
    }
}
