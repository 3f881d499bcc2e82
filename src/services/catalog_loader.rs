use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::{RwLock, RwLockReadGuard};

use crate::{
    error::{AppError, AppResult},
    models::{CatalogPage, CatalogState, PosterCache},
    services::{poster_enricher::PosterEnricher, providers::RecommendationBackend},
};

/// Catalog state guarded against overlapping page fetches
#[derive(Debug, Default)]
pub struct SharedCatalog {
    state: RwLock<CatalogState>,
    in_flight: AtomicBool,
}

impl SharedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().await
    }

    /// Whether a page fetch is currently outstanding
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }
}

/// Releases the in-flight flag when the fetch finishes, fails or is dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Pages through the backend catalog
#[derive(Clone)]
pub struct CatalogLoader {
    backend: Arc<dyn RecommendationBackend>,
    enricher: PosterEnricher,
    page_size: u32,
}

impl CatalogLoader {
    pub fn new(
        backend: Arc<dyn RecommendationBackend>,
        enricher: PosterEnricher,
        page_size: u32,
    ) -> Self {
        Self {
            backend,
            enricher,
            page_size,
        }
    }

    /// Fetches the next catalog page, appends it and enriches its titles
    ///
    /// Returns `Ok(None)` without touching the network when a fetch is already
    /// in flight or the catalog is exhausted. On failure the state is left as
    /// it was, so the call can simply be repeated.
    ///
    /// The cursor always advances by the page size, even when the backend
    /// returns a short page and still reports more data.
    #[tracing::instrument(skip_all, fields(page_size = self.page_size))]
    pub async fn load_next_page(
        &self,
        catalog: &SharedCatalog,
        posters: &RwLock<PosterCache>,
    ) -> AppResult<Option<CatalogPage>> {
        let Some(_guard) = catalog.try_begin() else {
            tracing::debug!("Catalog page fetch already in flight");
            return Ok(None);
        };

        let cursor = {
            let state = catalog.read().await;
            if state.is_exhausted() {
                tracing::debug!(loaded = state.len(), "Catalog exhausted");
                return Ok(None);
            }
            state.cursor()
        };

        let Some(next_offset) = cursor.checked_add(self.page_size) else {
            tracing::error!(cursor, "Catalog offset would overflow");
            return Err(AppError::Config(format!(
                "catalog offset overflows past cursor {}",
                cursor
            )));
        };

        let raw = match self.backend.fetch_catalog_page(cursor, self.page_size).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(cursor, kind = e.kind(), error = %e, "Catalog page fetch failed");
                return Err(e);
            }
        };

        let page = CatalogPage {
            titles: raw.data,
            has_more: raw.has_more,
            next_offset,
        };

        if page.has_more && page.titles.len() < self.page_size as usize {
            tracing::debug!(
                cursor,
                received = page.titles.len(),
                "Short catalog page reported more data; cursor still advances a full page"
            );
        }

        let loaded = {
            let mut state = catalog.state.write().await;
            state.apply_page(&page);
            state.len()
        };

        tracing::info!(
            cursor,
            received = page.titles.len(),
            loaded,
            has_more = page.has_more,
            "Catalog page loaded"
        );

        self.enricher.enrich(&page.titles, posters).await;

        Ok(Some(page))
    }
}
