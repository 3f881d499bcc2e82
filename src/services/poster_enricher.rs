use std::{collections::HashMap, sync::Arc};

use tokio::sync::{RwLock, Semaphore};

use crate::{
    models::{PosterCache, PosterInfo},
    services::providers::MetadataProvider,
};

/// Attaches poster artwork to bare titles
///
/// Lookups for uncached titles run concurrently, at most `max_concurrency` at
/// a time. Each title resolves on its own: a failed or empty lookup becomes
/// the placeholder and never fails the batch. There is no retry.
#[derive(Clone)]
pub struct PosterEnricher {
    provider: Arc<dyn MetadataProvider>,
    max_concurrency: usize,
}

impl PosterEnricher {
    pub fn new(provider: Arc<dyn MetadataProvider>, max_concurrency: usize) -> Self {
        Self {
            provider,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Looks up every title missing from `cache` and merges the results in
    ///
    /// Returns only the newly resolved entries. Titles that were already
    /// cached cause no network work and are absent from the result.
    #[tracing::instrument(skip_all, fields(requested = titles.len()))]
    pub async fn enrich(
        &self,
        titles: &[String],
        cache: &RwLock<PosterCache>,
    ) -> HashMap<String, PosterInfo> {
        let uncached = cache.read().await.uncached(titles);
        if uncached.is_empty() {
            tracing::debug!("All titles already enriched");
            return HashMap::new();
        }

        let delta = self.fetch_batch(uncached).await;
        let inserted = cache.write().await.merge(&delta);

        tracing::info!(
            resolved = delta.len(),
            inserted,
            placeholders = delta.values().filter(|info| info.is_placeholder()).count(),
            "Poster batch merged"
        );

        delta
    }

    /// Fans out one lookup per title and waits for all of them
    async fn fetch_batch(&self, titles: Vec<String>) -> HashMap<String, PosterInfo> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = Vec::with_capacity(titles.len());

        for title in titles {
            let provider = Arc::clone(&self.provider);
            let semaphore = Arc::clone(&semaphore);
            let lookup_title = title.clone();
            let task = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                resolve_poster(provider.as_ref(), &lookup_title).await
            });
            tasks.push((title, task));
        }

        let mut results = HashMap::with_capacity(tasks.len());
        for (title, task) in tasks {
            let info = match task.await {
                Ok(info) => info,
                Err(e) => {
                    tracing::error!(title = %title, error = %e, "Poster lookup task failed");
                    PosterInfo::placeholder()
                }
            };
            results.insert(title, info);
        }

        results
    }
}

async fn resolve_poster(provider: &dyn MetadataProvider, title: &str) -> PosterInfo {
    match provider.lookup_poster(title).await {
        Ok(Some(info)) => info,
        Ok(None) => {
            tracing::debug!(title = %title, "No artwork found");
            PosterInfo::placeholder()
        }
        Err(e) => {
            tracing::warn!(title = %title, kind = e.kind(), error = %e, "Poster lookup failed");
            PosterInfo::placeholder()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{AppError, AppResult},
        services::providers::MockMetadataProvider,
    };
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    fn titles(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn found(title: &str) -> PosterInfo {
        PosterInfo::new(
            format!("https://image.tmdb.org/t/p/w500/{}.jpg", title),
            format!("https://www.themoviedb.org/movie/{}", title.len()),
        )
    }

    #[tokio::test]
    async fn test_enrich_resolves_and_merges() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_lookup_poster()
            .times(2)
            .returning(|title| Ok(Some(found(title))));

        let enricher = PosterEnricher::new(Arc::new(provider), 4);
        let cache = RwLock::new(PosterCache::new());

        let delta = enricher.enrich(&titles(&["A", "B"]), &cache).await;

        assert_eq!(delta.len(), 2);
        assert_eq!(delta["A"], found("A"));
        let cache = cache.read().await;
        assert_eq!(cache.get("B"), Some(&found("B")));
    }

    #[tokio::test]
    async fn test_second_enrich_issues_no_lookups() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_lookup_poster()
            .times(3)
            .returning(|title| Ok(Some(found(title))));

        let enricher = PosterEnricher::new(Arc::new(provider), 4);
        let cache = RwLock::new(PosterCache::new());
        let batch = titles(&["A", "B", "C"]);

        enricher.enrich(&batch, &cache).await;
        let before = cache.read().await.clone();
        let delta = enricher.enrich(&batch, &cache).await;

        assert!(delta.is_empty());
        let after = cache.read().await;
        for title in &batch {
            assert_eq!(after.get(title), before.get(title));
        }
    }

    #[tokio::test]
    async fn test_overlapping_batch_fetches_only_new_titles() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_lookup_poster()
            .withf(|title| title == "A" || title == "B")
            .times(2)
            .returning(|title| Ok(Some(found(title))));
        provider
            .expect_lookup_poster()
            .withf(|title| title == "C")
            .times(1)
            .returning(|title| Ok(Some(found(title))));

        let enricher = PosterEnricher::new(Arc::new(provider), 4);
        let cache = RwLock::new(PosterCache::new());

        enricher.enrich(&titles(&["A", "B"]), &cache).await;
        let delta = enricher.enrich(&titles(&["B", "C"]), &cache).await;

        assert_eq!(delta.keys().collect::<Vec<_>>(), vec!["C"]);
        assert_eq!(cache.read().await.len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_titles_looked_up_once() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_lookup_poster()
            .times(1)
            .returning(|title| Ok(Some(found(title))));

        let enricher = PosterEnricher::new(Arc::new(provider), 4);
        let cache = RwLock::new(PosterCache::new());

        let delta = enricher.enrich(&titles(&["A", "A", "A"]), &cache).await;
        assert_eq!(delta.len(), 1);
    }

    #[tokio::test]
    async fn test_failures_and_misses_become_placeholders() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_lookup_poster()
            .withf(|title| title == "A")
            .returning(|title| Ok(Some(found(title))));
        provider
            .expect_lookup_poster()
            .withf(|title| title == "B")
            .returning(|_| Ok(None));
        provider
            .expect_lookup_poster()
            .withf(|title| title == "C")
            .returning(|_| {
                Err(AppError::Protocol {
                    status: 401,
                    body: "Invalid API key".to_string(),
                })
            });
        provider
            .expect_lookup_poster()
            .withf(|title| title == "D")
            .returning(|_| Err(AppError::Decode("expected value".to_string())));

        let enricher = PosterEnricher::new(Arc::new(provider), 2);
        let cache = RwLock::new(PosterCache::new());

        let delta = enricher
            .enrich(&titles(&["A", "B", "C", "D"]), &cache)
            .await;

        assert_eq!(delta.len(), 4);
        assert_eq!(delta["A"], found("A"));
        assert_eq!(delta["B"], PosterInfo::placeholder());
        assert_eq!(delta["C"], PosterInfo::placeholder());
        assert_eq!(delta["D"], PosterInfo::placeholder());
        assert_eq!(cache.read().await.len(), 4);
    }

    struct SlowProvider {
        active: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl MetadataProvider for SlowProvider {
        async fn lookup_poster(&self, title: &str) -> AppResult<Option<PosterInfo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(Some(found(title)))
        }
    }

    #[tokio::test]
    async fn test_fan_out_is_bounded() {
        let provider = Arc::new(SlowProvider {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        });
        let enricher = PosterEnricher::new(provider.clone(), 3);
        let cache = RwLock::new(PosterCache::new());
        let batch: Vec<String> = (0..12).map(|i| format!("Movie {}", i)).collect();

        let delta = enricher.enrich(&batch, &cache).await;

        assert_eq!(delta.len(), 12);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 12);
        assert!(provider.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_makes_progress() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_lookup_poster()
            .times(2)
            .returning(|_| Ok(None));

        let enricher = PosterEnricher::new(Arc::new(provider), 0);
        let cache = RwLock::new(PosterCache::new());

        let delta = enricher.enrich(&titles(&["A", "B"]), &cache).await;
        assert_eq!(delta.len(), 2);
    }
}
