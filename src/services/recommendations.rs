use tokio::sync::RwLock;

use crate::{
    models::{PosterCache, RecommendationResult, Selection},
    services::{poster_enricher::PosterEnricher, providers::RecommendationBackend},
};

/// Fetches recommendations for a selection and enriches exactly those titles
///
/// Backend failures are logged and read as "no recommendations". The
/// recommended titles need not be part of the loaded catalog.
pub async fn get_recommendations(
    backend: &dyn RecommendationBackend,
    enricher: &PosterEnricher,
    selection: &Selection,
    posters: &RwLock<PosterCache>,
) -> RecommendationResult {
    let titles = match backend.recommend(&selection.value).await {
        Ok(titles) => titles,
        Err(e) => {
            tracing::error!(
                title = %selection.value,
                kind = e.kind(),
                error = %e,
                "Error fetching recommendations"
            );
            return Vec::new();
        }
    };

    enricher.enrich(&titles, posters).await;

    titles
}
