use crate::{
    models::{CatalogState, Selection},
    services::providers::RecommendationBackend,
};

/// The first `limit` loaded catalog titles as selection candidates
pub fn default_options(catalog: &CatalogState, limit: usize) -> Vec<Selection> {
    catalog
        .prefix(limit)
        .iter()
        .map(Selection::from_title)
        .collect()
}

/// Service function for title search
///
/// An empty query returns `defaults` unchanged. Anything else goes to the
/// backend; an error or an empty answer also falls back to `defaults`, so
/// this never fails.
pub async fn search_titles(
    backend: &dyn RecommendationBackend,
    query: &str,
    defaults: Vec<Selection>,
) -> Vec<Selection> {
    if query.is_empty() {
        return defaults;
    }

    match backend.search_titles(query).await {
        Ok(titles) if !titles.is_empty() => {
            titles.into_iter().map(Selection::from_title).collect()
        }
        Ok(_) => {
            tracing::debug!(query = %query, "No search results, using default options");
            defaults
        }
        Err(e) => {
            tracing::warn!(
                query = %query,
                kind = e.kind(),
                error = %e,
                "Title search failed, using default options"
            );
            defaults
        }
    }
}
