use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod catalog;
pub mod poster;
pub mod selection;

pub use catalog::{CatalogPage, CatalogState};
pub use poster::{PosterCache, PosterInfo, PLACEHOLDER_DETAIL_LINK, PLACEHOLDER_POSTER_URL};
pub use selection::{PosterCard, RecommendationResult, Selection};

// ============================================================================
// Recommendation Backend Types
// ============================================================================

/// Raw response from GET /movies/all
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCatalogPage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<String>,
    #[serde(default)]
    pub has_more: bool,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw response from GET /recommend/{title}
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRecommendations {
    #[serde(default)]
    pub recommendations: Option<Value>,
}

impl ApiRecommendations {
    /// Recommended titles; anything other than an array of strings reads as empty
    pub fn into_titles(self) -> RecommendationResult {
        match self.recommendations {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(title) => Some(title),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from TMDB /search/movie
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// Search hit; only the fields needed for enrichment are kept
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub poster_path: Option<String>,
}
