/// Remote service abstractions
///
/// The recommendation backend serves the catalog, title search and
/// recommendations. The metadata provider resolves a title to poster artwork.
/// Both sit behind traits so the session logic can run against fakes.
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{ApiCatalogPage, PosterInfo, RecommendationResult},
};

pub mod backend;
pub mod tmdb;

pub use backend::HttpBackend;
pub use tmdb::TmdbProvider;

/// Recommendation backend endpoints
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationBackend: Send + Sync {
    /// Fetch the catalog slice `[skip, skip + limit)`
    async fn fetch_catalog_page(&self, skip: u32, limit: u32) -> AppResult<ApiCatalogPage>;

    /// Free-text title search
    async fn search_titles(&self, query: &str) -> AppResult<Vec<String>>;

    /// Titles recommended for `title`
    async fn recommend(&self, title: &str) -> AppResult<RecommendationResult>;
}

/// Movie metadata lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Resolve a title to poster info
    ///
    /// Returns `Ok(None)` when the service answered but had no usable artwork.
    async fn lookup_poster(&self, title: &str) -> AppResult<Option<PosterInfo>>;
}

/// Checks the status and decodes a JSON body
pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Protocol {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
