/// HTTP client for the recommendation backend
///
/// Endpoints:
/// - GET /movies/all?skip=&limit= → `{ data, has_more }`
/// - GET /movies/search?q= → `[title, ...]`
/// - GET /recommend/{title} → `{ recommendations }`
use reqwest::Client as HttpClient;

use crate::{
    error::AppResult,
    models::{ApiCatalogPage, ApiRecommendations, RecommendationResult},
    services::providers::{read_json, RecommendationBackend},
};

#[derive(Clone)]
pub struct HttpBackend {
    http_client: HttpClient,
    base_url: String,
}

impl HttpBackend {
    pub fn new(http_client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn recommend_url(&self, title: &str) -> String {
        format!("{}/recommend/{}", self.base_url, urlencoding::encode(title))
    }
}

#[async_trait::async_trait]
impl RecommendationBackend for HttpBackend {
    async fn fetch_catalog_page(&self, skip: u32, limit: u32) -> AppResult<ApiCatalogPage> {
        let url = format!("{}/movies/all", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("skip", skip), ("limit", limit)])
            .send()
            .await?;

        let page: ApiCatalogPage = read_json(response).await?;

        tracing::debug!(
            skip,
            limit,
            received = page.data.len(),
            has_more = page.has_more,
            "Catalog page fetched"
        );

        Ok(page)
    }

    async fn search_titles(&self, query: &str) -> AppResult<Vec<String>> {
        let url = format!("{}/movies/search", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await?;

        let titles: Vec<String> = read_json(response).await?;

        tracing::info!(query = %query, results = titles.len(), "Title search completed");

        Ok(titles)
    }

    async fn recommend(&self, title: &str) -> AppResult<RecommendationResult> {
        let response = self
            .http_client
            .get(self.recommend_url(title))
            .send()
            .await?;

        let body: ApiRecommendations = read_json(response).await?;
        let titles = body.into_titles();

        tracing::info!(title = %title, results = titles.len(), "Recommendations fetched");

        Ok(titles)
    }
}
