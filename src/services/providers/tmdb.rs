/// TMDB metadata provider
///
/// Searches /search/movie by free-text title and builds poster and detail
/// URLs from the first hit. The API key travels as a query parameter, so
/// transport errors are stripped of their URL before they leave this module.
use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    error::AppResult,
    models::{PosterInfo, TmdbMovie, TmdbSearchResponse},
    services::providers::{read_json, MetadataProvider},
};

const POSTER_SIZE_PATH: &str = "/t/p/w500";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    site_url: String,
}

impl TmdbProvider {
    pub fn new(
        http_client: HttpClient,
        api_key: String,
        api_url: String,
        image_url: String,
        site_url: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            image_url,
            site_url,
        }
    }

    pub fn from_config(http_client: HttpClient, config: &Config) -> Self {
        Self::new(
            http_client,
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_url.clone(),
            config.tmdb_site_url.clone(),
        )
    }

    /// Poster info for a search hit, if it has both artwork and an id
    fn poster_info(&self, movie: &TmdbMovie) -> Option<PosterInfo> {
        let poster_path = movie.poster_path.as_deref().filter(|p| !p.is_empty())?;
        let id = movie.id?;

        Some(PosterInfo::new(
            format!("{}{}{}", self.image_url, POSTER_SIZE_PATH, poster_path),
            format!("{}/movie/{}", self.site_url, id),
        ))
    }

    async fn search(&self, title: &str) -> AppResult<TmdbSearchResponse> {
        let url = format!("{}/search/movie", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title)])
            .send()
            .await?;

        read_json(response).await
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn lookup_poster(&self, title: &str) -> AppResult<Option<PosterInfo>> {
        let response = self.search(title).await.map_err(|e| e.without_url())?;
        let info = response
            .results
            .first()
            .and_then(|movie| self.poster_info(movie));

        tracing::debug!(
            title = %title,
            hits = response.results.len(),
            found = info.is_some(),
            provider = "tmdb",
            "Poster lookup completed"
        );

        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::canned::serve_once;

    fn create_test_provider() -> TmdbProvider {
        TmdbProvider::new(
            HttpClient::new(),
            "test_key".to_string(),
            "http://tmdb.test/3".to_string(),
            "https://image.tmdb.org".to_string(),
            "https://www.themoviedb.org".to_string(),
        )
    }

    #[test]
    fn test_poster_info_from_first_hit() {
        let provider = create_test_provider();
        let movie = TmdbMovie {
            id: Some(42),
            poster_path: Some("/x.jpg".to_string()),
        };

        let info = provider.poster_info(&movie).unwrap();

        assert_eq!(info.poster_url, "https://image.tmdb.org/t/p/w500/x.jpg");
        assert_eq!(info.detail_link, "https://www.themoviedb.org/movie/42");
    }

    #[test]
    fn test_poster_info_requires_artwork() {
        let provider = create_test_provider();

        let missing = TmdbMovie {
            id: Some(42),
            poster_path: None,
        };
        assert!(provider.poster_info(&missing).is_none());

        let empty = TmdbMovie {
            id: Some(42),
            poster_path: Some(String::new()),
        };
        assert!(provider.poster_info(&empty).is_none());
    }

    #[test]
    fn test_poster_info_requires_id() {
        let provider = create_test_provider();
        let movie = TmdbMovie {
            id: None,
            poster_path: Some("/x.jpg".to_string()),
        };

        assert!(provider.poster_info(&movie).is_none());
    }

    #[tokio::test]
    async fn test_network_error_hides_api_key() {
        let provider = TmdbProvider::new(
            HttpClient::new(),
            "super-secret".to_string(),
            "http://127.0.0.1:9".to_string(),
            "https://image.tmdb.org".to_string(),
            "https://www.themoviedb.org".to_string(),
        );

        let err = provider.lookup_poster("Heat").await.unwrap_err();
        assert_eq!(err.kind(), "network");
        assert!(!err.to_string().contains("super-secret"));
    }

    fn provider_at(api_url: String) -> TmdbProvider {
        TmdbProvider::new(
            HttpClient::new(),
            "test_key".to_string(),
            api_url,
            "https://image.tmdb.org".to_string(),
            "https://www.themoviedb.org".to_string(),
        )
    }

    #[tokio::test]
    async fn test_lookup_builds_urls_from_first_hit() {
        let base = serve_once(
            "200 OK",
            r#"{"results":[{"poster_path":"/x.jpg","id":42},{"poster_path":"/y.jpg","id":7}]}"#,
        )
        .await;

        let info = provider_at(base).lookup_poster("Heat").await.unwrap();

        assert_eq!(
            info,
            Some(PosterInfo::new(
                "https://image.tmdb.org/t/p/w500/x.jpg".to_string(),
                "https://www.themoviedb.org/movie/42".to_string(),
            ))
        );
    }

    #[tokio::test]
    async fn test_lookup_without_results_is_none() {
        let base = serve_once("200 OK", r#"{"results":[]}"#).await;
        let info = provider_at(base).lookup_poster("Nothing").await.unwrap();
        assert_eq!(info, None);
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_protocol_failure() {
        let base = serve_once("500 Internal Server Error", "boom").await;
        let err = provider_at(base).lookup_poster("Heat").await.unwrap_err();

        assert_eq!(err.kind(), "protocol");
        assert_eq!(err.to_string(), "Request failed 500: boom");
    }

    #[tokio::test]
    async fn test_lookup_bad_body_is_decode_failure() {
        let base = serve_once("200 OK", "not json").await;
        let err = provider_at(base).lookup_poster("Heat").await.unwrap_err();
        assert_eq!(err.kind(), "decode");
    }
}
