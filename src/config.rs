use std::{fmt, time::Duration};

use reqwest::{Client as HttpClient, Url};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Upper bound for `PAGE_SIZE`
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Application configuration loaded from environment variables
#[derive(Deserialize, Clone)]
pub struct Config {
    /// Recommendation backend base URL
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// TMDB public site base URL, used for detail links
    #[serde(default = "default_tmdb_site_url")]
    pub tmdb_site_url: String,

    /// Catalog page size
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Maximum number of poster lookups in flight at once
    #[serde(default = "default_poster_concurrency")]
    pub poster_concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org".to_string()
}

fn default_tmdb_site_url() -> String {
    "https://www.themoviedb.org".to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_poster_concurrency() -> usize {
    8
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        Ok(config.normalized()?)
    }

    /// Trims trailing slashes from base URLs and checks that they parse
    pub fn normalized(mut self) -> AppResult<Self> {
        for url in [
            &mut self.backend_url,
            &mut self.tmdb_api_url,
            &mut self.tmdb_image_url,
            &mut self.tmdb_site_url,
        ] {
            let trimmed = url.trim().trim_end_matches('/').to_string();
            Url::parse(&trimmed)
                .map_err(|e| AppError::Config(format!("invalid base URL {:?}: {}", trimmed, e)))?;
            *url = trimmed;
        }

        if self.tmdb_api_key.trim().is_empty() {
            return Err(AppError::Config("TMDB_API_KEY must not be empty".to_string()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(AppError::Config(format!(
                "PAGE_SIZE must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        self.poster_concurrency = self.poster_concurrency.max(1);

        Ok(self)
    }

    /// Builds the HTTP client shared by both remote services
    pub fn http_client(&self) -> AppResult<HttpClient> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .build()?;
        Ok(client)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("backend_url", &self.backend_url)
            .field("tmdb_api_key", &"<redacted>")
            .field("tmdb_api_url", &self.tmdb_api_url)
            .field("tmdb_image_url", &self.tmdb_image_url)
            .field("tmdb_site_url", &self.tmdb_site_url)
            .field("page_size", &self.page_size)
            .field("poster_concurrency", &self.poster_concurrency)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
