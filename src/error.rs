/// Client-side errors raised while talking to the backend or metadata service
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("Request failed {status}: {body}")]
    Protocol { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Network(err)
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl AppError {
    /// Short tag used in structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Network(_) => "network",
            AppError::Protocol { .. } => "protocol",
            AppError::Decode(_) => "decode",
            AppError::Config(_) => "config",
        }
    }

    /// Drops the request URL from transport errors so query credentials never reach logs
    pub fn without_url(self) -> Self {
        match self {
            AppError::Network(err) => AppError::Network(err.without_url()),
            other => other,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
