use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("not found")]
    NotFound,

    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse API response: {0}")]
    Parse(String),
}
