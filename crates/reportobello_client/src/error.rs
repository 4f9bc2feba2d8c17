use thiserror::Error;

/// Failures reported by the Reportobello API or the transport underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("report build failed: {0}")]
    BuildFailed(String),
    #[error("unauthorized: check the configured API key")]
    Unauthorized,
    #[error("http status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("could not encode request: {0}")]
    Encode(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("timeout")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ApiError::Timeout;
        }
        ApiError::Network(err.to_string())
    }
}
