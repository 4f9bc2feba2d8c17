use std::time::Duration;

/// Public Reportobello instance.
pub const DEFAULT_HOST: &str = "https://reportobello.com";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    /// Whole-request timeout. `None` waits for the server indefinitely.
    pub request_timeout: Option<Duration>,
    /// Upper bound on a downloaded PDF.
    pub max_pdf_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_key: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_pdf_bytes: 50 * 1024 * 1024,
        }
    }
}
