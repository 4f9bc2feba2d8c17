use bytes::Bytes;
use url::Url;

use crate::{ApiError, Template};

/// The slice of the Reportobello API the demo page depends on.
#[async_trait::async_trait]
pub trait ReportApi: Send + Sync {
    /// Creates `name` or adds a new revision with `source` as its Typst body.
    async fn upload_template(&self, name: &str, source: &str) -> Result<Template, ApiError>;

    /// Builds a report from the latest version of `name`, returning where the PDF lives.
    async fn run_report(&self, name: &str, data: &serde_json::Value) -> Result<Url, ApiError>;

    /// Downloads a previously built PDF.
    async fn fetch_pdf(&self, url: &Url) -> Result<Bytes, ApiError>;
}
