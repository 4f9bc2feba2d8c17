use url::Url;

use crate::RequestId;

/// Side effects requested by `update`; executed by the platform layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    UploadTemplate {
        request_id: RequestId,
        template: String,
        source: String,
    },
    RunReport {
        request_id: RequestId,
        template: String,
        data: serde_json::Value,
    },
    Present(Presentation),
}

/// One interop action for a freshly built report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Embed { url: Url },
    NewTab { url: Url, download_as: Option<String> },
    Download { url: Url, filename: String },
}
