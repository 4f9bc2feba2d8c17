use url::Url;

use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the template source.
    TemplateSourceChanged(String),
    /// User edited the JSON data box.
    JsonDataChanged(String),
    /// User picked a display mode by its UI tag.
    DisplayModeChanged(String),
    /// Filename for the download display mode (empty clears it).
    DownloadAsChanged(String),
    /// Forced download name for the new-tab display mode (empty clears it).
    TabDownloadAsChanged(String),
    /// User clicked Upload.
    UploadClicked,
    /// User clicked Build.
    BuildClicked,
    /// API completion for an upload.
    TemplateUploaded {
        request_id: RequestId,
        result: Result<u32, String>,
    },
    /// API completion for a report run.
    ReportBuilt {
        request_id: RequestId,
        result: Result<Url, String>,
    },
    /// An interop action could not be completed.
    PresentationFailed { message: String },
}
