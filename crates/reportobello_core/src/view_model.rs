use crate::DisplayMode;

/// Snapshot of the page for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageViewModel {
    pub template_name: &'static str,
    pub template_source: String,
    pub json_data: String,
    pub display_mode: Option<DisplayMode>,
    pub download_as: Option<String>,
    pub tab_download_as: Option<String>,
    /// Newest first.
    pub logs: Vec<String>,
    pub uploaded_version: Option<u32>,
    pub in_flight: usize,
    pub dirty: bool,
}
