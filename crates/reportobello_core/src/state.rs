use std::collections::BTreeMap;

use url::Url;

use crate::view_model::PageViewModel;
use crate::{
    DisplayMode, Presentation, QuarterlyReport, ReportTemplate, DEFAULT_DOWNLOAD_NAME,
    DEFAULT_TEMPLATE_SOURCE,
};

pub type RequestId = u64;

/// Presentation choices captured when Build is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BuildOptions {
    pub(crate) display_mode: Option<DisplayMode>,
    pub(crate) download_as: Option<String>,
    pub(crate) tab_download_as: Option<String>,
}

impl BuildOptions {
    pub(crate) fn present(self, url: Url) -> Option<Presentation> {
        match self.display_mode? {
            DisplayMode::Iframe => Some(Presentation::Embed { url }),
            DisplayMode::Tab => Some(Presentation::NewTab {
                url,
                download_as: self.tab_download_as,
            }),
            DisplayMode::Download => Some(Presentation::Download {
                url,
                filename: self
                    .download_as
                    .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string()),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    Upload,
    Build(BuildOptions),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    template_source: String,
    json_data: String,
    display_mode: Option<DisplayMode>,
    download_as: Option<String>,
    tab_download_as: Option<String>,
    /// Newest first.
    logs: Vec<String>,
    uploaded_version: Option<u32>,
    next_request_id: RequestId,
    in_flight: BTreeMap<RequestId, PendingAction>,
    dirty: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

impl PageState {
    /// Fresh page seeded with the default template and placeholder data.
    pub fn new() -> Self {
        Self {
            template_source: DEFAULT_TEMPLATE_SOURCE.to_string(),
            json_data: QuarterlyReport::placeholder_json(),
            display_mode: None,
            download_as: None,
            tab_download_as: None,
            logs: Vec::new(),
            uploaded_version: None,
            next_request_id: 1,
            in_flight: BTreeMap::new(),
            dirty: false,
        }
    }

    pub fn view(&self) -> PageViewModel {
        PageViewModel {
            template_name: QuarterlyReport::NAME,
            template_source: self.template_source.clone(),
            json_data: self.json_data.clone(),
            display_mode: self.display_mode,
            download_as: self.download_as.clone(),
            tab_download_as: self.tab_download_as.clone(),
            logs: self.logs.clone(),
            uploaded_version: self.uploaded_version,
            in_flight: self.in_flight.len(),
            dirty: self.dirty,
        }
    }

    pub fn template_source(&self) -> &str {
        &self.template_source
    }

    pub fn json_data(&self) -> &str {
        &self.json_data
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// True when no upload or build is awaiting its completion.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_template_source(&mut self, source: String) {
        self.template_source = source;
        self.mark_dirty();
    }

    pub(crate) fn set_json_data(&mut self, json: String) {
        self.json_data = json;
        self.mark_dirty();
    }

    pub(crate) fn set_display_mode(&mut self, mode: Option<DisplayMode>) {
        self.display_mode = mode;
        self.mark_dirty();
    }

    pub(crate) fn set_download_as(&mut self, name: Option<String>) {
        self.download_as = name;
        self.mark_dirty();
    }

    pub(crate) fn set_tab_download_as(&mut self, name: Option<String>) {
        self.tab_download_as = name;
        self.mark_dirty();
    }

    pub(crate) fn set_uploaded_version(&mut self, version: u32) {
        self.uploaded_version = Some(version);
        self.mark_dirty();
    }

    pub(crate) fn prepend_log(&mut self, message: String) {
        self.logs.insert(0, message);
        self.mark_dirty();
    }

    pub(crate) fn build_options(&self) -> BuildOptions {
        BuildOptions {
            display_mode: self.display_mode,
            download_as: self.download_as.clone(),
            tab_download_as: self.tab_download_as.clone(),
        }
    }

    pub(crate) fn begin(&mut self, action: PendingAction) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight.insert(id, action);
        self.mark_dirty();
        id
    }

    /// Completes an in-flight upload; other kinds of request are left untouched.
    pub(crate) fn finish_upload(&mut self, request_id: RequestId) -> bool {
        match self.in_flight.get(&request_id) {
            Some(PendingAction::Upload) => {
                self.in_flight.remove(&request_id);
                self.mark_dirty();
                true
            }
            _ => false,
        }
    }

    /// Completes an in-flight build, handing back the options captured at click time.
    pub(crate) fn finish_build(&mut self, request_id: RequestId) -> Option<BuildOptions> {
        if !matches!(self.in_flight.get(&request_id), Some(PendingAction::Build(_))) {
            return None;
        }
        self.mark_dirty();
        match self.in_flight.remove(&request_id) {
            Some(PendingAction::Build(options)) => Some(options),
            _ => None,
        }
    }
}
