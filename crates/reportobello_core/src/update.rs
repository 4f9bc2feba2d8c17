use crate::state::PendingAction;
use crate::{DisplayMode, Effect, Msg, PageState, QuarterlyReport, ReportTemplate};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PageState, msg: Msg) -> (PageState, Vec<Effect>) {
    let effects = match msg {
        Msg::TemplateSourceChanged(source) => {
            state.set_template_source(source);
            Vec::new()
        }
        Msg::JsonDataChanged(json) => {
            state.set_json_data(json);
            Vec::new()
        }
        Msg::DisplayModeChanged(tag) => {
            state.set_display_mode(DisplayMode::from_tag(&tag));
            Vec::new()
        }
        Msg::DownloadAsChanged(name) => {
            state.set_download_as(non_empty(name));
            Vec::new()
        }
        Msg::TabDownloadAsChanged(name) => {
            state.set_tab_download_as(non_empty(name));
            Vec::new()
        }
        Msg::UploadClicked => {
            let source = state.template_source().to_string();
            let request_id = state.begin(PendingAction::Upload);
            vec![Effect::UploadTemplate {
                request_id,
                template: QuarterlyReport::NAME.to_string(),
                source,
            }]
        }
        Msg::BuildClicked => match parse_request::<QuarterlyReport>(state.json_data()) {
            Ok(data) => {
                let options = state.build_options();
                let request_id = state.begin(PendingAction::Build(options));
                vec![Effect::RunReport {
                    request_id,
                    template: QuarterlyReport::NAME.to_string(),
                    data,
                }]
            }
            Err(message) => {
                state.prepend_log(message);
                Vec::new()
            }
        },
        Msg::TemplateUploaded { request_id, result } => {
            if state.finish_upload(request_id) {
                match result {
                    Ok(version) => state.set_uploaded_version(version),
                    Err(message) => state.prepend_log(message),
                }
            }
            Vec::new()
        }
        Msg::ReportBuilt { request_id, result } => match state.finish_build(request_id) {
            Some(options) => match result {
                Ok(url) => options
                    .present(url)
                    .map(Effect::Present)
                    .into_iter()
                    .collect(),
                Err(message) => {
                    state.prepend_log(message);
                    Vec::new()
                }
            },
            None => Vec::new(),
        },
        Msg::PresentationFailed { message } => {
            state.prepend_log(message);
            Vec::new()
        }
    };

    (state, effects)
}

/// Parses the data box into a typed record, returning it as the JSON payload to send.
fn parse_request<T: ReportTemplate>(json: &str) -> Result<serde_json::Value, String> {
    let record: T = serde_json::from_str(json).map_err(|err| err.to_string())?;
    serde_json::to_value(&record).map_err(|err| err.to_string())
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
