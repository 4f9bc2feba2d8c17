use std::sync::mpsc;
use std::sync::Arc;

use report_logging::{report_info, report_warn};
use reportobello_client::ReportApi;
use reportobello_core::{Effect, Msg, Presentation};
use tokio::runtime::Handle;

use super::app::AppEvent;
use super::interop::{BrowserInterop, FrameRef};

/// Executes core effects on the async runtime and reports back as `AppEvent`s.
pub(crate) struct EffectRunner {
    runtime: Handle,
    api: Arc<dyn ReportApi>,
    interop: Arc<dyn BrowserInterop>,
    frame: FrameRef,
    events: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(
        runtime: Handle,
        api: Arc<dyn ReportApi>,
        interop: Arc<dyn BrowserInterop>,
        frame: FrameRef,
        events: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            runtime,
            api,
            interop,
            frame,
            events,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::UploadTemplate {
                    request_id,
                    template,
                    source,
                } => {
                    report_info!(
                        "UploadTemplate request_id={} template={} source_len={}",
                        request_id,
                        template,
                        source.len()
                    );
                    let api = self.api.clone();
                    let events = self.events.clone();
                    self.runtime.spawn(async move {
                        let result = match api.upload_template(&template, &source).await {
                            Ok(uploaded) => Ok(uploaded.version),
                            Err(err) => {
                                report_warn!("Upload {} failed: {}", request_id, err);
                                Err(err.to_string())
                            }
                        };
                        let _ = events.send(AppEvent::Core(Msg::TemplateUploaded {
                            request_id,
                            result,
                        }));
                    });
                }
                Effect::RunReport {
                    request_id,
                    template,
                    data,
                } => {
                    report_info!("RunReport request_id={} template={}", request_id, template);
                    let api = self.api.clone();
                    let events = self.events.clone();
                    self.runtime.spawn(async move {
                        let result = api.run_report(&template, &data).await.map_err(|err| {
                            report_warn!("Run {} failed: {}", request_id, err);
                            err.to_string()
                        });
                        let _ = events.send(AppEvent::Core(Msg::ReportBuilt { request_id, result }));
                    });
                }
                Effect::Present(presentation) => {
                    report_info!("Present {:?}", presentation);
                    let interop = self.interop.clone();
                    let frame = self.frame.clone();
                    let events = self.events.clone();
                    self.runtime.spawn(async move {
                        let outcome = present(interop.as_ref(), &frame, presentation).await;
                        if let Err(message) = &outcome {
                            report_warn!("Presentation failed: {}", message);
                        }
                        let _ = events.send(AppEvent::Presented(outcome));
                    });
                }
            }
        }
    }
}

/// Runs exactly one interop action, describing what happened for the page.
async fn present(
    interop: &dyn BrowserInterop,
    frame: &FrameRef,
    presentation: Presentation,
) -> Result<String, String> {
    match presentation {
        Presentation::Embed { url } => interop
            .open_in_frame(&url, frame)
            .await
            .map(|()| format!("Frame shows {}", frame.document().display())),
        Presentation::NewTab { url, download_as } => interop
            .open_in_new_tab(&url, download_as.as_deref())
            .await
            .map(|()| format!("Opened {url} in a new tab")),
        Presentation::Download { url, filename } => interop
            .download(&url, &filename)
            .await
            .map(|path| format!("Downloaded to {}", path.display())),
    }
    .map_err(|err| err.to_string())
}
