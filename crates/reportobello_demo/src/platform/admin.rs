//! Account housekeeping commands that bypass the page state.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use report_logging::report_warn;
use reportobello_client::{Report, ReportobelloClient, Template};
use reportobello_core::{QuarterlyReport, ReportTemplate};
use tokio::runtime::Handle;

use super::app::AppEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AdminTask {
    ListTemplates,
    TemplateVersions,
    RecentBuilds { before: Option<DateTime<Utc>> },
    SetEnv { key: String, value: String },
    UnsetEnv { keys: Vec<String> },
    DeleteTemplate,
}

pub(crate) struct AdminRunner {
    runtime: Handle,
    client: Arc<ReportobelloClient>,
    events: mpsc::Sender<AppEvent>,
}

impl AdminRunner {
    pub fn new(
        runtime: Handle,
        client: Arc<ReportobelloClient>,
        events: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            runtime,
            client,
            events,
        }
    }

    pub fn run(&self, task: AdminTask) {
        let client = self.client.clone();
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let report = execute(&client, task).await;
            let _ = events.send(AppEvent::AdminDone(report));
        });
    }
}

/// Runs one task against the demo's template and renders the outcome as text.
async fn execute(client: &ReportobelloClient, task: AdminTask) -> String {
    let name = QuarterlyReport::NAME;
    let outcome = match task {
        AdminTask::ListTemplates => client
            .list_templates()
            .await
            .map(|templates| describe_templates(&templates)),
        AdminTask::TemplateVersions => client
            .template_versions(name)
            .await
            .map(|versions| describe_templates(&versions)),
        AdminTask::RecentBuilds { before } => client
            .recent_builds(name, before)
            .await
            .map(|reports| describe_reports(&reports)),
        AdminTask::SetEnv { key, value } => {
            let vars = BTreeMap::from([(key.clone(), value)]);
            client
                .update_env_vars(&vars)
                .await
                .map(|()| format!("Set {key}"))
        }
        AdminTask::UnsetEnv { keys } => client
            .delete_env_vars(&keys)
            .await
            .map(|()| format!("Unset {}", keys.join(", "))),
        AdminTask::DeleteTemplate => client
            .delete_template(name)
            .await
            .map(|()| format!("Deleted {name}")),
    };
    outcome.unwrap_or_else(|err| {
        report_warn!("Admin task failed: {}", err);
        format!("error: {err}")
    })
}

fn describe_templates(templates: &[Template]) -> String {
    if templates.is_empty() {
        return "No templates".to_string();
    }
    templates
        .iter()
        .map(|template| {
            format!(
                "{} v{} ({} lines)",
                template.name,
                template.version,
                template.template.lines().count()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_reports(reports: &[Report]) -> String {
    if reports.is_empty() {
        return "No recent builds".to_string();
    }
    reports
        .iter()
        .map(|report| match (&report.error_message, &report.filename) {
            (Some(error), _) => format!(
                "{} v{} FAILED: {}",
                report.started_at,
                report.actual_version,
                error.lines().next().unwrap_or_default()
            ),
            (None, Some(file)) => format!(
                "{} v{} {} (expires {})",
                report.started_at, report.actual_version, file, report.expires_at
            ),
            (None, None) => format!("{} v{} ok", report.started_at, report.actual_version),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
