use std::path::PathBuf;

use chrono::{DateTime, Utc};
use reportobello_core::Msg;

use crate::platform::admin::AdminTask;

pub(crate) const HELP: &str = "\
Commands:
  template <path>          load the template source from a file
  json <text>              replace the JSON data
  json-file <path>         load the JSON data from a file
  mode <iframe|tab|download>
                           choose how built reports are shown (anything else: nothing)
  download-as [name]       filename for downloads (default report.pdf)
  tab-download-as [name]   forced download name when opening a tab
  upload                   upload the template
  build                    build a PDF from the JSON data
  show                     print the page
  templates | versions | recent [rfc3339] | delete-template
  env set KEY=VALUE | env unset KEY...
  help | quit";

/// One line of user input, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UiCommand {
    Page(Msg),
    LoadTemplate(PathBuf),
    LoadJson(PathBuf),
    Admin(AdminTask),
    Show,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub(crate) fn parse_command(line: &str) -> UiCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (trimmed, ""),
    };

    match word {
        "" => UiCommand::Empty,
        "template" => path_arg(rest, UiCommand::LoadTemplate, "template <path>"),
        "json" => UiCommand::Page(Msg::JsonDataChanged(rest.to_string())),
        "json-file" => path_arg(rest, UiCommand::LoadJson, "json-file <path>"),
        "mode" => UiCommand::Page(Msg::DisplayModeChanged(rest.to_string())),
        "download-as" => UiCommand::Page(Msg::DownloadAsChanged(rest.to_string())),
        "tab-download-as" => UiCommand::Page(Msg::TabDownloadAsChanged(rest.to_string())),
        "upload" => UiCommand::Page(Msg::UploadClicked),
        "build" => UiCommand::Page(Msg::BuildClicked),
        "show" => UiCommand::Show,
        "help" | "?" => UiCommand::Help,
        "quit" | "exit" => UiCommand::Quit,
        "templates" => UiCommand::Admin(AdminTask::ListTemplates),
        "versions" => UiCommand::Admin(AdminTask::TemplateVersions),
        "delete-template" => UiCommand::Admin(AdminTask::DeleteTemplate),
        "recent" => parse_recent(rest.trim()),
        "env" => parse_env(rest),
        other => UiCommand::Invalid(format!("unknown command `{other}` (try `help`)")),
    }
}

fn path_arg(rest: &str, make: fn(PathBuf) -> UiCommand, usage: &str) -> UiCommand {
    let rest = rest.trim();
    if rest.is_empty() {
        UiCommand::Invalid(format!("usage: {usage}"))
    } else {
        make(PathBuf::from(rest))
    }
}

fn parse_recent(rest: &str) -> UiCommand {
    if rest.is_empty() {
        return UiCommand::Admin(AdminTask::RecentBuilds { before: None });
    }
    match DateTime::parse_from_rfc3339(rest) {
        Ok(before) => UiCommand::Admin(AdminTask::RecentBuilds {
            before: Some(before.with_timezone(&Utc)),
        }),
        Err(err) => UiCommand::Invalid(format!("recent: {err}")),
    }
}

fn parse_env(rest: &str) -> UiCommand {
    let rest = rest.trim();
    let (action, args) = rest
        .split_once(char::is_whitespace)
        .unwrap_or((rest, ""));
    match action {
        "set" => match args.trim_start().split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => UiCommand::Admin(AdminTask::SetEnv {
                key: key.trim().to_string(),
                value: value.to_string(),
            }),
            _ => UiCommand::Invalid("usage: env set KEY=VALUE".to_string()),
        },
        "unset" => {
            let keys: Vec<String> = args.split_whitespace().map(str::to_string).collect();
            if keys.is_empty() {
                UiCommand::Invalid("usage: env unset KEY...".to_string())
            } else {
                UiCommand::Admin(AdminTask::UnsetEnv { keys })
            }
        }
        _ => UiCommand::Invalid("usage: env set KEY=VALUE | env unset KEY...".to_string()),
    }
}
