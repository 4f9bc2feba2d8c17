use std::sync::Once;

use pretty_assertions::assert_eq;
use reportobello_core::{update, DisplayMode, Effect, Msg, PageState, Presentation};
use url::Url;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(report_logging::initialize_for_tests);
}

fn result_url() -> Url {
    Url::parse("https://host/r/abc123.pdf").unwrap()
}

/// Builds the placeholder report with the given page edits and returns the effects of a successful run.
fn build_and_succeed(edits: Vec<Msg>) -> (PageState, Vec<Effect>) {
    let mut state = PageState::new();
    for msg in edits {
        state = update(state, msg).0;
    }
    let (state, effects) = update(state, Msg::BuildClicked);
    let request_id = match effects.as_slice() {
        [Effect::RunReport { request_id, .. }] => *request_id,
        other => panic!("expected a single run, got {other:?}"),
    };
    update(
        state,
        Msg::ReportBuilt {
            request_id,
            result: Ok(result_url()),
        },
    )
}

#[test]
fn download_defaults_to_report_pdf() {
    init_logging();
    let (state, effects) = build_and_succeed(vec![
        Msg::JsonDataChanged(r#"{"quarter":1,"earnings":123456}"#.into()),
        Msg::DisplayModeChanged("download".into()),
    ]);

    assert_eq!(
        effects,
        vec![Effect::Present(Presentation::Download {
            url: Url::parse("https://host/r/abc123.pdf").unwrap(),
            filename: "report.pdf".to_string(),
        })]
    );
    assert!(state.logs().is_empty());
}

#[test]
fn download_uses_override_name() {
    init_logging();
    let (_state, effects) = build_and_succeed(vec![
        Msg::DisplayModeChanged("download".into()),
        Msg::DownloadAsChanged("  q1.pdf ".into()),
    ]);

    assert_eq!(
        effects,
        vec![Effect::Present(Presentation::Download {
            url: result_url(),
            filename: "q1.pdf".to_string(),
        })]
    );
}

#[test]
fn iframe_embeds_result() {
    init_logging();
    let (_state, effects) = build_and_succeed(vec![Msg::DisplayModeChanged("iframe".into())]);

    assert_eq!(
        effects,
        vec![Effect::Present(Presentation::Embed { url: result_url() })]
    );
}

#[test]
fn tab_passes_optional_forced_name() {
    init_logging();
    let (_state, effects) = build_and_succeed(vec![Msg::DisplayModeChanged("tab".into())]);
    assert_eq!(
        effects,
        vec![Effect::Present(Presentation::NewTab {
            url: result_url(),
            download_as: None,
        })]
    );

    let (_state, effects) = build_and_succeed(vec![
        Msg::DisplayModeChanged("tab".into()),
        Msg::TabDownloadAsChanged("earnings.pdf".into()),
        Msg::DownloadAsChanged("ignored.pdf".into()),
    ]);
    assert_eq!(
        effects,
        vec![Effect::Present(Presentation::NewTab {
            url: result_url(),
            download_as: Some("earnings.pdf".to_string()),
        })]
    );
}

#[test]
fn unset_or_unknown_mode_presents_nothing_and_logs_nothing() {
    init_logging();
    for edits in [
        vec![],
        vec![Msg::DisplayModeChanged("".into())],
        vec![Msg::DisplayModeChanged("popup".into())],
        vec![Msg::DisplayModeChanged("Download".into())],
        vec![Msg::DisplayModeChanged(" tab".into())],
        vec![
            Msg::DisplayModeChanged("tab".into()),
            Msg::DisplayModeChanged("window".into()),
        ],
    ] {
        let (state, effects) = build_and_succeed(edits);
        assert!(effects.is_empty());
        assert!(state.logs().is_empty());
        assert_eq!(state.view().display_mode, None);
        assert_eq!(state.view().in_flight, 0);
    }
}

#[test]
fn mode_is_captured_when_build_is_clicked() {
    init_logging();
    let (state, _) = update(PageState::new(), Msg::DisplayModeChanged("iframe".into()));
    let (state, effects) = update(state, Msg::BuildClicked);
    let request_id = match effects.as_slice() {
        [Effect::RunReport { request_id, .. }] => *request_id,
        other => panic!("expected a single run, got {other:?}"),
    };
    let (state, _) = update(state, Msg::DisplayModeChanged("download".into()));
    assert_eq!(state.view().display_mode, Some(DisplayMode::Download));

    let (_state, effects) = update(
        state,
        Msg::ReportBuilt {
            request_id,
            result: Ok(result_url()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Present(Presentation::Embed { url: result_url() })]
    );
}

#[test]
fn presentation_failure_is_logged() {
    init_logging();
    let (state, effects) = update(
        PageState::new(),
        Msg::PresentationFailed {
            message: "could not write report.pdf".into(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.logs(), ["could not write report.pdf".to_string()]);
}
