use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use clap::Parser;
use report_logging::{redact, report_info, report_warn};
use reportobello_client::{ReportApi, ReportobelloClient};
use reportobello_core::{update, Effect, Msg, PageState};
use tokio::runtime::Handle;

use super::admin::AdminRunner;
use super::cli::Cli;
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::interop::{DesktopInterop, FrameRef, SystemOpener, UrlOpener};
use super::logging;
use super::ui::commands::{parse_command, UiCommand, HELP};
use super::ui::render::render;

/// Everything the session loop reacts to, from stdin or from background tasks.
#[derive(Debug)]
pub(crate) enum AppEvent {
    Input(String),
    InputClosed,
    Core(Msg),
    Presented(Result<String, String>),
    AdminDone(String),
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log.into(), cli.log_level(), &cli.log_file);

    let config = AppConfig::load(&cli.config)?.with_env_overrides(|name| std::env::var(name).ok());
    report_info!(
        "Using {} with api key {}",
        config.host,
        config
            .api_key
            .as_deref()
            .map_or_else(|| "(none)".to_string(), redact)
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    let _guard = runtime.enter();

    let (tx, rx) = mpsc::channel();
    let mut session = Session::new(&config, runtime.handle().clone(), tx.clone(), io::stdout())?;
    spawn_stdin_reader(tx);

    session.start()?;
    for event in rx.iter() {
        if session.handle(event)? == Flow::Quit {
            break;
        }
    }
    report_info!("Session ended");
    Ok(())
}

fn spawn_stdin_reader(events: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(AppEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    report_warn!("Reading stdin failed: {}", err);
                    break;
                }
            }
        }
        let _ = events.send(AppEvent::InputClosed);
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Session<W> {
    state: PageState,
    effects: EffectRunner,
    admin: AdminRunner,
    out: W,
    /// Presentations and admin tasks that have not reported back yet.
    background: usize,
    input_closed: bool,
}

impl<W: Write> Session<W> {
    fn new(
        config: &AppConfig,
        runtime: Handle,
        events: mpsc::Sender<AppEvent>,
        out: W,
    ) -> anyhow::Result<Self> {
        let client = Arc::new(
            ReportobelloClient::new(config.api_settings()).context("invalid API settings")?,
        );
        let api: Arc<dyn ReportApi> = client.clone();
        let opener: Option<Arc<dyn UrlOpener>> = if config.open_browser {
            Some(Arc::new(SystemOpener))
        } else {
            None
        };
        let interop = Arc::new(DesktopInterop::new(
            api.clone(),
            config.downloads_dir.clone(),
            opener,
        ));
        let effects = EffectRunner::new(
            runtime.clone(),
            api,
            interop,
            FrameRef::new(config.preview_path.clone()),
            events.clone(),
        );
        let admin = AdminRunner::new(runtime, client, events);

        Ok(Self {
            state: PageState::new(),
            effects,
            admin,
            out,
            background: 0,
            input_closed: false,
        })
    }

    fn start(&mut self) -> io::Result<()> {
        self.show()?;
        writeln!(self.out, "Type `help` for commands.")
    }

    fn handle(&mut self, event: AppEvent) -> io::Result<Flow> {
        match event {
            AppEvent::Input(line) => match parse_command(&line) {
                UiCommand::Page(msg) => self.dispatch(msg)?,
                UiCommand::LoadTemplate(path) => match read_text(&path) {
                    Ok(text) => self.dispatch(Msg::TemplateSourceChanged(text))?,
                    Err(message) => writeln!(self.out, "{message}")?,
                },
                UiCommand::LoadJson(path) => match read_text(&path) {
                    Ok(text) => self.dispatch(Msg::JsonDataChanged(text))?,
                    Err(message) => writeln!(self.out, "{message}")?,
                },
                UiCommand::Admin(task) => {
                    self.background += 1;
                    self.admin.run(task);
                }
                UiCommand::Show => self.show()?,
                UiCommand::Help => writeln!(self.out, "{HELP}")?,
                UiCommand::Quit => return Ok(Flow::Quit),
                UiCommand::Empty => {}
                UiCommand::Invalid(message) => writeln!(self.out, "{message}")?,
            },
            AppEvent::InputClosed => self.input_closed = true,
            AppEvent::Core(msg) => self.dispatch(msg)?,
            AppEvent::Presented(outcome) => {
                self.background = self.background.saturating_sub(1);
                match outcome {
                    Ok(notice) => writeln!(self.out, "{notice}")?,
                    Err(message) => self.dispatch(Msg::PresentationFailed { message })?,
                }
            }
            AppEvent::AdminDone(report) => {
                self.background = self.background.saturating_sub(1);
                writeln!(self.out, "{report}")?;
            }
        }

        // Once stdin is gone, stay until every started action has reported back.
        if self.input_closed && self.state.is_idle() && self.background == 0 {
            Ok(Flow::Quit)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.background += effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Present(_)))
            .count();
        self.effects.run(effects);

        let was_dirty = state.consume_dirty();
        self.state = state;
        if was_dirty {
            self.show()?;
        }
        Ok(())
    }

    fn show(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", render(&self.state.view()))
    }
}

fn read_text(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("could not read {}: {err}", path.display()))
}
