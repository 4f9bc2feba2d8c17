mod admin;
mod app;
mod cli;
mod config;
mod effects;
mod interop;
mod logging;
mod ui;

pub use app::run_app;
