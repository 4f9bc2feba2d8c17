//! Reportobello client: async access to the report API and PDF artifacts.
mod api;
mod client;
mod error;
mod filename;
mod links;
mod persist;
mod settings;
mod types;

pub use api::ReportApi;
pub use client::ReportobelloClient;
pub use error::ApiError;
pub use filename::safe_pdf_filename;
pub use links::pdf_link;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use settings::{ApiSettings, DEFAULT_HOST};
pub use types::{Report, Template};
