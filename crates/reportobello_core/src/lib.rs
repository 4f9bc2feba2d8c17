//! Reportobello demo core: pure page state machine and view-model helpers.
mod display;
mod effect;
mod msg;
mod report;
mod state;
mod update;
mod view_model;

pub use display::{DisplayMode, DEFAULT_DOWNLOAD_NAME};
pub use effect::{Effect, Presentation};
pub use msg::Msg;
pub use report::{QuarterlyReport, ReportTemplate, DEFAULT_TEMPLATE_SOURCE};
pub use state::{PageState, RequestId};
pub use update::update;
pub use view_model::PageViewModel;
