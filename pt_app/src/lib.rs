//! # pt_app
//!
//! Configuration, presentation and stage orchestration for the `playtime` binary

pub mod app;
pub mod cli;
pub mod config_loader;
pub mod presentation;
pub mod tracing_setup;

pub use app::Playtime;
pub use app::PlaytimeReport;
pub use app::Stage;
pub use app::StageError;
