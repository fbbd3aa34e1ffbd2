//! Service layer for plugin registration, pipelines and dispatch.
//!
//! [`PluginManager`] owns the registry. Its behaviour is split by concern:
//! registration and lifecycle here in `manager`, message pipelines in
//! `pipeline`, UI aggregation in `ui`, and tool dispatch in `tools`.

mod config;
mod guard;
mod manager;
mod pipeline;
mod registration;
mod tools;
mod ui;

pub use config::PluginManagerConfig;
pub use manager::{LoadReport, PluginManager, PluginManagerError, PluginManagerResult, RegistrationOutcome};
pub use pipeline::{PipelineError, PipelinePass};
pub use registration::{PluginRegistration, PluginRegistrationBuilder};
