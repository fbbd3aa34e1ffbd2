//! Domain model for plugins.
//!
//! Identity, lifecycle state, declared capabilities, and the descriptor and
//! result types exchanged between plugins and the host. Behaviour lives in
//! the [`ports`](super::ports) traits.

mod capabilities;
mod error;
mod event;
mod ids;
mod info;
mod intercept;
mod lifecycle;
mod tool;
mod ui;

pub use capabilities::{PluginCapabilities, PluginCapability};
pub use error::{PluginDomainError, ToolParameterError};
pub use event::{PluginEvent, PluginStage};
pub use ids::PluginId;
pub use info::{PluginInfo, PluginRecord};
pub use intercept::InterceptResult;
pub use lifecycle::PluginLifecycleState;
pub use tool::{PluginTool, RegisteredTool, ToolParameter, ToolParameters, ToolResult};
pub use ui::{
    ActionHandlerRef, InputExtension, MessageAction, PluginSettings, SettingField,
    SettingFieldType,
};
