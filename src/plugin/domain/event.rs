//! Notifications published by the plugin manager.

use super::PluginId;
use std::fmt;

/// The plugin call during which something happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginStage {
    /// `initialize`.
    Initialize,
    /// `dispose`.
    Dispose,
    /// `on_before_send`.
    BeforeSend,
    /// `on_after_receive`.
    AfterReceive,
    /// `message_actions`.
    MessageActions,
    /// `input_extensions`.
    InputExtensions,
    /// `settings_schema`.
    Settings,
    /// `render_custom_content`.
    CustomContent,
    /// `tools`.
    ListTools,
    /// `execute_tool`.
    ExecuteTool,
}

impl PluginStage {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Dispose => "dispose",
            Self::BeforeSend => "before_send",
            Self::AfterReceive => "after_receive",
            Self::MessageActions => "message_actions",
            Self::InputExtensions => "input_extensions",
            Self::Settings => "settings",
            Self::CustomContent => "custom_content",
            Self::ListTools => "list_tools",
            Self::ExecuteTool => "execute_tool",
        }
    }
}

impl fmt::Display for PluginStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event broadcast to subscribers of the plugin manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginEvent {
    /// A plugin was registered and is active.
    Loaded {
        /// Plugin identifier.
        plugin_id: PluginId,
        /// Display name.
        name: String,
        /// Version string.
        version: String,
    },
    /// A plugin was disposed and removed.
    Unloaded {
        /// Plugin identifier.
        plugin_id: PluginId,
    },
    /// Plugin code failed; the failure was contained.
    Error {
        /// Plugin identifier.
        plugin_id: PluginId,
        /// Call that failed.
        stage: PluginStage,
        /// Error description.
        message: String,
    },
}
