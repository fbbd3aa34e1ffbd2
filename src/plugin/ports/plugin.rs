//! Lifecycle and capability traits every extension builds on.
//!
//! Every plugin implements [`Plugin`]. A plugin may additionally implement
//! any subset of [`MessageInterceptor`], [`UiExtension`] and
//! [`ToolProvider`]; which ones it offers is declared when it is registered
//! (see [`PluginRegistration`](crate::plugin::services::PluginRegistration)).

use crate::conversation::domain::{ConversationContext, Message};
use crate::plugin::domain::{
    InputExtension, InterceptResult, MessageAction, PluginDomainError, PluginId, PluginInfo,
    PluginSettings, PluginTool, ToolParameters, ToolResult,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for plugin calls.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors returned by plugin code.
///
/// The manager contains every one of these at its boundary; none reaches
/// the hosting chat turn.
#[derive(Debug, Clone, Error)]
pub enum PluginError {
    /// The plugin could not prepare its resources.
    #[error("plugin initialisation failed: {0}")]
    Initialization(String),

    /// The plugin rejected its input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested tool does not exist in this plugin.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A domain value could not be constructed.
    #[error(transparent)]
    Domain(#[from] PluginDomainError),

    /// Generic runtime failure.
    #[error("plugin runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl PluginError {
    /// Wraps a runtime error raised inside plugin code.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}

/// Minimal lifecycle every plugin honours.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique identifier.
    fn id(&self) -> &PluginId;

    /// Descriptive metadata.
    fn info(&self) -> &PluginInfo;

    /// Explicit pipeline priority; lower values run first.
    ///
    /// Plugins without one are ordered by registration sequence.
    fn priority(&self) -> Option<i64> {
        None
    }

    /// Called once before the plugin joins the registry.
    async fn initialize(&self) -> PluginResult<()> {
        Ok(())
    }

    /// Called once when the plugin leaves the registry.
    async fn dispose(&self) -> PluginResult<()> {
        Ok(())
    }
}

/// Inspects, rewrites or blocks messages around the completion call.
///
/// Calls run sequentially: the next interceptor only starts once this one
/// has returned, so slow I/O here delays every later plugin.
#[async_trait]
pub trait MessageInterceptor: Plugin {
    /// Called before a user message is sent to the model.
    async fn on_before_send(
        &self,
        message: &Message,
        context: &mut ConversationContext,
    ) -> PluginResult<InterceptResult>;

    /// Called after the model replied.
    async fn on_after_receive(
        &self,
        message: &Message,
        context: &mut ConversationContext,
    ) -> PluginResult<InterceptResult>;
}

/// Contributes declarative UI descriptors. All methods are pure queries.
pub trait UiExtension: Plugin {
    /// Buttons to show next to `message`.
    fn message_actions(&self, message: &Message) -> PluginResult<Vec<MessageAction>>;

    /// Controls for the chat input bar.
    fn input_extensions(&self) -> PluginResult<Vec<InputExtension>>;

    /// Settings form schema, if the plugin has settings.
    fn settings_schema(&self) -> PluginResult<Option<PluginSettings>>;

    /// Extra content to render inside the message bubble.
    fn render_custom_content(&self, _message: &Message) -> PluginResult<Option<String>> {
        Ok(None)
    }
}

/// Declares named tools and executes them on demand.
#[async_trait]
pub trait ToolProvider: Plugin {
    /// Tools offered by this plugin.
    fn tools(&self) -> PluginResult<Vec<PluginTool>>;

    /// Runs a tool with validated arguments.
    async fn execute_tool(
        &self,
        tool_name: &str,
        parameters: ToolParameters,
    ) -> PluginResult<ToolResult>;
}
