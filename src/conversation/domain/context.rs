//! Per-turn context handed to every interceptor.

use super::{ConversationId, Message, Metadata, PluginValue};

/// The conversation state visible to plugins during one pipeline run.
///
/// History is append-only. User settings are read-only for plugins, while
/// plugin data is a scratch area shared by all plugins within a single run;
/// it is not meant to survive between turns.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationContext {
    conversation_id: ConversationId,
    history: Vec<Message>,
    user_settings: Metadata,
    plugin_data: Metadata,
}

impl ConversationContext {
    /// Creates an empty context for a conversation.
    #[must_use]
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            history: Vec::new(),
            user_settings: Metadata::new(),
            plugin_data: Metadata::new(),
        }
    }

    /// Adds a user setting.
    #[must_use]
    pub fn with_user_setting(
        mut self,
        key: impl Into<String>,
        value: impl Into<PluginValue>,
    ) -> Self {
        self.user_settings.insert(key.into(), value.into());
        self
    }

    /// Seeds the history with previously exchanged messages.
    #[must_use]
    pub fn with_history(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.history.extend(messages);
        self
    }

    /// Returns the conversation identifier.
    #[must_use]
    pub const fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Returns the ordered message history.
    #[must_use]
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Appends a message to the history.
    pub fn push_message(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Returns all user settings.
    #[must_use]
    pub const fn user_settings(&self) -> &Metadata {
        &self.user_settings
    }

    /// Returns a user setting by key.
    #[must_use]
    pub fn user_setting(&self, key: &str) -> Option<&PluginValue> {
        self.user_settings.get(key)
    }

    /// Returns the scratch data shared by plugins in the current run.
    #[must_use]
    pub const fn plugin_data(&self) -> &Metadata {
        &self.plugin_data
    }

    /// Stores a scratch value for later plugins in the same run.
    pub fn set_plugin_data(&mut self, key: impl Into<String>, value: impl Into<PluginValue>) {
        self.plugin_data.insert(key.into(), value.into());
    }

    /// Discards all scratch data, typically at the start of a turn.
    pub fn clear_plugin_data(&mut self) {
        self.plugin_data.clear();
    }
}
