//! Declarative UI descriptors contributed by plugins.
//!
//! The host renders these; plugins never touch UI state directly. Click
//! behaviour is referenced through [`ActionHandlerRef`] rather than
//! captured closures so descriptors stay plain data.

use super::PluginId;
use crate::conversation::domain::{PluginValue, Role};
use serde::{Deserialize, Serialize};

/// Reference to the plugin action a UI element triggers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionHandlerRef {
    /// Plugin that handles the action.
    pub plugin_id: PluginId,
    /// Plugin-local action name.
    pub action: String,
}

impl ActionHandlerRef {
    /// Creates a handler reference.
    #[must_use]
    pub fn new(plugin_id: PluginId, action: impl Into<String>) -> Self {
        Self {
            plugin_id,
            action: action.into(),
        }
    }
}

/// A button shown next to a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAction {
    /// Stable element id.
    pub id: String,
    /// Button label.
    pub label: String,
    /// Icon name.
    pub icon: String,
    /// Hover text.
    pub tooltip: String,
    /// Action triggered on click.
    pub handler: ActionHandlerRef,
    /// Whether the button appears on user messages.
    pub show_on_user_messages: bool,
    /// Whether the button appears on assistant messages.
    pub show_on_assistant_messages: bool,
}

impl MessageAction {
    /// Reports whether the button applies to a message with `role`.
    ///
    /// System messages never carry actions.
    #[must_use]
    pub const fn is_visible_for(&self, role: Role) -> bool {
        match role {
            Role::User => self.show_on_user_messages,
            Role::Assistant => self.show_on_assistant_messages,
            Role::System => false,
        }
    }
}

/// A control added to the chat input bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputExtension {
    /// Stable element id.
    pub id: String,
    /// Icon name.
    pub icon: String,
    /// Hover text.
    pub tooltip: String,
    /// Action triggered on click.
    pub handler: ActionHandlerRef,
    /// Display position; lower values render first.
    pub order: i32,
}

/// The kind of input a settings field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingFieldType {
    /// Single-line text.
    Text,
    /// Numeric input.
    Number,
    /// Toggle.
    Boolean,
    /// Choice from `options`.
    Dropdown,
    /// Multi-line text.
    TextArea,
}

/// A single field in a plugin settings form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingField {
    /// Settings key the value is stored under.
    pub key: String,
    /// Field label.
    pub label: String,
    /// Input kind.
    pub field_type: SettingFieldType,
    /// Initial value.
    pub default_value: Option<PluginValue>,
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Choices for dropdowns.
    pub options: Vec<String>,
}

impl SettingField {
    /// Creates a field with no default, placeholder or options.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        field_type: SettingFieldType,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            default_value: None,
            placeholder: None,
            options: Vec::new(),
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<PluginValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the placeholder.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets dropdown options.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// A plugin's settings form schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Form title.
    pub title: String,
    /// Ordered fields.
    pub fields: Vec<SettingField>,
}

impl PluginSettings {
    /// Creates a settings schema.
    #[must_use]
    pub fn new(title: impl Into<String>, fields: Vec<SettingField>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }

    /// Returns the field with the given key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&SettingField> {
        self.fields.iter().find(|field| field.key == key)
    }
}
