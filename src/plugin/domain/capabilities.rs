//! Declared plugin capabilities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the optional extension points a plugin can implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginCapability {
    /// Inspects or rewrites messages around the completion call.
    MessageInterceptor,
    /// Contributes UI descriptors.
    UiExtension,
    /// Exposes invokable tools.
    ToolProvider,
}

impl PluginCapability {
    /// All capabilities in canonical order.
    pub const ALL: [Self; 3] = [Self::MessageInterceptor, Self::UiExtension, Self::ToolProvider];

    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MessageInterceptor => "message_interceptor",
            Self::UiExtension => "ui_extension",
            Self::ToolProvider => "tool_provider",
        }
    }
}

impl fmt::Display for PluginCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of capabilities a plugin declared at registration.
///
/// # Examples
///
/// ```
/// use aimate::plugin::domain::{PluginCapabilities, PluginCapability};
///
/// let caps = PluginCapabilities::empty().with(PluginCapability::ToolProvider);
/// assert!(caps.contains(PluginCapability::ToolProvider));
/// assert!(!caps.contains(PluginCapability::UiExtension));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginCapabilities {
    message_interceptor: bool,
    ui_extension: bool,
    tool_provider: bool,
}

impl PluginCapabilities {
    /// Returns a set with no capabilities.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            message_interceptor: false,
            ui_extension: false,
            tool_provider: false,
        }
    }

    /// Returns a copy with the capability added.
    #[must_use]
    pub const fn with(mut self, capability: PluginCapability) -> Self {
        match capability {
            PluginCapability::MessageInterceptor => self.message_interceptor = true,
            PluginCapability::UiExtension => self.ui_extension = true,
            PluginCapability::ToolProvider => self.tool_provider = true,
        }
        self
    }

    /// Returns whether the capability is present.
    #[must_use]
    pub const fn contains(self, capability: PluginCapability) -> bool {
        match capability {
            PluginCapability::MessageInterceptor => self.message_interceptor,
            PluginCapability::UiExtension => self.ui_extension,
            PluginCapability::ToolProvider => self.tool_provider,
        }
    }

    /// Returns whether no capability is present.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.message_interceptor || self.ui_extension || self.tool_provider)
    }

    /// Iterates over the present capabilities in canonical order.
    pub fn iter(self) -> impl Iterator<Item = PluginCapability> {
        PluginCapability::ALL
            .into_iter()
            .filter(move |capability| self.contains(*capability))
    }
}

impl fmt::Display for PluginCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(PluginCapability::as_str).collect();
        f.write_str(&names.join(","))
    }
}
