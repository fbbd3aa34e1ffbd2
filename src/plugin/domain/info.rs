//! Descriptive plugin metadata and registry snapshots.

use super::{PluginCapabilities, PluginId, PluginLifecycleState};
use serde::{Deserialize, Serialize};

/// Human-facing metadata every plugin exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    name: String,
    description: String,
    version: String,
    author: String,
    icon: String,
}

impl PluginInfo {
    /// Creates plugin metadata with the display name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: version.into(),
            author: String::new(),
            icon: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the icon name.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the icon name.
    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }
}

/// Point-in-time view of a registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRecord {
    /// Plugin identifier.
    pub id: PluginId,
    /// Descriptive metadata.
    pub info: PluginInfo,
    /// Capabilities declared at registration.
    pub capabilities: PluginCapabilities,
    /// Lifecycle state at the time of the snapshot.
    pub state: PluginLifecycleState,
    /// Effective pipeline priority (lower runs first).
    pub priority: i64,
}
