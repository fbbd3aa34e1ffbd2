//! Plugin identifier value object.

use super::PluginDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_PLUGIN_ID_LENGTH: usize = 100;

/// Unique, validated identifier of a plugin (for example `web-search`).
///
/// # Examples
///
/// ```
/// use aimate::plugin::domain::PluginId;
///
/// let id = PluginId::new("mental-health-safety").expect("valid id");
/// assert_eq!(id.as_str(), "mental-health-safety");
/// assert!(PluginId::new("Web Search").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginId(String);

impl PluginId {
    /// Creates a validated plugin identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError`] when the identifier is empty, too long,
    /// or contains characters outside `[a-z0-9_-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, PluginDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PluginDomainError::EmptyPluginId);
        }
        if trimmed.chars().count() > MAX_PLUGIN_ID_LENGTH {
            return Err(PluginDomainError::PluginIdTooLong(trimmed.to_owned()));
        }
        let valid = trimmed
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_');
        if !valid {
            return Err(PluginDomainError::InvalidPluginId(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PluginId {
    type Error = PluginDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PluginId> for String {
    fn from(value: PluginId) -> Self {
        value.0
    }
}

impl AsRef<str> for PluginId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
