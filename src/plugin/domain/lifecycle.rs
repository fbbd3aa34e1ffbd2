//! Plugin lifecycle state machine.

use super::PluginDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a plugin inside the manager.
///
/// Valid transitions:
///
/// ```text
/// Unregistered -> Initialized -> Active -> Disposed
///                      \______________________^
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginLifecycleState {
    /// Known to the caller but not yet initialised.
    Unregistered,
    /// `initialize` succeeded; not yet visible to pipelines.
    Initialized,
    /// Stored in the registry and participating in pipelines.
    Active,
    /// `dispose` was called; the plugin is gone from the registry.
    Disposed,
}

impl PluginLifecycleState {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unregistered => "unregistered",
            Self::Initialized => "initialized",
            Self::Active => "active",
            Self::Disposed => "disposed",
        }
    }

    /// Returns whether moving to `next` is permitted.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unregistered, Self::Initialized)
                | (Self::Initialized, Self::Active | Self::Disposed)
                | (Self::Active, Self::Disposed)
        )
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError::InvalidLifecycleTransition`] when the
    /// transition is not permitted.
    pub fn transition_to(self, next: Self) -> Result<Self, PluginDomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(PluginDomainError::InvalidLifecycleTransition {
                from: self.as_str().to_owned(),
                to: next.as_str().to_owned(),
            })
        }
    }
}

impl fmt::Display for PluginLifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
