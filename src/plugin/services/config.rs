//! Plugin manager configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Tunables for [`PluginManager`](super::PluginManager).
///
/// # Examples
///
/// ```
/// use aimate::plugin::services::PluginManagerConfig;
/// use std::time::Duration;
///
/// let config = PluginManagerConfig::default()
///     .with_interceptor_timeout(Duration::from_secs(5));
/// assert_eq!(config.interceptor_timeout(), Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginManagerConfig {
    interceptor_timeout: Option<Duration>,
    event_capacity: usize,
}

impl PluginManagerConfig {
    /// Bounds every individual interceptor call.
    #[must_use]
    pub const fn with_interceptor_timeout(mut self, timeout: Duration) -> Self {
        self.interceptor_timeout = Some(timeout);
        self
    }

    /// Sets how many undelivered events subscribers may lag behind.
    #[must_use]
    pub const fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Returns the per-interceptor timeout, if any.
    #[must_use]
    pub const fn interceptor_timeout(&self) -> Option<Duration> {
        self.interceptor_timeout
    }

    /// Returns the event channel capacity (at least 1).
    #[must_use]
    pub fn event_capacity(&self) -> usize {
        self.event_capacity.max(1)
    }
}

impl Default for PluginManagerConfig {
    fn default() -> Self {
        Self {
            interceptor_timeout: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}
