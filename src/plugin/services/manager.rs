//! Plugin registry and lifecycle management.

use super::config::PluginManagerConfig;
use super::guard::catch_panic;
use super::registration::PluginRegistration;
use crate::plugin::domain::{
    PluginDomainError, PluginEvent, PluginId, PluginLifecycleState, PluginRecord, PluginStage,
};
use crate::plugin::ports::{MessageInterceptor, Plugin, PluginError, ToolProvider, UiExtension};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

/// Errors raised while registering plugins.
#[derive(Debug, Clone, Error)]
pub enum PluginManagerError {
    /// The plugin's `initialize` call failed; the plugin was not registered.
    #[error("plugin {plugin_id} failed to initialise: {source}")]
    Initialization {
        /// Plugin identifier.
        plugin_id: PluginId,
        /// Underlying plugin error.
        #[source]
        source: PluginError,
    },

    /// Plugin code panicked; the plugin was not registered.
    #[error("plugin {plugin_id} panicked during {stage}: {message}")]
    Panicked {
        /// Plugin identifier.
        plugin_id: PluginId,
        /// Call that panicked.
        stage: PluginStage,
        /// Panic payload text.
        message: String,
    },

    /// A lifecycle rule was violated.
    #[error(transparent)]
    Domain(#[from] PluginDomainError),
}

/// Result type for plugin manager operations.
pub type PluginManagerResult<T> = Result<T, PluginManagerError>;

/// Outcome of a successful [`PluginManager::register`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The plugin was initialised and is now active.
    Registered,
    /// A plugin with the same identifier was already active; nothing changed.
    AlreadyRegistered,
}

/// Summary of a [`PluginManager::load_all`] call.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Plugins registered by this call, in order.
    pub registered: Vec<PluginId>,
    /// Plugins skipped because their identifier was already registered.
    pub skipped: Vec<PluginId>,
    /// Plugins whose registration failed.
    pub failed: Vec<PluginManagerError>,
}

pub(super) struct RegistryEntry {
    pub(super) registration: PluginRegistration,
    pub(super) state: PluginLifecycleState,
    pub(super) sequence: u64,
    pub(super) priority: i64,
}

impl RegistryEntry {
    fn record(&self) -> PluginRecord {
        PluginRecord {
            id: self.registration.id().clone(),
            info: self.registration.plugin().info().clone(),
            capabilities: self.registration.capabilities(),
            state: self.state,
            priority: self.priority,
        }
    }
}

#[derive(Default)]
pub(super) struct RegistryState {
    pub(super) entries: HashMap<PluginId, RegistryEntry>,
    pub(super) interceptors: Vec<PluginId>,
    pub(super) ui_extensions: Vec<PluginId>,
    pub(super) tool_providers: Vec<PluginId>,
    next_sequence: u64,
}

impl RegistryState {
    fn insert(&mut self, registration: PluginRegistration, state: PluginLifecycleState) -> bool {
        let plugin_id = registration.id().clone();
        if self.entries.contains_key(&plugin_id) {
            return false;
        }
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        let priority = registration
            .plugin()
            .priority()
            .unwrap_or_else(|| i64::try_from(sequence).unwrap_or(i64::MAX));

        if registration.interceptor().is_some() {
            self.interceptors.push(plugin_id.clone());
        }
        if registration.ui_extension().is_some() {
            self.ui_extensions.push(plugin_id.clone());
        }
        if registration.tool_provider().is_some() {
            self.tool_providers.push(plugin_id.clone());
        }
        self.entries.insert(
            plugin_id,
            RegistryEntry {
                registration,
                state,
                sequence,
                priority,
            },
        );
        true
    }

    fn remove(&mut self, plugin_id: &PluginId) -> Option<RegistryEntry> {
        let entry = self.entries.remove(plugin_id)?;
        self.interceptors.retain(|id| id != plugin_id);
        self.ui_extensions.retain(|id| id != plugin_id);
        self.tool_providers.retain(|id| id != plugin_id);
        Some(entry)
    }
}

/// Registry of active plugins and the entry point for every plugin call.
///
/// Registration, lookup and removal are safe under concurrent use. Calls
/// into plugins run against a snapshot of the registry taken when the call
/// starts, so registry changes never block on plugin code.
///
/// # Examples
///
/// ```
/// use aimate::plugin::services::{PluginManager, PluginRegistration, RegistrationOutcome};
/// use aimate::safety::services::MentalHealthSafetyPlugin;
/// use std::sync::Arc;
///
/// # tokio_test_block_on(async {
/// let manager = PluginManager::default();
/// let plugin = Arc::new(MentalHealthSafetyPlugin::with_defaults().expect("templates compile"));
/// let registration = PluginRegistration::builder(plugin)
///     .intercepts_messages()
///     .extends_ui()
///     .build();
///
/// let outcome = manager.register(registration).await.expect("safety plugin registers");
/// assert_eq!(outcome, RegistrationOutcome::Registered);
/// assert_eq!(manager.plugins().len(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(future: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().expect("runtime").block_on(future)
/// # }
/// ```
pub struct PluginManager {
    pub(super) registry: RwLock<RegistryState>,
    pub(super) config: PluginManagerConfig,
    events: broadcast::Sender<PluginEvent>,
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new(PluginManagerConfig::default())
    }
}

impl PluginManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new(config: PluginManagerConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity());
        Self {
            registry: RwLock::new(RegistryState::default()),
            config,
            events,
        }
    }

    /// Returns the manager configuration.
    #[must_use]
    pub const fn config(&self) -> &PluginManagerConfig {
        &self.config
    }

    /// Subscribes to lifecycle and error events.
    ///
    /// Only events published after the call are delivered.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PluginEvent> {
        self.events.subscribe()
    }

    /// Initialises and registers a plugin.
    ///
    /// Registering an identifier that is already active is a no-op that
    /// reports [`RegistrationOutcome::AlreadyRegistered`]; the second
    /// plugin is never initialised.
    ///
    /// # Errors
    ///
    /// Returns [`PluginManagerError::Initialization`] or
    /// [`PluginManagerError::Panicked`] when the plugin's `initialize` call
    /// fails. The registry is left unchanged and an error event is
    /// published.
    #[instrument(skip_all, fields(plugin_id = %registration.id()))]
    pub async fn register(
        &self,
        registration: PluginRegistration,
    ) -> PluginManagerResult<RegistrationOutcome> {
        let plugin_id = registration.id().clone();
        if self.read_registry().entries.contains_key(&plugin_id) {
            warn!("plugin already registered; keeping the existing instance");
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        let plugin = Arc::clone(registration.plugin());
        match catch_panic(plugin.initialize()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(error = %err, "plugin initialisation failed");
                self.publish_error(&plugin_id, PluginStage::Initialize, err.to_string());
                return Err(PluginManagerError::Initialization {
                    plugin_id,
                    source: err,
                });
            }
            Err(message) => {
                error!(panic = %message, "plugin panicked during initialisation");
                self.publish_error(&plugin_id, PluginStage::Initialize, message.clone());
                return Err(PluginManagerError::Panicked {
                    plugin_id,
                    stage: PluginStage::Initialize,
                    message,
                });
            }
        }

        let active = PluginLifecycleState::Unregistered
            .transition_to(PluginLifecycleState::Initialized)?
            .transition_to(PluginLifecycleState::Active)?;
        let capabilities = registration.capabilities();
        let inserted = self.write_registry().insert(registration, active);
        if !inserted {
            warn!("plugin registered concurrently; disposing the duplicate");
            self.dispose_plugin(&plugin_id, plugin.as_ref()).await;
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        let info = plugin.info();
        info!(
            name = info.name(),
            version = info.version(),
            capabilities = %capabilities,
            "registered plugin"
        );
        self.publish(PluginEvent::Loaded {
            plugin_id,
            name: info.name().to_owned(),
            version: info.version().to_owned(),
        });
        Ok(RegistrationOutcome::Registered)
    }

    /// Registers each plugin in turn, continuing past failures.
    pub async fn load_all<I>(&self, registrations: I) -> LoadReport
    where
        I: IntoIterator<Item = PluginRegistration>,
    {
        let mut report = LoadReport::default();
        for registration in registrations {
            let plugin_id = registration.id().clone();
            match self.register(registration).await {
                Ok(RegistrationOutcome::Registered) => report.registered.push(plugin_id),
                Ok(RegistrationOutcome::AlreadyRegistered) => report.skipped.push(plugin_id),
                Err(err) => report.failed.push(err),
            }
        }
        info!(
            registered = report.registered.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "plugin load finished"
        );
        report
    }

    /// Disposes and removes a plugin.
    ///
    /// Returns the final record, or `None` when the identifier is not
    /// registered. Dispose failures are logged and reported as events; the
    /// plugin is removed regardless.
    #[instrument(skip(self), fields(plugin_id = %plugin_id))]
    pub async fn unregister(&self, plugin_id: &PluginId) -> Option<PluginRecord> {
        let Some(entry) = self.write_registry().remove(plugin_id) else {
            debug!("plugin not registered; nothing to unload");
            return None;
        };
        let plugin = Arc::clone(entry.registration.plugin());
        self.dispose_plugin(plugin_id, plugin.as_ref()).await;

        let mut record = entry.record();
        record.state = entry
            .state
            .transition_to(PluginLifecycleState::Disposed)
            .unwrap_or_else(|err| {
                warn!(error = %err, "unexpected lifecycle state at unload");
                PluginLifecycleState::Disposed
            });
        info!("unloaded plugin");
        self.publish(PluginEvent::Unloaded {
            plugin_id: plugin_id.clone(),
        });
        Some(record)
    }

    /// Returns a record for every active plugin, in registration order.
    #[must_use]
    pub fn plugins(&self) -> Vec<PluginRecord> {
        let registry = self.read_registry();
        let mut entries: Vec<&RegistryEntry> = registry.entries.values().collect();
        entries.sort_by_key(|entry| entry.sequence);
        entries.into_iter().map(RegistryEntry::record).collect()
    }

    /// Returns the record for `plugin_id`, if registered.
    #[must_use]
    pub fn record(&self, plugin_id: &str) -> Option<PluginRecord> {
        self.read_registry()
            .entries
            .values()
            .find(|entry| entry.registration.id().as_str() == plugin_id)
            .map(RegistryEntry::record)
    }

    /// Returns the plugin registered as `plugin_id`, if any.
    #[must_use]
    pub fn plugin(&self, plugin_id: &str) -> Option<Arc<dyn Plugin>> {
        self.read_registry()
            .entries
            .values()
            .find(|entry| entry.registration.id().as_str() == plugin_id)
            .map(|entry| Arc::clone(entry.registration.plugin()))
    }

    /// Snapshot of interceptors ordered by priority, ties by registration.
    pub(super) fn interceptor_snapshot(&self) -> Vec<(PluginId, Arc<dyn MessageInterceptor>)> {
        let registry = self.read_registry();
        let mut ordered: Vec<(i64, u64, PluginId, Arc<dyn MessageInterceptor>)> = registry
            .interceptors
            .iter()
            .filter_map(|id| {
                let entry = registry.entries.get(id)?;
                let interceptor = entry.registration.interceptor()?;
                Some((
                    entry.priority,
                    entry.sequence,
                    id.clone(),
                    Arc::clone(interceptor),
                ))
            })
            .collect();
        ordered.sort_by_key(|(priority, sequence, _, _)| (*priority, *sequence));
        ordered
            .into_iter()
            .map(|(_, _, id, interceptor)| (id, interceptor))
            .collect()
    }

    /// Snapshot of UI extensions in registration order.
    pub(super) fn ui_snapshot(&self) -> Vec<(PluginId, Arc<dyn UiExtension>)> {
        let registry = self.read_registry();
        registry
            .ui_extensions
            .iter()
            .filter_map(|id| {
                let extension = registry.entries.get(id)?.registration.ui_extension()?;
                Some((id.clone(), Arc::clone(extension)))
            })
            .collect()
    }

    /// Snapshot of tool providers in registration order.
    pub(super) fn tool_provider_snapshot(&self) -> Vec<(PluginId, Arc<dyn ToolProvider>)> {
        let registry = self.read_registry();
        registry
            .tool_providers
            .iter()
            .filter_map(|id| {
                let provider = registry.entries.get(id)?.registration.tool_provider()?;
                Some((id.clone(), Arc::clone(provider)))
            })
            .collect()
    }

    /// Publishes an error event for contained plugin failures.
    pub(super) fn publish_error(&self, plugin_id: &PluginId, stage: PluginStage, message: String) {
        self.publish(PluginEvent::Error {
            plugin_id: plugin_id.clone(),
            stage,
            message,
        });
    }

    fn publish(&self, event: PluginEvent) {
        if self.events.send(event).is_err() {
            debug!("no plugin event subscribers");
        }
    }

    async fn dispose_plugin(&self, plugin_id: &PluginId, plugin: &dyn Plugin) {
        match catch_panic(plugin.dispose()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(plugin_id = %plugin_id, error = %err, "plugin dispose failed");
                self.publish_error(plugin_id, PluginStage::Dispose, err.to_string());
            }
            Err(message) => {
                error!(plugin_id = %plugin_id, panic = %message, "plugin panicked during dispose");
                self.publish_error(plugin_id, PluginStage::Dispose, message);
            }
        }
    }

    fn read_registry(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_registry(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}
