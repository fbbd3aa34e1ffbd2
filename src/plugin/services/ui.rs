//! Aggregation of UI contributions across plugins.

use super::guard::catch_panic_sync;
use super::manager::PluginManager;
use crate::conversation::domain::Message;
use crate::plugin::domain::{
    InputExtension, MessageAction, PluginId, PluginSettings, PluginStage,
};
use crate::plugin::ports::{PluginResult, UiExtension};
use std::collections::BTreeMap;
use tracing::error;

impl PluginManager {
    /// Collects message actions applicable to `message`, in registration
    /// order.
    ///
    /// Actions are filtered by the visibility flags against the message
    /// role; system messages receive none.
    #[must_use]
    pub fn message_actions(&self, message: &Message) -> Vec<MessageAction> {
        self.collect_ui(PluginStage::MessageActions, &|extension| {
            extension.message_actions(message)
        })
        .into_iter()
        .flat_map(|(_, actions)| actions)
        .filter(|action| action.is_visible_for(message.role()))
        .collect()
    }

    /// Collects input-bar extensions sorted by `order` (stable).
    #[must_use]
    pub fn input_extensions(&self) -> Vec<InputExtension> {
        let mut extensions: Vec<InputExtension> = self
            .collect_ui(PluginStage::InputExtensions, &|extension| {
                extension.input_extensions()
            })
            .into_iter()
            .flat_map(|(_, extensions)| extensions)
            .collect();
        extensions.sort_by_key(|extension| extension.order);
        extensions
    }

    /// Collects the settings schema of every plugin that declares one.
    #[must_use]
    pub fn all_plugin_settings(&self) -> BTreeMap<PluginId, PluginSettings> {
        self.collect_ui(PluginStage::Settings, &|extension| extension.settings_schema())
            .into_iter()
            .filter_map(|(plugin_id, settings)| settings.map(|schema| (plugin_id, schema)))
            .collect()
    }

    /// Collects custom rendered content for `message`, keyed by plugin.
    #[must_use]
    pub fn custom_content(&self, message: &Message) -> BTreeMap<PluginId, String> {
        self.collect_ui(PluginStage::CustomContent, &|extension| {
            extension.render_custom_content(message)
        })
        .into_iter()
        .filter_map(|(plugin_id, content)| content.map(|html| (plugin_id, html)))
        .collect()
    }

    fn collect_ui<T>(
        &self,
        stage: PluginStage,
        query: &dyn Fn(&dyn UiExtension) -> PluginResult<T>,
    ) -> Vec<(PluginId, T)> {
        let mut collected = Vec::new();
        for (plugin_id, extension) in self.ui_snapshot() {
            match catch_panic_sync(|| query(extension.as_ref())) {
                Ok(Ok(value)) => collected.push((plugin_id, value)),
                Ok(Err(err)) => {
                    error!(plugin_id = %plugin_id, %stage, error = %err, "UI query failed");
                    self.publish_error(&plugin_id, stage, err.to_string());
                }
                Err(panic) => {
                    error!(plugin_id = %plugin_id, %stage, panic = %panic, "UI query panicked");
                    self.publish_error(&plugin_id, stage, panic);
                }
            }
        }
        collected
    }
}
