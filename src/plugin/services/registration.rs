//! Explicit capability declaration for plugin registration.

use crate::plugin::domain::{PluginCapabilities, PluginCapability, PluginId};
use crate::plugin::ports::{MessageInterceptor, Plugin, ToolProvider, UiExtension};
use std::sync::Arc;

/// A plugin together with the capabilities it takes part in.
///
/// Each capability method on the builder only exists when the plugin type
/// implements the matching trait, so declarations are checked at compile
/// time.
///
/// # Examples
///
/// ```
/// use aimate::plugin::domain::PluginCapability;
/// use aimate::plugin::services::PluginRegistration;
/// use aimate::safety::services::MentalHealthSafetyPlugin;
/// use std::sync::Arc;
///
/// let plugin = Arc::new(MentalHealthSafetyPlugin::with_defaults().expect("templates compile"));
/// let registration = PluginRegistration::builder(plugin)
///     .intercepts_messages()
///     .extends_ui()
///     .build();
///
/// assert!(registration.capabilities().contains(PluginCapability::MessageInterceptor));
/// assert!(!registration.capabilities().contains(PluginCapability::ToolProvider));
/// ```
#[derive(Clone)]
pub struct PluginRegistration {
    id: PluginId,
    plugin: Arc<dyn Plugin>,
    interceptor: Option<Arc<dyn MessageInterceptor>>,
    ui_extension: Option<Arc<dyn UiExtension>>,
    tool_provider: Option<Arc<dyn ToolProvider>>,
}

impl PluginRegistration {
    /// Starts a registration for `plugin`.
    #[must_use]
    pub fn builder<P>(plugin: Arc<P>) -> PluginRegistrationBuilder<P>
    where
        P: Plugin + 'static,
    {
        PluginRegistrationBuilder {
            plugin,
            interceptor: None,
            ui_extension: None,
            tool_provider: None,
        }
    }

    /// Returns the plugin identifier.
    #[must_use]
    pub const fn id(&self) -> &PluginId {
        &self.id
    }

    /// Returns the plugin.
    #[must_use]
    pub const fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }

    /// Returns the interceptor view, when declared.
    #[must_use]
    pub const fn interceptor(&self) -> Option<&Arc<dyn MessageInterceptor>> {
        self.interceptor.as_ref()
    }

    /// Returns the UI extension view, when declared.
    #[must_use]
    pub const fn ui_extension(&self) -> Option<&Arc<dyn UiExtension>> {
        self.ui_extension.as_ref()
    }

    /// Returns the tool provider view, when declared.
    #[must_use]
    pub const fn tool_provider(&self) -> Option<&Arc<dyn ToolProvider>> {
        self.tool_provider.as_ref()
    }

    /// Returns the declared capability set.
    #[must_use]
    pub const fn capabilities(&self) -> PluginCapabilities {
        let mut capabilities = PluginCapabilities::empty();
        if self.interceptor.is_some() {
            capabilities = capabilities.with(PluginCapability::MessageInterceptor);
        }
        if self.ui_extension.is_some() {
            capabilities = capabilities.with(PluginCapability::UiExtension);
        }
        if self.tool_provider.is_some() {
            capabilities = capabilities.with(PluginCapability::ToolProvider);
        }
        capabilities
    }
}

/// Builder returned by [`PluginRegistration::builder`].
pub struct PluginRegistrationBuilder<P> {
    plugin: Arc<P>,
    interceptor: Option<Arc<dyn MessageInterceptor>>,
    ui_extension: Option<Arc<dyn UiExtension>>,
    tool_provider: Option<Arc<dyn ToolProvider>>,
}

impl<P> PluginRegistrationBuilder<P>
where
    P: Plugin + 'static,
{
    /// Declares the message interceptor capability.
    #[must_use]
    pub fn intercepts_messages(mut self) -> Self
    where
        P: MessageInterceptor,
    {
        let interceptor: Arc<dyn MessageInterceptor> = Arc::<P>::clone(&self.plugin);
        self.interceptor = Some(interceptor);
        self
    }

    /// Declares the UI extension capability.
    #[must_use]
    pub fn extends_ui(mut self) -> Self
    where
        P: UiExtension,
    {
        let ui_extension: Arc<dyn UiExtension> = Arc::<P>::clone(&self.plugin);
        self.ui_extension = Some(ui_extension);
        self
    }

    /// Declares the tool provider capability.
    #[must_use]
    pub fn provides_tools(mut self) -> Self
    where
        P: ToolProvider,
    {
        let tool_provider: Arc<dyn ToolProvider> = Arc::<P>::clone(&self.plugin);
        self.tool_provider = Some(tool_provider);
        self
    }

    /// Finishes the registration.
    #[must_use]
    pub fn build(self) -> PluginRegistration {
        let id = self.plugin.id().clone();
        let plugin: Arc<dyn Plugin> = self.plugin;
        PluginRegistration {
            id,
            plugin,
            interceptor: self.interceptor,
            ui_extension: self.ui_extension,
            tool_provider: self.tool_provider,
        }
    }
}
