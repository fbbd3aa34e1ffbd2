//! Port contracts implemented by plugins.

mod plugin;

pub use plugin::{MessageInterceptor, Plugin, PluginError, PluginResult, ToolProvider, UiExtension};
