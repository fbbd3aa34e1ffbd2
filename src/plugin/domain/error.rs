//! Error types for plugin domain validation.

use crate::conversation::domain::PluginValueKind;
use thiserror::Error;

/// Errors returned while constructing plugin domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PluginDomainError {
    /// The plugin identifier is empty after trimming.
    #[error("plugin id must not be empty")]
    EmptyPluginId,

    /// The plugin identifier contains characters outside `[a-z0-9_-]`.
    #[error(
        "plugin id '{0}' contains invalid characters (only lowercase alphanumeric, hyphens and underscores allowed)"
    )]
    InvalidPluginId(String),

    /// The plugin identifier exceeds the 100-character limit.
    #[error("plugin id exceeds 100 character limit: {0}")]
    PluginIdTooLong(String),

    /// A tool name is empty after trimming.
    #[error("tool name must not be empty")]
    EmptyToolName,

    /// A tool parameter name is empty after trimming.
    #[error("tool parameter name must not be empty")]
    EmptyParameterName,

    /// Transitioning between two lifecycle states is invalid.
    #[error("invalid plugin lifecycle transition: {from} -> {to}")]
    InvalidLifecycleTransition {
        /// Current lifecycle state.
        from: String,
        /// Requested target lifecycle state.
        to: String,
    },
}

/// Errors raised while validating tool arguments against a tool definition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolParameterError {
    /// A required parameter was not supplied and has no default.
    #[error("missing required parameter '{parameter}' for tool {tool}")]
    MissingRequired {
        /// Tool name.
        tool: String,
        /// Parameter name.
        parameter: String,
    },

    /// A parameter value has the wrong type.
    #[error("parameter '{parameter}' for tool {tool} expects {expected}, got {actual}")]
    TypeMismatch {
        /// Tool name.
        tool: String,
        /// Parameter name.
        parameter: String,
        /// Declared type.
        expected: PluginValueKind,
        /// Supplied type.
        actual: PluginValueKind,
    },

    /// An argument does not correspond to any declared parameter.
    #[error("unknown parameter '{parameter}' for tool {tool}")]
    Unknown {
        /// Tool name.
        tool: String,
        /// Parameter name.
        parameter: String,
    },
}
