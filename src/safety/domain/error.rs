//! Error types for the safety layer.

use crate::plugin::domain::PluginDomainError;
use thiserror::Error;

/// Errors raised while preparing the safety plugin.
///
/// Detection never fails; only construction can.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SafetyError {
    /// A response template failed to compile or render.
    #[error("safety template {template} failed: {reason}")]
    Template {
        /// Template name.
        template: String,
        /// Rendering error description.
        reason: String,
    },

    /// The plugin identity could not be built.
    #[error(transparent)]
    Identity(#[from] PluginDomainError),
}
