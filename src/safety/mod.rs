//! Mental-health safety monitoring.
//!
//! The safety layer screens outbound user messages for crisis signals and
//! inbound assistant replies for harmful patterns. Detection is pure and
//! lives in [`domain`]; the stateful plugin that ties detection, escalation
//! tracking and response rendering together lives in [`services`].
//!
//! A critical message never reaches the completion backend: the plugin
//! blocks the turn and answers with region-specific crisis resources.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
