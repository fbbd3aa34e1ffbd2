//! Conversation primitives shared by every plugin capability.
//!
//! The types here describe what flows through the interception pipeline:
//! messages, their roles and attachments, the per-turn
//! [`domain::ConversationContext`], and the [`domain::PluginValue`] union
//! used for settings, metadata and tool payloads.

pub mod domain;
