//! aimate: message-interception safety core for a chat assistant.
//!
//! Every user message and every model reply passes through an ordered
//! pipeline of plugins before it reaches its destination. The bundled
//! mental-health safety plugin runs first: it blocks crisis messages with
//! region-appropriate hotline information, adds guidance to distressed
//! ones, and replaces replies that blame, gaslight or minimise the user.
//!
//! # Architecture
//!
//! aimate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for plugins and backends
//! - **Adapters**: Concrete implementations of ports
//! - **Services**: Orchestration over ports (plugin manager, chat turns)
//!
//! # Modules
//!
//! - [`conversation`]: Messages, roles, plugin values and turn context
//! - [`plugin`]: Plugin contract, registry and interception pipelines
//! - [`safety`]: Crisis and harm detection, escalation and interventions
//! - [`completion`]: Completion backend port and the chat turn driver
//! - [`plugins`]: Optional web search and code generator plugins

pub mod completion;
pub mod conversation;
pub mod plugin;
pub mod plugins;
pub mod safety;

#[cfg(test)]
mod test_support;
