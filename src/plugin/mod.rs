//! Plugin contract, registry and interception pipeline.
//!
//! Plugins extend the chat core through three optional capabilities:
//! intercepting messages around the completion call, contributing UI
//! descriptors, and providing invokable tools. The module follows the
//! hexagonal layout used across the crate:
//!
//! - Domain types in [`domain`]
//! - Port contracts (the plugin traits) in [`ports`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
