//! Completion backend contract and the chat turn driver.
//!
//! A chat turn runs the outbound message through the plugin pipeline,
//! calls the completion backend unless an interceptor blocked the turn,
//! and screens the reply before it reaches the conversation history.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
