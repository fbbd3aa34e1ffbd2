//! Plugins bundled with aimate.
//!
//! Both are opt-in: hosts register them alongside the safety plugin with
//! [`PluginRegistration`](crate::plugin::services::PluginRegistration).

pub mod code_generator;
pub mod web_search;

#[cfg(test)]
mod tests;
