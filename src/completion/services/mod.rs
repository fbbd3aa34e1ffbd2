//! Chat turn orchestration.

mod config;
mod turn;

pub use config::TurnConfig;
pub use turn::{ChatTurnService, TurnError, TurnOutcome};
