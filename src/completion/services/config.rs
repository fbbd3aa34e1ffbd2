//! Chat turn configuration.

use crate::completion::domain::DEFAULT_TEMPERATURE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_MODEL: &str = "default";
const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings applied to every turn run by a
/// [`ChatTurnService`](super::ChatTurnService).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    model: String,
    temperature: f64,
    max_tokens: Option<u32>,
    turn_timeout: Option<Duration>,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            turn_timeout: Some(DEFAULT_TURN_TIMEOUT),
        }
    }
}

impl TurnConfig {
    /// Creates a configuration for `model` with default sampling.
    #[must_use]
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the token limit.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets or clears the whole-turn time limit.
    #[must_use]
    pub const fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Returns the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the sampling temperature.
    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Returns the token limit.
    #[must_use]
    pub const fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    /// Returns the whole-turn time limit.
    #[must_use]
    pub const fn turn_timeout(&self) -> Option<Duration> {
        self.turn_timeout
    }
}
