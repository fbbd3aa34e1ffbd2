//! Per-conversation escalation tracking.

use super::{CrisisAnalysis, DistressLevel, Sensitivity};
use crate::conversation::domain::ConversationId;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// How recent the previous distress message must be for escalation.
pub const ESCALATION_WINDOW: TimeDelta = TimeDelta::minutes(15);

#[derive(Debug, Clone, Copy)]
struct EscalationState {
    consecutive: u32,
    last_distress: DateTime<Utc>,
}

/// Counts consecutive distress messages per conversation.
///
/// A message at [`DistressLevel::Elevated`] or above extends the run. Once
/// the run reaches the sensitivity's threshold, and the previous distress
/// message arrived within [`ESCALATION_WINDOW`], the analysis is upgraded
/// to critical. A message with no signal clears the run; mild messages
/// leave it untouched.
pub struct EscalationTracker<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
    states: Mutex<HashMap<ConversationId, EscalationState>>,
}

impl<C> EscalationTracker<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty tracker reading time from `clock`.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            clock,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Folds `analysis` into the conversation's run.
    ///
    /// Returns the possibly upgraded analysis and the current run length.
    pub fn observe(
        &self,
        conversation_id: ConversationId,
        mut analysis: CrisisAnalysis,
        sensitivity: Sensitivity,
    ) -> (CrisisAnalysis, u32) {
        let mut states = self.lock();
        match analysis.level() {
            DistressLevel::None => {
                states.remove(&conversation_id);
                (analysis, 0)
            }
            DistressLevel::Mild => {
                let consecutive = states
                    .get(&conversation_id)
                    .map_or(0, |state| state.consecutive);
                (analysis, consecutive)
            }
            DistressLevel::Elevated | DistressLevel::Critical => {
                let now = self.clock.utc();
                let previous = states.get(&conversation_id).copied();
                let within_window = previous.is_some_and(|state| {
                    now.signed_duration_since(state.last_distress) < ESCALATION_WINDOW
                });
                let consecutive = previous.map_or(1, |state| state.consecutive.saturating_add(1));
                if within_window && consecutive >= sensitivity.escalation_threshold() {
                    analysis.escalate();
                }
                states.insert(
                    conversation_id,
                    EscalationState {
                        consecutive,
                        last_distress: now,
                    },
                );
                (analysis, consecutive)
            }
        }
    }

    /// Returns the current run length for a conversation.
    #[must_use]
    pub fn consecutive_count(&self, conversation_id: ConversationId) -> u32 {
        self.lock()
            .get(&conversation_id)
            .map_or(0, |state| state.consecutive)
    }

    /// Drops the state of one conversation.
    pub fn forget(&self, conversation_id: ConversationId) {
        self.lock().remove(&conversation_id);
    }

    /// Drops every conversation's state.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ConversationId, EscalationState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
