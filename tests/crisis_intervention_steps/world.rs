//! Shared world state for crisis intervention BDD scenarios.

use std::sync::{Arc, Mutex, PoisonError};

use aimate::completion::{
    adapters::scripted::ScriptedCompletionBackend,
    services::{ChatTurnService, TurnConfig, TurnError, TurnOutcome},
};
use aimate::conversation::domain::{ConversationContext, ConversationId};
use aimate::plugin::services::PluginManager;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;

/// Clock the scenarios move forward explicitly.
#[derive(Debug)]
pub struct ScenarioClock {
    now: Mutex<DateTime<Utc>>,
}

impl ScenarioClock {
    /// Starts the clock at a fixed morning.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2025, 3, 14, 8, 30, 0)
            .single()
            .unwrap_or_default();
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Default for ScenarioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ScenarioClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Turn service type used by the BDD world.
pub type TestTurnService = ChatTurnService<ScriptedCompletionBackend, ScenarioClock>;

/// Scenario world for crisis intervention behaviour tests.
pub struct CrisisWorld {
    /// Clock shared by messages and escalation tracking.
    pub clock: Arc<ScenarioClock>,
    /// Scripted model backend.
    pub backend: Arc<ScriptedCompletionBackend>,
    /// Plugin manager; empty until a step registers plugins.
    pub plugins: Arc<PluginManager>,
    /// Turn service, built once plugins are registered.
    pub service: Option<TestTurnService>,
    /// Conversation the scenario runs in.
    pub context: ConversationContext,
    /// Result of the last turn.
    pub last_outcome: Option<Result<TurnOutcome, TurnError>>,
}

impl CrisisWorld {
    /// Creates a world with no plugins and no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Arc::new(ScenarioClock::new()),
            backend: Arc::new(ScriptedCompletionBackend::new()),
            plugins: Arc::new(PluginManager::default()),
            service: None,
            context: ConversationContext::new(ConversationId::new()),
            last_outcome: None,
        }
    }

    /// Builds the turn service over the current plugins and backend.
    pub fn start_service(&mut self) {
        self.service = Some(ChatTurnService::new(
            Arc::clone(&self.plugins),
            Arc::clone(&self.backend),
            Arc::clone(&self.clock),
            TurnConfig::for_model("scenario-model"),
        ));
    }

    /// Returns the outcome of the last successful turn.
    ///
    /// # Errors
    ///
    /// Fails when no turn ran or the last turn returned an error.
    pub fn outcome(&self) -> Result<&TurnOutcome, eyre::Report> {
        match self.last_outcome.as_ref() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(err)) => Err(eyre::eyre!("turn failed: {err}")),
            None => Err(eyre::eyre!("no turn has run in this scenario")),
        }
    }
}

impl Default for CrisisWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> CrisisWorld {
    CrisisWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
