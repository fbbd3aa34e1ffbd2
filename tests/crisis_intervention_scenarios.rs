//! Behaviour tests for crisis intervention across full chat turns.

mod crisis_intervention_steps;

use crisis_intervention_steps::world::{CrisisWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/crisis_intervention.feature",
    name = "A critical message is blocked with New Zealand resources"
)]
#[tokio::test(flavor = "multi_thread")]
async fn critical_message_is_blocked(world: CrisisWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/crisis_intervention.feature",
    name = "Everyday stress passes through unchanged"
)]
#[tokio::test(flavor = "multi_thread")]
async fn everyday_stress_passes_through(world: CrisisWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/crisis_intervention.feature",
    name = "Repeated distress escalates to an intervention"
)]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_distress_escalates(world: CrisisWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/crisis_intervention.feature",
    name = "Distress after a long pause does not escalate"
)]
#[tokio::test(flavor = "multi_thread")]
async fn long_pause_holds_off_escalation(world: CrisisWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/crisis_intervention.feature",
    name = "A long pause does not reset the distress count"
)]
#[tokio::test(flavor = "multi_thread")]
async fn long_pause_keeps_distress_count(world: CrisisWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/crisis_intervention.feature",
    name = "An Australian user is shown Lifeline"
)]
#[tokio::test(flavor = "multi_thread")]
async fn australian_user_sees_lifeline(world: CrisisWorld) {
    let _ = world;
}
