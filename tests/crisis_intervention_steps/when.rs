//! When steps for crisis intervention BDD scenarios.

use super::world::{CrisisWorld, run_async};
use aimate::conversation::domain::Message;
use chrono::TimeDelta;
use rstest_bdd_macros::when;
use tokio_util::sync::CancellationToken;

#[when(r#"the user sends "{text}""#)]
fn user_sends(world: &mut CrisisWorld, text: String) -> Result<(), eyre::Report> {
    let service = world
        .service
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no chat assistant in scenario world"))?;
    let message = Message::user(text, world.clock.as_ref());
    let outcome = run_async(service.run_turn(
        &mut world.context,
        message,
        &CancellationToken::new(),
    ));
    world.last_outcome = Some(outcome);
    Ok(())
}

#[when("{minutes:i64} minutes pass")]
fn minutes_pass(world: &mut CrisisWorld, minutes: i64) {
    world.clock.advance(TimeDelta::minutes(minutes));
}
