//! Then steps for crisis intervention BDD scenarios.

use super::world::CrisisWorld;
use aimate::completion::domain::CompletionRequest;
use aimate::conversation::domain::Message;
use rstest_bdd_macros::then;

#[then("the turn is blocked")]
fn turn_is_blocked(world: &CrisisWorld) -> Result<(), eyre::Report> {
    let outcome = world.outcome()?;
    if !outcome.is_blocked() {
        return Err(eyre::eyre!("expected a blocked turn, got {outcome:?}"));
    }
    Ok(())
}

#[then("the turn completes")]
fn turn_completes(world: &CrisisWorld) -> Result<(), eyre::Report> {
    let outcome = world.outcome()?;
    if outcome.is_blocked() {
        return Err(eyre::eyre!("expected a completed turn, got {outcome:?}"));
    }
    Ok(())
}

#[then(r#"the reply mentions "{text}""#)]
fn reply_mentions(world: &CrisisWorld, text: String) -> Result<(), eyre::Report> {
    let reply = world
        .outcome()?
        .reply()
        .map(Message::content)
        .ok_or_else(|| eyre::eyre!("the turn produced no reply"))?;
    if !reply.contains(&text) {
        return Err(eyre::eyre!("expected reply to mention '{text}', got: {reply}"));
    }
    Ok(())
}

#[then("the model was called {count:usize} times")]
fn model_called(world: &CrisisWorld, count: usize) -> Result<(), eyre::Report> {
    let calls = world.backend.requests().len();
    if calls != count {
        return Err(eyre::eyre!("expected {count} model calls, saw {calls}"));
    }
    Ok(())
}

#[then(r#"the model received "{text}""#)]
fn model_received(world: &CrisisWorld, text: String) -> Result<(), eyre::Report> {
    let requests = world.backend.requests();
    let sent = requests
        .last()
        .and_then(CompletionRequest::last_message)
        .ok_or_else(|| eyre::eyre!("the model received no request"))?;
    if sent.content != text {
        return Err(eyre::eyre!(
            "expected the model to receive '{text}', got '{}'",
            sent.content
        ));
    }
    Ok(())
}
