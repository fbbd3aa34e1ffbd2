//! Interceptor pipeline ordering, failure isolation and cancellation.

use super::fixtures::{Behaviour, CallLog, ScriptedPlugin, context, log, manager, user_message};
use crate::conversation::domain::{ConversationContext, Message, PluginValue};
use crate::plugin::domain::{PluginEvent, PluginStage};
use crate::plugin::services::{PipelineError, PluginManager, PluginManagerConfig};
use rstest::rstest;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

async fn register_all(manager: &PluginManager, plugins: Vec<ScriptedPlugin>) {
    let report = manager
        .load_all(plugins.into_iter().map(ScriptedPlugin::registration))
        .await;
    assert!(report.failed.is_empty(), "fixtures should register");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn interceptors_chain_modifications_in_priority_order(
    manager: PluginManager,
    log: CallLog,
    mut context: ConversationContext,
    user_message: Message,
) {
    register_all(
        &manager,
        vec![
            ScriptedPlugin::new("late", Behaviour::Append(" [late]"), &log),
            ScriptedPlugin::new("early", Behaviour::Append(" [early]"), &log).with_priority(-5),
        ],
    )
    .await;

    let result = manager
        .on_before_send(&user_message, &mut context, &CancellationToken::new())
        .await
        .expect("pipeline should complete");

    assert!(result.should_continue());
    let final_message = result.modified_message().expect("final message is returned");
    assert_eq!(final_message.content(), "hello [early] [late]");
    assert_eq!(final_message.id(), user_message.id());
    assert_eq!(log.entries(), ["early:before", "late:before"]);
    assert_eq!(result.metadata().get("early.seen"), Some(&PluginValue::Boolean(true)));
    assert_eq!(result.metadata().get("late.seen"), Some(&PluginValue::Boolean(true)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn after_receive_runs_in_reverse_order(
    manager: PluginManager,
    log: CallLog,
    mut context: ConversationContext,
    user_message: Message,
) {
    register_all(
        &manager,
        vec![
            ScriptedPlugin::new("safety", Behaviour::PassThrough, &log).with_priority(-1000),
            ScriptedPlugin::new("search", Behaviour::PassThrough, &log),
        ],
    )
    .await;

    manager
        .on_after_receive(&user_message, &mut context, &CancellationToken::new())
        .await
        .expect("pipeline should complete");

    assert_eq!(log.entries(), ["search:after", "safety:after"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blocking_interceptor_stops_the_pass(
    manager: PluginManager,
    log: CallLog,
    mut context: ConversationContext,
    user_message: Message,
) {
    register_all(
        &manager,
        vec![
            ScriptedPlugin::new("guard", Behaviour::Block("Crisis intervention activated"), &log),
            ScriptedPlugin::new("after-guard", Behaviour::Append("!"), &log),
        ],
    )
    .await;

    let result = manager
        .on_before_send(&user_message, &mut context, &CancellationToken::new())
        .await
        .expect("pipeline should complete");

    assert!(!result.should_continue());
    assert_eq!(result.cancel_reason(), Some("Crisis intervention activated"));
    assert_eq!(
        result.modified_message().map(Message::content),
        Some("blocked by guard")
    );
    assert_eq!(log.entries(), ["guard:before"]);
}

#[rstest]
#[case(Behaviour::Fail)]
#[case(Behaviour::Panic)]
#[tokio::test(flavor = "multi_thread")]
async fn failing_interceptor_is_skipped(
    #[case] behaviour: Behaviour,
    manager: PluginManager,
    log: CallLog,
    mut context: ConversationContext,
    user_message: Message,
) {
    register_all(
        &manager,
        vec![
            ScriptedPlugin::new("faulty", behaviour, &log),
            ScriptedPlugin::new("healthy", Behaviour::Append("!"), &log),
        ],
    )
    .await;
    let mut events = manager.subscribe();

    let result = manager
        .on_before_send(&user_message, &mut context, &CancellationToken::new())
        .await
        .expect("pipeline should complete");

    assert_eq!(
        result.modified_message().map(Message::content),
        Some("hello!")
    );
    assert!(matches!(
        events.try_recv(),
        Ok(PluginEvent::Error { plugin_id, stage: PluginStage::BeforeSend, .. })
            if plugin_id.as_str() == "faulty"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_registry_passes_message_through(
    manager: PluginManager,
    mut context: ConversationContext,
    user_message: Message,
) {
    let result = manager
        .on_before_send(&user_message, &mut context, &CancellationToken::new())
        .await
        .expect("pipeline should complete");

    assert!(result.should_continue());
    assert_eq!(result.modified_message(), Some(&user_message));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancellation_stops_the_pipeline(
    manager: PluginManager,
    log: CallLog,
    mut context: ConversationContext,
    user_message: Message,
) {
    register_all(
        &manager,
        vec![ScriptedPlugin::new("slow", Behaviour::Sleep(Duration::from_secs(30)), &log)],
    )
    .await;
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = manager
        .on_before_send(&user_message, &mut context, &cancel)
        .await;
    canceller.await.expect("canceller task should finish");

    assert!(matches!(
        result,
        Err(PipelineError::Cancelled { plugin_id }) if plugin_id.as_str() == "slow"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slow_interceptor_times_out(
    log: CallLog,
    mut context: ConversationContext,
    user_message: Message,
) {
    let manager = PluginManager::new(
        PluginManagerConfig::default().with_interceptor_timeout(Duration::from_millis(20)),
    );
    register_all(
        &manager,
        vec![
            ScriptedPlugin::new("slow", Behaviour::Sleep(Duration::from_secs(30)), &log),
            ScriptedPlugin::new("never", Behaviour::Append("!"), &log),
        ],
    )
    .await;

    let result = manager
        .on_before_send(&user_message, &mut context, &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(PipelineError::TimedOut { .. })));
    assert_eq!(log.entries(), ["slow:before"]);
}
