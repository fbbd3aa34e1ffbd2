//! Registration, lifecycle and event tests for the plugin manager.

use super::fixtures::{Behaviour, CallLog, ScriptedPlugin, log, manager};
use crate::plugin::domain::{PluginCapability, PluginEvent, PluginLifecycleState, PluginStage};
use crate::plugin::services::{
    PluginManager, PluginManagerError, PluginRegistration, RegistrationOutcome,
};
use rstest::rstest;
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_activates_plugin_and_records_capabilities(manager: PluginManager, log: CallLog) {
    let mut events = manager.subscribe();
    let outcome = manager
        .register(ScriptedPlugin::new("alpha", Behaviour::PassThrough, &log).registration())
        .await
        .expect("registration should succeed");

    assert_eq!(outcome, RegistrationOutcome::Registered);
    let record = manager.record("alpha").expect("alpha is registered");
    assert_eq!(record.state, PluginLifecycleState::Active);
    for capability in PluginCapability::ALL {
        assert!(record.capabilities.contains(capability));
    }
    assert!(matches!(
        events.try_recv(),
        Ok(PluginEvent::Loaded { plugin_id, .. }) if plugin_id.as_str() == "alpha"
    ));
}

#[rstest]
fn builder_exposes_only_declared_capabilities(log: CallLog) {
    let plugin = Arc::new(ScriptedPlugin::new("beta", Behaviour::PassThrough, &log));
    let registration = PluginRegistration::builder(plugin)
        .intercepts_messages()
        .provides_tools()
        .build();

    assert_eq!(registration.id().as_str(), "beta");
    assert!(registration.interceptor().is_some());
    assert!(registration.tool_provider().is_some());
    assert!(registration.ui_extension().is_none());
    let capabilities = registration.capabilities();
    assert!(capabilities.contains(PluginCapability::MessageInterceptor));
    assert!(capabilities.contains(PluginCapability::ToolProvider));
    assert!(!capabilities.contains(PluginCapability::UiExtension));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_registration_is_a_no_op(manager: PluginManager, log: CallLog) {
    manager
        .register(ScriptedPlugin::new("alpha", Behaviour::PassThrough, &log).registration())
        .await
        .expect("first registration should succeed");

    let outcome = manager
        .register(
            ScriptedPlugin::new("alpha", Behaviour::Append("!"), &log)
                .failing_initialize()
                .registration(),
        )
        .await
        .expect("duplicate registration is not an error");

    assert_eq!(outcome, RegistrationOutcome::AlreadyRegistered);
    assert_eq!(manager.plugins().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_initialisation_leaves_registry_untouched(manager: PluginManager, log: CallLog) {
    let mut events = manager.subscribe();
    let result = manager
        .register(
            ScriptedPlugin::new("broken", Behaviour::PassThrough, &log)
                .failing_initialize()
                .registration(),
        )
        .await;

    assert!(matches!(
        result,
        Err(PluginManagerError::Initialization { ref plugin_id, .. }) if plugin_id.as_str() == "broken"
    ));
    assert!(manager.plugins().is_empty());
    assert!(matches!(
        events.try_recv(),
        Ok(PluginEvent::Error { stage: PluginStage::Initialize, .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_all_continues_past_failures(manager: PluginManager, log: CallLog) {
    let report = manager
        .load_all([
            ScriptedPlugin::new("alpha", Behaviour::PassThrough, &log).registration(),
            ScriptedPlugin::new("broken", Behaviour::PassThrough, &log)
                .failing_initialize()
                .registration(),
            ScriptedPlugin::new("alpha", Behaviour::PassThrough, &log).registration(),
            ScriptedPlugin::new("beta", Behaviour::PassThrough, &log).registration(),
        ])
        .await;

    let registered: Vec<&str> = report.registered.iter().map(|id| id.as_str()).collect();
    assert_eq!(registered, ["alpha", "beta"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.failed.len(), 1);
    let listed: Vec<String> = manager
        .plugins()
        .into_iter()
        .map(|record| record.id.as_str().to_owned())
        .collect();
    assert_eq!(listed, ["alpha", "beta"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unregister_disposes_even_when_dispose_fails(manager: PluginManager, log: CallLog) {
    manager
        .register(
            ScriptedPlugin::new("alpha", Behaviour::PassThrough, &log)
                .failing_dispose()
                .registration(),
        )
        .await
        .expect("registration should succeed");
    let mut events = manager.subscribe();
    let plugin_id = manager.record("alpha").expect("registered").id;

    let record = manager
        .unregister(&plugin_id)
        .await
        .expect("alpha was registered");

    assert_eq!(record.state, PluginLifecycleState::Disposed);
    assert!(manager.plugin("alpha").is_none());
    assert!(manager.all_tools().is_empty());
    assert!(matches!(
        events.try_recv(),
        Ok(PluginEvent::Error { stage: PluginStage::Dispose, .. })
    ));
    assert!(matches!(events.try_recv(), Ok(PluginEvent::Unloaded { .. })));
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unregister_unknown_plugin_returns_none(manager: PluginManager, log: CallLog) {
    manager
        .register(ScriptedPlugin::new("alpha", Behaviour::PassThrough, &log).registration())
        .await
        .expect("registration should succeed");
    let stranger = crate::plugin::domain::PluginId::new("ghost").expect("valid plugin id");

    assert!(manager.unregister(&stranger).await.is_none());
    assert_eq!(manager.plugins().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn default_priority_follows_registration_sequence(manager: PluginManager, log: CallLog) {
    manager
        .load_all([
            ScriptedPlugin::new("first", Behaviour::PassThrough, &log).registration(),
            ScriptedPlugin::new("second", Behaviour::PassThrough, &log)
                .with_priority(-10)
                .registration(),
        ])
        .await;

    let priorities: Vec<(String, i64)> = manager
        .plugins()
        .into_iter()
        .map(|record| (record.id.as_str().to_owned(), record.priority))
        .collect();
    assert_eq!(
        priorities,
        [("first".to_owned(), 0), ("second".to_owned(), -10)]
    );
}
