//! Tool discovery and dispatch through the plugin manager.

use super::fixtures::{Behaviour, CallLog, ScriptedPlugin, log, manager};
use crate::conversation::domain::PluginValue;
use crate::plugin::domain::ToolParameters;
use crate::plugin::services::PluginManager;
use rstest::{fixture, rstest};

#[fixture]
async fn loaded(manager: PluginManager, log: CallLog) -> PluginManager {
    manager
        .register(ScriptedPlugin::new("toolbox", Behaviour::PassThrough, &log).registration())
        .await
        .expect("registration should succeed");
    manager
}

fn text_argument(text: &str) -> ToolParameters {
    ToolParameters::from([("text".to_owned(), PluginValue::from(text))])
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn all_tools_lists_owner_and_tool(#[future] loaded: PluginManager) {
    let manager = loaded.await;
    let tools = manager.all_tools();

    let names: Vec<&str> = tools.iter().map(|entry| entry.tool.name()).collect();
    assert_eq!(names, ["echo", "broken", "explode"]);
    assert!(tools.iter().all(|entry| entry.plugin_id.as_str() == "toolbox"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn execute_tool_fills_defaults(#[future] loaded: PluginManager) {
    let manager = loaded.await;
    let result = manager
        .execute_tool("toolbox", "echo", text_argument("hi"))
        .await;

    assert!(result.is_success());
    assert_eq!(result.result(), Some(&PluginValue::from("hi x2")));
    assert_eq!(result.metadata().get("times"), Some(&PluginValue::Number(2.0)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn execute_tool_reports_unknown_plugin(#[future] loaded: PluginManager) {
    let manager = loaded.await;
    let result = manager
        .execute_tool("missing", "echo", text_argument("hi"))
        .await;

    assert!(!result.is_success());
    assert_eq!(result.error(), Some("plugin missing not found"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn execute_tool_reports_unknown_tool(#[future] loaded: PluginManager) {
    let manager = loaded.await;
    let result = manager
        .execute_tool("toolbox", "teleport", ToolParameters::new())
        .await;

    assert_eq!(result.error(), Some("tool teleport not found in plugin toolbox"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn execute_tool_rejects_missing_required_parameter(#[future] loaded: PluginManager) {
    let manager = loaded.await;
    let result = manager
        .execute_tool("toolbox", "echo", ToolParameters::new())
        .await;

    assert!(!result.is_success());
    assert!(result.error().is_some_and(|error| error.contains("text")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn execute_tool_rejects_type_mismatch(#[future] loaded: PluginManager) {
    let manager = loaded.await;
    let parameters = ToolParameters::from([("text".to_owned(), PluginValue::from(true))]);
    let result = manager.execute_tool("toolbox", "echo", parameters).await;

    assert!(!result.is_success());
}

#[rstest]
#[case("broken", "tool refused")]
#[case("explode", "tool exploded")]
#[tokio::test(flavor = "multi_thread")]
async fn execute_tool_wraps_errors_and_panics(
    #[case] tool: &str,
    #[case] expected: &str,
    #[future] loaded: PluginManager,
) {
    let manager = loaded.await;
    let result = manager
        .execute_tool("toolbox", tool, ToolParameters::new())
        .await;

    assert!(!result.is_success());
    assert!(
        result.error().is_some_and(|error| error.contains(expected)),
        "unexpected error: {:?}",
        result.error()
    );
}
