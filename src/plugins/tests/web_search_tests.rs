//! Search enrichment, UI and tool behaviour of the web search plugin.

use crate::conversation::domain::{
    ConversationContext, ConversationId, Message, PluginValue, Role,
};
use crate::plugin::domain::ToolParameters;
use crate::plugin::ports::{MessageInterceptor, UiExtension};
use crate::plugin::services::{PluginManager, PluginRegistration};
use crate::plugins::web_search::{
    MockSearchProvider, SearchError, SearchResult, StaticSearchProvider, WebSearchPlugin,
};
use crate::test_support::ManualClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn clock() -> ManualClock {
    ManualClock::default()
}

#[fixture]
fn context() -> ConversationContext {
    ConversationContext::new(ConversationId::new())
}

#[fixture]
fn plugin() -> WebSearchPlugin {
    WebSearchPlugin::new(Arc::new(StaticSearchProvider::default())).expect("valid plugin id")
}

fn mocked(provider: MockSearchProvider) -> WebSearchPlugin<MockSearchProvider> {
    WebSearchPlugin::new(Arc::new(provider)).expect("valid plugin id")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn appends_results_to_current_event_questions(
    plugin: WebSearchPlugin,
    clock: ManualClock,
    mut context: ConversationContext,
) {
    let message = Message::user("What's the latest Rust release?", &clock);

    let result = plugin
        .on_before_send(&message, &mut context)
        .await
        .expect("search never fails the turn");

    let enhanced = result.modified_message().expect("message enriched");
    assert!(enhanced.content().starts_with("What's the latest Rust release?\n\n[WEB_SEARCH_RESULTS]"));
    assert!(enhanced.content().contains("[1] Example Result 1\n"));
    assert!(enhanced.content().contains("URL: https://example.com/2"));
    assert_eq!(enhanced.id(), message.id());
    assert_eq!(
        result.metadata().get("results_count"),
        Some(&PluginValue::from(2_u32))
    );
    assert_eq!(
        result.metadata().get("search_performed"),
        Some(&PluginValue::from(true))
    );
}

#[rstest]
#[case("Tell me a story about a lighthouse")]
#[case("[WEB_SEARCH_RESULTS] already searched the latest news")]
#[tokio::test(flavor = "multi_thread")]
async fn leaves_other_messages_alone(
    plugin: WebSearchPlugin,
    clock: ManualClock,
    mut context: ConversationContext,
    #[case] content: &str,
) {
    let message = Message::user(content, &clock);

    let result = plugin
        .on_before_send(&message, &mut context)
        .await
        .expect("search never fails the turn");

    assert!(result.should_continue());
    assert!(result.modified_message().is_none());
    assert!(result.metadata().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn auto_search_setting_disables_enrichment(plugin: WebSearchPlugin, clock: ManualClock) {
    let mut context = ConversationContext::new(ConversationId::new())
        .with_user_setting("auto_search", false);
    let message = Message::user("Who won the match today?", &clock);

    let result = plugin
        .on_before_send(&message, &mut context)
        .await
        .expect("search never fails the turn");

    assert!(result.modified_message().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn passes_truncated_query_and_configured_limit(clock: ManualClock) {
    let mut provider = MockSearchProvider::new();
    provider
        .expect_search()
        .withf(|query, limit| query.chars().count() == 100 && *limit == 3)
        .times(1)
        .returning(|_, _| {
            Ok(vec![SearchResult::new(
                "Release notes",
                "https://blog.rust-lang.org",
                "Rust 1.90 is out",
                "blog.rust-lang.org",
            )])
        });
    let plugin = mocked(provider);
    let mut context = ConversationContext::new(ConversationId::new())
        .with_user_setting("max_results", 3_u32);
    let long_question = format!("What is the latest news about {}", "x".repeat(200));
    let message = Message::user(long_question, &clock);

    let result = plugin
        .on_before_send(&message, &mut context)
        .await
        .expect("search never fails the turn");

    assert_eq!(
        result.metadata().get("results_count"),
        Some(&PluginValue::from(1_u32))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn provider_failure_sends_message_unchanged(
    clock: ManualClock,
    mut context: ConversationContext,
) {
    let mut provider = MockSearchProvider::new();
    provider
        .expect_search()
        .returning(|_, _| Err(SearchError::Unavailable("rate limited".to_owned())));
    let plugin = mocked(provider);
    let message = Message::user("What happened in the news today?", &clock);

    let result = plugin
        .on_before_send(&message, &mut context)
        .await
        .expect("search never fails the turn");

    assert!(result.should_continue());
    assert!(result.modified_message().is_none());
}

#[rstest]
fn actions_depend_on_message_role(plugin: WebSearchPlugin, clock: ManualClock) {
    let user = plugin
        .message_actions(&Message::user("hi", &clock))
        .expect("actions");
    let assistant = plugin
        .message_actions(&Message::assistant("hello", &clock))
        .expect("actions");
    let system = plugin
        .message_actions(&Message::new(Role::System, "setup", &clock))
        .expect("actions");

    assert_eq!(user.first().map(|action| action.id.as_str()), Some("search-web"));
    assert_eq!(
        assistant.first().map(|action| action.id.as_str()),
        Some("verify-facts")
    );
    assert!(system.is_empty());
}

async fn manager_with(plugin: WebSearchPlugin<MockSearchProvider>) -> PluginManager {
    let manager = PluginManager::default();
    manager
        .register(
            PluginRegistration::builder(Arc::new(plugin))
                .intercepts_messages()
                .provides_tools()
                .build(),
        )
        .await
        .expect("registration succeeds");
    manager
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_tool_uses_default_result_count() {
    let mut provider = MockSearchProvider::new();
    provider
        .expect_search()
        .withf(|query, limit| query == "rust async" && *limit == 5)
        .times(1)
        .returning(|_, _| {
            Ok(vec![SearchResult::new(
                "Async book",
                "https://rust-lang.github.io/async-book",
                "Asynchronous programming in Rust",
                "rust-lang.github.io",
            )])
        });
    let manager = manager_with(mocked(provider)).await;
    let arguments = ToolParameters::from([("query".to_owned(), PluginValue::from("rust async"))]);

    let result = manager.execute_tool("web-search", "web_search", arguments).await;

    assert!(result.is_success());
    let listed = result
        .result()
        .and_then(PluginValue::as_list)
        .expect("list of results");
    assert_eq!(listed.len(), 1);
    assert_eq!(
        listed
            .first()
            .and_then(PluginValue::as_map)
            .and_then(|hit| hit.get("title")),
        Some(&PluginValue::from("Async book"))
    );
    assert_eq!(
        result.metadata().get("query"),
        Some(&PluginValue::from("rust async"))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_tool_wraps_provider_errors() {
    let mut provider = MockSearchProvider::new();
    provider
        .expect_search()
        .returning(|_, _| Err(SearchError::Unavailable("offline".to_owned())));
    let manager = manager_with(mocked(provider)).await;
    let arguments = ToolParameters::from([("query".to_owned(), PluginValue::from("rust"))]);

    let result = manager.execute_tool("web-search", "web_search", arguments).await;

    assert!(!result.is_success());
    assert!(result.error().is_some_and(|error| error.contains("offline")));
}
