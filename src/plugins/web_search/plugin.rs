//! The web search plugin.

use super::search::{SearchProvider, SearchResult, StaticSearchProvider};
use crate::conversation::domain::{
    ConversationContext, Message, PluginValue, PluginValueKind, Role,
};
use crate::plugin::domain::{
    ActionHandlerRef, InputExtension, InterceptResult, MessageAction, PluginDomainError, PluginId,
    PluginInfo, PluginSettings, PluginTool, SettingField, SettingFieldType, ToolParameter,
    ToolParameters, ToolResult,
};
use crate::plugin::ports::{
    MessageInterceptor, Plugin, PluginError, PluginResult, ToolProvider, UiExtension,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identifier of the web search plugin.
pub const WEB_SEARCH_PLUGIN_ID: &str = "web-search";

const RESULTS_MARKER: &str = "[WEB_SEARCH_RESULTS]";
const SEARCH_TOOL: &str = "web_search";
const AUTO_SEARCH_SETTING: &str = "auto_search";
const MAX_RESULTS_SETTING: &str = "max_results";
const DEFAULT_RESULTS: u32 = 5;
const RESULTS_CAP: u32 = 20;
const MAX_QUERY_CHARS: usize = 100;

const SEARCH_TRIGGERS: &[&str] = &[
    "latest",
    "current",
    "recent",
    "today",
    "news",
    "what's happening",
    "what happened",
    "what is the",
    "who won",
    "who is the",
    "when did",
];

/// Appends web search results to questions about current information.
///
/// Messages already carrying a results block are left alone, so a message
/// rewritten once is never searched twice.
pub struct WebSearchPlugin<S = StaticSearchProvider>
where
    S: SearchProvider,
{
    id: PluginId,
    info: PluginInfo,
    provider: Arc<S>,
}

impl<S> WebSearchPlugin<S>
where
    S: SearchProvider,
{
    /// Creates the plugin over a search provider.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError`] if the plugin identifier is invalid.
    pub fn new(provider: Arc<S>) -> Result<Self, PluginDomainError> {
        Ok(Self {
            id: PluginId::new(WEB_SEARCH_PLUGIN_ID)?,
            info: PluginInfo::new("Web Search", "1.0.0")
                .with_description("Search the web for current information")
                .with_author("aiMate Team")
                .with_icon("Search"),
            provider,
        })
    }

    fn action(&self, action: &str) -> ActionHandlerRef {
        ActionHandlerRef::new(self.id.clone(), action)
    }
}

fn needs_search(content: &str) -> bool {
    let lowered = content.to_lowercase();
    !content.contains(RESULTS_MARKER)
        && SEARCH_TRIGGERS
            .iter()
            .any(|trigger| lowered.contains(trigger))
}

fn search_query(content: &str) -> String {
    content
        .chars()
        .take(MAX_QUERY_CHARS)
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Whole number of results wanted, between one and the cap.
fn result_limit(requested: Option<f64>) -> usize {
    let wanted = requested.unwrap_or_else(|| f64::from(DEFAULT_RESULTS));
    (1..=RESULTS_CAP)
        .take_while(|count| f64::from(*count) <= wanted)
        .count()
        .max(1)
}

fn format_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .zip(1_u32..)
        .map(|(result, rank)| {
            format!(
                "[{rank}] {}\n{}\nSource: {}\nURL: {}",
                result.title, result.snippet, result.source, result.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn count(results: &[SearchResult]) -> u32 {
    u32::try_from(results.len()).unwrap_or(u32::MAX)
}

#[async_trait]
impl<S> Plugin for WebSearchPlugin<S>
where
    S: SearchProvider + 'static,
{
    fn id(&self) -> &PluginId {
        &self.id
    }

    fn info(&self) -> &PluginInfo {
        &self.info
    }
}

#[async_trait]
impl<S> MessageInterceptor for WebSearchPlugin<S>
where
    S: SearchProvider + 'static,
{
    async fn on_before_send(
        &self,
        message: &Message,
        context: &mut ConversationContext,
    ) -> PluginResult<InterceptResult> {
        let enabled = context
            .user_setting(AUTO_SEARCH_SETTING)
            .and_then(PluginValue::as_bool)
            .unwrap_or(true);
        if !enabled || !needs_search(message.content()) {
            return Ok(InterceptResult::proceed());
        }

        let query = search_query(message.content());
        let limit = result_limit(
            context
                .user_setting(MAX_RESULTS_SETTING)
                .and_then(PluginValue::as_f64),
        );
        let results = match self.provider.search(&query, limit).await {
            Ok(found) => found,
            Err(err) => {
                warn!(error = %err, "web search failed; sending message unchanged");
                return Ok(InterceptResult::proceed());
            }
        };
        if results.is_empty() {
            debug!(query = %query, "web search returned nothing");
            return Ok(InterceptResult::proceed());
        }

        let enhanced = format!(
            "{}\n\n{RESULTS_MARKER}\n{}\n\nPlease use the above web search results to answer the question accurately with current information.",
            message.content(),
            format_results(&results)
        );
        debug!(query = %query, results = results.len(), "web search results appended");
        Ok(InterceptResult::proceed_with(message.with_content(enhanced))
            .with_metadata("search_query", query)
            .with_metadata("results_count", count(&results))
            .with_metadata("search_performed", true))
    }

    async fn on_after_receive(
        &self,
        _message: &Message,
        _context: &mut ConversationContext,
    ) -> PluginResult<InterceptResult> {
        Ok(InterceptResult::proceed())
    }
}

impl<S> UiExtension for WebSearchPlugin<S>
where
    S: SearchProvider + 'static,
{
    fn message_actions(&self, message: &Message) -> PluginResult<Vec<MessageAction>> {
        let action = match message.role() {
            Role::User => MessageAction {
                id: "search-web".to_owned(),
                label: "Search Web".to_owned(),
                icon: "Search".to_owned(),
                tooltip: "Search web for this query".to_owned(),
                handler: self.action("search-web"),
                show_on_user_messages: true,
                show_on_assistant_messages: false,
            },
            Role::Assistant => MessageAction {
                id: "verify-facts".to_owned(),
                label: "Verify".to_owned(),
                icon: "FactCheck".to_owned(),
                tooltip: "Verify facts with web search".to_owned(),
                handler: self.action("verify-facts"),
                show_on_user_messages: false,
                show_on_assistant_messages: true,
            },
            Role::System => return Ok(Vec::new()),
        };
        Ok(vec![action])
    }

    fn input_extensions(&self) -> PluginResult<Vec<InputExtension>> {
        Ok(vec![InputExtension {
            id: "quick-search".to_owned(),
            icon: "TravelExplore".to_owned(),
            tooltip: "Quick web search".to_owned(),
            handler: self.action("quick-search"),
            order: 20,
        }])
    }

    fn settings_schema(&self) -> PluginResult<Option<PluginSettings>> {
        Ok(Some(PluginSettings::new(
            "Web Search Settings",
            vec![
                SettingField::new(
                    AUTO_SEARCH_SETTING,
                    "Auto-search for current info",
                    SettingFieldType::Boolean,
                )
                .with_default(true),
                SettingField::new(
                    "search_provider",
                    "Search Provider",
                    SettingFieldType::Dropdown,
                )
                .with_default("Google")
                .with_options(["Google", "Bing", "DuckDuckGo"]),
                SettingField::new(MAX_RESULTS_SETTING, "Max Results", SettingFieldType::Number)
                    .with_default(DEFAULT_RESULTS),
                SettingField::new("api_key", "API Key", SettingFieldType::Text)
                    .with_placeholder("Enter your search API key"),
            ],
        )))
    }
}

#[async_trait]
impl<S> ToolProvider for WebSearchPlugin<S>
where
    S: SearchProvider + 'static,
{
    fn tools(&self) -> PluginResult<Vec<PluginTool>> {
        Ok(vec![
            PluginTool::new(SEARCH_TOOL, "Search the web for current information")?
                .with_parameter(ToolParameter::required(
                    "query",
                    "Search query",
                    PluginValueKind::Text,
                )?)
                .with_parameter(ToolParameter::optional(
                    "num_results",
                    "Number of results to return",
                    PluginValueKind::Number,
                    Some(PluginValue::from(DEFAULT_RESULTS)),
                )?),
        ])
    }

    async fn execute_tool(
        &self,
        tool_name: &str,
        parameters: ToolParameters,
    ) -> PluginResult<ToolResult> {
        if tool_name != SEARCH_TOOL {
            return Err(PluginError::UnknownTool(tool_name.to_owned()));
        }
        let query = parameters
            .get("query")
            .and_then(PluginValue::as_str)
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .ok_or_else(|| PluginError::InvalidInput("query must not be blank".to_owned()))?;
        let limit = result_limit(parameters.get("num_results").and_then(PluginValue::as_f64));

        let results = self
            .provider
            .search(query, limit)
            .await
            .map_err(PluginError::runtime)?;
        info!(query, results = results.len(), "web search tool ran");
        let listed: Vec<PluginValue> = results.iter().map(SearchResult::to_value).collect();
        Ok(ToolResult::success(listed)
            .with_metadata("query", query)
            .with_metadata("results_count", count(&results)))
    }
}
