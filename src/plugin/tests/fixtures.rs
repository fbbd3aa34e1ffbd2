//! Scripted plugins used across the plugin service tests.

use crate::conversation::domain::{
    ConversationContext, ConversationId, Message, PluginValue, PluginValueKind,
};
use crate::plugin::domain::{
    ActionHandlerRef, InputExtension, InterceptResult, MessageAction, PluginId, PluginInfo,
    PluginSettings, PluginTool, SettingField, SettingFieldType, ToolParameter, ToolParameters,
    ToolResult,
};
use crate::plugin::ports::{
    MessageInterceptor, Plugin, PluginError, PluginResult, ToolProvider, UiExtension,
};
use crate::plugin::services::{PluginManager, PluginRegistration};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// What a scripted interceptor does when called.
#[derive(Debug, Clone)]
pub(super) enum Behaviour {
    PassThrough,
    Append(&'static str),
    Block(&'static str),
    Fail,
    Panic,
    Sleep(Duration),
}

/// Shared record of interceptor calls, as `"<plugin>:<stage>"`.
#[derive(Debug, Clone, Default)]
pub(super) struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    fn push(&self, entry: String) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    pub(super) fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

pub(super) struct ScriptedPlugin {
    id: PluginId,
    info: PluginInfo,
    priority: Option<i64>,
    behaviour: Behaviour,
    log: CallLog,
    fail_initialize: bool,
    fail_dispose: bool,
    fail_ui: bool,
    input_order: i32,
}

impl ScriptedPlugin {
    pub(super) fn new(id: &str, behaviour: Behaviour, log: &CallLog) -> Self {
        Self {
            id: PluginId::new(id).expect("valid plugin id"),
            info: PluginInfo::new(format!("Scripted {id}"), "1.0.0"),
            priority: None,
            behaviour,
            log: log.clone(),
            fail_initialize: false,
            fail_dispose: false,
            fail_ui: false,
            input_order: 50,
        }
    }

    pub(super) const fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub(super) const fn failing_initialize(mut self) -> Self {
        self.fail_initialize = true;
        self
    }

    pub(super) const fn failing_dispose(mut self) -> Self {
        self.fail_dispose = true;
        self
    }

    pub(super) const fn failing_ui(mut self) -> Self {
        self.fail_ui = true;
        self
    }

    pub(super) const fn with_input_order(mut self, order: i32) -> Self {
        self.input_order = order;
        self
    }

    pub(super) fn registration(self) -> PluginRegistration {
        PluginRegistration::builder(Arc::new(self))
            .intercepts_messages()
            .extends_ui()
            .provides_tools()
            .build()
    }

    async fn apply(&self, stage: &str, message: &Message) -> PluginResult<InterceptResult> {
        self.log.push(format!("{}:{stage}", self.id));
        match &self.behaviour {
            Behaviour::PassThrough => Ok(InterceptResult::proceed()),
            Behaviour::Append(suffix) => Ok(InterceptResult::proceed_with(
                message.with_content(format!("{}{suffix}", message.content())),
            )
            .with_metadata(format!("{}.seen", self.id), true)),
            Behaviour::Block(reason) => Ok(InterceptResult::block(
                *reason,
                Message::assistant(format!("blocked by {}", self.id), &DefaultClock),
            )),
            Behaviour::Fail => Err(PluginError::InvalidInput("scripted failure".to_owned())),
            Behaviour::Panic => panic!("scripted panic in {}", self.id),
            Behaviour::Sleep(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(InterceptResult::proceed())
            }
        }
    }

    fn handler(&self, action: &str) -> ActionHandlerRef {
        ActionHandlerRef::new(self.id.clone(), action)
    }
}

#[async_trait]
impl Plugin for ScriptedPlugin {
    fn id(&self) -> &PluginId {
        &self.id
    }

    fn info(&self) -> &PluginInfo {
        &self.info
    }

    fn priority(&self) -> Option<i64> {
        self.priority
    }

    async fn initialize(&self) -> PluginResult<()> {
        if self.fail_initialize {
            return Err(PluginError::Initialization("scripted".to_owned()));
        }
        Ok(())
    }

    async fn dispose(&self) -> PluginResult<()> {
        if self.fail_dispose {
            return Err(PluginError::InvalidInput("dispose refused".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageInterceptor for ScriptedPlugin {
    async fn on_before_send(
        &self,
        message: &Message,
        _context: &mut ConversationContext,
    ) -> PluginResult<InterceptResult> {
        self.apply("before", message).await
    }

    async fn on_after_receive(
        &self,
        message: &Message,
        _context: &mut ConversationContext,
    ) -> PluginResult<InterceptResult> {
        self.apply("after", message).await
    }
}

impl UiExtension for ScriptedPlugin {
    fn message_actions(&self, _message: &Message) -> PluginResult<Vec<MessageAction>> {
        if self.fail_ui {
            return Err(PluginError::InvalidInput("ui refused".to_owned()));
        }
        Ok(vec![MessageAction {
            id: format!("{}-action", self.id),
            label: "Act".to_owned(),
            icon: "Bolt".to_owned(),
            tooltip: "Scripted action".to_owned(),
            handler: self.handler("act"),
            show_on_user_messages: true,
            show_on_assistant_messages: false,
        }])
    }

    fn input_extensions(&self) -> PluginResult<Vec<InputExtension>> {
        if self.fail_ui {
            return Err(PluginError::InvalidInput("ui refused".to_owned()));
        }
        Ok(vec![InputExtension {
            id: format!("{}-input", self.id),
            icon: "Bolt".to_owned(),
            tooltip: "Scripted input".to_owned(),
            handler: self.handler("input"),
            order: self.input_order,
        }])
    }

    fn settings_schema(&self) -> PluginResult<Option<PluginSettings>> {
        if self.fail_ui {
            panic!("settings exploded");
        }
        Ok(Some(PluginSettings::new(
            self.info.name(),
            vec![
                SettingField::new("enabled", "Enabled", SettingFieldType::Boolean)
                    .with_default(true),
            ],
        )))
    }

    fn render_custom_content(&self, message: &Message) -> PluginResult<Option<String>> {
        Ok(Some(format!("<span>{}</span>", message.content().len())))
    }
}

#[async_trait]
impl ToolProvider for ScriptedPlugin {
    fn tools(&self) -> PluginResult<Vec<PluginTool>> {
        Ok(vec![
            PluginTool::new("echo", "Repeats text")?
                .with_parameter(ToolParameter::required(
                    "text",
                    "Text to repeat",
                    PluginValueKind::Text,
                )?)
                .with_parameter(ToolParameter::optional(
                    "times",
                    "Repetitions",
                    PluginValueKind::Number,
                    Some(PluginValue::from(2)),
                )?),
            PluginTool::new("broken", "Always fails")?,
            PluginTool::new("explode", "Always panics")?,
        ])
    }

    async fn execute_tool(
        &self,
        tool_name: &str,
        parameters: ToolParameters,
    ) -> PluginResult<ToolResult> {
        match tool_name {
            "echo" => {
                let text = parameters
                    .get("text")
                    .and_then(|value| value.as_str())
                    .unwrap_or_default();
                let times = parameters
                    .get("times")
                    .and_then(|value| value.as_f64())
                    .unwrap_or(1.0);
                Ok(ToolResult::success(format!("{text} x{times}")).with_metadata("times", times))
            }
            "broken" => Err(PluginError::InvalidInput("tool refused".to_owned())),
            "explode" => panic!("tool exploded"),
            other => Err(PluginError::UnknownTool(other.to_owned())),
        }
    }
}

#[fixture]
pub(super) fn log() -> CallLog {
    CallLog::default()
}

#[fixture]
pub(super) fn manager() -> PluginManager {
    PluginManager::default()
}

#[fixture]
pub(super) fn context() -> ConversationContext {
    ConversationContext::new(ConversationId::new())
}

#[fixture]
pub(super) fn user_message() -> Message {
    Message::user("hello", &DefaultClock)
}
