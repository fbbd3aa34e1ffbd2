//! The code generator plugin.

use super::scaffold::{ScaffoldError, StructScaffold};
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
use tracing::{debug, info};

/// Identifier of the code generator plugin.
pub const CODE_GENERATOR_PLUGIN_ID: &str = "code-generator";

const STRUCT_TOOL: &str = "generate_struct";
const AUTO_ENHANCE_SETTING: &str = "auto_enhance";
const DEFAULT_DERIVES: &str = "Debug, Clone";
const CODE_FENCES: &[&str] = &["```rust", "```rs"];
const REQUEST_TRIGGERS: &[&str] = &["generate code", "write a function"];

const GUIDANCE: &str = "[Code Generation Instructions]
- Use Rust (2024 edition)
- Follow idiomatic style and keep clippy quiet
- Document public items
- Return Result for fallible operations instead of panicking
- Make it production-ready";

/// Sharpens code requests and scaffolds Rust structs.
pub struct CodeGeneratorPlugin {
    id: PluginId,
    info: PluginInfo,
}

impl CodeGeneratorPlugin {
    /// Creates the plugin.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError`] if the plugin identifier is invalid.
    pub fn new() -> Result<Self, PluginDomainError> {
        Ok(Self {
            id: PluginId::new(CODE_GENERATOR_PLUGIN_ID)?,
            info: PluginInfo::new("Rust Code Generator", "1.0.0")
                .with_description("Generates Rust code from natural language descriptions")
                .with_author("aiMate Team")
                .with_icon("Code"),
        })
    }

    fn action(&self, action: &str) -> ActionHandlerRef {
        ActionHandlerRef::new(self.id.clone(), action)
    }
}

fn contains_code(content: &str) -> bool {
    CODE_FENCES.iter().any(|fence| content.contains(fence))
}

fn text_argument<'a>(parameters: &'a ToolParameters, name: &str) -> PluginResult<&'a str> {
    parameters
        .get(name)
        .and_then(PluginValue::as_str)
        .ok_or_else(|| PluginError::InvalidInput(format!("{name} must be text")))
}

impl From<ScaffoldError> for PluginError {
    fn from(err: ScaffoldError) -> Self {
        match err {
            ScaffoldError::Render(_) => Self::runtime(err),
            other => Self::InvalidInput(other.to_string()),
        }
    }
}

#[async_trait]
impl Plugin for CodeGeneratorPlugin {
    fn id(&self) -> &PluginId {
        &self.id
    }

    fn info(&self) -> &PluginInfo {
        &self.info
    }
}

#[async_trait]
impl MessageInterceptor for CodeGeneratorPlugin {
    async fn on_before_send(
        &self,
        message: &Message,
        context: &mut ConversationContext,
    ) -> PluginResult<InterceptResult> {
        let enabled = context
            .user_setting(AUTO_ENHANCE_SETTING)
            .and_then(PluginValue::as_bool)
            .unwrap_or(true);
        let lowered = message.content().to_lowercase();
        if !enabled
            || message.content().contains(GUIDANCE)
            || !REQUEST_TRIGGERS
                .iter()
                .any(|trigger| lowered.contains(trigger))
        {
            return Ok(InterceptResult::proceed());
        }

        debug!("code request enhanced");
        let enhanced = format!("{}\n\n{GUIDANCE}", message.content());
        Ok(InterceptResult::proceed_with(message.with_content(enhanced))
            .with_metadata("enhanced_by", self.id.as_str())
            .with_metadata("original_content", message.content()))
    }

    async fn on_after_receive(
        &self,
        message: &Message,
        _context: &mut ConversationContext,
    ) -> PluginResult<InterceptResult> {
        if !contains_code(message.content()) {
            return Ok(InterceptResult::proceed());
        }
        debug!("reply contains Rust code");
        Ok(InterceptResult::proceed()
            .with_metadata("contains_code", true)
            .with_metadata("code_language", "rust"))
    }
}

impl UiExtension for CodeGeneratorPlugin {
    fn message_actions(&self, message: &Message) -> PluginResult<Vec<MessageAction>> {
        if message.role() != Role::Assistant || !contains_code(message.content()) {
            return Ok(Vec::new());
        }
        Ok(vec![
            MessageAction {
                id: "copy-code".to_owned(),
                label: "Copy Code".to_owned(),
                icon: "ContentCopy".to_owned(),
                tooltip: "Copy the Rust code to the clipboard".to_owned(),
                handler: self.action("copy-code"),
                show_on_user_messages: false,
                show_on_assistant_messages: true,
            },
            MessageAction {
                id: "save-code".to_owned(),
                label: "Save to File".to_owned(),
                icon: "Save".to_owned(),
                tooltip: "Save code to a .rs file".to_owned(),
                handler: self.action("save-code"),
                show_on_user_messages: false,
                show_on_assistant_messages: true,
            },
        ])
    }

    fn input_extensions(&self) -> PluginResult<Vec<InputExtension>> {
        Ok(vec![InputExtension {
            id: "quick-code".to_owned(),
            icon: "Code".to_owned(),
            tooltip: "Generate code from template".to_owned(),
            handler: self.action("quick-code"),
            order: 10,
        }])
    }

    fn settings_schema(&self) -> PluginResult<Option<PluginSettings>> {
        Ok(Some(PluginSettings::new(
            "Code Generator Settings",
            vec![
                SettingField::new(
                    AUTO_ENHANCE_SETTING,
                    "Auto-enhance code prompts",
                    SettingFieldType::Boolean,
                )
                .with_default(true),
                SettingField::new("edition", "Rust Edition", SettingFieldType::Dropdown)
                    .with_default("2024")
                    .with_options(["2024", "2021", "2018"]),
                SettingField::new("derives", "Default Derives", SettingFieldType::Text)
                    .with_default(DEFAULT_DERIVES),
            ],
        )))
    }
}

#[async_trait]
impl ToolProvider for CodeGeneratorPlugin {
    fn tools(&self) -> PluginResult<Vec<PluginTool>> {
        Ok(vec![
            PluginTool::new(STRUCT_TOOL, "Generate a Rust struct with public fields")?
                .with_parameter(ToolParameter::required(
                    "struct_name",
                    "Name of the struct to generate",
                    PluginValueKind::Text,
                )?)
                .with_parameter(ToolParameter::required(
                    "fields",
                    "Fields as a JSON array of {\"name\", \"type\"} objects",
                    PluginValueKind::Text,
                )?)
                .with_parameter(ToolParameter::optional(
                    "derives",
                    "Comma-separated derive macros",
                    PluginValueKind::Text,
                    Some(PluginValue::from(DEFAULT_DERIVES)),
                )?),
        ])
    }

    async fn execute_tool(
        &self,
        tool_name: &str,
        parameters: ToolParameters,
    ) -> PluginResult<ToolResult> {
        if tool_name != STRUCT_TOOL {
            return Err(PluginError::UnknownTool(tool_name.to_owned()));
        }
        let scaffold = StructScaffold::parse(
            text_argument(&parameters, "struct_name")?,
            text_argument(&parameters, "fields")?,
            text_argument(&parameters, "derives")?,
        )?;
        let source = scaffold.render()?;
        info!(struct_name = scaffold.name(), fields = scaffold.fields().len(), "struct generated");
        Ok(ToolResult::success(source)
            .with_metadata("language", "rust")
            .with_metadata("struct_name", scaffold.name()))
    }
}
