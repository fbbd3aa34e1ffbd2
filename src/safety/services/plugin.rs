//! The mental-health safety plugin.

use super::responses::{CrisisNotice, SafetyResponses};
use crate::conversation::domain::{ConversationContext, Message, PluginValue, Role};
use crate::plugin::domain::{
    ActionHandlerRef, InputExtension, InterceptResult, MessageAction, PluginId, PluginInfo,
    PluginSettings, SettingField, SettingFieldType,
};
use crate::plugin::ports::{MessageInterceptor, Plugin, PluginResult, UiExtension};
use crate::safety::domain::{
    AUTO_INTERVENE_SETTING, CrisisAnalysis, CrisisDetector, EscalationTracker, FALLBACK_REGION,
    HarmDetector, REGION_SETTING, Region, SENSITIVITY_SETTING, SafetyConfig, SafetyError,
    Sensitivity,
};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identifier of the safety plugin.
pub const SAFETY_PLUGIN_ID: &str = "mental-health-safety";

/// Pipeline priority of the safety plugin; it screens messages first and
/// replies last.
pub const SAFETY_PRIORITY: i64 = -1000;

/// Cancel reason reported when a crisis blocks the turn.
const CRISIS_CANCEL_REASON: &str = "Crisis intervention activated";

const REGION_NOTE: &str = "These are the default resources. Set your region in Settings > Plugins > Mental Health Safety to see local services.";

const SHOW_RESOURCES_ACTION: &str = "show-crisis-resources";

/// Plugin data key holding the latest distress level of the turn.
pub const DISTRESS_LEVEL_KEY: &str = "safety.distress_level";

/// Screens user messages for crisis signals and replies for harm.
///
/// Escalation state is tracked per conversation, so one instance can serve
/// every conversation in the process.
///
/// # Examples
///
/// ```
/// use aimate::conversation::domain::{ConversationContext, ConversationId, Message};
/// use aimate::plugin::ports::MessageInterceptor;
/// use aimate::safety::services::MentalHealthSafetyPlugin;
/// use mockable::DefaultClock;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let plugin = MentalHealthSafetyPlugin::with_defaults().expect("templates compile");
/// let mut context = ConversationContext::new(ConversationId::new());
/// let message = Message::user("I don't think I can do this anymore", &DefaultClock);
///
/// let result = plugin
///     .on_before_send(&message, &mut context)
///     .await
///     .expect("screening never fails");
///
/// assert!(!result.should_continue());
/// let reply = result.modified_message().expect("intervention message");
/// assert!(reply.content().contains("1737"));
/// # });
/// ```
pub struct MentalHealthSafetyPlugin<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    id: PluginId,
    info: PluginInfo,
    config: SafetyConfig,
    escalation: EscalationTracker<C>,
    responses: SafetyResponses,
    clock: Arc<C>,
}

impl MentalHealthSafetyPlugin<DefaultClock> {
    /// Creates the plugin with default configuration and the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyError`] if the response templates fail to compile.
    pub fn with_defaults() -> Result<Self, SafetyError> {
        Self::new(SafetyConfig::default(), Arc::new(DefaultClock))
    }
}

impl<C> MentalHealthSafetyPlugin<C>
where
    C: Clock + Send + Sync,
{
    /// Creates the plugin.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyError`] if the response templates fail to compile.
    pub fn new(config: SafetyConfig, clock: Arc<C>) -> Result<Self, SafetyError> {
        Ok(Self {
            id: PluginId::new(SAFETY_PLUGIN_ID)?,
            info: PluginInfo::new("Mental Health Safety Monitor", "1.0.0")
                .with_description("Detects and intervenes in mental health crises")
                .with_author("aiMate Team")
                .with_icon("HealthAndSafety"),
            config,
            escalation: EscalationTracker::new(Arc::clone(&clock)),
            responses: SafetyResponses::new()?,
            clock,
        })
    }

    /// Returns the host-level configuration.
    #[must_use]
    pub const fn config(&self) -> &SafetyConfig {
        &self.config
    }

    /// Returns the escalation tracker.
    #[must_use]
    pub const fn escalation(&self) -> &EscalationTracker<C> {
        &self.escalation
    }

    fn crisis_reply(
        &self,
        analysis: &CrisisAnalysis,
        context: &ConversationContext,
        config: &SafetyConfig,
    ) -> (Message, Region) {
        let (region, region_known) = resolve_region(config);
        let content = self.responses.crisis_intervention(CrisisNotice {
            resources: region.resources(),
            region_note: (!region_known).then_some(REGION_NOTE),
        });
        warn!(
            conversation_id = %context.conversation_id(),
            region = %region,
            triggers = ?analysis.triggers(),
            "crisis intervention activated"
        );
        (Message::assistant(content, self.clock.as_ref()), region)
    }
}

/// Picks the region chosen by the user's settings or the host, falling back
/// to [`FALLBACK_REGION`]. The flag reports whether anyone chose one.
fn resolve_region(config: &SafetyConfig) -> (Region, bool) {
    config
        .chosen_region()
        .map_or((FALLBACK_REGION, false), |region| (region, true))
}

fn triggers_value(analysis: &CrisisAnalysis) -> PluginValue {
    PluginValue::text_list(analysis.triggers().iter().cloned())
}

#[async_trait]
impl<C> Plugin for MentalHealthSafetyPlugin<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn id(&self) -> &PluginId {
        &self.id
    }

    fn info(&self) -> &PluginInfo {
        &self.info
    }

    fn priority(&self) -> Option<i64> {
        Some(SAFETY_PRIORITY)
    }

    async fn initialize(&self) -> PluginResult<()> {
        info!(
            regions = Region::ALL.len(),
            sensitivity = %self.config.sensitivity(),
            "safety monitoring active"
        );
        Ok(())
    }

    async fn dispose(&self) -> PluginResult<()> {
        self.escalation.clear();
        Ok(())
    }
}

#[async_trait]
impl<C> MessageInterceptor for MentalHealthSafetyPlugin<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn on_before_send(
        &self,
        message: &Message,
        context: &mut ConversationContext,
    ) -> PluginResult<InterceptResult> {
        let config = self.config.with_overrides(context.user_settings());
        let detected = CrisisDetector.analyze(message.content(), config.sensitivity());
        let (analysis, consecutive) =
            self.escalation
                .observe(context.conversation_id(), detected, config.sensitivity());
        context.set_plugin_data(DISTRESS_LEVEL_KEY, analysis.level().as_str());

        if analysis.is_critical() && config.auto_intervene() {
            let (reply, region) = self.crisis_reply(&analysis, context, &config);
            return Ok(InterceptResult::block(CRISIS_CANCEL_REASON, reply)
                .with_metadata("distress_level", analysis.level().as_str())
                .with_metadata("triggers", triggers_value(&analysis))
                .with_metadata("region", region.code())
                .with_metadata("consecutive_count", consecutive));
        }

        if analysis.is_critical() || analysis.is_elevated() {
            debug!(
                conversation_id = %context.conversation_id(),
                level = %analysis.level(),
                consecutive,
                "adding safety guidance"
            );
            let guided = self
                .responses
                .safety_guidance(analysis.triggers(), message.content());
            let mut result = InterceptResult::proceed_with(message.with_content(guided))
                .with_metadata("distress_level", analysis.level().as_str())
                .with_metadata("triggers", triggers_value(&analysis))
                .with_metadata("consecutive_count", consecutive);
            if analysis.is_critical() {
                warn!(
                    conversation_id = %context.conversation_id(),
                    "critical signal detected but auto-intervention is disabled"
                );
                result = result.with_metadata("intervention_suppressed", true);
            }
            return Ok(result);
        }

        let mut result = InterceptResult::proceed_with(message.clone());
        if !analysis.triggers().is_empty() {
            result = result
                .with_metadata("distress_level", analysis.level().as_str())
                .with_metadata("triggers", triggers_value(&analysis));
        }
        Ok(result)
    }

    async fn on_after_receive(
        &self,
        message: &Message,
        context: &mut ConversationContext,
    ) -> PluginResult<InterceptResult> {
        let analysis = HarmDetector.analyze(message.content());
        if !analysis.is_harmful() {
            return Ok(InterceptResult::proceed());
        }

        warn!(
            conversation_id = %context.conversation_id(),
            patterns = ?analysis.patterns(),
            "blocked harmful reply"
        );
        let corrected = message.with_content(self.responses.harm_block(analysis.patterns()));
        Ok(InterceptResult::proceed_with(corrected)
            .with_metadata("blocked_response", true)
            .with_metadata(
                "harm_patterns",
                PluginValue::text_list(analysis.patterns().iter().cloned()),
            )
            .with_metadata("original_blocked", message.content()))
    }
}

impl<C> UiExtension for MentalHealthSafetyPlugin<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn message_actions(&self, message: &Message) -> PluginResult<Vec<MessageAction>> {
        if message.role() != Role::User {
            return Ok(Vec::new());
        }
        Ok(vec![MessageAction {
            id: "crisis-help".to_owned(),
            label: "Get Crisis Support".to_owned(),
            icon: "LocalHospital".to_owned(),
            tooltip: "Access immediate crisis resources".to_owned(),
            handler: ActionHandlerRef::new(self.id.clone(), SHOW_RESOURCES_ACTION),
            show_on_user_messages: true,
            show_on_assistant_messages: false,
        }])
    }

    fn input_extensions(&self) -> PluginResult<Vec<InputExtension>> {
        Ok(vec![InputExtension {
            id: "crisis-resources".to_owned(),
            icon: "ContactSupport".to_owned(),
            tooltip: "Crisis support resources".to_owned(),
            handler: ActionHandlerRef::new(self.id.clone(), SHOW_RESOURCES_ACTION),
            order: 100,
        }])
    }

    fn settings_schema(&self) -> PluginResult<Option<PluginSettings>> {
        Ok(Some(PluginSettings::new(
            "Mental Health Safety",
            vec![
                SettingField::new(REGION_SETTING, "Your Region", SettingFieldType::Dropdown)
                    .with_default(self.config.default_region().code())
                    .with_options(Region::ALL.map(Region::code)),
                SettingField::new(
                    SENSITIVITY_SETTING,
                    "Detection Sensitivity",
                    SettingFieldType::Dropdown,
                )
                .with_default(self.config.sensitivity().as_str())
                .with_options(Sensitivity::ALL.map(Sensitivity::as_str)),
                SettingField::new(
                    AUTO_INTERVENE_SETTING,
                    "Auto-intervene on critical signals",
                    SettingFieldType::Boolean,
                )
                .with_default(self.config.auto_intervene()),
            ],
        )))
    }
}
