//! Rendering of intervention, guidance and corrective messages.

use crate::safety::domain::{CrisisResources, SafetyError};
use minijinja::{Environment, context};
use tracing::warn;

const CRISIS_TEMPLATE: &str = "crisis_intervention.md";
const GUIDANCE_TEMPLATE: &str = "safety_guidance.md";
const HARM_TEMPLATE: &str = "harm_block.md";

const CRISIS_SOURCE: &str = r"## Crisis Support Activated

It sounds like you may be going through something really painful. **You are not alone, and help is available right now.**

### Immediate Support ({{ resources.name }})

{% for line in resources.hotlines -%}
- **{{ line.number }}** ({{ line.name }}) - {{ line.available }}{% if line.can_text %}, call or text{% endif %}
{% endfor %}
{%- if resources.web_chats %}
**Online chat:**
{% for chat in resources.web_chats -%}
- {{ chat }}
{% endfor %}
{%- endif %}
**Emergency:** call **{{ resources.emergency }}** if you or someone else is in immediate danger.
{% if region_note %}
_{{ region_note }}_
{% endif %}
---

Whatever you are feeling is real, and it is not your fault. I'm not able to provide crisis support myself, but the people at these numbers are trained to help with exactly this. You can keep talking with me, but please reach out to one of them first.

**You don't have to face this alone.**

_Shown by the Mental Health Safety Monitor. If this appeared in error, you can adjust its sensitivity in Settings > Plugins > Mental Health Safety._";

const GUIDANCE_SOURCE: &str = r#"[SAFETY CONTEXT: User may be experiencing emotional distress. Respond with empathy, avoid victim-blaming, and watch for escalation.]
[SAFETY GUIDANCE]
- Detected triggers: {{ triggers | join(", ") }}
- Respond with genuine empathy and validation
- Never suggest the user is responsible for harm others did to them
- Never minimise their experience or question their perception
- If they mention harm to themselves or others, prioritise crisis resources

{{ content }}"#;

const HARM_SOURCE: &str = r"I'm sorry, but I need to pause our conversation.

The reply I was about to send contained patterns that could be harmful:
{% for pattern in patterns -%}
- {{ pattern }}
{% endfor %}
Let me try again with a more supportive approach.

Whatever you're experiencing is real and valid. If someone has harmed you, that's on them - not you. You didn't cause their behaviour, and you're not responsible for their choices.

Would you like to talk about what's going on? I'm here to listen without judgement.

_This reply was replaced by the Mental Health Safety Monitor to prevent potential harm._";

/// Inputs for the crisis intervention message.
#[derive(Debug, Clone, Copy)]
pub struct CrisisNotice<'a> {
    /// Resources for the resolved region.
    pub resources: &'a CrisisResources,
    /// Note asking the user to set their region, when it was not known.
    pub region_note: Option<&'a str>,
}

/// Pre-compiled response templates.
///
/// Templates are checked when the plugin is built. Should rendering still
/// fail at runtime, a plain-text fallback carrying the same essentials is
/// returned so an intervention is never lost.
pub struct SafetyResponses {
    environment: Environment<'static>,
}

impl SafetyResponses {
    /// Compiles the response templates.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyError::Template`] if a template does not compile.
    pub fn new() -> Result<Self, SafetyError> {
        let mut environment = Environment::new();
        for (name, source) in [
            (CRISIS_TEMPLATE, CRISIS_SOURCE),
            (GUIDANCE_TEMPLATE, GUIDANCE_SOURCE),
            (HARM_TEMPLATE, HARM_SOURCE),
        ] {
            environment
                .add_template(name, source)
                .map_err(|error| template_error(name, &error))?;
        }
        Ok(Self { environment })
    }

    /// Renders the message that replaces a blocked crisis turn.
    #[must_use]
    pub fn crisis_intervention(&self, notice: CrisisNotice<'_>) -> String {
        self.render(
            CRISIS_TEMPLATE,
            context! {
                resources => notice.resources,
                region_note => notice.region_note,
            },
        )
        .unwrap_or_else(|| crisis_fallback(notice))
    }

    /// Prefixes `content` with guidance for the completion model.
    #[must_use]
    pub fn safety_guidance(&self, triggers: &[String], content: &str) -> String {
        self.render(
            GUIDANCE_TEMPLATE,
            context! { triggers => triggers, content => content },
        )
        .unwrap_or_else(|| {
            format!(
                "[SAFETY CONTEXT: User may be experiencing emotional distress. Respond with empathy, avoid victim-blaming, and watch for escalation.]\n\n{content}"
            )
        })
    }

    /// Renders the corrective reply that replaces a harmful one.
    #[must_use]
    pub fn harm_block(&self, patterns: &[String]) -> String {
        self.render(HARM_TEMPLATE, context! { patterns => patterns })
            .unwrap_or_else(|| {
                let listed: Vec<String> =
                    patterns.iter().map(|pattern| format!("- {pattern}")).collect();
                format!(
                    "I'm sorry, but I need to pause our conversation. The reply I was about to send contained patterns that could be harmful:\n{}\n\nWhatever you're experiencing is real and valid.",
                    listed.join("\n")
                )
            })
    }

    fn render(&self, name: &str, context: minijinja::Value) -> Option<String> {
        self.environment
            .get_template(name)
            .and_then(|template| template.render(context))
            .inspect_err(|error| {
                warn!(template = name, error = %error, "safety template failed; using fallback");
            })
            .ok()
    }
}

fn template_error(name: &str, error: &minijinja::Error) -> SafetyError {
    SafetyError::Template {
        template: name.to_owned(),
        reason: error.to_string(),
    }
}

fn crisis_fallback(notice: CrisisNotice<'_>) -> String {
    let lines: Vec<String> = notice
        .resources
        .hotlines
        .iter()
        .map(|line| format!("- {} ({})", line.number, line.name))
        .collect();
    format!(
        "Crisis Support Activated. You are not alone. Support in {}:\n{}\nEmergency: {}\n{}",
        notice.resources.name,
        lines.join("\n"),
        notice.resources.emergency,
        notice.region_note.unwrap_or_default()
    )
}
