//! Crisis signal detection.

use super::Sensitivity;
use super::text::{matching, normalise};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trigger label recorded when repeated distress upgrades a message.
pub const ESCALATING_PATTERN: &str = "escalating_pattern";

/// Direct ideation, self-harm, imminent danger and farewell phrases.
const CRITICAL_TRIGGERS: &[&str] = &[
    "kill myself",
    "end my life",
    "want to die",
    "suicide",
    "suicidal",
    "not worth living",
    "no reason to live",
    "better off dead",
    "can't do this anymore",
    "cannot do this anymore",
    "can do this anymore",
    "cutting myself",
    "hurting myself",
    "self harm",
    "self-harm",
    "going to do it",
    "do it tonight",
    "doing it tonight",
    "end it tonight",
    "end it all",
    "have the pills",
    "have a gun",
    "have a rope",
    "goodbye forever",
    "this is goodbye",
    "last message",
    "won't be here",
    "final message",
];

/// Hopelessness, overwhelm, abuse context and isolation.
const ELEVATED_TRIGGERS: &[&str] = &[
    "no hope",
    "hopeless",
    "pointless",
    "give up",
    "can't go on",
    "can't take it",
    "too much",
    "unbearable",
    "overwhelming",
    "gaslighting",
    "abusive",
    "manipulating",
    "controlling",
    "nobody cares",
    "alone",
    "no one",
    "abandoned",
];

/// Everyday strain, only consulted above conservative sensitivity.
const MILD_TRIGGERS: &[&str] = &[
    "stressed",
    "exhausted",
    "struggling",
    "can't cope",
    "burnt out",
    "burned out",
    "worn out",
    "drained",
    "anxious",
    "not okay",
];

/// Ordered distress severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistressLevel {
    /// No signal.
    #[default]
    None,
    /// Everyday strain.
    Mild,
    /// Distress that warrants extra care downstream.
    Elevated,
    /// Risk of harm; the turn is blocked.
    Critical,
}

impl DistressLevel {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mild => "mild",
            Self::Elevated => "elevated",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for DistressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of screening one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrisisAnalysis {
    level: DistressLevel,
    triggers: Vec<String>,
}

impl CrisisAnalysis {
    fn from_matches(level: DistressLevel, matches: Vec<&str>) -> Self {
        Self {
            level,
            triggers: matches.into_iter().map(str::to_owned).collect(),
        }
    }

    /// Returns the distress level.
    #[must_use]
    pub const fn level(&self) -> DistressLevel {
        self.level
    }

    /// Returns whether the message needs intervention.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.level == DistressLevel::Critical
    }

    /// Returns whether the message warrants added care without blocking.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        self.level == DistressLevel::Elevated
    }

    /// Returns every matched trigger, in detection order.
    #[must_use]
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    /// Upgrades the analysis to critical because of repeated distress.
    pub(crate) fn escalate(&mut self) {
        self.level = DistressLevel::Critical;
        self.triggers.push(ESCALATING_PATTERN.to_owned());
    }
}

/// Stateless crisis detector.
///
/// Matching is a case-insensitive substring search. Critical phrases are
/// checked first and every match is recorded; elevated phrases are only
/// consulted when nothing critical matched.
///
/// # Examples
///
/// ```
/// use aimate::safety::domain::{CrisisDetector, DistressLevel, Sensitivity};
///
/// let analysis = CrisisDetector.analyze("I feel so alone and hopeless", Sensitivity::Conservative);
/// assert_eq!(analysis.level(), DistressLevel::Elevated);
/// assert_eq!(analysis.triggers(), ["hopeless", "alone"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CrisisDetector;

impl CrisisDetector {
    /// Screens `text` at the given sensitivity.
    #[must_use]
    pub fn analyze(self, text: &str, sensitivity: Sensitivity) -> CrisisAnalysis {
        let normalised = normalise(text);

        let critical = matching(&normalised, CRITICAL_TRIGGERS);
        if !critical.is_empty() {
            return CrisisAnalysis::from_matches(DistressLevel::Critical, critical);
        }

        let elevated = matching(&normalised, ELEVATED_TRIGGERS);
        if !elevated.is_empty() {
            return CrisisAnalysis::from_matches(DistressLevel::Elevated, elevated);
        }

        sensitivity
            .mild_level()
            .map(|level| CrisisAnalysis::from_matches(level, matching(&normalised, MILD_TRIGGERS)))
            .filter(|analysis| !analysis.triggers.is_empty())
            .unwrap_or_default()
    }
}
