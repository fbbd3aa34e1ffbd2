//! Harmful pattern detection in assistant replies.

use super::text::{matching, normalise};
use std::fmt;

const VICTIM_BLAMING: &[&str] = &[
    "you enabled",
    "your engagement contributed",
    "you allowed",
    "you chose to",
    "you participated",
    "your responsibility",
    "you could have stopped",
];

const GASLIGHTING: &[&str] = &[
    "you're overreacting",
    "it wasn't that bad",
    "you're too sensitive",
    "you misunderstood",
    "that didn't happen",
    "you're imagining",
];

const MINIMIZATION: &[&str] = &[
    "it's not a big deal",
    "others have it worse",
    "at least",
    "look on the bright side",
    "everything happens for a reason",
];

/// Family of harmful reply patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarmCategory {
    /// Suggests the user caused harm done to them.
    VictimBlaming,
    /// Questions the user's perception of events.
    Gaslighting,
    /// Downplays the user's experience.
    Minimization,
}

impl HarmCategory {
    /// Every category, in detection order.
    pub const ALL: [Self; 3] = [Self::VictimBlaming, Self::Gaslighting, Self::Minimization];

    /// Returns the label prefix used in pattern reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VictimBlaming => "victim_blaming",
            Self::Gaslighting => "gaslighting",
            Self::Minimization => "minimization",
        }
    }

    const fn phrases(self) -> &'static [&'static str] {
        match self {
            Self::VictimBlaming => VICTIM_BLAMING,
            Self::Gaslighting => GASLIGHTING,
            Self::Minimization => MINIMIZATION,
        }
    }
}

impl fmt::Display for HarmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of screening one reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarmAnalysis {
    patterns: Vec<String>,
}

impl HarmAnalysis {
    /// Returns whether any pattern matched.
    #[must_use]
    pub fn is_harmful(&self) -> bool {
        !self.patterns.is_empty()
    }

    /// Returns the matched patterns as `"category: phrase"` labels.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Stateless harmful pattern detector.
///
/// # Examples
///
/// ```
/// use aimate::safety::domain::HarmDetector;
///
/// let analysis = HarmDetector.analyze("Honestly, you're overreacting.");
/// assert_eq!(analysis.patterns(), ["gaslighting: you're overreacting"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HarmDetector;

impl HarmDetector {
    /// Screens `text` against every category.
    #[must_use]
    pub fn analyze(self, text: &str) -> HarmAnalysis {
        let normalised = normalise(text);
        let patterns = HarmCategory::ALL
            .into_iter()
            .flat_map(|category| {
                matching(&normalised, category.phrases())
                    .into_iter()
                    .map(move |phrase| format!("{category}: {phrase}"))
            })
            .collect();
        HarmAnalysis { patterns }
    }
}
