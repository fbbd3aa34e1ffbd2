//! Safety plugin configuration.

use super::{DistressLevel, Region};
use crate::conversation::domain::{Metadata, PluginValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings key holding the user's region code.
pub const REGION_SETTING: &str = "region";
/// Settings key holding the detection sensitivity.
pub const SENSITIVITY_SETTING: &str = "sensitivity";
/// Settings key holding the auto-intervention flag.
pub const AUTO_INTERVENE_SETTING: &str = "auto_intervene";

/// Region used when neither the host nor the user chose one.
pub const FALLBACK_REGION: Region = Region::Nz;

/// How eagerly everyday strain is treated as distress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sensitivity {
    /// Only the critical and elevated wordlists apply.
    #[default]
    Conservative,
    /// Everyday strain is reported as mild without affecting escalation.
    Moderate,
    /// Everyday strain counts as elevated and escalation triggers sooner.
    Aggressive,
}

impl Sensitivity {
    /// Every sensitivity, in settings order.
    pub const ALL: [Self; 3] = [Self::Conservative, Self::Moderate, Self::Aggressive];

    /// Returns the settings label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Moderate => "Moderate",
            Self::Aggressive => "Aggressive",
        }
    }

    /// Parses a settings label, ignoring case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sensitivity| sensitivity.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    /// Consecutive distress messages that escalate to critical.
    #[must_use]
    pub const fn escalation_threshold(self) -> u32 {
        match self {
            Self::Conservative | Self::Moderate => 3,
            Self::Aggressive => 2,
        }
    }

    /// Level assigned to everyday strain, when it is considered at all.
    #[must_use]
    pub const fn mild_level(self) -> Option<DistressLevel> {
        match self {
            Self::Conservative => None,
            Self::Moderate => Some(DistressLevel::Mild),
            Self::Aggressive => Some(DistressLevel::Elevated),
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Safety plugin configuration.
///
/// Host-level defaults are overridden per turn by the user's plugin
/// settings; unrecognised values leave the default in place.
///
/// # Examples
///
/// ```
/// use aimate::conversation::domain::{Metadata, PluginValue};
/// use aimate::safety::domain::{Region, SafetyConfig, Sensitivity};
///
/// let settings = Metadata::from([
///     ("region".to_owned(), PluginValue::from("au")),
///     ("sensitivity".to_owned(), PluginValue::from("Aggressive")),
/// ]);
/// let config = SafetyConfig::from_settings(&settings);
///
/// assert_eq!(config.default_region(), Region::Au);
/// assert_eq!(config.sensitivity(), Sensitivity::Aggressive);
/// assert!(config.auto_intervene());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    default_region: Option<Region>,
    sensitivity: Sensitivity,
    auto_intervene: bool,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            default_region: None,
            sensitivity: Sensitivity::Conservative,
            auto_intervene: true,
        }
    }
}

impl SafetyConfig {
    /// Builds a configuration from a plugin settings map.
    #[must_use]
    pub fn from_settings(settings: &Metadata) -> Self {
        Self::default().with_overrides(settings)
    }

    /// Returns a copy with any recognised settings applied.
    #[must_use]
    pub fn with_overrides(self, settings: &Metadata) -> Self {
        let default_region = settings
            .get(REGION_SETTING)
            .and_then(PluginValue::as_str)
            .and_then(|raw| raw.parse().ok())
            .or(self.default_region);
        let sensitivity = settings
            .get(SENSITIVITY_SETTING)
            .and_then(PluginValue::as_str)
            .and_then(Sensitivity::parse)
            .unwrap_or(self.sensitivity);
        let auto_intervene = settings
            .get(AUTO_INTERVENE_SETTING)
            .and_then(flag)
            .unwrap_or(self.auto_intervene);
        Self {
            default_region,
            sensitivity,
            auto_intervene,
        }
    }

    /// Sets the fallback region.
    #[must_use]
    pub const fn with_default_region(mut self, region: Region) -> Self {
        self.default_region = Some(region);
        self
    }

    /// Sets the detection sensitivity.
    #[must_use]
    pub const fn with_sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Enables or disables blocking on critical signals.
    #[must_use]
    pub const fn with_auto_intervene(mut self, enabled: bool) -> Self {
        self.auto_intervene = enabled;
        self
    }

    /// Returns the region crisis resources are drawn from when the user
    /// has not picked one.
    #[must_use]
    pub const fn default_region(&self) -> Region {
        match self.default_region {
            Some(region) => region,
            None => FALLBACK_REGION,
        }
    }

    /// Returns the region explicitly chosen by the host or the user's
    /// settings, if any.
    #[must_use]
    pub const fn chosen_region(&self) -> Option<Region> {
        self.default_region
    }

    /// Returns the detection sensitivity.
    #[must_use]
    pub const fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    /// Returns whether critical signals block the turn.
    #[must_use]
    pub const fn auto_intervene(&self) -> bool {
        self.auto_intervene
    }
}

fn flag(value: &PluginValue) -> Option<bool> {
    value.as_bool().or_else(|| match value.as_str()?.trim() {
        raw if raw.eq_ignore_ascii_case("true") => Some(true),
        raw if raw.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    })
}
