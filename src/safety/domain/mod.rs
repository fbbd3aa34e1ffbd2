//! Detection rules, escalation state and crisis resources.

mod config;
mod crisis;
mod error;
mod escalation;
mod harm;
mod resources;
mod text;

pub use config::{
    AUTO_INTERVENE_SETTING, FALLBACK_REGION, REGION_SETTING, SENSITIVITY_SETTING, SafetyConfig,
    Sensitivity,
};
pub use crisis::{CrisisAnalysis, CrisisDetector, DistressLevel, ESCALATING_PATTERN};
pub use error::SafetyError;
pub use escalation::{ESCALATION_WINDOW, EscalationTracker};
pub use harm::{HarmAnalysis, HarmCategory, HarmDetector};
pub use resources::{CrisisHotline, CrisisResources, ParseRegionError, Region};
