//! The mental-health safety plugin and its response rendering.

mod plugin;
mod responses;

pub use plugin::{
    DISTRESS_LEVEL_KEY, MentalHealthSafetyPlugin, SAFETY_PLUGIN_ID, SAFETY_PRIORITY,
};
pub use responses::{CrisisNotice, SafetyResponses};
