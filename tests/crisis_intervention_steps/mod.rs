//! Step definitions for crisis intervention scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
