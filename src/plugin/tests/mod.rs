//! Unit tests for the plugin registry, pipelines and dispatch.

mod fixtures;
mod pipeline_tests;
mod registry_tests;
mod tool_tests;
