//! Code-generation prompt enrichment and struct scaffolding.

mod plugin;
mod scaffold;

pub use plugin::{CODE_GENERATOR_PLUGIN_ID, CodeGeneratorPlugin};
pub use scaffold::{FieldDefinition, ScaffoldError, StructScaffold};
