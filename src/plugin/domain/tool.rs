//! Tool definitions, arguments and results.

use super::{PluginDomainError, PluginId, ToolParameterError};
use crate::conversation::domain::{Metadata, PluginValue, PluginValueKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named arguments for a tool invocation.
pub type ToolParameters = BTreeMap<String, PluginValue>;

/// A single typed parameter of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    name: String,
    description: String,
    kind: PluginValueKind,
    required: bool,
    default_value: Option<PluginValue>,
}

impl ToolParameter {
    /// Creates a required parameter.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError::EmptyParameterName`] when the name is
    /// empty after trimming.
    pub fn required(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: PluginValueKind,
    ) -> Result<Self, PluginDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(PluginDomainError::EmptyParameterName);
        }
        Ok(Self {
            name: normalized_name,
            description: description.into(),
            kind,
            required: true,
            default_value: None,
        })
    }

    /// Creates an optional parameter with an optional default.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError::EmptyParameterName`] when the name is
    /// empty after trimming.
    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: PluginValueKind,
        default_value: Option<PluginValue>,
    ) -> Result<Self, PluginDomainError> {
        let mut parameter = Self::required(name, description, kind)?;
        parameter.required = false;
        parameter.default_value = default_value;
        Ok(parameter)
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the expected value type.
    #[must_use]
    pub const fn kind(&self) -> PluginValueKind {
        self.kind
    }

    /// Returns whether callers must supply this parameter.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the default value, if any.
    #[must_use]
    pub const fn default_value(&self) -> Option<&PluginValue> {
        self.default_value.as_ref()
    }
}

/// A tool exposed by a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginTool {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
    requires_confirmation: bool,
}

impl PluginTool {
    /// Creates a tool without parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PluginDomainError::EmptyToolName`] when the name is empty
    /// after trimming.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, PluginDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(PluginDomainError::EmptyToolName);
        }
        Ok(Self {
            name: normalized_name,
            description: description.into(),
            parameters: Vec::new(),
            requires_confirmation: false,
        })
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Marks the tool as needing user confirmation before it runs.
    #[must_use]
    pub const fn requiring_confirmation(mut self) -> Self {
        self.requires_confirmation = true;
        self
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the declared parameters.
    #[must_use]
    pub fn parameters(&self) -> &[ToolParameter] {
        &self.parameters
    }

    /// Returns whether the tool needs user confirmation.
    #[must_use]
    pub const fn requires_confirmation(&self) -> bool {
        self.requires_confirmation
    }

    /// Checks arguments against the declared parameters and fills defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ToolParameterError`] for unknown arguments, missing
    /// required arguments, or arguments of the wrong type.
    pub fn validate_parameters(
        &self,
        mut arguments: ToolParameters,
    ) -> Result<ToolParameters, ToolParameterError> {
        if let Some(unknown) = arguments
            .keys()
            .find(|key| !self.parameters.iter().any(|param| param.name() == key.as_str()))
        {
            return Err(ToolParameterError::Unknown {
                tool: self.name.clone(),
                parameter: unknown.clone(),
            });
        }

        for parameter in &self.parameters {
            match arguments.get(parameter.name()) {
                Some(value) if value.kind() != parameter.kind() => {
                    return Err(ToolParameterError::TypeMismatch {
                        tool: self.name.clone(),
                        parameter: parameter.name().to_owned(),
                        expected: parameter.kind(),
                        actual: value.kind(),
                    });
                }
                Some(_) => {}
                None => {
                    if let Some(default_value) = parameter.default_value() {
                        arguments.insert(parameter.name().to_owned(), default_value.clone());
                    } else if parameter.is_required() {
                        return Err(ToolParameterError::MissingRequired {
                            tool: self.name.clone(),
                            parameter: parameter.name().to_owned(),
                        });
                    }
                }
            }
        }
        Ok(arguments)
    }
}

/// A tool together with the plugin that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredTool {
    /// Owning plugin.
    pub plugin_id: PluginId,
    /// Tool definition.
    pub tool: PluginTool,
}

/// Outcome of a tool invocation.
///
/// Failures are values, never panics or errors: the manager wraps missing
/// plugins, unknown tools, invalid arguments and provider errors alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    success: bool,
    result: Option<PluginValue>,
    error: Option<String>,
    metadata: Metadata,
}

impl ToolResult {
    /// Creates a successful result carrying a payload.
    #[must_use]
    pub fn success(result: impl Into<PluginValue>) -> Self {
        Self {
            success: true,
            result: Some(result.into()),
            error: None,
            metadata: Metadata::new(),
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
            metadata: Metadata::new(),
        }
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<PluginValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns whether the tool succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the payload, if any.
    #[must_use]
    pub const fn result(&self) -> Option<&PluginValue> {
        self.result.as_ref()
    }

    /// Returns the error text, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}
