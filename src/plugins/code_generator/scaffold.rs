//! Rust struct scaffolding from a field list.

use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const STRUCT_TEMPLATE: &str = r"/// {{ name }} record.
#[derive({{ derives | join(', ') }})]
pub struct {{ name }} {
{%- for field in fields %}
    pub {{ field.name }}: {{ field.type }},
{%- endfor %}
}";

/// Errors raised while scaffolding a struct.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScaffoldError {
    /// A struct, field or derive name is not a Rust identifier.
    #[error("'{0}' is not a valid Rust identifier")]
    InvalidIdentifier(String),

    /// A field type is blank or would break out of the struct body.
    #[error("field '{field}' has an invalid type '{ty}'")]
    InvalidType {
        /// Field name.
        field: String,
        /// Offending type text.
        ty: String,
    },

    /// The field list is not a JSON array of field objects.
    #[error("fields must be a JSON array of {{\"name\", \"type\"}} objects: {0}")]
    MalformedFields(String),

    /// The template failed to render.
    #[error("failed to render struct: {0}")]
    Render(String),
}

/// One field of a scaffolded struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name.
    pub name: String,
    /// Field type; `String` when omitted.
    #[serde(rename = "type", default = "default_type")]
    pub ty: String,
}

fn default_type() -> String {
    "String".to_owned()
}

/// A validated struct definition ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructScaffold {
    name: String,
    derives: Vec<String>,
    fields: Vec<FieldDefinition>,
}

impl StructScaffold {
    /// Validates a struct definition.
    ///
    /// `fields_json` is a JSON array such as
    /// `[{"name": "id", "type": "u64"}, {"name": "title"}]`; `derives` is a
    /// comma-separated list of derive macros.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError`] when a name is not an identifier, a type is
    /// blank or contains braces, semicolons or newlines, or the field list
    /// does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use aimate::plugins::code_generator::StructScaffold;
    ///
    /// let scaffold = StructScaffold::parse("Note", r#"[{"name": "id", "type": "u64"}]"#, "Debug")
    ///     .expect("valid definition");
    ///
    /// assert!(scaffold.render().expect("renders").contains("pub id: u64,"));
    /// ```
    pub fn parse(name: &str, fields_json: &str, derives: &str) -> Result<Self, ScaffoldError> {
        let struct_name = identifier(name)?;
        let fields: Vec<FieldDefinition> = serde_json::from_str(fields_json)
            .map_err(|err| ScaffoldError::MalformedFields(err.to_string()))?;
        let checked = fields
            .into_iter()
            .map(|field| {
                let field_name = identifier(&field.name)?;
                let ty = field.ty.trim();
                if ty.is_empty() || ty.contains(['{', '}', ';', '\n']) {
                    return Err(ScaffoldError::InvalidType {
                        field: field_name,
                        ty: field.ty,
                    });
                }
                Ok(FieldDefinition {
                    name: field_name,
                    ty: ty.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let derive_list = derives
            .split(',')
            .map(str::trim)
            .filter(|derive| !derive.is_empty())
            .map(identifier)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: struct_name,
            derives: derive_list,
            fields: checked,
        })
    }

    /// Returns the struct name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the validated fields.
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Renders the struct as Rust source.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Render`] if template rendering fails.
    pub fn render(&self) -> Result<String, ScaffoldError> {
        let environment = Environment::new();
        let source = environment
            .render_str(
                STRUCT_TEMPLATE,
                context! {
                    name => self.name,
                    derives => self.derives,
                    fields => self.fields,
                },
            )
            .map_err(|err| ScaffoldError::Render(err.to_string()))?;
        if self.derives.is_empty() {
            return Ok(source.replacen("#[derive()]\n", "", 1));
        }
        Ok(source)
    }
}

fn identifier(raw: &str) -> Result<String, ScaffoldError> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let valid = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|rest| rest.is_ascii_alphanumeric() || rest == '_')
        && trimmed != "_";
    if valid {
        Ok(trimmed.to_owned())
    } else {
        Err(ScaffoldError::InvalidIdentifier(raw.to_owned()))
    }
}
