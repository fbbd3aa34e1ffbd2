//! Message author roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A message typed by the person using the chat.
    User,
    /// A reply produced by the language model or substituted by a plugin.
    Assistant,
    /// An instruction injected by the application.
    System,
}

impl Role {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing a role from its string form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown message role: {0}")]
pub struct ParseRoleError(pub String);

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "system" => Ok(Self::System),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user", Role::User)]
    #[case(" Assistant ", Role::Assistant)]
    #[case("SYSTEM", Role::System)]
    fn parses_known_roles(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(Role::try_from(raw), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_role() {
        assert_eq!(
            Role::try_from("tool"),
            Err(ParseRoleError("tool".to_owned()))
        );
    }
}
