//! Responses returned by a completion backend.

use serde::{Deserialize, Serialize};

/// Token accounting reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens generated.
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Returns the combined token count.
    #[must_use]
    pub const fn total_tokens(self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

/// A complete reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Backend-assigned response id.
    pub id: String,
    /// Model that produced the reply.
    pub model: String,
    /// Reply text.
    pub content: String,
    /// Why generation stopped, if reported.
    pub finish_reason: Option<String>,
    /// Token accounting, if reported.
    pub usage: Option<TokenUsage>,
}

/// An incremental piece of a streamed reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChunk {
    /// Text appended by this chunk.
    pub delta: String,
    /// Set on the final chunk.
    pub finish_reason: Option<String>,
}

impl CompletionChunk {
    /// Creates a content chunk.
    #[must_use]
    pub fn delta(text: impl Into<String>) -> Self {
        Self {
            delta: text.into(),
            finish_reason: None,
        }
    }

    /// Marks the chunk as final.
    #[must_use]
    pub fn finished(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }
}
