//! Completion request and response values.

mod request;
mod response;

pub use request::{ChatMessage, CompletionRequest, DEFAULT_TEMPERATURE};
pub use response::{CompletionChunk, CompletionResponse, TokenUsage};
