//! Scripted in-memory completion backend.

use crate::completion::domain::{CompletionChunk, CompletionRequest, CompletionResponse};
use crate::completion::ports::{ChunkStream, CompletionBackend, CompletionError, CompletionResult};
use async_trait::async_trait;
use futures::stream;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A reply queued on a [`ScriptedCompletionBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    /// Reply with this text.
    Text(String),
    /// Fail with this message.
    Failure(String),
}

#[derive(Debug, Default)]
struct ScriptState {
    replies: VecDeque<ScriptedReply>,
    requests: Vec<CompletionRequest>,
}

/// Completion backend that answers from a queue of scripted replies.
///
/// Every request is recorded so callers can check what was sent, or that
/// nothing was. Streamed replies are split on whitespace.
///
/// # Examples
///
/// ```
/// use aimate::completion::adapters::scripted::ScriptedCompletionBackend;
/// use aimate::completion::domain::CompletionRequest;
/// use aimate::completion::ports::CompletionBackend;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let backend = ScriptedCompletionBackend::new().with_reply("Kia ora!");
/// let response = backend
///     .send_chat(CompletionRequest::new("test-model"))
///     .await
///     .expect("scripted reply");
///
/// assert_eq!(response.content, "Kia ora!");
/// assert_eq!(backend.requests().len(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct ScriptedCompletionBackend {
    state: Mutex<ScriptState>,
}

impl ScriptedCompletionBackend {
    /// Creates a backend with no queued replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a text reply.
    #[must_use]
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(ScriptedReply::Text(text.into()));
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(ScriptedReply::Failure(message.into()));
        self
    }

    /// Queues a reply on a shared backend.
    pub fn push(&self, reply: ScriptedReply) {
        self.lock().replies.push_back(reply);
    }

    /// Returns every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock().requests.clone()
    }

    fn next_reply(&self, request: CompletionRequest) -> CompletionResult<(String, String)> {
        let mut state = self.lock();
        let model = request.model.clone();
        state.requests.push(request);
        let sequence = state.requests.len();
        match state.replies.pop_front() {
            Some(ScriptedReply::Text(text)) if text.is_empty() => Err(CompletionError::EmptyReply),
            Some(ScriptedReply::Text(text)) => Ok((format!("scripted-{sequence}"), text)),
            Some(ScriptedReply::Failure(message)) => Err(CompletionError::Rejected(message)),
            None => Err(CompletionError::Rejected(format!(
                "no scripted reply left for model {model}"
            ))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CompletionBackend for ScriptedCompletionBackend {
    async fn send_chat(&self, request: CompletionRequest) -> CompletionResult<CompletionResponse> {
        let model = request.model.clone();
        let (id, content) = self.next_reply(request)?;
        Ok(CompletionResponse {
            id,
            model,
            content,
            finish_reason: Some("stop".to_owned()),
            usage: None,
        })
    }

    async fn stream_chat(&self, request: CompletionRequest) -> CompletionResult<ChunkStream> {
        let (_, content) = self.next_reply(request)?;
        let words: Vec<String> = content
            .split_inclusive(char::is_whitespace)
            .map(str::to_owned)
            .collect();
        let last = words.len().saturating_sub(1);
        let chunks: Vec<CompletionResult<CompletionChunk>> = words
            .into_iter()
            .enumerate()
            .map(|(index, word)| {
                let chunk = CompletionChunk::delta(word);
                Ok(if index == last {
                    chunk.finished("stop")
                } else {
                    chunk
                })
            })
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }
}
