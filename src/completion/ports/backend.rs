//! Completion backend port.

use crate::completion::domain::{CompletionChunk, CompletionRequest, CompletionResponse};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;
use thiserror::Error;

/// Result type for completion backend calls.
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Stream of reply chunks.
pub type ChunkStream = BoxStream<'static, CompletionResult<CompletionChunk>>;

/// Errors returned by completion backends.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// The backend rejected the request.
    #[error("completion backend rejected the request: {0}")]
    Rejected(String),

    /// The backend returned no content.
    #[error("completion backend returned an empty reply")]
    EmptyReply,

    /// Transport or backend failure.
    #[error("completion backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl CompletionError {
    /// Wraps a transport or backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}

/// Chat completion service contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Requests a complete reply.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError`] when the backend fails.
    async fn send_chat(&self, request: CompletionRequest) -> CompletionResult<CompletionResponse>;

    /// Requests a reply delivered as incremental chunks.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError`] when the stream cannot be opened; errors
    /// after that arrive as stream items.
    async fn stream_chat(&self, request: CompletionRequest) -> CompletionResult<ChunkStream>;
}
