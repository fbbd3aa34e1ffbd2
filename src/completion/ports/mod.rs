//! Port contracts for completion backends.

mod backend;

#[cfg(test)]
pub use backend::MockCompletionBackend;
pub use backend::{ChunkStream, CompletionBackend, CompletionError, CompletionResult};
