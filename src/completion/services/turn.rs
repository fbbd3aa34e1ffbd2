//! The chat turn driver.

use super::config::TurnConfig;
use crate::completion::domain::{CompletionChunk, CompletionRequest};
use crate::completion::ports::{CompletionBackend, CompletionError};
use crate::conversation::domain::{ConversationContext, Message, Metadata};
use crate::plugin::services::{PipelineError, PluginManager};
use futures::TryStreamExt;
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Errors that abort a chat turn.
#[derive(Debug, Clone, Error)]
pub enum TurnError {
    /// An interceptor pipeline was cancelled or timed out.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The completion backend failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// The caller cancelled the turn.
    #[error("turn cancelled")]
    Cancelled,

    /// The turn exceeded its time limit.
    #[error("turn exceeded its {0:?} time limit")]
    TimedOut(Duration),
}

/// How a chat turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The backend replied and the reply passed screening.
    Completed {
        /// Message sent to the backend, after interceptor rewrites.
        sent: Message,
        /// Reply delivered to the user.
        reply: Message,
        /// Metadata from both pipeline passes; reply keys win.
        metadata: Metadata,
    },
    /// An interceptor stopped the turn.
    Blocked {
        /// Reason reported by the interceptor.
        reason: Option<String>,
        /// Message shown in place of a backend reply.
        reply: Option<Message>,
        /// Metadata reported by the blocking interceptor.
        metadata: Metadata,
    },
}

impl TurnOutcome {
    /// Returns the message delivered to the user, if any.
    #[must_use]
    pub const fn reply(&self) -> Option<&Message> {
        match self {
            Self::Completed { reply, .. } => Some(reply),
            Self::Blocked { reply, .. } => reply.as_ref(),
        }
    }

    /// Returns whether an interceptor stopped the turn.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    /// Returns the metadata collected during the turn.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        match self {
            Self::Completed { metadata, .. } | Self::Blocked { metadata, .. } => metadata,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Delivery {
    Whole,
    Streamed,
}

/// Runs chat turns through the plugin pipelines and a completion backend.
///
/// The backend is never called for a turn blocked before sending, and a
/// streamed reply is buffered in full so after-receive screening sees it
/// before any of it is delivered.
pub struct ChatTurnService<B, C>
where
    B: CompletionBackend,
    C: Clock + Send + Sync,
{
    plugins: Arc<PluginManager>,
    backend: Arc<B>,
    clock: Arc<C>,
    config: TurnConfig,
}

impl<B, C> ChatTurnService<B, C>
where
    B: CompletionBackend,
    C: Clock + Send + Sync,
{
    /// Creates a turn service.
    #[must_use]
    pub const fn new(
        plugins: Arc<PluginManager>,
        backend: Arc<B>,
        clock: Arc<C>,
        config: TurnConfig,
    ) -> Self {
        Self {
            plugins,
            backend,
            clock,
            config,
        }
    }

    /// Returns the turn configuration.
    #[must_use]
    pub const fn config(&self) -> &TurnConfig {
        &self.config
    }

    /// Runs one turn with a whole-reply backend call.
    ///
    /// The user message and the delivered reply are appended to the
    /// context history; plugin scratch data is cleared first.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError`] on cancellation, timeout, pipeline failure or
    /// backend failure. Nothing is appended to the history in that case
    /// unless the user message was already recorded.
    #[instrument(skip_all, fields(conversation_id = %context.conversation_id()))]
    pub async fn run_turn(
        &self,
        context: &mut ConversationContext,
        message: Message,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome, TurnError> {
        self.bounded(self.drive(context, message, cancel, Delivery::Whole))
            .await
    }

    /// Runs one turn with a streamed backend call.
    ///
    /// Chunks are buffered into a single reply before screening.
    ///
    /// # Errors
    ///
    /// As for [`Self::run_turn`]; a failing chunk aborts the turn.
    #[instrument(skip_all, fields(conversation_id = %context.conversation_id()))]
    pub async fn run_streaming_turn(
        &self,
        context: &mut ConversationContext,
        message: Message,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome, TurnError> {
        self.bounded(self.drive(context, message, cancel, Delivery::Streamed))
            .await
    }

    async fn bounded(
        &self,
        turn: impl Future<Output = Result<TurnOutcome, TurnError>>,
    ) -> Result<TurnOutcome, TurnError> {
        match self.config.turn_timeout() {
            Some(limit) => tokio::time::timeout(limit, turn).await.unwrap_or_else(|_elapsed| {
                warn!(limit = ?limit, "turn timed out");
                Err(TurnError::TimedOut(limit))
            }),
            None => turn.await,
        }
    }

    async fn drive(
        &self,
        context: &mut ConversationContext,
        message: Message,
        cancel: &CancellationToken,
        delivery: Delivery,
    ) -> Result<TurnOutcome, TurnError> {
        context.clear_plugin_data();

        let screened = self
            .plugins
            .on_before_send(&message, context, cancel)
            .await?;
        if !screened.should_continue() {
            let reason = screened.cancel_reason().map(str::to_owned);
            let (reply, metadata) = screened.into_parts();
            info!(reason = reason.as_deref().unwrap_or_default(), "turn blocked before sending");
            context.push_message(message);
            if let Some(shown) = &reply {
                context.push_message(shown.clone());
            }
            return Ok(TurnOutcome::Blocked {
                reason,
                reply,
                metadata,
            });
        }

        let (rewritten, mut metadata) = screened.into_parts();
        let sent = rewritten.unwrap_or_else(|| message.clone());
        let request = CompletionRequest::new(self.config.model())
            .with_messages(context.history().iter().chain(std::iter::once(&sent)))
            .with_temperature(self.config.temperature())
            .with_max_tokens(self.config.max_tokens());
        context.push_message(message);

        let content = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(TurnError::Cancelled),
            completed = self.complete(request, delivery) => completed?,
        };
        let received = Message::assistant(content, self.clock.as_ref());

        let checked = self
            .plugins
            .on_after_receive(&received, context, cancel)
            .await?;
        if !checked.should_continue() {
            let reason = checked.cancel_reason().map(str::to_owned);
            let (reply, blocked_metadata) = checked.into_parts();
            warn!(reason = reason.as_deref().unwrap_or_default(), "reply blocked");
            if let Some(shown) = &reply {
                context.push_message(shown.clone());
            }
            return Ok(TurnOutcome::Blocked {
                reason,
                reply,
                metadata: blocked_metadata,
            });
        }

        let (screened_reply, reply_metadata) = checked.into_parts();
        let reply = screened_reply.unwrap_or(received);
        metadata.extend(reply_metadata);
        context.push_message(reply.clone());
        info!(reply_len = reply.content().len(), "turn completed");
        Ok(TurnOutcome::Completed {
            sent,
            reply,
            metadata,
        })
    }

    async fn complete(
        &self,
        request: CompletionRequest,
        delivery: Delivery,
    ) -> Result<String, CompletionError> {
        let content = match delivery {
            Delivery::Whole => self.backend.send_chat(request).await?.content,
            Delivery::Streamed => {
                self.backend
                    .stream_chat(request)
                    .await?
                    .try_fold(String::new(), |mut buffer, chunk: CompletionChunk| async move {
                        buffer.push_str(&chunk.delta);
                        Ok::<_, CompletionError>(buffer)
                    })
                    .await?
            }
        };
        if content.is_empty() {
            return Err(CompletionError::EmptyReply);
        }
        Ok(content)
    }
}
