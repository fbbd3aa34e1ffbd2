//! Sequential interceptor pipelines.

use super::guard::catch_panic;
use super::manager::PluginManager;
use crate::conversation::domain::{ConversationContext, Message, Metadata};
use crate::plugin::domain::{InterceptResult, PluginId, PluginStage};
use crate::plugin::ports::MessageInterceptor;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, warn};

/// Errors that stop a pipeline without delivering a message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// The caller cancelled the turn while an interceptor was running.
    #[error("pipeline cancelled while {plugin_id} was running")]
    Cancelled {
        /// Interceptor that was running.
        plugin_id: PluginId,
    },

    /// An interceptor exceeded the configured time limit.
    #[error("interceptor {plugin_id} exceeded its {limit:?} time limit")]
    TimedOut {
        /// Interceptor that timed out.
        plugin_id: PluginId,
        /// Configured limit.
        limit: Duration,
    },
}

/// Direction of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePass {
    /// User message on its way to the completion backend.
    BeforeSend,
    /// Assistant reply on its way back to the user.
    AfterReceive,
}

impl PipelinePass {
    const fn stage(self) -> PluginStage {
        match self {
            Self::BeforeSend => PluginStage::BeforeSend,
            Self::AfterReceive => PluginStage::AfterReceive,
        }
    }
}

impl fmt::Display for PipelinePass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stage().as_str())
    }
}

type Interceptors = Vec<(PluginId, Arc<dyn MessageInterceptor>)>;

impl PluginManager {
    /// Runs every interceptor over an outbound user message.
    ///
    /// Interceptors run one at a time in ascending priority order, each
    /// seeing the message as rewritten by the previous one. The first
    /// result with `should_continue() == false` is returned as is.
    /// Otherwise the result carries the final message and the merged
    /// metadata of every interceptor (later keys win).
    ///
    /// Interceptor errors and panics are logged, published as
    /// [`PluginEvent::Error`](crate::plugin::domain::PluginEvent::Error)
    /// and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when `cancel` fires or an interceptor
    /// exceeds the configured timeout.
    #[instrument(
        skip_all,
        fields(conversation_id = %context.conversation_id(), message_id = %message.id())
    )]
    pub async fn on_before_send(
        &self,
        message: &Message,
        context: &mut ConversationContext,
        cancel: &CancellationToken,
    ) -> Result<InterceptResult, PipelineError> {
        let interceptors = self.interceptor_snapshot();
        self.run_pass(PipelinePass::BeforeSend, interceptors, message, context, cancel)
            .await
    }

    /// Runs every interceptor over an inbound assistant reply.
    ///
    /// Same contract as [`Self::on_before_send`], but interceptors run in
    /// descending priority order so the highest-priority plugin inspects
    /// the reply last.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when `cancel` fires or an interceptor
    /// exceeds the configured timeout.
    #[instrument(
        skip_all,
        fields(conversation_id = %context.conversation_id(), message_id = %message.id())
    )]
    pub async fn on_after_receive(
        &self,
        message: &Message,
        context: &mut ConversationContext,
        cancel: &CancellationToken,
    ) -> Result<InterceptResult, PipelineError> {
        let mut interceptors = self.interceptor_snapshot();
        interceptors.reverse();
        self.run_pass(PipelinePass::AfterReceive, interceptors, message, context, cancel)
            .await
    }

    async fn run_pass(
        &self,
        pass: PipelinePass,
        interceptors: Interceptors,
        message: &Message,
        context: &mut ConversationContext,
        cancel: &CancellationToken,
    ) -> Result<InterceptResult, PipelineError> {
        let mut current = message.clone();
        let mut metadata = Metadata::new();

        for (plugin_id, interceptor) in interceptors {
            let Some(result) = self
                .invoke(pass, &plugin_id, interceptor.as_ref(), &current, context, cancel)
                .await?
            else {
                continue;
            };

            if !result.should_continue() {
                warn!(
                    plugin_id = %plugin_id,
                    %pass,
                    reason = result.cancel_reason().unwrap_or_default(),
                    "message intercepted"
                );
                return Ok(result);
            }

            let (modified, result_metadata) = result.into_parts();
            if let Some(rewritten) = modified {
                current = rewritten;
            }
            metadata.extend(result_metadata);
        }

        debug!(%pass, "pipeline completed");
        Ok(InterceptResult::proceed_with(current).with_metadata_map(metadata))
    }

    async fn invoke(
        &self,
        pass: PipelinePass,
        plugin_id: &PluginId,
        interceptor: &dyn MessageInterceptor,
        message: &Message,
        context: &mut ConversationContext,
        cancel: &CancellationToken,
    ) -> Result<Option<InterceptResult>, PipelineError> {
        let call = match pass {
            PipelinePass::BeforeSend => interceptor.on_before_send(message, context),
            PipelinePass::AfterReceive => interceptor.on_after_receive(message, context),
        };
        let guarded = catch_panic(call);
        let limited = async {
            match self.config.interceptor_timeout() {
                Some(limit) => tokio::time::timeout(limit, guarded).await.map_err(|_elapsed| {
                    PipelineError::TimedOut {
                        plugin_id: plugin_id.clone(),
                        limit,
                    }
                }),
                None => Ok(guarded.await),
            }
        };

        let raced = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(PipelineError::Cancelled {
                plugin_id: plugin_id.clone(),
            }),
            finished = limited => finished,
        };
        let outcome = match raced {
            Ok(settled) => settled,
            Err(err) => {
                warn!(plugin_id = %plugin_id, %pass, error = %err, "pipeline stopped");
                self.publish_error(plugin_id, pass.stage(), err.to_string());
                return Err(err);
            }
        };

        match outcome {
            Ok(Ok(result)) => Ok(Some(result)),
            Ok(Err(err)) => {
                error!(plugin_id = %plugin_id, %pass, error = %err, "interceptor failed");
                self.publish_error(plugin_id, pass.stage(), err.to_string());
                Ok(None)
            }
            Err(panic) => {
                error!(plugin_id = %plugin_id, %pass, panic = %panic, "interceptor panicked");
                self.publish_error(plugin_id, pass.stage(), panic);
                Ok(None)
            }
        }
    }
}
