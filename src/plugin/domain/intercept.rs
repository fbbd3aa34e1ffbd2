//! Outcome of a single interceptor invocation.

use crate::conversation::domain::{Message, Metadata, PluginValue};

/// What an interceptor decided about a message.
///
/// When `should_continue` is false the pipeline stops immediately and the
/// replacement message, if present, is what the caller emits instead of the
/// original. A crisis block is such a stop: a deliberate, successful
/// outcome rather than an error.
///
/// # Examples
///
/// ```
/// use aimate::conversation::domain::Message;
/// use aimate::plugin::domain::InterceptResult;
/// use mockable::DefaultClock;
///
/// let reply = Message::assistant("Please reach out for support.", &DefaultClock);
/// let result = InterceptResult::block("Crisis intervention activated", reply)
///     .with_metadata("distress_level", "critical");
///
/// assert!(!result.should_continue());
/// assert!(result.modified_message().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InterceptResult {
    should_continue: bool,
    modified_message: Option<Message>,
    cancel_reason: Option<String>,
    metadata: Metadata,
}

impl InterceptResult {
    /// Lets the message through untouched.
    #[must_use]
    pub fn proceed() -> Self {
        Self {
            should_continue: true,
            modified_message: None,
            cancel_reason: None,
            metadata: Metadata::new(),
        }
    }

    /// Lets the pipeline continue with a replacement message.
    #[must_use]
    pub fn proceed_with(message: Message) -> Self {
        Self {
            modified_message: Some(message),
            ..Self::proceed()
        }
    }

    /// Stops the pipeline and emits `replacement` instead.
    #[must_use]
    pub fn block(reason: impl Into<String>, replacement: Message) -> Self {
        Self {
            should_continue: false,
            modified_message: Some(replacement),
            cancel_reason: Some(reason.into()),
            metadata: Metadata::new(),
        }
    }

    /// Stops the pipeline without emitting a replacement.
    #[must_use]
    pub fn cancel(reason: impl Into<String>) -> Self {
        Self {
            should_continue: false,
            modified_message: None,
            cancel_reason: Some(reason.into()),
            metadata: Metadata::new(),
        }
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<PluginValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Merges a whole metadata map; existing keys are overwritten.
    #[must_use]
    pub fn with_metadata_map(mut self, metadata: Metadata) -> Self {
        self.metadata.extend(metadata);
        self
    }

    /// Returns whether later interceptors should run.
    #[must_use]
    pub const fn should_continue(&self) -> bool {
        self.should_continue
    }

    /// Returns the replacement message, if any.
    #[must_use]
    pub const fn modified_message(&self) -> Option<&Message> {
        self.modified_message.as_ref()
    }

    /// Returns the cancellation reason, if any.
    #[must_use]
    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Consumes the result, returning the replacement message and metadata.
    #[must_use]
    pub fn into_parts(self) -> (Option<Message>, Metadata) {
        (self.modified_message, self.metadata)
    }
}

impl Default for InterceptResult {
    fn default() -> Self {
        Self::proceed()
    }
}
