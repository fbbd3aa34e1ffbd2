//! Domain types for chat conversations.
//!
//! These types carry no infrastructure dependencies. Messages are immutable
//! after construction; plugins rewrite them by producing new values.

mod attachment;
mod context;
mod ids;
mod message;
mod role;
mod value;

pub use attachment::{Attachment, AttachmentKind};
pub use context::ConversationContext;
pub use ids::{ConversationId, MessageId};
pub use message::Message;
pub use role::{ParseRoleError, Role};
pub use value::{Metadata, PluginValue, PluginValueError, PluginValueKind};
