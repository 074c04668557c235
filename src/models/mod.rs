pub mod completion;
pub mod conversation;
pub mod message;
pub mod platform;
pub mod scheduled_post;

pub use completion::{Completion, FailureKind, NO_CONTENT_FALLBACK};
pub use conversation::Conversation;
pub use message::{Message, Role};
pub use platform::Platform;
pub use scheduled_post::ScheduledPost;
