mod conversation;
mod message;
mod profile;

// Export database-agnostic models
pub use conversation::Conversation;
pub use message::{MessageRole, StoredMessage};
pub use profile::Profile;
