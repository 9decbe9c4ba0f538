pub mod dbs;
pub mod error;
pub mod memory;
pub mod models;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::{Conversation, MessageRole, Profile, StoredMessage};
pub use store::ConversationStore;

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoStore;
