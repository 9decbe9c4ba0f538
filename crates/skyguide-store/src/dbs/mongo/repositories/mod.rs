pub mod conversation;
pub mod message;
pub mod profile;

#[cfg(feature = "mongodb")]
pub use conversation::MongoConversationRepository;
#[cfg(feature = "mongodb")]
pub use message::MongoMessageRepository;
#[cfg(feature = "mongodb")]
pub use profile::MongoProfileRepository;
