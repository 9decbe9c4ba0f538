use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Conversation, Profile, StoredMessage};

/// Trait for conversation persistence operations
///
/// Implementations provide database-specific CRUD operations
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Create a new conversation for a user
    async fn create_conversation(
        &self,
        user_id: &str,
        title: Option<String>,
    ) -> Result<Conversation>;

    /// Get a conversation by ID
    async fn get_conversation(&self, conversation_id: &str) -> Result<Option<Conversation>>;

    /// List conversations for a user, most recently updated first
    async fn list_conversations(
        &self,
        user_id: &str,
        limit: Option<i64>,
        skip: Option<i64>,
    ) -> Result<Vec<Conversation>>;

    /// Bind a provider thread to a conversation if none is bound yet.
    ///
    /// Create-if-absent: under concurrent binds only the first write lands,
    /// and every caller gets back the thread ID that actually won.
    async fn bind_thread(&self, conversation_id: &str, thread_id: &str) -> Result<String>;

    /// Bump a conversation's `updated_at` timestamp
    async fn touch_conversation(&self, conversation_id: &str) -> Result<()>;

    /// Save a single message
    async fn save_message(&self, message: StoredMessage) -> Result<()>;

    /// Get all messages for a conversation, oldest first
    async fn get_messages(&self, conversation_id: &str) -> Result<Vec<StoredMessage>>;

    /// Get the subscription profile for a user
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>>;

    /// Count one answered query against the user's allowance
    async fn increment_query_count(&self, user_id: &str) -> Result<()>;
}
