use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database-agnostic conversation model
///
/// `provider_thread_id` starts out unset and is bound exactly once, the
/// first time a reply is generated for the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub provider_thread_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
