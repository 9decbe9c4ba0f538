use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database-agnostic message model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    pub conversation_id: String,
    pub user_id: String,
    pub role: MessageRole,
    pub content: String,
    /// Contract citation extracted from an assistant reply, if any
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Default for StoredMessage {
    fn default() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: String::new(),
            user_id: String::new(),
            role: MessageRole::Assistant,
            content: String::new(),
            reference: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}
