#[cfg(feature = "mongodb")]
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
#[cfg(feature = "mongodb")]
use chrono::{DateTime, Utc};
#[cfg(feature = "mongodb")]
use mongodb::bson::oid::ObjectId;
#[cfg(feature = "mongodb")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "mongodb")]
use crate::models::{Conversation, MessageRole, Profile, StoredMessage};

/// MongoDB-specific conversation model (uses ObjectId)
#[cfg(feature = "mongodb")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConversation {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: String,
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_thread_id: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// MongoDB-specific message model (uses ObjectId)
#[cfg(feature = "mongodb")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub conversation_id: ObjectId,
    pub user_id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// MongoDB-specific subscription profile
#[cfg(feature = "mongodb")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoProfile {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: String,
    #[serde(default = "default_plan")]
    pub subscription_plan: String,
    #[serde(default)]
    pub query_count: i64,
    #[serde(default)]
    pub is_admin: bool,
}

#[cfg(feature = "mongodb")]
fn default_plan() -> String {
    "free".to_string()
}

// Conversions between database-agnostic and MongoDB-specific models

#[cfg(feature = "mongodb")]
impl From<StoredMessage> for MongoMessage {
    fn from(msg: StoredMessage) -> Self {
        // Parse ids as ObjectId, or create new if invalid
        let id = ObjectId::parse_str(&msg.id).unwrap_or_else(|_| ObjectId::new());
        let conversation_id =
            ObjectId::parse_str(&msg.conversation_id).unwrap_or_else(|_| ObjectId::new());

        Self {
            id,
            conversation_id,
            user_id: msg.user_id,
            role: msg.role,
            content: msg.content,
            reference: msg.reference,
            created_at: msg.created_at,
        }
    }
}

#[cfg(feature = "mongodb")]
impl From<MongoMessage> for StoredMessage {
    fn from(msg: MongoMessage) -> Self {
        Self {
            id: msg.id.to_hex(),
            conversation_id: msg.conversation_id.to_hex(),
            user_id: msg.user_id,
            role: msg.role,
            content: msg.content,
            reference: msg.reference,
            created_at: msg.created_at,
        }
    }
}

#[cfg(feature = "mongodb")]
impl From<MongoConversation> for Conversation {
    fn from(conversation: MongoConversation) -> Self {
        Self {
            id: conversation.id.to_hex(),
            user_id: conversation.user_id,
            title: conversation.title,
            provider_thread_id: conversation.provider_thread_id,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

#[cfg(feature = "mongodb")]
impl From<MongoProfile> for Profile {
    fn from(profile: MongoProfile) -> Self {
        Self {
            user_id: profile.user_id,
            subscription_plan: profile.subscription_plan,
            query_count: profile.query_count,
            is_admin: profile.is_admin,
        }
    }
}
