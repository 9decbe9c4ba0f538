use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::{Result, StoreError};
use crate::models::{Conversation, Profile, StoredMessage};
use crate::store::ConversationStore;

/// In-memory store for tests and local development.
///
/// A single lock over all collections keeps bind_thread's check-then-set
/// atomic without any database machinery.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    conversations: HashMap<String, Conversation>,
    messages: Vec<StoredMessage>,
    profiles: HashMap<String, Profile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile directly (profiles are otherwise written by billing)
    pub async fn upsert_profile(&self, profile: Profile) {
        let mut inner = self.inner.lock().await;
        inner.profiles.insert(profile.user_id.clone(), profile);
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn create_conversation(
        &self,
        user_id: &str,
        title: Option<String>,
    ) -> Result<Conversation> {
        let now = Utc::now();
        let conversation = Conversation {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title,
            provider_thread_id: None,
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.lock().await;
        inner
            .conversations
            .insert(conversation.id.clone(), conversation.clone());
        Ok(conversation)
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<Option<Conversation>> {
        let inner = self.inner.lock().await;
        Ok(inner.conversations.get(conversation_id).cloned())
    }

    async fn list_conversations(
        &self,
        user_id: &str,
        limit: Option<i64>,
        skip: Option<i64>,
    ) -> Result<Vec<Conversation>> {
        let inner = self.inner.lock().await;
        let mut conversations: Vec<Conversation> = inner
            .conversations
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let skip = skip.unwrap_or(0).max(0) as usize;
        let mut conversations: Vec<Conversation> =
            conversations.into_iter().skip(skip).collect();
        if let Some(limit) = limit {
            conversations.truncate(limit.max(0) as usize);
        }
        Ok(conversations)
    }

    async fn bind_thread(&self, conversation_id: &str, thread_id: &str) -> Result<String> {
        let mut inner = self.inner.lock().await;
        let conversation = inner
            .conversations
            .get_mut(conversation_id)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation_id.to_string()))?;

        match &conversation.provider_thread_id {
            Some(existing) => Ok(existing.clone()),
            None => {
                conversation.provider_thread_id = Some(thread_id.to_string());
                conversation.updated_at = Utc::now();
                Ok(thread_id.to_string())
            }
        }
    }

    async fn touch_conversation(&self, conversation_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let conversation = inner
            .conversations
            .get_mut(conversation_id)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation_id.to_string()))?;
        conversation.updated_at = Utc::now();
        Ok(())
    }

    async fn save_message(&self, message: StoredMessage) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.messages.push(message);
        Ok(())
    }

    async fn get_messages(&self, conversation_id: &str) -> Result<Vec<StoredMessage>> {
        let inner = self.inner.lock().await;
        let mut messages: Vec<StoredMessage> = inner
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let inner = self.inner.lock().await;
        Ok(inner.profiles.get(user_id).cloned())
    }

    async fn increment_query_count(&self, user_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let profile = inner
            .profiles
            .entry(user_id.to_string())
            .or_insert_with(|| Profile::free(user_id));
        profile.query_count += 1;
        Ok(())
    }
}
