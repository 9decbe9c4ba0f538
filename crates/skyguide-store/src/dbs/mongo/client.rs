#[cfg(feature = "mongodb")]
use async_trait::async_trait;
#[cfg(feature = "mongodb")]
use mongodb::{bson::oid::ObjectId, Client};

#[cfg(feature = "mongodb")]
use crate::dbs::mongo::models::MongoMessage;
#[cfg(feature = "mongodb")]
use crate::dbs::mongo::repositories::{
    MongoConversationRepository, MongoMessageRepository, MongoProfileRepository,
};
#[cfg(feature = "mongodb")]
use crate::error::{Result, StoreError};
#[cfg(feature = "mongodb")]
use crate::models::{Conversation, Profile, StoredMessage};
#[cfg(feature = "mongodb")]
use crate::store::ConversationStore;

#[cfg(feature = "mongodb")]
pub struct MongoStore {
    conversation_repo: MongoConversationRepository,
    message_repo: MongoMessageRepository,
    profile_repo: MongoProfileRepository,
}

#[cfg(feature = "mongodb")]
impl MongoStore {
    /// Connect to MongoDB and create the store
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!("MongoDB store ready, database: {}", database);

        let conversation_repo = MongoConversationRepository::new(&client, database);
        let message_repo = MongoMessageRepository::new(&client, database);
        let profile_repo = MongoProfileRepository::new(&client, database);

        Ok(Self {
            conversation_repo,
            message_repo,
            profile_repo,
        })
    }
}

#[cfg(feature = "mongodb")]
#[async_trait]
impl ConversationStore for MongoStore {
    async fn create_conversation(
        &self,
        user_id: &str,
        title: Option<String>,
    ) -> Result<Conversation> {
        let conversation = self
            .conversation_repo
            .create_conversation(user_id.to_string(), title)
            .await?;
        Ok(conversation.into())
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<Option<Conversation>> {
        // An id that cannot be an ObjectId cannot name a stored conversation.
        let Ok(object_id) = ObjectId::parse_str(conversation_id) else {
            return Ok(None);
        };

        let conversation = self.conversation_repo.get_conversation(object_id).await?;
        Ok(conversation.map(|c| c.into()))
    }

    async fn list_conversations(
        &self,
        user_id: &str,
        limit: Option<i64>,
        skip: Option<i64>,
    ) -> Result<Vec<Conversation>> {
        let conversations = self
            .conversation_repo
            .list_conversations(user_id, limit, skip)
            .await?;
        Ok(conversations.into_iter().map(|c| c.into()).collect())
    }

    async fn bind_thread(&self, conversation_id: &str, thread_id: &str) -> Result<String> {
        let object_id = ObjectId::parse_str(conversation_id)
            .map_err(|e| StoreError::InvalidObjectId(e.to_string()))?;

        self.conversation_repo.bind_thread(object_id, thread_id).await
    }

    async fn touch_conversation(&self, conversation_id: &str) -> Result<()> {
        let object_id = ObjectId::parse_str(conversation_id)
            .map_err(|e| StoreError::InvalidObjectId(e.to_string()))?;

        self.conversation_repo.touch(object_id).await
    }

    async fn save_message(&self, message: StoredMessage) -> Result<()> {
        let mongo_message: MongoMessage = message.into();
        self.message_repo.save_message(mongo_message).await?;
        Ok(())
    }

    async fn get_messages(&self, conversation_id: &str) -> Result<Vec<StoredMessage>> {
        let object_id = ObjectId::parse_str(conversation_id)
            .map_err(|e| StoreError::InvalidObjectId(e.to_string()))?;

        let mongo_messages = self.message_repo.get_messages(object_id).await?;
        Ok(mongo_messages.into_iter().map(|m| m.into()).collect())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let profile = self.profile_repo.get_profile(user_id).await?;
        Ok(profile.map(|p| p.into()))
    }

    async fn increment_query_count(&self, user_id: &str) -> Result<()> {
        self.profile_repo.increment_query_count(user_id).await
    }
}
