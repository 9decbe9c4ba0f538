#[cfg(feature = "mongodb")]
use chrono::Utc;
#[cfg(feature = "mongodb")]
use futures::TryStreamExt;
#[cfg(feature = "mongodb")]
use mongodb::{bson, bson::doc, bson::oid::ObjectId, bson::Bson, Client, Collection};

#[cfg(feature = "mongodb")]
use crate::dbs::mongo::models::MongoConversation;
#[cfg(feature = "mongodb")]
use crate::error::{Result, StoreError};

#[cfg(feature = "mongodb")]
#[derive(Clone)]
pub struct MongoConversationRepository {
    collection: Collection<MongoConversation>,
}

#[cfg(feature = "mongodb")]
impl MongoConversationRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("conversations");
        Self { collection }
    }

    /// Create a new conversation
    pub async fn create_conversation(
        &self,
        user_id: String,
        title: Option<String>,
    ) -> Result<MongoConversation> {
        let now = Utc::now();
        let conversation = MongoConversation {
            id: ObjectId::new(),
            user_id,
            title,
            provider_thread_id: None,
            created_at: now,
            updated_at: now,
        };

        self.collection.insert_one(&conversation).await?;
        Ok(conversation)
    }

    /// Get conversation by ID
    pub async fn get_conversation(
        &self,
        conversation_id: ObjectId,
    ) -> Result<Option<MongoConversation>> {
        let filter = doc! { "_id": conversation_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// List conversations for a user, most recently updated first
    pub async fn list_conversations(
        &self,
        user_id: &str,
        limit: Option<i64>,
        skip: Option<i64>,
    ) -> Result<Vec<MongoConversation>> {
        let filter = doc! { "user_id": user_id };
        let mut find_opts = self
            .collection
            .find(filter)
            .sort(doc! { "updated_at": -1 });

        if let Some(limit) = limit {
            find_opts = find_opts.limit(limit);
        }
        if let Some(skip) = skip {
            find_opts = find_opts.skip(skip.try_into().unwrap_or(0));
        }

        let conversations = find_opts.await?.try_collect().await?;
        Ok(conversations)
    }

    /// Bind a provider thread to a conversation that has none yet.
    ///
    /// The filter matches only while `provider_thread_id` is null or absent,
    /// so a concurrent bind cannot overwrite an existing binding. The
    /// read-back tells every caller which thread ID actually won.
    pub async fn bind_thread(
        &self,
        conversation_id: ObjectId,
        thread_id: &str,
    ) -> Result<String> {
        let filter = doc! { "_id": conversation_id, "provider_thread_id": Bson::Null };
        let update = doc! {
            "$set": {
                "provider_thread_id": thread_id,
                "updated_at": bson::DateTime::now(),
            }
        };

        self.collection.update_one(filter, update).await?;

        let conversation = self
            .collection
            .find_one(doc! { "_id": conversation_id })
            .await?
            .ok_or_else(|| StoreError::ConversationNotFound(conversation_id.to_hex()))?;

        Ok(conversation
            .provider_thread_id
            .unwrap_or_else(|| thread_id.to_string()))
    }

    /// Bump `updated_at`
    pub async fn touch(&self, conversation_id: ObjectId) -> Result<()> {
        let filter = doc! { "_id": conversation_id };
        let update = doc! { "$set": { "updated_at": bson::DateTime::now() } };
        self.collection.update_one(filter, update).await?;
        Ok(())
    }
}
