#[cfg(feature = "mongodb")]
use futures::TryStreamExt;
#[cfg(feature = "mongodb")]
use mongodb::{bson::doc, bson::oid::ObjectId, Client, Collection};

#[cfg(feature = "mongodb")]
use crate::dbs::mongo::models::MongoMessage;
#[cfg(feature = "mongodb")]
use crate::error::Result;

#[cfg(feature = "mongodb")]
#[derive(Clone)]
pub struct MongoMessageRepository {
    collection: Collection<MongoMessage>,
}

#[cfg(feature = "mongodb")]
impl MongoMessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("messages");
        Self { collection }
    }

    /// Save a single message
    pub async fn save_message(&self, message: MongoMessage) -> Result<ObjectId> {
        self.collection.insert_one(&message).await?;
        Ok(message.id)
    }

    /// Get all messages for a conversation, oldest first
    pub async fn get_messages(&self, conversation_id: ObjectId) -> Result<Vec<MongoMessage>> {
        let filter = doc! { "conversation_id": conversation_id };
        let messages = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(messages)
    }
}
