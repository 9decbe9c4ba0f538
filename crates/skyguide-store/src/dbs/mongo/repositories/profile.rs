#[cfg(feature = "mongodb")]
use mongodb::{bson::doc, bson::oid::ObjectId, Client, Collection};

#[cfg(feature = "mongodb")]
use crate::dbs::mongo::models::MongoProfile;
#[cfg(feature = "mongodb")]
use crate::error::Result;

#[cfg(feature = "mongodb")]
#[derive(Clone)]
pub struct MongoProfileRepository {
    collection: Collection<MongoProfile>,
}

#[cfg(feature = "mongodb")]
impl MongoProfileRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("profiles");
        Self { collection }
    }

    /// Get profile by user ID
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<MongoProfile>> {
        let filter = doc! { "user_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Count one answered query. Creates the profile lazily so users who
    /// signed up before profiles existed still get tracked.
    pub async fn increment_query_count(&self, user_id: &str) -> Result<()> {
        let filter = doc! { "user_id": user_id };
        let update = doc! { "$inc": { "query_count": 1 } };
        let result = self.collection.update_one(filter, update).await?;

        if result.matched_count == 0 {
            tracing::debug!("No profile for user {}, creating one", user_id);
            let profile = MongoProfile {
                id: ObjectId::new(),
                user_id: user_id.to_string(),
                subscription_plan: "free".to_string(),
                query_count: 1,
                is_admin: false,
            };
            self.collection.insert_one(&profile).await?;
        }

        Ok(())
    }
}
