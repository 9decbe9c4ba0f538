use serde::{Deserialize, Serialize};

/// Subscription profile consulted by the quota gate.
///
/// Profiles are written by the billing side of the product; this crate
/// only reads them and bumps `query_count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    #[serde(default = "default_plan")]
    pub subscription_plan: String,
    #[serde(default)]
    pub query_count: i64,
    #[serde(default)]
    pub is_admin: bool,
}

impl Profile {
    /// Fresh free-plan profile with no usage
    pub fn free(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            subscription_plan: default_plan(),
            query_count: 0,
            is_admin: false,
        }
    }
}

fn default_plan() -> String {
    "free".to_string()
}
