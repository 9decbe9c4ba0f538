use serde::{Deserialize, Serialize};

/// Wire representation of a provider thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantThread {
    pub id: String,
    #[serde(default)]
    pub created_at: i64,
}

/// Owned handle to a provider thread.
///
/// The caller that creates a thread owns its lifecycle. Today the provider
/// expires idle threads server-side, so [`ThreadHandle::dispose`] only logs;
/// swap in a DELETE call there if explicit cleanup becomes necessary.
#[derive(Debug, Clone)]
pub struct ThreadHandle {
    id: String,
}

impl ThreadHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn into_id(self) -> String {
        self.id
    }

    /// Release the provider thread
    pub async fn dispose(self) {
        tracing::debug!(thread_id = %self.id, "Releasing provider thread");
    }
}

impl From<AssistantThread> for ThreadHandle {
    fn from(thread: AssistantThread) -> Self {
        Self { id: thread.id }
    }
}
