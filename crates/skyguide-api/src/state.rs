use std::sync::Arc;

use skyguide_relay::ChatRelay;
use skyguide_store::ConversationStore;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// All resources are wrapped in Arc for efficient sharing across async tasks.
/// The relay is created once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ConversationStore>,
    pub relay: ChatRelay,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ConversationStore>, relay: ChatRelay) -> Self {
        Self {
            config: Arc::new(config),
            store,
            relay,
        }
    }
}
