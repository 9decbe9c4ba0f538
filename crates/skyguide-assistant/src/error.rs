use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Assistant API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse assistant response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Run {run_id} did not reach a terminal state within {waited:?}")]
    PollTimeout { run_id: String, waited: Duration },

    #[error("Invalid API key format")]
    InvalidApiKey,
}

impl AssistantError {
    /// Whether a retry has a chance of succeeding.
    ///
    /// Rate limits, provider-side failures, and network-level errors are
    /// transient. Client errors (bad request, auth, not found) are not.
    pub fn is_transient(&self) -> bool {
        match self {
            AssistantError::Api { status, .. } => *status == 429 || *status >= 500,
            AssistantError::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AssistantError::Api { status: 429, .. })
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            AssistantError::PollTimeout { .. } => true,
            AssistantError::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
