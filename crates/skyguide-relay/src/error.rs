use skyguide_assistant::AssistantError;
use skyguide_store::StoreError;
use thiserror::Error;

/// Notice shown when the assistant took too long to answer.
pub const TIMEOUT_NOTICE: &str =
    "The request took too long to process. Please try a shorter or simpler question.";

/// Notice shown when the provider is rate limiting us.
pub const RATE_LIMIT_NOTICE: &str =
    "Our service is experiencing high demand. Please try again in a few moments.";

/// Notice shown when another reply is still being produced for the conversation.
pub const BUSY_NOTICE: &str =
    "Please wait for the current reply to finish before sending another message.";

/// Fallback notice for everything else.
pub const GENERIC_FAILURE_NOTICE: &str =
    "I'm having trouble processing your request right now. Please try again in a moment.";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("A reply is already in flight for conversation {0}")]
    Busy(String),

    #[error("Conversation not found: {0}")]
    UnknownConversation(String),

    #[error("Assistant run ended as {status}")]
    RunFailed {
        status: String,
        message: Option<String>,
    },

    #[error("Assistant run completed without a reply")]
    EmptyReply,

    #[error(transparent)]
    Assistant(#[from] AssistantError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RelayError {
    pub fn is_busy(&self) -> bool {
        matches!(self, RelayError::Busy(_))
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RelayError::Assistant(e) if e.is_rate_limited())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RelayError::Assistant(e) if e.is_timeout())
    }

    /// Guidance safe to show to the end user for this failure.
    ///
    /// The internal error detail stays in logs; the user sees one of a
    /// small set of fixed sentences.
    pub fn user_notice(&self) -> &'static str {
        if self.is_timeout() {
            TIMEOUT_NOTICE
        } else if self.is_rate_limited() {
            RATE_LIMIT_NOTICE
        } else if self.is_busy() {
            BUSY_NOTICE
        } else {
            GENERIC_FAILURE_NOTICE
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
