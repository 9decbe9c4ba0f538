//! Chat relay for contract Q&A.
//!
//! Sits between the HTTP surface and the assistant provider: gates
//! off-topic messages, guarantees conversation and thread bookkeeping,
//! retries transient provider failures with exponential backoff, and
//! sanitizes replies into displayable text plus a structured citation.

pub mod error;
pub mod events;
pub mod gate;
pub mod quota;
pub mod relay;
pub mod retry;
pub mod sanitize;

pub use error::{
    RelayError, Result, BUSY_NOTICE, GENERIC_FAILURE_NOTICE, RATE_LIMIT_NOTICE, TIMEOUT_NOTICE,
};
pub use events::RelayEvent;
pub use gate::{is_off_topic, OFF_TOPIC_GUIDANCE};
pub use quota::{is_trial_exhausted, FREE_PLAN_QUERY_ALLOWANCE, UPGRADE_NOTICE};
pub use relay::{ChatOutcome, ChatRelay, ChatRequest, RelayConfig};
pub use retry::{with_retry, RetryPolicy, DEFAULT_INITIAL_DELAY};
pub use sanitize::{sanitize, SanitizedResponse};
