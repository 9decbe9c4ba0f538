use crate::error::{AssistantError, Result};
use crate::streaming::RunStreamEvent;
use crate::types::{MessageList, Run, ThreadHandle, ThreadMessage};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::time::{Duration, Instant};

/// Provider primitives the relay is built on
///
/// One method per remote call so callers can wrap each in their own
/// retry policy. Implementations must be cheap to share behind an Arc.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Create a new provider thread, returning an owned handle
    async fn create_thread(&self) -> Result<ThreadHandle>;

    /// Append a user message to a thread
    async fn add_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage>;

    /// Start a run on a thread (non-streaming)
    async fn create_run(&self, thread_id: &str, assistant_id: &str, instructions: &str)
        -> Result<Run>;

    /// Fetch the current state of a run
    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// List messages in a thread, newest first
    async fn list_messages(&self, thread_id: &str) -> Result<MessageList>;

    /// Start a run and stream its events as they arrive
    async fn stream_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<RunStreamEvent>> + Send>>>;

    /// Poll a run until it reaches a terminal state or the deadline passes
    async fn poll_run(
        &self,
        thread_id: &str,
        run_id: &str,
        interval: Duration,
        timeout: Duration,
    ) -> Result<Run> {
        let deadline = Instant::now() + timeout;
        loop {
            let run = self.run_status(thread_id, run_id).await?;
            if run.status.is_terminal() {
                return Ok(run);
            }
            if Instant::now() >= deadline {
                return Err(AssistantError::PollTimeout {
                    run_id: run_id.to_string(),
                    waited: timeout,
                });
            }
            tokio::time::sleep(interval).await;
        }
    }
}
