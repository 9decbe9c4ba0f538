use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures::StreamExt;
use tokio::sync::mpsc;

use skyguide_assistant::{
    AssistantApi, RunStatus, RunStreamEvent, DEFAULT_RUN_INSTRUCTIONS,
};
use skyguide_store::{Conversation, ConversationStore, MessageRole, StoredMessage};

use crate::error::{RelayError, Result};
use crate::events::RelayEvent;
use crate::gate::{self, OFF_TOPIC_GUIDANCE};
use crate::quota::{self, FREE_PLAN_QUERY_ALLOWANCE, UPGRADE_NOTICE};
use crate::retry::{with_retry, RetryPolicy, DEFAULT_INITIAL_DELAY};
use crate::sanitize::sanitize;

/// One inbound chat request, after HTTP decoding.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub user_id: String,
    pub content: String,
    /// Plan the client believes it is on; overridden by the stored
    /// profile when one exists.
    pub subscription_plan: String,
    /// Absent for the first message of a brand-new conversation.
    pub conversation_id: Option<String>,
    /// Overrides the configured assistant when set.
    pub assistant_id: Option<String>,
    /// Extra retry attempts requested by the client, capped server-side.
    pub retry_count: u32,
}

/// Result of a relayed chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// The assistant produced an answer.
    Answer {
        conversation_id: String,
        content: String,
        reference: Option<String>,
    },
    /// The request was answered without reaching the assistant.
    Redirected { notice: String },
}

/// Relay tunables.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Assistant used when the request does not name one.
    pub assistant_id: String,
    /// Instructions attached to every run.
    pub run_instructions: String,
    /// First backoff delay for retried provider calls.
    pub initial_retry_delay: Duration,
    /// Status-poll cadence on the non-streaming path.
    pub poll_interval: Duration,
    /// Hard ceiling on how long a non-streaming run may stay unfinished.
    pub poll_timeout: Duration,
    /// Questions included with the free plan.
    pub free_query_allowance: i64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            assistant_id: String::new(),
            run_instructions: DEFAULT_RUN_INSTRUCTIONS.to_string(),
            initial_retry_delay: DEFAULT_INITIAL_DELAY,
            poll_interval: Duration::from_secs(1),
            poll_timeout: Duration::from_secs(120),
            free_query_allowance: FREE_PLAN_QUERY_ALLOWANCE,
        }
    }
}

/// Top-level entry point invoked once per user message.
///
/// Walks a fixed pipeline: content gate, busy claim, trial allowance,
/// conversation and thread bookkeeping, message post, assistant run,
/// sanitize, persist. Cloning is cheap; every relay shares the same
/// in-flight table.
#[derive(Clone)]
pub struct ChatRelay {
    assistant: Arc<dyn AssistantApi>,
    store: Arc<dyn ConversationStore>,
    config: RelayConfig,
    in_flight: Arc<DashMap<String, ()>>,
}

impl ChatRelay {
    pub fn new(
        assistant: Arc<dyn AssistantApi>,
        store: Arc<dyn ConversationStore>,
        config: RelayConfig,
    ) -> Self {
        Self {
            assistant,
            store,
            config,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Handle a request end to end, returning once the answer is ready.
    pub async fn send(&self, request: ChatRequest) -> Result<ChatOutcome> {
        self.execute(request, None).await
    }

    /// Handle a request in the background, streaming progress events.
    ///
    /// The stream always ends with a `Done` or `Error` event.
    pub fn spawn_send(&self, request: ChatRequest) -> mpsc::Receiver<RelayEvent> {
        let (tx, rx) = mpsc::channel(1000);
        let relay = self.clone();

        tokio::spawn(async move {
            let started = Instant::now();
            match relay.execute(request, Some(tx.clone())).await {
                Ok(ChatOutcome::Answer { .. }) => {
                    let _ = tx
                        .send(RelayEvent::Done {
                            status: "completed".to_string(),
                            total_duration_ms: started.elapsed().as_millis() as u64,
                        })
                        .await;
                }
                Ok(ChatOutcome::Redirected { notice }) => {
                    let _ = tx.send(RelayEvent::Redirect { notice }).await;
                    let _ = tx
                        .send(RelayEvent::Done {
                            status: "redirected".to_string(),
                            total_duration_ms: started.elapsed().as_millis() as u64,
                        })
                        .await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Relay failed");
                    let _ = tx
                        .send(RelayEvent::Error {
                            message: e.to_string(),
                            notice: e.user_notice().to_string(),
                        })
                        .await;
                }
            }
        });

        rx
    }

    async fn execute(
        &self,
        request: ChatRequest,
        events: Option<mpsc::Sender<RelayEvent>>,
    ) -> Result<ChatOutcome> {
        // Gate first: an off-topic message must not touch the store or
        // the provider.
        if gate::is_off_topic(&request.content) {
            tracing::info!(user_id = %request.user_id, "Message gated as off-topic");
            return Ok(ChatOutcome::Redirected {
                notice: OFF_TOPIC_GUIDANCE.to_string(),
            });
        }

        // Claim the conversation before reading or writing any of its
        // state. For brand-new conversations the claim happens right
        // after the row is created instead.
        let mut guard = match &request.conversation_id {
            Some(id) => Some(InFlightGuard::claim(&self.in_flight, id)?),
            None => None,
        };

        let profile = self.store.get_profile(&request.user_id).await?;
        let (plan, query_count, is_admin) = match &profile {
            Some(p) => (p.subscription_plan.as_str(), p.query_count, p.is_admin),
            None => (request.subscription_plan.as_str(), 0, false),
        };
        if quota::is_trial_exhausted(plan, query_count, is_admin, self.config.free_query_allowance)
        {
            tracing::info!(user_id = %request.user_id, "Free-trial allowance exhausted");
            return Ok(ChatOutcome::Redirected {
                notice: UPGRADE_NOTICE.to_string(),
            });
        }

        let conversation = self.ensure_conversation(&request).await?;
        if guard.is_none() {
            guard = Some(InFlightGuard::claim(&self.in_flight, &conversation.id)?);
        }
        let _guard = guard;

        if let Some(tx) = &events {
            let _ = tx
                .send(RelayEvent::Init {
                    conversation_id: conversation.id.clone(),
                    timestamp: chrono::Utc::now().timestamp_millis(),
                })
                .await;
        }

        // Persist the user's message before any remote call so it
        // survives a relay failure.
        self.store
            .save_message(StoredMessage {
                conversation_id: conversation.id.clone(),
                user_id: request.user_id.clone(),
                role: MessageRole::User,
                content: request.content.clone(),
                ..Default::default()
            })
            .await?;

        let policy = RetryPolicy::for_request(request.retry_count, self.config.initial_retry_delay);
        let thread_id = self.ensure_thread(&conversation, &policy).await?;

        with_retry(&policy, "message.post", || {
            self.assistant.add_message(&thread_id, &request.content)
        })
        .await?;

        let assistant_id = request
            .assistant_id
            .as_deref()
            .unwrap_or(&self.config.assistant_id);

        let raw_answer = match &events {
            Some(tx) => {
                self.run_streaming(&thread_id, assistant_id, &policy, tx)
                    .await?
            }
            None => self.run_blocking(&thread_id, assistant_id, &policy).await?,
        };

        let sanitized = sanitize(&raw_answer);
        if let (Some(tx), Some(reference)) = (&events, &sanitized.reference) {
            let _ = tx
                .send(RelayEvent::Reference {
                    content: reference.clone(),
                })
                .await;
        }

        self.store
            .save_message(StoredMessage {
                conversation_id: conversation.id.clone(),
                user_id: request.user_id.clone(),
                role: MessageRole::Assistant,
                content: sanitized.content.clone(),
                reference: sanitized.reference.clone(),
                ..Default::default()
            })
            .await?;

        // Usage bookkeeping stays off the critical path.
        let store = Arc::clone(&self.store);
        let user_id = request.user_id.clone();
        let conversation_id = conversation.id.clone();
        tokio::spawn(async move {
            if let Err(e) = store.increment_query_count(&user_id).await {
                tracing::warn!(error = %e, user_id = %user_id, "Failed to bump query count");
            }
            if let Err(e) = store.touch_conversation(&conversation_id).await {
                tracing::warn!(error = %e, conversation_id = %conversation_id, "Failed to touch conversation");
            }
        });

        Ok(ChatOutcome::Answer {
            conversation_id: conversation.id,
            content: sanitized.content,
            reference: sanitized.reference,
        })
    }

    /// Fetch the request's conversation, or create one titled after the
    /// opening message.
    async fn ensure_conversation(&self, request: &ChatRequest) -> Result<Conversation> {
        if let Some(id) = &request.conversation_id {
            let conversation = self
                .store
                .get_conversation(id)
                .await?
                .ok_or_else(|| RelayError::UnknownConversation(id.clone()))?;
            // A conversation id from another user is indistinguishable
            // from an unknown one on purpose.
            if conversation.user_id != request.user_id {
                return Err(RelayError::UnknownConversation(id.clone()));
            }
            return Ok(conversation);
        }

        let title = derive_title(&request.content);
        let conversation = self
            .store
            .create_conversation(&request.user_id, Some(title))
            .await?;
        tracing::info!(conversation_id = %conversation.id, "Conversation created");
        Ok(conversation)
    }

    /// Return the conversation's provider thread, creating and binding
    /// one on first use.
    ///
    /// The bind is conditional on no thread being set yet, so under a
    /// concurrent first message only one thread survives. The loser
    /// adopts the winner's thread and releases its own.
    async fn ensure_thread(
        &self,
        conversation: &Conversation,
        policy: &RetryPolicy,
    ) -> Result<String> {
        if let Some(thread_id) = &conversation.provider_thread_id {
            return Ok(thread_id.clone());
        }

        let handle = with_retry(policy, "thread.create", || self.assistant.create_thread()).await?;
        tracing::info!(thread_id = %handle.id(), conversation_id = %conversation.id, "Thread created");

        let bound = self.store.bind_thread(&conversation.id, handle.id()).await?;
        if bound != handle.id() {
            tracing::warn!(
                conversation_id = %conversation.id,
                orphaned = %handle.id(),
                adopted = %bound,
                "Concurrent thread bind, adopting winner"
            );
            handle.dispose().await;
        }
        Ok(bound)
    }

    /// Streaming run: forward deltas as they arrive and accumulate the
    /// full reply.
    async fn run_streaming(
        &self,
        thread_id: &str,
        assistant_id: &str,
        policy: &RetryPolicy,
        tx: &mpsc::Sender<RelayEvent>,
    ) -> Result<String> {
        let mut stream = with_retry(policy, "run.stream", || {
            self.assistant
                .stream_run(thread_id, assistant_id, &self.config.run_instructions)
        })
        .await?;

        let mut answer = String::new();
        let mut completed = false;

        while let Some(event) = stream.next().await {
            match event? {
                RunStreamEvent::Delta { content } => {
                    answer.push_str(&content);
                    let _ = tx
                        .send(RelayEvent::Delta { content })
                        .await;
                }
                RunStreamEvent::Completed => completed = true,
                RunStreamEvent::Failed { status, message } => {
                    return Err(RelayError::RunFailed { status, message });
                }
                RunStreamEvent::Done => break,
            }
        }

        if answer.is_empty() {
            return Err(RelayError::EmptyReply);
        }
        if !completed {
            tracing::warn!(thread_id = %thread_id, "Stream ended without a completion event");
        }
        Ok(answer)
    }

    /// Non-streaming run: poll to a terminal status, then read the
    /// newest assistant message back.
    async fn run_blocking(
        &self,
        thread_id: &str,
        assistant_id: &str,
        policy: &RetryPolicy,
    ) -> Result<String> {
        let run = with_retry(policy, "run.create", || {
            self.assistant
                .create_run(thread_id, assistant_id, &self.config.run_instructions)
        })
        .await?;

        let finished = self
            .assistant
            .poll_run(
                thread_id,
                &run.id,
                self.config.poll_interval,
                self.config.poll_timeout,
            )
            .await?;

        if finished.status != RunStatus::Completed {
            return Err(RelayError::RunFailed {
                status: finished.status.as_str().to_string(),
                message: finished.error_message().map(String::from),
            });
        }

        let messages = self.assistant.list_messages(thread_id).await?;
        messages
            .latest_assistant_text()
            .ok_or(RelayError::EmptyReply)
    }
}

/// Busy marker for one conversation, released on drop.
struct InFlightGuard {
    in_flight: Arc<DashMap<String, ()>>,
    conversation_id: String,
}

impl InFlightGuard {
    fn claim(in_flight: &Arc<DashMap<String, ()>>, conversation_id: &str) -> Result<Self> {
        use dashmap::mapref::entry::Entry;
        match in_flight.entry(conversation_id.to_string()) {
            Entry::Occupied(_) => Err(RelayError::Busy(conversation_id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(Self {
                    in_flight: Arc::clone(in_flight),
                    conversation_id: conversation_id.to_string(),
                })
            }
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.remove(&self.conversation_id);
    }
}

/// First words of the opening message, capped for list views.
fn derive_title(content: &str) -> String {
    const MAX_TITLE_CHARS: usize = 60;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return "New conversation".to_string();
    }
    if trimmed.chars().count() <= MAX_TITLE_CHARS {
        return trimmed.to_string();
    }
    let mut title: String = trimmed.chars().take(MAX_TITLE_CHARS).collect();
    title.push('…');
    title
}
