// OpenAI Assistants API client (HTTP direct, no SDK)

use crate::error::{AssistantError, Result};
use crate::streaming::{parse_run_sse_stream, RunStreamEvent};
use crate::traits::AssistantApi;
use crate::types::{AssistantThread, MessageList, Run, ThreadHandle, ThreadMessage};
use async_trait::async_trait;
use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::pin::Pin;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const ASSISTANTS_BETA: &str = "assistants=v1";

pub struct AssistantClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AssistantClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("OpenAI-Beta", HeaderValue::from_static(ASSISTANTS_BETA));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| AssistantError::InvalidApiKey)?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API base (tests, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn run_payload(assistant_id: &str, instructions: &str, stream: bool) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "assistant_id": assistant_id,
            "instructions": instructions,
        });
        if stream {
            payload["stream"] = serde_json::json!(true);
        }
        payload
    }
}

#[async_trait]
impl AssistantApi for AssistantClient {
    async fn create_thread(&self) -> Result<ThreadHandle> {
        let response = self
            .http_client
            .post(format!("{}/threads", self.base_url))
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api { status, body });
        }

        let thread: AssistantThread = response.json().await?;
        tracing::debug!(thread_id = %thread.id, "Provider thread created");
        Ok(thread.into())
    }

    async fn add_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage> {
        let payload = serde_json::json!({
            "role": "user",
            "content": content,
        });

        let response = self
            .http_client
            .post(format!("{}/threads/{}/messages", self.base_url, thread_id))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<Run> {
        let payload = Self::run_payload(assistant_id, instructions, false);

        let response = self
            .http_client
            .post(format!("{}/threads/{}/runs", self.base_url, thread_id))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let response = self
            .http_client
            .get(format!(
                "{}/threads/{}/runs/{}",
                self.base_url, thread_id, run_id
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    async fn list_messages(&self, thread_id: &str) -> Result<MessageList> {
        let response = self
            .http_client
            .get(format!("{}/threads/{}/messages", self.base_url, thread_id))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    async fn stream_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        instructions: &str,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<RunStreamEvent>> + Send>>> {
        let payload = Self::run_payload(assistant_id, instructions, true);

        let response = self
            .http_client
            .post(format!("{}/threads/{}/runs", self.base_url, thread_id))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api { status, body });
        }

        Ok(parse_run_sse_stream(response))
    }
}
