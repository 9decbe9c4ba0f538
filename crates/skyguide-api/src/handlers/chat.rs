use axum::{
    extract::State,
    response::sse::{Event, Sse},
    response::IntoResponse,
    response::Response,
    Json,
};
use futures::stream::StreamExt;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use utoipa::ToSchema;

use skyguide_relay::{ChatOutcome, ChatRequest};

use crate::{
    error::{ApiError, ApiResult},
    session::SessionContext,
    state::AppState,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletionRequest {
    pub content: String,
    #[serde(default = "default_plan")]
    pub subscription_plan: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Overrides the configured assistant when set
    #[serde(default)]
    pub assistant_id: Option<String>,
    /// Accepted for older clients; scheduling is first-come first-served
    #[serde(default)]
    pub priority: bool,
    #[serde(default)]
    pub stream: bool,
    /// Extra retry attempts requested by the client, capped server-side
    #[serde(default)]
    pub retry_count: u32,
}

fn default_plan() -> String {
    "free".to_string()
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletionResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Relay a chat message to the contract assistant
///
/// With `stream: true` the reply arrives as Server-Sent Events; otherwise
/// the full answer is returned in one JSON body.
#[utoipa::path(
    post,
    path = "/chat/completions",
    request_body = ChatCompletionRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatCompletionResponse),
        (status = 401, description = "Missing session"),
        (status = 429, description = "Rate limited or conversation busy"),
        (status = 500, description = "Relay failure")
    ),
    tag = "chat"
)]
pub async fn chat_completion(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Json(req): Json<ChatCompletionRequest>,
) -> ApiResult<Response> {
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("content must not be empty".to_string()));
    }
    if req.priority {
        tracing::debug!(user_id = %session.user_id, "Priority flag received; no fast lane exists");
    }

    let request = ChatRequest {
        user_id: session.user_id,
        content: req.content,
        subscription_plan: req.subscription_plan,
        conversation_id: req.conversation_id,
        assistant_id: req.assistant_id,
        retry_count: req.retry_count,
    };

    if req.stream {
        let receiver = state.relay.spawn_send(request);

        // Forward relay events as named SSE events with JSON payloads.
        let sse_stream = ReceiverStream::new(receiver).map(|event| {
            let sse_event = Event::default().event(event.name()).json_data(&event);
            Ok::<Event, Infallible>(sse_event.unwrap())
        });

        return Ok(Sse::new(sse_stream).into_response());
    }

    let response = match state.relay.send(request).await? {
        ChatOutcome::Answer {
            conversation_id,
            content,
            reference,
        } => ChatCompletionResponse {
            response: content,
            reference,
            conversation_id: Some(conversation_id),
        },
        ChatOutcome::Redirected { notice } => ChatCompletionResponse {
            response: notice,
            reference: None,
            conversation_id: None,
        },
    };

    Ok(Json(response).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_the_wire_shape() {
        let body = r#"{
            "content": "What is the reserve call-out policy?",
            "subscriptionPlan": "monthly",
            "conversationId": "conv_1",
            "assistantId": "asst_9",
            "priority": true,
            "stream": true,
            "retryCount": 2
        }"#;

        let req: ChatCompletionRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.subscription_plan, "monthly");
        assert_eq!(req.conversation_id.as_deref(), Some("conv_1"));
        assert_eq!(req.assistant_id.as_deref(), Some("asst_9"));
        assert!(req.priority);
        assert!(req.stream);
        assert_eq!(req.retry_count, 2);
    }

    #[test]
    fn test_request_defaults() {
        let req: ChatCompletionRequest =
            serde_json::from_str(r#"{"content": "What about sick leave?"}"#).unwrap();
        assert_eq!(req.subscription_plan, "free");
        assert_eq!(req.conversation_id, None);
        assert!(!req.priority);
        assert!(!req.stream);
        assert_eq!(req.retry_count, 0);
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = ChatCompletionResponse {
            response: "Covered in Section 9.".to_string(),
            reference: Some("Section 9, Page 30: Sick leave".to_string()),
            conversation_id: Some("conv_1".to_string()),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["response"], "Covered in Section 9.");
        assert_eq!(json["reference"], "Section 9, Page 30: Sick leave");
        assert_eq!(json["conversationId"], "conv_1");
    }

    #[test]
    fn test_redirect_response_omits_optional_fields() {
        let response = ChatCompletionResponse {
            response: "Please ask about your contract.".to_string(),
            reference: None,
            conversation_id: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("reference").is_none());
        assert!(json.get("conversationId").is_none());
    }
}
