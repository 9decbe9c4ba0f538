use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use skyguide_store::StoredMessage;

use crate::{
    error::ApiResult, routes::conversations::fetch_owned_conversation, session::SessionContext,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message_id: String,
    pub conversation_id: String,
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesResponse {
    pub messages: Vec<MessageResponse>,
    pub has_more: bool,
}

/// List messages in a conversation, oldest first
#[utoipa::path(
    get,
    path = "/conversations/{conversation_id}/messages",
    params(
        ("conversation_id" = String, Path, description = "Conversation ID"),
        ("limit" = Option<i64>, Query, description = "Maximum number of messages (default: 50)")
    ),
    responses(
        (status = 200, description = "List of messages", body = ListMessagesResponse),
        (status = 404, description = "Conversation not found")
    ),
    tag = "messages"
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Path(conversation_id): Path<String>,
    Query(query): Query<ListMessagesQuery>,
) -> ApiResult<Json<ListMessagesResponse>> {
    let _ = fetch_owned_conversation(&state, &session, &conversation_id).await?;

    let limit = query.limit.min(100); // Cap at 100

    let all_messages = state.store.get_messages(&conversation_id).await?;
    let messages: Vec<StoredMessage> = all_messages.into_iter().take(limit as usize).collect();

    let has_more = messages.len() as i64 == limit;
    let responses: Vec<MessageResponse> = messages.into_iter().map(message_to_response).collect();

    Ok(Json(ListMessagesResponse {
        messages: responses,
        has_more,
    }))
}

fn message_to_response(message: StoredMessage) -> MessageResponse {
    MessageResponse {
        message_id: message.id,
        conversation_id: message.conversation_id,
        role: message.role.as_str().to_string(),
        content: message.content,
        reference: message.reference,
        created_at: message.created_at,
    }
}
