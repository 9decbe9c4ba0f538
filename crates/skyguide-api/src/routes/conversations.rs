use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use skyguide_store::Conversation;

use crate::{
    error::{ApiError, ApiResult},
    session::SessionContext,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListConversationsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListConversationsResponse {
    pub conversations: Vec<ConversationResponse>,
    pub has_more: bool,
}

/// Create a new conversation
#[utoipa::path(
    post,
    path = "/conversations",
    request_body = CreateConversationRequest,
    responses(
        (status = 201, description = "Conversation created", body = ConversationResponse),
        (status = 401, description = "Missing session")
    ),
    tag = "conversations"
)]
pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Json(req): Json<CreateConversationRequest>,
) -> ApiResult<(StatusCode, Json<ConversationResponse>)> {
    let conversation = state
        .store
        .create_conversation(&session.user_id, req.title)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(conversation_to_response(conversation)),
    ))
}

/// List the caller's conversations, most recently active first
#[utoipa::path(
    get,
    path = "/conversations",
    params(
        ("limit" = Option<i64>, Query, description = "Maximum number of conversations to return (default: 20)"),
        ("skip" = Option<i64>, Query, description = "Number of conversations to skip")
    ),
    responses(
        (status = 200, description = "List of conversations", body = ListConversationsResponse),
        (status = 401, description = "Missing session")
    ),
    tag = "conversations"
)]
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Query(query): Query<ListConversationsQuery>,
) -> ApiResult<Json<ListConversationsResponse>> {
    let limit = query.limit.min(100); // Cap at 100

    let conversations = state
        .store
        .list_conversations(&session.user_id, Some(limit), Some(query.skip))
        .await?;

    let has_more = conversations.len() as i64 == limit;
    let responses: Vec<ConversationResponse> = conversations
        .into_iter()
        .map(conversation_to_response)
        .collect();

    Ok(Json(ListConversationsResponse {
        conversations: responses,
        has_more,
    }))
}

/// Get a specific conversation by ID
#[utoipa::path(
    get,
    path = "/conversations/{conversation_id}",
    params(
        ("conversation_id" = String, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Conversation details", body = ConversationResponse),
        (status = 404, description = "Conversation not found")
    ),
    tag = "conversations"
)]
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Path(conversation_id): Path<String>,
) -> ApiResult<Json<ConversationResponse>> {
    let conversation = fetch_owned_conversation(&state, &session, &conversation_id).await?;
    Ok(Json(conversation_to_response(conversation)))
}

/// Look up a conversation and confirm the caller owns it.
///
/// Someone else's conversation id reads the same as a missing one.
pub(crate) async fn fetch_owned_conversation(
    state: &AppState,
    session: &SessionContext,
    conversation_id: &str,
) -> ApiResult<Conversation> {
    let conversation = state
        .store
        .get_conversation(conversation_id)
        .await?
        .filter(|c| c.user_id == session.user_id)
        .ok_or_else(|| ApiError::ConversationNotFound(conversation_id.to_string()))?;
    Ok(conversation)
}

fn conversation_to_response(conversation: Conversation) -> ConversationResponse {
    ConversationResponse {
        conversation_id: conversation.id,
        user_id: conversation.user_id,
        title: conversation.title,
        created_at: conversation.created_at,
        updated_at: conversation.updated_at,
    }
}
