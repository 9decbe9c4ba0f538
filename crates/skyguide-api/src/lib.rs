//! HTTP surface for the SkyGuide contract assistant.
//!
//! Axum server exposing chat completions (blocking and SSE), conversation
//! and message history endpoints, and a health check, with OpenAPI docs
//! served from /api/docs.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_check,
        routes::conversations::create_conversation,
        routes::conversations::list_conversations,
        routes::conversations::get_conversation,
        routes::messages::list_messages,
        handlers::chat::chat_completion,
    ),
    components(schemas(
        routes::health::HealthResponse,
        routes::conversations::CreateConversationRequest,
        routes::conversations::ConversationResponse,
        routes::conversations::ListConversationsResponse,
        routes::messages::MessageResponse,
        routes::messages::ListMessagesResponse,
        handlers::chat::ChatCompletionRequest,
        handlers::chat::ChatCompletionResponse,
    )),
    tags(
        (name = "chat", description = "Contract Q&A relay"),
        (name = "conversations", description = "Conversation management"),
        (name = "messages", description = "Message history"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
