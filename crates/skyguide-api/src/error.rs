use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skyguide_relay::{RelayError, GENERIC_FAILURE_NOTICE};
use skyguide_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing or invalid session")]
    Unauthorized,

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::ConversationNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Relay(e) if e.is_busy() || e.is_rate_limited() => {
                StatusCode::TOO_MANY_REQUESTS
            }
            ApiError::Relay(RelayError::UnknownConversation(_)) => StatusCode::NOT_FOUND,
            ApiError::Relay(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Sentence shown to the end user in place of the raw error.
    fn notice(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "Please sign in to continue.",
            ApiError::ConversationNotFound(_)
            | ApiError::Relay(RelayError::UnknownConversation(_)) => {
                "That conversation is no longer available. Please start a new one."
            }
            ApiError::BadRequest(_) => "That request could not be understood.",
            ApiError::Relay(e) => e.user_notice(),
            ApiError::Store(_) => GENERIC_FAILURE_NOTICE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, detail = ?self, "Request failed");
        }

        // Fixed failure envelope: `response` carries the user-safe text,
        // `error`/`details` carry diagnostics.
        let body = Json(json!({
            "error": self.to_string(),
            "details": format!("{self:?}"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "response": self.notice(),
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use skyguide_relay::{BUSY_NOTICE, RATE_LIMIT_NOTICE, TIMEOUT_NOTICE};
    use skyguide_assistant::AssistantError;
    use std::time::Duration;

    #[test]
    fn test_unauthorized_maps_to_401() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_rate_limit_and_busy_map_to_429() {
        let rate_limited = ApiError::Relay(RelayError::Assistant(AssistantError::Api {
            status: 429,
            body: "rate limited".to_string(),
        }));
        assert_eq!(rate_limited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(rate_limited.notice(), RATE_LIMIT_NOTICE);

        let busy = ApiError::Relay(RelayError::Busy("conv_1".to_string()));
        assert_eq!(busy.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(busy.notice(), BUSY_NOTICE);
    }

    #[test]
    fn test_timeout_keeps_500_with_timeout_notice() {
        let err = ApiError::Relay(RelayError::Assistant(AssistantError::PollTimeout {
            run_id: "run_1".to_string(),
            waited: Duration::from_secs(120),
        }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.notice(), TIMEOUT_NOTICE);
    }

    #[test]
    fn test_unknown_conversation_maps_to_404() {
        let err = ApiError::Relay(RelayError::UnknownConversation("c1".to_string()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
