use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// Identity of the calling user, taken from the `x-user-id` header.
///
/// The gateway in front of this service verifies the auth token and
/// forwards the resolved user id; requests arriving without it are
/// rejected before any handler logic runs.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        Ok(Self {
            user_id: user_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<SessionContext, ApiError> {
        let (mut parts, _) = request.into_parts();
        SessionContext::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_user_id_header_is_required() {
        let request = Request::builder().body(()).unwrap();
        assert!(matches!(
            extract(request).await,
            Err(ApiError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_blank_user_id_is_rejected() {
        let request = Request::builder()
            .header("x-user-id", "   ")
            .body(())
            .unwrap();
        assert!(matches!(
            extract(request).await,
            Err(ApiError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_user_id_is_extracted() {
        let request = Request::builder()
            .header("x-user-id", "user_42")
            .body(())
            .unwrap();
        let session = extract(request).await.unwrap();
        assert_eq!(session.user_id, "user_42");
    }
}
