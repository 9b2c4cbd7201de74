//! Acting-user extractor.
//!
//! The upstream gateway authenticates callers and forwards the acting
//! user's numeric id in `x-actor-id`. Resolution against the user store
//! happens in the service layer, not here.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;

const ACTOR_HEADER: &str = "x-actor-id";

/// Numeric id of the acting user, taken from the `x-actor-id` header.
pub struct ActorId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for ActorId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::client("Missing x-actor-id header"))?;
        let id = value
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::client("x-actor-id header must be a numeric user id"))?;
        Ok(ActorId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<ActorId, AppError> {
        let (mut parts, _) = req.into_parts();
        ActorId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn parses_numeric_header() {
        let req = Request::builder()
            .header("x-actor-id", "42")
            .body(())
            .unwrap();
        let ActorId(id) = extract(req).await.unwrap();
        assert_eq!(id, 42);
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let req = Request::builder().body(()).unwrap();
        assert!(extract(req).await.is_err());
    }

    #[tokio::test]
    async fn rejects_non_numeric_header() {
        let req = Request::builder()
            .header("x-actor-id", "alice")
            .body(())
            .unwrap();
        assert!(extract(req).await.is_err());
    }
}
