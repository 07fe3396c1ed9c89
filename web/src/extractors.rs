//! Custom Axum extractors.
//!
//! - [`RequireAdmin`]: checks `Authorization: Bearer <token>` against the
//!   configured admin secret
//! - [`EventPath`]: parses the `:id` path segment into an [`EventId`]
//! - [`ApiJson`]: `Json` whose rejections use the `{code, message}` body
//!
//! # Examples
//!
//! ```ignore
//! async fn delete_event(
//!     _admin: RequireAdmin,
//!     State(state): State<AppState>,
//!     EventPath(id): EventPath,
//! ) -> Result<Json<MessageResponse>, AppError> {
//!     state.hub.delete(id).await?;
//!     Ok(Json(MessageResponse::ok("Event deleted successfully")))
//! }
//! ```

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::{header::AUTHORIZATION, request::Parts},
};
use volunteer_hub_core::EventId;

/// Proof that the request carried the admin bearer token.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
        })?;

        if token.is_empty()
            || !constant_time_eq::constant_time_eq(token.as_bytes(), state.admin_token.as_bytes())
        {
            tracing::warn!("Rejected admin request with invalid token");
            return Err(AppError::unauthorized("Unauthorized"));
        }

        Ok(Self)
    }
}

/// Event ID taken from the `:id` path segment.
#[derive(Debug, Clone, Copy)]
pub struct EventPath(pub EventId);

#[async_trait]
impl<S> FromRequestParts<S> for EventPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("Invalid event ID"))?;

        raw.parse::<EventId>()
            .map(Self)
            .map_err(|_| AppError::bad_request("Invalid event ID"))
    }
}

/// JSON body extractor reporting failures as [`AppError`].
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
