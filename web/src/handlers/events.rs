//! Public event endpoints.
//!
//! - `GET /api/events` - upcoming events, soonest first
//! - `GET /api/events/:id` - one event
//! - `GET /api/events/:id/stats` - fill statistics
//! - `POST /api/events/:id/signup` - sign up for a role

use crate::error::AppError;
use crate::extractors::{ApiJson, EventPath};
use crate::state::AppState;
use crate::views::{EventResponse, EventView};
use axum::{Json, extract::State};
use serde::Deserialize;
use volunteer_hub_core::{EventStats, SignupNotice, dispatch_signup_notices};

/// Signup request body.
///
/// Every field is optional at the JSON level so an incomplete body gets the
/// same `400 Missing required fields` regardless of which field is absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Volunteer name
    pub name: Option<String>,
    /// Volunteer email
    pub email: Option<String>,
    /// Zero-based role position
    pub role_index: Option<i64>,
}

/// List upcoming events.
///
/// # Example
///
/// ```bash
/// curl http://localhost:3000/api/events
/// ```
///
/// # Errors
///
/// 503 if the store is unavailable.
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventView>>, AppError> {
    let events = state.hub.list_upcoming().await?;
    Ok(Json(EventView::all(events, state.hub.now())))
}

/// Get one event.
///
/// # Errors
///
/// - 400 if the ID is malformed
/// - 404 if the event does not exist
/// - 503 if the store is unavailable
pub async fn get_event(
    State(state): State<AppState>,
    EventPath(id): EventPath,
) -> Result<Json<EventView>, AppError> {
    let event = state
        .hub
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;

    Ok(Json(EventView::new(event, state.hub.now())))
}

/// Fill statistics for one event.
///
/// # Errors
///
/// - 400 if the ID is malformed
/// - 404 if the event does not exist
/// - 503 if the store is unavailable
pub async fn get_event_stats(
    State(state): State<AppState>,
    EventPath(id): EventPath,
) -> Result<Json<EventStats>, AppError> {
    let stats = state
        .hub
        .event_stats(id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;

    Ok(Json(stats))
}

/// Sign up for a role.
///
/// Emails go out on a detached task after the signup is committed; their
/// failure never changes the response.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3000/api/events/<id>/signup \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Ada", "email": "ada@example.com", "roleIndex": 0}'
/// ```
///
/// # Errors
///
/// - 400 if a field is missing or the ID is malformed
/// - 404 if the event or role does not exist
/// - 409 if the role is full or the email is already on it
/// - 422 if the name or email is blank
/// - 503 if the store is unavailable
pub async fn sign_up(
    State(state): State<AppState>,
    EventPath(id): EventPath,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let (Some(name), Some(email), Some(role_index)) =
        (request.name, request.email, request.role_index)
    else {
        return Err(AppError::bad_request("Missing required fields"));
    };

    // A negative position can never name a role.
    let role_index =
        usize::try_from(role_index).map_err(|_| AppError::not_found("Role not found"))?;

    let receipt = state.hub.sign_up(id, role_index, &name, &email).await?;

    dispatch_signup_notices(state.notifier.clone(), SignupNotice::from(&receipt));

    let message = format!(
        "Thank you, {}! You're signed up! Check your email for confirmation.",
        receipt.volunteer.name
    );
    Ok(Json(EventResponse::ok(
        message,
        EventView::new(receipt.event, state.hub.now()),
    )))
}
