//! Admin endpoints. Every handler takes [`RequireAdmin`], so a missing or
//! wrong bearer token is rejected with 401 before the body is read.
//!
//! - `GET /api/admin/events` - every event, most recent first
//! - `POST /api/admin/events` - create
//! - `PUT /api/admin/events/:id` - partial update
//! - `DELETE /api/admin/events/:id` - delete with all signups

use crate::error::AppError;
use crate::extractors::{ApiJson, EventPath, RequireAdmin};
use crate::state::AppState;
use crate::views::{EventResponse, EventView, MessageResponse};
use axum::{Json, extract::State, http::StatusCode};
use volunteer_hub_core::{EventPatch, NewEvent};

/// List every event, past ones included.
///
/// # Errors
///
/// - 401 without the admin token
/// - 503 if the store is unavailable
pub async fn list_all_events(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<EventView>>, AppError> {
    let events = state.hub.list_all().await?;
    Ok(Json(EventView::all(events, state.hub.now())))
}

/// Create an event.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3000/api/admin/events \
///   -H "Authorization: Bearer $ADMIN_TOKEN" \
///   -H "Content-Type: application/json" \
///   -d '{
///     "title": "Community Food Drive",
///     "date": "2025-06-01",
///     "time": "9:00 AM - 3:00 PM",
///     "description": "Help sort and distribute food",
///     "roles": [{"name": "Food Sorter", "totalSlots": 5}]
///   }'
/// ```
///
/// # Errors
///
/// - 401 without the admin token
/// - 422 if the draft is incomplete
/// - 503 if the store is unavailable
pub async fn create_event(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewEvent>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let event = state.hub.create(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(EventResponse::ok(
            "Event created successfully",
            EventView::new(event, state.hub.now()),
        )),
    ))
}

/// Merge the supplied fields into an event.
///
/// # Errors
///
/// - 400 if the ID is malformed
/// - 401 without the admin token
/// - 404 if the event does not exist
/// - 422 if the result is invalid
/// - 503 if the store is unavailable
pub async fn update_event(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    EventPath(id): EventPath,
    ApiJson(patch): ApiJson<EventPatch>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state.hub.update(id, &patch).await?;

    Ok(Json(EventResponse::ok(
        "Event updated successfully",
        EventView::new(event, state.hub.now()),
    )))
}

/// Delete an event and all of its signups.
///
/// # Errors
///
/// - 400 if the ID is malformed
/// - 401 without the admin token
/// - 404 if the event does not exist
/// - 503 if the store is unavailable
pub async fn delete_event(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    EventPath(id): EventPath,
) -> Result<Json<MessageResponse>, AppError> {
    state.hub.delete(id).await?;
    Ok(Json(MessageResponse::ok("Event deleted successfully")))
}
