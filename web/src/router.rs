//! Router configuration.

use crate::handlers::{admin, events, health_check, readiness_check};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete Axum router.
///
/// - `/health`, `/ready`: probes, no authentication
/// - `/api/events/...`: public reads and signup
/// - `/api/admin/events/...`: bearer-protected management
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/events", get(events::list_events))
        .route("/events/:id", get(events::get_event))
        .route("/events/:id/stats", get(events::get_event_stats))
        .route("/events/:id/signup", post(events::sign_up));

    let admin_routes = Router::new()
        .route(
            "/events",
            get(admin::list_all_events).post(admin::create_event),
        )
        .route(
            "/events/:id",
            put(admin::update_event).delete(admin::delete_event),
        );

    let api_routes = public_routes.nest("/admin", admin_routes);

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
