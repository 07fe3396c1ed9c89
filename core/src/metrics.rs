//! Business metrics for Volunteer Hub.
//!
//! # Exported Metrics
//!
//! - `volunteer_hub_signups_total{outcome}` - signup attempts by outcome
//! - `volunteer_hub_events_created_total` - events published
//! - `volunteer_hub_events_deleted_total` - events removed
//! - `volunteer_hub_commit_conflicts_total` - conditional replaces that lost a race
//! - `volunteer_hub_notifications_total{kind,outcome}` - email delivery results

use crate::error::{ErrorKind, HubError};
use metrics::describe_counter;

/// Register metric descriptions.
///
/// Call once at startup, before any metrics are recorded.
pub fn register_metrics() {
    describe_counter!(
        "volunteer_hub_signups_total",
        "Signup attempts by outcome (accepted, role_full, duplicate, not_found, invalid, unavailable)"
    );
    describe_counter!("volunteer_hub_events_created_total", "Events published");
    describe_counter!("volunteer_hub_events_deleted_total", "Events deleted");
    describe_counter!(
        "volunteer_hub_commit_conflicts_total",
        "Conditional replaces rejected because the event changed after it was read"
    );
    describe_counter!(
        "volunteer_hub_notifications_total",
        "Signup notifications by kind and outcome"
    );

    tracing::info!("Volunteer Hub metrics registered");
}

/// Record the result of a signup attempt.
pub fn record_signup<T>(result: &Result<T, HubError>) {
    let outcome = match result {
        Ok(_) => "accepted",
        Err(error) => match error.kind() {
            ErrorKind::RoleFull => "role_full",
            ErrorKind::DuplicateSignup => "duplicate",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "invalid",
            ErrorKind::TransientStore => "unavailable",
        },
    };
    metrics::counter!("volunteer_hub_signups_total", "outcome" => outcome).increment(1);
}

/// Record an event created.
pub fn record_event_created() {
    metrics::counter!("volunteer_hub_events_created_total").increment(1);
}

/// Record an event deleted.
pub fn record_event_deleted() {
    metrics::counter!("volunteer_hub_events_deleted_total").increment(1);
}

/// Record a lost conditional replace.
pub fn record_commit_conflict() {
    metrics::counter!("volunteer_hub_commit_conflicts_total").increment(1);
}

/// Record a notification delivery attempt.
pub fn record_notification(kind: &'static str, delivered: bool) {
    let outcome = if delivered { "sent" } else { "failed" };
    metrics::counter!("volunteer_hub_notifications_total", "kind" => kind, "outcome" => outcome)
        .increment(1);
}
