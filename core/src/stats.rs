//! Fill statistics derived from an event snapshot.

use crate::types::Event;
use serde::{Deserialize, Serialize};

/// Per-role fill figures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleStats {
    /// Role name
    pub name: String,
    /// Capacity
    pub total_slots: u32,
    /// Volunteers signed up
    pub filled_slots: u32,
    /// `total_slots - filled_slots`
    pub available_slots: u32,
}

/// Whole-event fill figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    /// Number of roles
    pub total_roles: usize,
    /// Sum of role capacities
    pub total_slots: u64,
    /// Sum of volunteers across roles
    pub filled_slots: u64,
    /// `filled / total * 100`, one decimal place; `0.0` when there is no capacity
    pub fill_percentage: f64,
    /// Breakdown in role order
    pub roles: Vec<RoleStats>,
}

/// Compute fill statistics for an event.
#[must_use]
pub fn compute_stats(event: &Event) -> EventStats {
    let roles: Vec<RoleStats> = event
        .roles
        .iter()
        .map(|role| RoleStats {
            name: role.name.clone(),
            total_slots: role.total_slots,
            filled_slots: role.filled_slots(),
            available_slots: role.available_slots(),
        })
        .collect();

    let total_slots: u64 = roles.iter().map(|r| u64::from(r.total_slots)).sum();
    let filled_slots: u64 = roles.iter().map(|r| u64::from(r.filled_slots)).sum();

    EventStats {
        total_roles: roles.len(),
        total_slots,
        filled_slots,
        fill_percentage: fill_percentage(filled_slots, total_slots),
        roles,
    }
}

#[allow(clippy::cast_precision_loss)] // slot counts are far below 2^52
fn fill_percentage(filled: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percentage = filled as f64 / total as f64 * 100.0;
    (percentage * 10.0).round() / 10.0
}
