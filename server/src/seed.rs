//! Sample events for demos and local development.

use chrono::{DateTime, Duration, Utc};
use volunteer_hub_core::{HubError, NewEvent, RoleDraft, VolunteerHub};

fn sample(
    title: &str,
    date: DateTime<Utc>,
    time: &str,
    description: &str,
    roles: &[(&str, i64)],
) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        date,
        time: time.to_string(),
        description: description.to_string(),
        roles: roles
            .iter()
            .map(|(name, slots)| RoleDraft::new(*name, *slots))
            .collect(),
        created_by: None,
    }
}

/// The five sample events, dated relative to `now` so they are all upcoming.
#[must_use]
pub fn sample_events(now: DateTime<Utc>) -> Vec<NewEvent> {
    vec![
        sample(
            "Community Food Drive",
            now + Duration::days(7),
            "10:00 AM - 2:00 PM",
            "Help us collect and distribute food to families in need. We need volunteers to sort donations, pack boxes, and assist with distribution.",
            &[("Food Sorter", 5), ("Distribution Helper", 3), ("Registration Desk", 2)],
        ),
        sample(
            "Beach Cleanup Day",
            now + Duration::days(12),
            "8:00 AM - 12:00 PM",
            "Join us for a morning of environmental action! Help keep our beaches clean and protect marine life. All supplies provided.",
            &[("Cleanup Crew", 15), ("Team Leader", 3), ("Photographer", 1)],
        ),
        sample(
            "Senior Center Holiday Party",
            now + Duration::days(14),
            "2:00 PM - 5:00 PM",
            "Spread cheer by helping organize and run a festive party for seniors in our community. Activities include games, music, and refreshments.",
            &[("Activity Coordinator", 4), ("Kitchen Helper", 3), ("Entertainment", 2)],
        ),
        sample(
            "Youth Mentorship Program",
            now + Duration::days(33),
            "4:00 PM - 6:00 PM",
            "Make a lasting impact by mentoring local youth. Help with homework, share career advice, and be a positive role model.",
            &[("Tutor", 8), ("Career Mentor", 5), ("Activity Leader", 3)],
        ),
        sample(
            "Animal Shelter Support",
            now + Duration::days(38),
            "9:00 AM - 1:00 PM",
            "Help care for animals at our local shelter. Tasks include walking dogs, socializing cats, cleaning facilities, and administrative support.",
            &[
                ("Dog Walker", 6),
                ("Cat Socializer", 4),
                ("Facility Cleaner", 3),
                ("Admin Support", 2),
            ],
        ),
    ]
}

/// Insert the sample events if the store holds no events at all.
///
/// Returns how many were inserted.
///
/// # Errors
///
/// Returns [`HubError`] if the store cannot be read or written.
pub async fn seed_if_empty(hub: &VolunteerHub) -> Result<usize, HubError> {
    if !hub.list_all().await?.is_empty() {
        tracing::info!("Store already has events, skipping sample data");
        return Ok(0);
    }

    let drafts = sample_events(hub.now());
    let count = drafts.len();
    for draft in drafts {
        let event = hub.create(draft).await?;
        tracing::info!(event_id = %event.id, title = %event.title, "🌱 Seeded sample event");
    }
    Ok(count)
}
