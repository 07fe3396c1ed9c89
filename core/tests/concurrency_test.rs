//! Concurrency stress tests for last-slot scenarios.
//!
//! Many signups race for the same role on a multi-threaded runtime. The
//! revision-checked replace must never let more volunteers in than there are
//! slots.
//!
//! Run with: `cargo test --test concurrency_test -- --nocapture`

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use std::collections::HashSet;
use std::sync::Arc;
use volunteer_hub_core::environment::SystemClock;
use volunteer_hub_core::{ErrorKind, EventId, HubConfig, VolunteerHub};
use volunteer_hub_testing::InMemoryEventStore;
use volunteer_hub_testing::fixtures::upcoming_draft;

fn hub_over(store: &InMemoryEventStore, max_commit_attempts: u32) -> VolunteerHub {
    VolunteerHub::new(
        Arc::new(store.clone()),
        Arc::new(SystemClock),
        HubConfig::default().with_max_commit_attempts(max_commit_attempts),
    )
}

/// Race `requests` distinct volunteers for one role, returning
/// `(accepted, role_full)` counts.
async fn race(hub: &VolunteerHub, event_id: EventId, requests: usize) -> (usize, usize) {
    let mut handles = Vec::with_capacity(requests);
    for i in 0..requests {
        let hub = hub.clone();
        handles.push(tokio::spawn(async move {
            hub.sign_up(event_id, 0, &format!("Volunteer {i}"), &format!("v{i}@example.com"))
                .await
        }));
    }

    let mut accepted = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(error) => {
                assert_eq!(error.kind(), ErrorKind::RoleFull, "unexpected error: {error}");
                full += 1;
            }
        }
    }
    (accepted, full)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_signups_for_last_slot() {
    let store = InMemoryEventStore::new();
    let hub = hub_over(&store, HubConfig::DEFAULT_MAX_COMMIT_ATTEMPTS);
    let event = hub
        .create(upcoming_draft("Senior Center Holiday Party", &[("Photographer", 1)]))
        .await
        .unwrap();

    let (accepted, full) = race(&hub, event.id, 2).await;

    assert_eq!(accepted, 1);
    assert_eq!(full, 1);
    assert_eq!(store.snapshot(event.id).unwrap().event.roles[0].volunteers.len(), 1);
}

/// 100 concurrent signups for 1 slot: exactly one wins.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_last_slot_concurrency_100_requests() {
    println!("🧪 Concurrency Stress Test: 100 concurrent signups for 1 slot");

    let store = InMemoryEventStore::new();
    let hub = hub_over(&store, HubConfig::DEFAULT_MAX_COMMIT_ATTEMPTS);
    let event = hub
        .create(upcoming_draft("Community Food Drive", &[("Team Leader", 1)]))
        .await
        .unwrap();

    let (accepted, full) = race(&hub, event.id, 100).await;
    println!("  ✅ accepted: {accepted}, ❌ role full: {full}");

    assert_eq!(accepted, 1, "exactly one signup must win the last slot");
    assert_eq!(full, 99);
    assert_eq!(store.snapshot(event.id).unwrap().event.roles[0].volunteers.len(), 1);
}

/// 60 concurrent signups for 5 slots: exactly five win, all distinct.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_no_overbooking_with_several_slots() {
    let store = InMemoryEventStore::new();
    // Each commit can cost every in-flight request one round.
    let hub = hub_over(&store, 64);
    let event = hub
        .create(upcoming_draft("Youth Mentorship Program", &[("Career Mentor", 5)]))
        .await
        .unwrap();

    let (accepted, full) = race(&hub, event.id, 60).await;

    assert_eq!(accepted, 5);
    assert_eq!(full, 55);

    let role = store.snapshot(event.id).unwrap().event.roles[0].clone();
    assert_eq!(role.volunteers.len(), 5);
    let emails: HashSet<_> = role.volunteers.iter().map(|v| v.email.clone()).collect();
    assert_eq!(emails.len(), 5);
}

/// The same email racing itself lands once; the rest are duplicates.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_email_racing_lands_once() {
    let store = InMemoryEventStore::new();
    let hub = hub_over(&store, 64);
    let event = hub
        .create(upcoming_draft("Animal Shelter Support", &[("Dog Walker", 10)]))
        .await
        .unwrap();

    let event_id = event.id;
    let mut handles = Vec::new();
    for i in 0..20 {
        let hub = hub.clone();
        let email = if i % 2 == 0 { "Sam@Example.com" } else { "sam@example.COM" };
        handles.push(tokio::spawn(async move {
            hub.sign_up(event_id, 0, "Sam", email).await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(error) => assert_eq!(error.kind(), ErrorKind::DuplicateSignup),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(store.snapshot(event.id).unwrap().event.roles[0].volunteers.len(), 1);
}

/// An admin edit racing signups neither loses volunteers nor overbooks.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_update_racing_signups_keeps_every_volunteer() {
    use volunteer_hub_core::{EventPatch, RoleDraft};

    let store = InMemoryEventStore::new();
    let hub = hub_over(&store, 64);
    let event = hub
        .create(upcoming_draft("Beach Cleanup Day", &[("Cleanup Crew", 20)]))
        .await
        .unwrap();

    let event_id = event.id;
    let mut handles = Vec::new();
    for i in 0..10 {
        let hub = hub.clone();
        handles.push(tokio::spawn(async move {
            hub.sign_up(event_id, 0, "V", &format!("v{i}@example.com")).await.map(|_| ())
        }));
    }

    let keep = RoleDraft::keep(&event.roles[0]);
    let patch = EventPatch {
        title: Some("Beach Cleanup Day (rescheduled)".to_string()),
        roles: Some(vec![keep]),
        ..EventPatch::default()
    };
    let editor = {
        let hub = hub.clone();
        tokio::spawn(async move { hub.update(event_id, &patch).await.map(|_| ()) })
    };

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    editor.await.unwrap().unwrap();

    let stored = store.snapshot(event_id).unwrap().event;
    assert_eq!(stored.title, "Beach Cleanup Day (rescheduled)");
    assert_eq!(stored.roles[0].volunteers.len(), 10);
}
