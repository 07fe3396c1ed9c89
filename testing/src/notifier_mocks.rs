//! Notifier doubles.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on a poisoned lock

use std::sync::{Arc, Mutex};
use std::time::Duration;
use volunteer_hub_core::notification::{Notifier, NotifyError, NotifyFuture, SignupNotice};

/// Which message a notice was sent as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Sent to the volunteer
    VolunteerConfirmation,
    /// Sent to the organizer
    AdminAlert,
}

/// Notifier that keeps every message it is asked to send.
///
/// Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(NoticeKind, SignupNotice)>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order
    #[must_use]
    pub fn sent(&self) -> Vec<(NoticeKind, SignupNotice)> {
        self.sent.lock().unwrap().clone()
    }

    /// Notices of one kind
    #[must_use]
    pub fn sent_of(&self, kind: NoticeKind) -> Vec<SignupNotice> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, notice)| notice.clone())
            .collect()
    }

    /// Wait until at least `count` messages were recorded or `timeout` passes.
    ///
    /// Returns whether the count was reached. Needed where the notices are
    /// sent from a detached task the test cannot join.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.sent.lock().unwrap().len() >= count {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn record(&self, kind: NoticeKind, notice: &SignupNotice) {
        self.sent.lock().unwrap().push((kind, notice.clone()));
    }
}

impl Notifier for RecordingNotifier {
    fn volunteer_confirmation<'a>(&'a self, notice: &'a SignupNotice) -> NotifyFuture<'a> {
        Box::pin(async move {
            self.record(NoticeKind::VolunteerConfirmation, notice);
            Ok(())
        })
    }

    fn admin_alert<'a>(&'a self, notice: &'a SignupNotice) -> NotifyFuture<'a> {
        Box::pin(async move {
            self.record(NoticeKind::AdminAlert, notice);
            Ok(())
        })
    }
}

/// Notifier whose every send fails, counting attempts.
#[derive(Clone, Debug, Default)]
pub struct FailingNotifier {
    attempts: Arc<Mutex<usize>>,
}

impl FailingNotifier {
    /// Create a failing notifier
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends attempted so far
    #[must_use]
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    fn fail(&self) -> NotifyFuture<'_> {
        *self.attempts.lock().unwrap() += 1;
        Box::pin(async {
            Err(NotifyError::Transport(
                "421 service not available".to_string(),
            ))
        })
    }
}

impl Notifier for FailingNotifier {
    fn volunteer_confirmation<'a>(&'a self, _notice: &'a SignupNotice) -> NotifyFuture<'a> {
        self.fail()
    }

    fn admin_alert<'a>(&'a self, _notice: &'a SignupNotice) -> NotifyFuture<'a> {
        self.fail()
    }
}
