//! Post-signup notifications.
//!
//! Email is best-effort: a signup is complete once it is committed, and
//! nothing here can undo or fail it. [`dispatch_signup_notices`] runs both
//! messages on a detached task and only logs what goes wrong.

use crate::service::SignupReceipt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Everything a notification template needs about one committed signup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupNotice {
    /// Volunteer's name as entered
    pub volunteer_name: String,
    /// Normalized email
    pub volunteer_email: String,
    /// Event title
    pub event_title: String,
    /// Role signed up for
    pub role_name: String,
    /// When the event happens
    pub event_date: DateTime<Utc>,
    /// Free-text time range, e.g. "9:00 AM - 1:00 PM"
    pub event_time: String,
    /// When the signup was committed
    pub signed_up_at: DateTime<Utc>,
}

impl From<&SignupReceipt> for SignupNotice {
    fn from(receipt: &SignupReceipt) -> Self {
        Self {
            volunteer_name: receipt.volunteer.name.clone(),
            volunteer_email: receipt.volunteer.email.clone(),
            event_title: receipt.event.title.clone(),
            role_name: receipt.role_name.clone(),
            event_date: receipt.event.date,
            event_time: receipt.event.time.clone(),
            signed_up_at: receipt.volunteer.signed_up_at,
        }
    }
}

/// Notification delivery errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The message could not be built (bad address, template failure).
    #[error("Invalid message: {0}")]
    Message(String),

    /// The transport refused or dropped the message.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No recipient is configured for this kind of message.
    #[error("No recipient configured for {0}")]
    NoRecipient(&'static str),
}

/// Boxed future returned by notifier methods
pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>>;

/// Sends the two messages that follow a signup.
///
/// Implementations live outside the core (console and SMTP in the server
/// crate, recording/failing doubles in the testing crate).
pub trait Notifier: Send + Sync {
    /// Confirmation to the volunteer.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the message cannot be delivered.
    fn volunteer_confirmation<'a>(&'a self, notice: &'a SignupNotice) -> NotifyFuture<'a>;

    /// Heads-up to the organizer.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::NoRecipient`] when no admin address is
    /// configured, or another variant if delivery fails.
    fn admin_alert<'a>(&'a self, notice: &'a SignupNotice) -> NotifyFuture<'a>;
}

/// Send both signup messages on a detached task.
///
/// Each message is attempted independently; failures are logged at `warn`
/// and dropped. The returned handle is only useful to tests.
pub fn dispatch_signup_notices(
    notifier: Arc<dyn Notifier>,
    notice: SignupNotice,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let (confirmation, alert) = tokio::join!(
            notifier.volunteer_confirmation(&notice),
            notifier.admin_alert(&notice),
        );

        match confirmation {
            Ok(()) => {
                crate::metrics::record_notification("volunteer_confirmation", true);
                tracing::debug!(to = %notice.volunteer_email, "Confirmation email sent");
            }
            Err(error) => {
                crate::metrics::record_notification("volunteer_confirmation", false);
                tracing::warn!(
                    to = %notice.volunteer_email,
                    error = %error,
                    "Failed to send confirmation email"
                );
            }
        }

        match alert {
            Ok(()) => {
                crate::metrics::record_notification("admin_alert", true);
                tracing::debug!(event = %notice.event_title, "Admin alert sent");
            }
            Err(NotifyError::NoRecipient(kind)) => {
                tracing::info!(kind, "No admin address configured, skipping alert");
            }
            Err(error) => {
                crate::metrics::record_notification("admin_alert", false);
                tracing::warn!(
                    event = %notice.event_title,
                    error = %error,
                    "Failed to send admin alert"
                );
            }
        }
    })
}
