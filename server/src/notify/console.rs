//! Console notifier for development.

use super::templates::{self, Email};
use tracing::info;
use volunteer_hub_core::notification::NotifyFuture;
use volunteer_hub_core::{Notifier, NotifyError, SignupNotice};

/// Logs emails instead of sending them.
///
/// Used when no SMTP credentials are configured, so signups work end to end
/// on a laptop.
#[derive(Clone, Debug, Default)]
pub struct ConsoleNotifier {
    admin_email: Option<String>,
}

impl ConsoleNotifier {
    /// Create a console notifier; alerts are skipped when `admin_email` is
    /// `None`.
    #[must_use]
    pub const fn new(admin_email: Option<String>) -> Self {
        Self { admin_email }
    }

    fn print(to: &str, email: &Email) {
        info!(to = %to, subject = %email.subject, "📧 Email (console mode)");
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                   EMAIL WOULD BE SENT                        ║");
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ To: {to:<57}║");
        println!("║ Subject: {:<52}║", email.subject);
        println!("╚══════════════════════════════════════════════════════════════╝\n");
    }
}

impl Notifier for ConsoleNotifier {
    fn volunteer_confirmation<'a>(&'a self, notice: &'a SignupNotice) -> NotifyFuture<'a> {
        Box::pin(async move {
            Self::print(&notice.volunteer_email, &templates::volunteer_confirmation(notice));
            Ok(())
        })
    }

    fn admin_alert<'a>(&'a self, notice: &'a SignupNotice) -> NotifyFuture<'a> {
        Box::pin(async move {
            let to = self
                .admin_email
                .as_deref()
                .ok_or(NotifyError::NoRecipient("admin alert"))?;
            Self::print(to, &templates::admin_alert(notice));
            Ok(())
        })
    }
}
