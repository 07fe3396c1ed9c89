//! SMTP notifier using Lettre.

use super::templates::{self, Email};
use crate::config::EmailConfig;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use volunteer_hub_core::notification::NotifyFuture;
use volunteer_hub_core::{Notifier, NotifyError, SignupNotice};

/// Sends signup emails through an SMTP relay (STARTTLS).
///
/// # Examples
///
/// ```ignore
/// let notifier = SmtpNotifier::new(&config.email)?;
/// dispatch_signup_notices(Arc::new(notifier), notice);
/// ```
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    admin: Option<Mailbox>,
}

impl SmtpNotifier {
    /// Build a notifier from the email configuration.
    ///
    /// # Errors
    ///
    /// - [`NotifyError::Message`] if a configured address does not parse
    /// - [`NotifyError::Transport`] if credentials are missing or the relay
    ///   host is invalid
    pub fn new(config: &EmailConfig) -> Result<Self, NotifyError> {
        let (user, pass) = config.credentials().ok_or_else(|| {
            NotifyError::Transport("EMAIL_USER and EMAIL_PASS are required".to_string())
        })?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Transport(format!("SMTP relay error: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();

        let from = parse_mailbox(&config.from, "from")?;
        let admin = config
            .admin_email
            .as_deref()
            .map(|address| parse_mailbox(address, "admin"))
            .transpose()?;

        Ok(Self {
            mailer,
            from,
            admin,
        })
    }

    async fn send(&self, to: Mailbox, email: Email) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html)
            .map_err(|e| NotifyError::Message(format!("Failed to build email: {e}")))?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(format!("Failed to send email: {e}")))?;
        Ok(())
    }
}

impl Notifier for SmtpNotifier {
    fn volunteer_confirmation<'a>(&'a self, notice: &'a SignupNotice) -> NotifyFuture<'a> {
        Box::pin(async move {
            let to = parse_mailbox(&notice.volunteer_email, "to")?;
            self.send(to, templates::volunteer_confirmation(notice)).await
        })
    }

    fn admin_alert<'a>(&'a self, notice: &'a SignupNotice) -> NotifyFuture<'a> {
        Box::pin(async move {
            let to = self
                .admin
                .clone()
                .ok_or(NotifyError::NoRecipient("admin alert"))?;
            self.send(to, templates::admin_alert(notice)).await
        })
    }
}

fn parse_mailbox(raw: &str, role: &str) -> Result<Mailbox, NotifyError> {
    raw.parse()
        .map_err(|e| NotifyError::Message(format!("Invalid {role} address `{raw}`: {e}")))
}
