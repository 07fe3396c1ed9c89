//! Notifier implementations.
//!
//! - [`SmtpNotifier`]: real delivery, used when SMTP credentials are set
//! - [`ConsoleNotifier`]: prints instead, for development

pub mod console;
pub mod smtp;
pub mod templates;

pub use console::ConsoleNotifier;
pub use smtp::SmtpNotifier;

use crate::config::EmailConfig;
use std::sync::Arc;
use volunteer_hub_core::{Notifier, NotifyError};

/// Pick the notifier the configuration asks for.
///
/// # Errors
///
/// Returns [`NotifyError`] if SMTP credentials are set but the rest of the
/// SMTP configuration is unusable.
pub fn build_notifier(config: &EmailConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    if config.credentials().is_some() {
        tracing::info!(host = %config.host, port = config.port, "📧 Using SMTP notifier");
        Ok(Arc::new(SmtpNotifier::new(config)?))
    } else {
        tracing::info!("📧 No SMTP credentials, emails will be logged to the console");
        Ok(Arc::new(ConsoleNotifier::new(config.admin_email.clone())))
    }
}
