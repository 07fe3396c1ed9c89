//! Email subjects and HTML bodies for signup notices.

use chrono::{DateTime, Utc};
use volunteer_hub_core::SignupNotice;

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
}

/// Long-form event date, e.g. `Monday, December 15, 2025`.
#[must_use]
pub fn format_event_date(date: DateTime<Utc>) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Confirmation sent to the volunteer.
#[must_use]
pub fn volunteer_confirmation(notice: &SignupNotice) -> Email {
    let name = escape(&notice.volunteer_name);
    let title = escape(&notice.event_title);
    let role = escape(&notice.role_name);
    let time = escape(&notice.event_time);
    let date = format_event_date(notice.event_date);

    let html = format!(
        r#"
<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: #6366f1; color: white; padding: 30px; border-radius: 10px; text-align: center;">
        <h1 style="margin: 0; font-size: 28px;">Thank You for Volunteering!</h1>
    </div>
    <div style="background: #f8fafc; padding: 30px; border-radius: 10px; margin: 20px 0;">
        <h2 style="color: #1f2937;">Hi {name}!</h2>
        <p style="font-size: 16px; line-height: 1.6; color: #374151;">
            You've successfully signed up as a <strong>{role}</strong> for our upcoming event:
        </p>
        <div style="background: white; padding: 20px; border-radius: 8px; border-left: 4px solid #6366f1;">
            <h3 style="color: #6366f1; margin: 0 0 10px 0;">{title}</h3>
            <p style="margin: 5px 0; color: #6b7280;"><strong>Date:</strong> {date}</p>
            <p style="margin: 5px 0; color: #6b7280;"><strong>Time:</strong> {time}</p>
            <p style="margin: 5px 0; color: #6b7280;"><strong>Your Role:</strong> {role}</p>
        </div>
        <p style="font-size: 16px; line-height: 1.6; color: #374151;">
            Thank you for making a difference in our community! If you have any questions,
            feel free to reply to this email.
        </p>
    </div>
    <div style="text-align: center; padding: 20px; color: #6b7280; font-size: 14px;">
        <p>This email was sent by Volunteer Hub</p>
    </div>
</div>
"#
    );

    Email {
        subject: format!("Volunteer Signup Confirmation - {}", notice.event_title),
        html,
    }
}

/// Alert sent to the organizer.
#[must_use]
pub fn admin_alert(notice: &SignupNotice) -> Email {
    let name = escape(&notice.volunteer_name);
    let email = escape(&notice.volunteer_email);
    let title = escape(&notice.event_title);
    let role = escape(&notice.role_name);
    let signed_up_at = notice.signed_up_at.format("%Y-%m-%d %H:%M:%S UTC");

    let html = format!(
        r#"
<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: #1f2937; color: white; padding: 20px; border-radius: 10px;">
        <h2 style="margin: 0;">New Volunteer Signup</h2>
    </div>
    <div style="background: #f8fafc; padding: 20px; border-radius: 10px; margin: 20px 0;">
        <p><strong>Event:</strong> {title}</p>
        <p><strong>Role:</strong> {role}</p>
        <p><strong>Volunteer:</strong> {name}</p>
        <p><strong>Email:</strong> {email}</p>
        <p><strong>Time:</strong> {signed_up_at}</p>
    </div>
</div>
"#
    );

    Email {
        subject: format!("New Volunteer Signup - {}", notice.event_title),
        html,
    }
}

// Names and titles are user input and end up inside HTML.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
