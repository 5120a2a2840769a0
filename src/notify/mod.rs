//! Operator notifications.

pub mod email;

pub use email::{EmailConfig, SmtpNotifier};

use tracing::info;

use crate::error::NotifyError;

/// One outgoing notification: the plain body doubles as the HTML source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(recipients: &[String], subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            recipients: recipients.to_vec(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn html_body(&self) -> String {
        render_html(&self.body)
    }
}

/// Wrap a plain-text body in a minimal HTML document.
///
/// Newlines become `<br>`; nothing else is escaped.
pub fn render_html(body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<body>\n<p>{}</p>\n</body>\n</html>\n",
        body.replace('\n', "<br>")
    )
}

/// Delivers notifications. Implementations do not retry.
pub trait Notifier {
    fn name(&self) -> &str;

    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes notifications to the log instead of sending them.
///
/// Used when no SMTP relay is configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            recipients = %notification.recipients.join(", "),
            subject = %notification.subject,
            "Notification (not sent, no SMTP relay configured):\n{}",
            notification.body
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_converts_newlines_only() {
        let html = render_html("Line <1>\nLine & 2");
        assert!(html.contains("<p>Line <1><br>Line & 2</p>"));
        assert!(html.starts_with("<!doctype html>"));
    }

    #[test]
    fn notification_html_body() {
        let n = Notification::new(&["ops@example.com".to_string()], "Subject", "a\nb");
        assert!(n.html_body().contains("a<br>b"));
        assert_eq!(n.recipients, vec!["ops@example.com"]);
    }

    #[test]
    fn log_notifier_always_succeeds() {
        let n = Notification::new(&[], "Subject", "body");
        assert!(LogNotifier.send(&n).is_ok());
        assert_eq!(LogNotifier.name(), "log");
    }
}
