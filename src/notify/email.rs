//! SMTP notifier via lettre.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::{ExposeSecret, SecretString};

use crate::error::NotifyError;
use crate::notify::{Notification, Notifier};

// ── Configuration ───────────────────────────────────────────────────

/// SMTP configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: SecretString,
    pub from_address: String,
}

impl EmailConfig {
    /// Build config from environment variables.
    /// Returns `None` if `SMTP_HOST` is not set (email disabled).
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let smtp_host = lookup("SMTP_HOST").filter(|h| !h.trim().is_empty())?;

        let smtp_port: u16 = lookup("SMTP_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(587);

        let username = lookup("SMTP_USERNAME").unwrap_or_default();
        let password = SecretString::from(lookup("SMTP_PASSWORD").unwrap_or_default());
        let from_address = lookup("SMTP_FROM_ADDRESS").unwrap_or_else(|| username.clone());

        Some(Self {
            smtp_host,
            smtp_port,
            username,
            password,
            from_address,
        })
    }
}

// ── Notifier ────────────────────────────────────────────────────────

/// Sends notifications as multipart (plain + HTML) email.
pub struct SmtpNotifier {
    config: EmailConfig,
}

impl SmtpNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Build the message without sending it.
    pub fn build_message(&self, notification: &Notification) -> Result<Message, NotifyError> {
        if notification.recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }

        let mut builder = Message::builder()
            .from(parse_mailbox(&self.config.from_address)?)
            .subject(notification.subject.as_str());
        for recipient in &notification.recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                notification.body.clone(),
                notification.html_body(),
            ))
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

impl Notifier for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let email = self.build_message(notification)?;

        let creds = Credentials::new(
            self.config.username.clone(),
            self.config.password.expose_secret().to_string(),
        );

        let transport = SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| NotifyError::SendFailed(format!("SMTP relay error: {e}")))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        transport
            .send(&email)
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        tracing::info!(
            recipients = notification.recipients.len(),
            subject = %notification.subject,
            "Email sent"
        );
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .trim()
        .parse()
        .map_err(|e: lettre::address::AddressError| NotifyError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}
