//! Email receipts over SMTP via lettre.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use secrecy::{ExposeSecret, SecretString};

use super::EmailSender;
use crate::error::{self, ConfigError, NotifyError};

/// Port on which the relay speaks implicit TLS; any other port uses STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

// ── Configuration ───────────────────────────────────────────────────

/// SMTP account configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: SecretString,
    /// Display name on the `From` header.
    pub from_name: String,
}

impl EmailConfig {
    /// Build config from the process environment.
    pub fn from_env(from_name: &str) -> error::Result<Self> {
        Ok(Self::from_lookup(from_name, |key| std::env::var(key).ok())?)
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// `EMAIL_USER` and `EMAIL_PASS` are required; the relay defaults to
    /// Gmail on the submission port.
    pub fn from_lookup<F>(from_name: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username =
            lookup("EMAIL_USER").ok_or_else(|| ConfigError::MissingEnvVar("EMAIL_USER".into()))?;
        let password =
            lookup("EMAIL_PASS").ok_or_else(|| ConfigError::MissingEnvVar("EMAIL_PASS".into()))?;

        let smtp_host = lookup("EMAIL_SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string());
        let smtp_port = match lookup("EMAIL_SMTP_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "EMAIL_SMTP_PORT".into(),
                message: format!("'{raw}' is not a port number"),
            })?,
            None => 587,
        };

        Ok(Self {
            smtp_host,
            smtp_port,
            username,
            password: SecretString::from(password),
            from_name: from_name.to_string(),
        })
    }

    /// The organizational sender identity, `"{from_name} <{username}>"`.
    pub fn sender(&self) -> Result<Mailbox, ConfigError> {
        let address: Address = self.username.parse().map_err(|e| ConfigError::InvalidValue {
            key: "EMAIL_USER".into(),
            message: format!("not an email address: {e}"),
        })?;
        Ok(Mailbox::new(Some(self.from_name.clone()), address))
    }
}

// ── Sender ──────────────────────────────────────────────────────────

/// Sends receipts through one long-lived SMTP transport.
pub struct SmtpEmailSender {
    from: Mailbox,
    transport: SmtpTransport,
}

impl SmtpEmailSender {
    pub fn new(config: &EmailConfig) -> Result<Self, ConfigError> {
        let from = config.sender()?;
        let creds = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let relay = if config.smtp_port == IMPLICIT_TLS_PORT {
            SmtpTransport::relay(&config.smtp_host)
        } else {
            SmtpTransport::starttls_relay(&config.smtp_host)
        };
        let builder = relay.map_err(|e| ConfigError::InvalidValue {
            key: "EMAIL_SMTP_HOST".into(),
            message: format!("SMTP relay error: {e}"),
        })?;

        let transport = builder.port(config.smtp_port).credentials(creds).build();

        tracing::info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            from = %from,
            "SMTP sender configured"
        );
        Ok(Self { from, transport })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let email = build_message(&self.from, to, subject, body)?;

        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| NotifyError::Email(format!("SMTP task failed: {e}")))?
            .map_err(|e| NotifyError::Email(e.to_string()))?;

        tracing::info!("Email sent to {to}");
        Ok(())
    }
}

/// Build a plain-text message from the organizational sender.
pub fn build_message(
    from: &Mailbox,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<Message, NotifyError> {
    let to: Mailbox = to
        .parse()
        .map_err(|e| NotifyError::Email(format!("Invalid to address: {e}")))?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(subject)
        .body(body.to_string())
        .map_err(|e| NotifyError::Email(format!("Failed to build email: {e}")))
}

// ── Tests ───────────────────────────────────────────────────────────
