//! Outbound notification channels.
//!
//! The donation notifier only sees the two traits below; the SMTP and
//! Twilio implementations are constructed once in `main` and injected.

pub mod email;
pub mod whatsapp;

pub use email::{EmailConfig, SmtpEmailSender};
pub use whatsapp::{SANDBOX_SENDER, TwilioConfig, WhatsAppSender};

use async_trait::async_trait;

use crate::error::NotifyError;

/// Sends a plain-text email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Sends a WhatsApp message and returns the provider's message id.
#[async_trait]
pub trait MessagingSender: Send + Sync {
    /// The configured originator, e.g. `whatsapp:+14155238886`.
    fn sender_id(&self) -> &str;

    async fn send(&self, to: &str, body: &str) -> Result<String, NotifyError>;
}
