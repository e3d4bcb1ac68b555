//! The donation handler: validate, notify by email then WhatsApp, reply.

use std::sync::Arc;

use super::outcome::{ChannelResult, NotificationOutcome};
use super::policy::DonationPolicy;
use super::request::{Donation, DonationRequest};
use crate::channels::whatsapp::{SANDBOX_SENDER, is_invalid_number, whatsapp_address};
use crate::channels::{EmailSender, MessagingSender};

pub const CONFIRMATION_SUBJECT: &str = "Donation Confirmation";

pub const MISSING_DETAILS_REPLY: &str =
    "❗ Some details are missing. Please provide all required donation info.";

const DEFAULT_JOIN_CODE: &str = "join <your-sandbox-code>";

/// Static settings for the notifier.
#[derive(Debug, Clone)]
pub struct NotifierSettings {
    pub org_name: String,
    /// Keyword shown in sandbox opt-in guidance.
    pub sandbox_join_code: Option<String>,
}

/// Handles the "Donate" intent end to end.
pub struct DonationNotifier {
    email: Arc<dyn EmailSender>,
    messaging: Arc<dyn MessagingSender>,
    settings: NotifierSettings,
    policy: DonationPolicy,
}

impl DonationNotifier {
    pub fn new(
        email: Arc<dyn EmailSender>,
        messaging: Arc<dyn MessagingSender>,
        settings: NotifierSettings,
        policy: DonationPolicy,
    ) -> Self {
        Self {
            email,
            messaging,
            settings,
            policy,
        }
    }

    pub fn policy(&self) -> DonationPolicy {
        self.policy
    }

    /// Validate the request, attempt both notifications and compose the reply.
    pub async fn handle(&self, request: DonationRequest) -> String {
        tracing::info!(
            donation_type = %request.donation_type,
            amount = ?request.amount,
            name = %request.donor_name,
            email = ?request.email,
            phone_raw = %request.phone_raw,
            phone = %request.phone_normalized,
            "Donation details"
        );

        let donation = match request.resolve(self.policy.validation) {
            Ok(donation) => donation,
            Err(e) => {
                tracing::warn!(error = %e, "Donation rejected, nothing sent");
                return MISSING_DETAILS_REPLY.to_string();
            }
        };

        let outcome = self.notify(&donation).await;
        outcome.compose(&donation, self.policy.response)
    }

    /// Attempt the email, then the WhatsApp message. Failures become data.
    pub async fn notify(&self, donation: &Donation) -> NotificationOutcome {
        let body = confirmation_body(donation, &self.settings.org_name);

        let email = match self
            .email
            .send(&donation.email, CONFIRMATION_SUBJECT, &body)
            .await
        {
            Ok(()) => {
                tracing::info!(to = %donation.email, "Confirmation email sent");
                ChannelResult::Sent
            }
            Err(e) => {
                tracing::error!(error = %e, "Email error");
                ChannelResult::Failed(e.to_string())
            }
        };

        let sandbox = self.is_sandbox();
        let to = whatsapp_address(&donation.phone);
        let whatsapp = match self.messaging.send(&to, &body).await {
            Ok(sid) => {
                tracing::info!(to = %to, sid = %sid, "WhatsApp confirmation sent");
                ChannelResult::Sent
            }
            Err(e) => {
                tracing::error!(error = %e, sandbox, "WhatsApp error");
                let message = if is_invalid_number(&e) {
                    format!("{e} ({})", self.invalid_number_hint(sandbox))
                } else {
                    e.to_string()
                };
                ChannelResult::Failed(message)
            }
        };

        NotificationOutcome { email, whatsapp }
    }

    fn is_sandbox(&self) -> bool {
        whatsapp_address(self.messaging.sender_id()) == SANDBOX_SENDER
    }

    fn invalid_number_hint(&self, sandbox: bool) -> String {
        if sandbox {
            let join = self
                .settings
                .sandbox_join_code
                .as_deref()
                .unwrap_or(DEFAULT_JOIN_CODE);
            format!(
                "Hint: messages come from the Twilio WhatsApp sandbox, so the recipient must first send '{join}' to +14155238886 on WhatsApp"
            )
        } else {
            "Hint: check that the number includes its country code and is registered on WhatsApp"
                .to_string()
        }
    }
}

/// Body shared by the email receipt and the WhatsApp message.
pub fn confirmation_body(donation: &Donation, org_name: &str) -> String {
    format!(
        "Dear {}, thank you for your generous donation of {} via {}. Your support helps {} feed those in need.",
        donation.donor_name, donation.amount, donation.donation_type, org_name
    )
}
