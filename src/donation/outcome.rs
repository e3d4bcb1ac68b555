//! Per-request delivery outcome and the reply composed from it.

use super::policy::ResponsePolicy;
use super::request::Donation;

/// Result of one delivery attempt, captured as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelResult {
    Sent,
    Failed(String),
}

impl ChannelResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::Sent => None,
        }
    }
}

/// Combined outcome of the email and WhatsApp attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOutcome {
    pub email: ChannelResult,
    pub whatsapp: ChannelResult,
}

impl NotificationOutcome {
    pub fn email_sent(&self) -> bool {
        self.email.is_sent()
    }

    pub fn whatsapp_sent(&self) -> bool {
        self.whatsapp.is_sent()
    }

    /// Whether the policy lets this outcome be reported as a success.
    pub fn is_success(&self, policy: ResponsePolicy) -> bool {
        match policy {
            ResponsePolicy::AllOrNothing => self.email_sent() && self.whatsapp_sent(),
            ResponsePolicy::BestEffort => self.email_sent() || self.whatsapp_sent(),
        }
    }

    /// Compose the single user-facing reply.
    pub fn compose(&self, donation: &Donation, policy: ResponsePolicy) -> String {
        if self.is_success(policy) {
            success_message(donation, &self.delivered_to(donation))
        } else {
            self.error_summary()
        }
    }

    fn delivered_to(&self, donation: &Donation) -> Vec<String> {
        let mut channels = Vec::with_capacity(2);
        if self.email_sent() {
            channels.push(donation.email.clone());
        }
        if self.whatsapp_sent() {
            channels.push(format!("WhatsApp +{}", donation.phone));
        }
        channels
    }

    fn error_summary(&self) -> String {
        let mut summary = String::from("Some issues occurred:\n");
        if let Some(err) = self.email.error() {
            summary.push_str(&format!("- Email error: {err}\n"));
        }
        if let Some(err) = self.whatsapp.error() {
            summary.push_str(&format!("- WhatsApp error: {err}\n"));
        }
        summary.push_str("\nPlease check and try again.");
        summary
    }
}

fn success_message(donation: &Donation, channels: &[String]) -> String {
    format!(
        "🌟 Thank you, {}! Your {} of {} has been recorded.\nConfirmation sent to {}. May Allah bless you! 🤲",
        donation.donor_name,
        donation.donation_type,
        donation.amount,
        channels.join(" and "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donation() -> Donation {
        Donation {
            donation_type: "cash".into(),
            amount: "500".into(),
            donor_name: "Ali".into(),
            email: "ali@x.com".into(),
            phone: "923001234567".into(),
        }
    }

    fn sent() -> ChannelResult {
        ChannelResult::Sent
    }

    fn failed(msg: &str) -> ChannelResult {
        ChannelResult::Failed(msg.into())
    }

    #[test]
    fn both_sent_lists_both_channels() {
        let outcome = NotificationOutcome { email: sent(), whatsapp: sent() };
        for policy in [ResponsePolicy::AllOrNothing, ResponsePolicy::BestEffort] {
            let reply = outcome.compose(&donation(), policy);
            assert_eq!(
                reply,
                "🌟 Thank you, Ali! Your cash of 500 has been recorded.\n\
                 Confirmation sent to ali@x.com and WhatsApp +923001234567. May Allah bless you! 🤲"
            );
        }
    }

    #[test]
    fn all_or_nothing_reports_a_single_failure() {
        let outcome = NotificationOutcome {
            email: failed("Invalid login"),
            whatsapp: sent(),
        };
        let reply = outcome.compose(&donation(), ResponsePolicy::AllOrNothing);
        assert_eq!(
            reply,
            "Some issues occurred:\n- Email error: Invalid login\n\nPlease check and try again."
        );
    }

    #[test]
    fn best_effort_lists_only_delivered_channels() {
        let outcome = NotificationOutcome {
            email: failed("Invalid login"),
            whatsapp: sent(),
        };
        let reply = outcome.compose(&donation(), ResponsePolicy::BestEffort);
        assert!(reply.contains("Confirmation sent to WhatsApp +923001234567."));
        assert!(!reply.contains("ali@x.com"));
        assert!(!reply.contains("Invalid login"));
    }

    #[test]
    fn both_failed_lists_every_error_under_either_policy() {
        let outcome = NotificationOutcome {
            email: failed("Invalid login"),
            whatsapp: failed("Authenticate"),
        };
        for policy in [ResponsePolicy::AllOrNothing, ResponsePolicy::BestEffort] {
            let reply = outcome.compose(&donation(), policy);
            assert!(reply.starts_with("Some issues occurred:\n"));
            assert!(reply.contains("- Email error: Invalid login\n"));
            assert!(reply.contains("- WhatsApp error: Authenticate\n"));
            assert!(reply.ends_with("Please check and try again."));
        }
    }
}
