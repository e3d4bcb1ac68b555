//! Intent dispatch: one handler per recognized intent name.

use std::sync::Arc;

use super::types::WebhookRequest;
use crate::donation::{DonationNotifier, DonationRequest};

pub const UNKNOWN_INTENT_REPLY: &str = "Sorry, I can't help with that yet.";

pub const MEAL_TIMINGS_REPLY: &str =
    "Meals are served daily from 12:00 PM to 3:00 PM and 6:00 PM to 9:00 PM.";

/// Intents this service fulfills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Welcome,
    RotiBankInfo,
    MealTimings,
    Donate,
    Unknown(String),
}

impl Intent {
    pub fn from_display_name(name: &str) -> Self {
        match name {
            "Default Welcome Intent" => Self::Welcome,
            "Roti Bank Info" => Self::RotiBankInfo,
            "Meal Timings" => Self::MealTimings,
            "Donate" => Self::Donate,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Routes a fulfillment request to its handler and returns the reply text.
pub struct IntentRouter {
    org_name: String,
    notifier: Arc<DonationNotifier>,
}

impl IntentRouter {
    pub fn new(org_name: impl Into<String>, notifier: Arc<DonationNotifier>) -> Self {
        Self {
            org_name: org_name.into(),
            notifier,
        }
    }

    pub async fn dispatch(&self, request: &WebhookRequest) -> String {
        let intent = Intent::from_display_name(request.intent_name());
        tracing::info!(?intent, "Fulfillment webhook triggered");

        match intent {
            Intent::Welcome => format!(
                "Hello! I’m the virtual assistant for {}. How can I assist you today?",
                self.org_name
            ),
            Intent::RotiBankInfo => format!(
                "{} provides free meals daily. You can support us by donating food or money to help the needy.",
                self.org_name
            ),
            Intent::MealTimings => MEAL_TIMINGS_REPLY.to_string(),
            Intent::Donate => {
                let donation = DonationRequest::from_params(request.parameters());
                self.notifier.handle(donation).await
            }
            Intent::Unknown(name) => {
                tracing::warn!(intent = %name, "No handler for intent");
                UNKNOWN_INTENT_REPLY.to_string()
            }
        }
    }
}
