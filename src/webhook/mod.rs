//! Fulfillment webhook for the NLU platform.

pub mod router;
pub mod routes;
pub mod types;

pub use router::{Intent, IntentRouter};
pub use routes::{WebhookState, webhook_routes};
pub use types::{WebhookRequest, WebhookResponse};
