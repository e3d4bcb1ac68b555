//! Donation notification pipeline.
//!
//! A "Donate" turn is resolved into a typed [`DonationRequest`], validated
//! according to the configured [`DonationPolicy`], confirmed to the donor by
//! email and then WhatsApp, and summarized in one reply. Delivery failures
//! are captured in a [`NotificationOutcome`] and never abort the turn.

pub mod notifier;
pub mod outcome;
pub mod phone;
pub mod policy;
pub mod request;

pub use notifier::{DonationNotifier, NotifierSettings};
pub use outcome::{ChannelResult, NotificationOutcome};
pub use phone::normalize_phone;
pub use policy::{DonationPolicy, ResponsePolicy, ValidationPolicy};
pub use request::{Donation, DonationRequest};
