//! Roti Bank — fulfillment webhook for the donation chatbot.

pub mod channels;
pub mod config;
pub mod donation;
pub mod error;
pub mod webhook;
