//! Error types for the Roti Bank webhook.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Donation error: {0}")]
    Donation(#[from] DonationError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Donation validation errors.
#[derive(Debug, thiserror::Error)]
pub enum DonationError {
    #[error("Missing donation fields: {}", .0.join(", "))]
    MissingField(Vec<&'static str>),
}

/// Outbound notification failures. Messages are the transport's own text.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotifyError {
    #[error("{0}")]
    Email(String),

    #[error("{message}")]
    Messaging { code: Option<u32>, message: String },
}

impl NotifyError {
    /// Build a messaging error without a provider error code.
    pub fn messaging(message: impl Into<String>) -> Self {
        Self::Messaging {
            code: None,
            message: message.into(),
        }
    }
}

/// Inbound webhook errors.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Invalid fulfillment request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
