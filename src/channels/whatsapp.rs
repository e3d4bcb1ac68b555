//! WhatsApp delivery through the Twilio Messaging REST API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::MessagingSender;
use crate::error::{self, ConfigError, NotifyError};

/// Twilio's shared WhatsApp sandbox originator.
pub const SANDBOX_SENDER: &str = "whatsapp:+14155238886";

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Twilio error codes meaning the destination is not a reachable number.
const INVALID_NUMBER_CODES: &[u32] = &[21211, 21614, 63003];

// ── Configuration ───────────────────────────────────────────────────

/// Twilio account configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: SecretString,
    /// Originator as configured; normalized to `whatsapp:+...` on use.
    pub sender: String,
    pub api_base: String,
    /// Sandbox keyword recipients send to opt in, e.g. `join bright-river`.
    pub sandbox_join_code: Option<String>,
}

impl TwilioConfig {
    pub fn from_env() -> error::Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// `TWILIO_SID` and `TWILIO_AUTH_TOKEN` are required. The sender falls
    /// back to the sandbox number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let account_sid =
            lookup("TWILIO_SID").ok_or_else(|| ConfigError::MissingEnvVar("TWILIO_SID".into()))?;
        let auth_token = lookup("TWILIO_AUTH_TOKEN")
            .ok_or_else(|| ConfigError::MissingEnvVar("TWILIO_AUTH_TOKEN".into()))?;

        let sender = lookup("TWILIO_PHONE_NUMBER")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| SANDBOX_SENDER.to_string());
        let api_base = lookup("TWILIO_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let sandbox_join_code = lookup("TWILIO_SANDBOX_JOIN_CODE").filter(|s| !s.trim().is_empty());

        Ok(Self {
            account_sid,
            auth_token: SecretString::from(auth_token),
            sender,
            api_base,
            sandbox_join_code,
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

/// Qualify a number as a WhatsApp address (`whatsapp:+<digits>`).
pub fn whatsapp_address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else if number.starts_with('+') {
        format!("whatsapp:{number}")
    } else {
        format!("whatsapp:+{number}")
    }
}

/// Whether a messaging failure says the destination number is unusable.
pub fn is_invalid_number(err: &NotifyError) -> bool {
    match err {
        NotifyError::Messaging { code, message } => {
            code.is_some_and(|c| INVALID_NUMBER_CODES.contains(&c))
                || message.to_lowercase().contains("not a valid phone number")
        }
        NotifyError::Email(_) => false,
    }
}

// ── Sender ──────────────────────────────────────────────────────────

/// Message resource returned on a successful create.
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

/// Error body Twilio returns with 4xx/5xx responses.
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<u32>,
    message: String,
}

/// Sends WhatsApp messages through one shared HTTP client.
pub struct WhatsAppSender {
    config: TwilioConfig,
    sender_id: String,
    client: reqwest::Client,
}

impl WhatsAppSender {
    pub fn new(config: TwilioConfig) -> Self {
        let sender_id = whatsapp_address(&config.sender);
        Self {
            config,
            sender_id,
            client: reqwest::Client::new(),
        }
    }

    pub fn is_sandbox(&self) -> bool {
        self.sender_id == SANDBOX_SENDER
    }
}

#[async_trait]
impl MessagingSender for WhatsAppSender {
    fn sender_id(&self) -> &str {
        &self.sender_id
    }

    async fn send(&self, to: &str, body: &str) -> Result<String, NotifyError> {
        let form = [("From", self.sender_id.as_str()), ("To", to), ("Body", body)];

        let resp = self
            .client
            .post(self.config.messages_url())
            .basic_auth(
                &self.config.account_sid,
                Some(self.config.auth_token.expose_secret()),
            )
            .form(&form[..])
            .send()
            .await
            .map_err(|e| NotifyError::messaging(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let err = match serde_json::from_str::<TwilioErrorBody>(&text) {
                Ok(body) => NotifyError::Messaging {
                    code: body.code,
                    message: body.message,
                },
                Err(_) => NotifyError::messaging(format!("Twilio returned {status}: {text}")),
            };
            tracing::warn!(%status, error = %err, "Twilio message create failed");
            return Err(err);
        }

        let resource: MessageResource = resp
            .json()
            .await
            .map_err(|e| NotifyError::messaging(format!("Invalid Twilio response: {e}")))?;

        tracing::info!(sid = %resource.sid, "WhatsApp message sent to {to}");
        Ok(resource.sid)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
