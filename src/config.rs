//! Service configuration.

use crate::donation::{DonationPolicy, ResponsePolicy, ValidationPolicy};
use crate::error::{ConfigError, Result};

pub const DEFAULT_ORG_NAME: &str = "Saylani Roti Bank";
pub const DEFAULT_PORT: u16 = 8080;

/// Top-level settings not owned by a channel.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Listening port.
    pub port: u16,
    /// Organization named in replies and receipts.
    pub org_name: String,
    pub policy: DonationPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            org_name: DEFAULT_ORG_NAME.to_string(),
            policy: DonationPolicy::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Build config from an arbitrary key lookup. Every key is optional.
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".into(),
                message: format!("'{raw}' is not a port number"),
            })?,
            None => defaults.port,
        };

        let org_name = lookup("ORG_NAME")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.org_name);

        let validation = parse_or(&lookup, "DONATION_VALIDATION", ValidationPolicy::default())?;
        let response = parse_or(&lookup, "DONATION_RESPONSE", ResponsePolicy::default())?;

        Ok(Self {
            port,
            org_name,
            policy: DonationPolicy {
                validation,
                response,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> std::result::Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr<Err = String>,
{
    match lookup(key) {
        Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ServiceConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.org_name, "Saylani Roti Bank");
        assert_eq!(config.policy, DonationPolicy::default());
    }

    #[test]
    fn reads_every_key() {
        let config = ServiceConfig::from_lookup(|key| {
            match key {
                "PORT" => Some("3000"),
                "ORG_NAME" => Some("Test Kitchen"),
                "DONATION_VALIDATION" => Some("lenient"),
                "DONATION_RESPONSE" => Some("best-effort"),
                _ => None,
            }
            .map(str::to_string)
        })
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.org_name, "Test Kitchen");
        assert_eq!(config.policy.validation, ValidationPolicy::Lenient);
        assert_eq!(config.policy.response, ResponsePolicy::BestEffort);
    }

    #[test]
    fn invalid_values_name_their_key() {
        let err = ServiceConfig::from_lookup(|key| (key == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORT"));

        let err = ServiceConfig::from_lookup(|key| {
            (key == "DONATION_RESPONSE").then(|| "sometimes".to_string())
        })
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "DONATION_RESPONSE")
        );
    }
}
