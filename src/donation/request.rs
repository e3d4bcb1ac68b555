//! Typed donation parameters resolved from the NLU parameter bag.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use super::phone::normalize_phone;
use super::policy::ValidationPolicy;
use crate::error::DonationError;

pub const DEFAULT_DONATION_TYPE: &str = "donation";
pub const DEFAULT_DONOR_NAME: &str = "Donor";
pub const UNSPECIFIED_AMOUNT: &str = "an unspecified amount";
/// Recipient used by lenient validation when no email was collected.
pub const PLACEHOLDER_EMAIL: &str = "donor@example.com";
/// Recipient used by lenient validation when no usable phone was collected.
pub const TEST_PHONE: &str = "923001234567";

// Precedence lists, first usable value wins.
const DONATION_TYPE_KEYS: &[&str] = &["any", "donation_type"];
const AMOUNT_KEYS: &[&str] = &["number", "amount"];
const EMAIL_KEYS: &[&str] = &["email"];
const PHONE_KEYS: &[&str] = &["phone-number", "phone"];
const PERSON_KEY: &str = "person";

/// Donation details as extracted from one fulfillment request.
///
/// Optional fields are the ones whose absence the validation policy decides
/// on. Everything else already carries its default.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationRequest {
    pub donation_type: String,
    pub amount: Option<Decimal>,
    pub donor_name: String,
    pub email: Option<String>,
    pub phone_raw: String,
    pub phone_normalized: String,
}

/// A donation ready for dispatch: every field present and display-ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    pub donation_type: String,
    pub amount: String,
    pub donor_name: String,
    pub email: String,
    /// Bare international digits, no `+`.
    pub phone: String,
}

impl DonationRequest {
    /// Resolve the typed request from the raw parameter mapping.
    pub fn from_params(params: &Map<String, Value>) -> Self {
        let donation_type = first_text(params, DONATION_TYPE_KEYS)
            .unwrap_or_else(|| DEFAULT_DONATION_TYPE.to_string());

        let amount = AMOUNT_KEYS
            .iter()
            .filter_map(|key| params.get(*key))
            .find_map(parse_amount);

        let donor_name = params
            .get(PERSON_KEY)
            .and_then(person_name)
            .unwrap_or_else(|| DEFAULT_DONOR_NAME.to_string());

        let email = first_text(params, EMAIL_KEYS);
        let phone_raw = first_text(params, PHONE_KEYS).unwrap_or_default();
        let phone_normalized = normalize_phone(&phone_raw);

        Self {
            donation_type,
            amount,
            donor_name,
            email,
            phone_raw,
            phone_normalized,
        }
    }

    /// Names of the required fields this request lacks.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.donation_type.is_empty() {
            missing.push("donation_type");
        }
        if self.amount.is_none() {
            missing.push("amount");
        }
        if self.donor_name.is_empty() {
            missing.push("donor_name");
        }
        if self.email.is_none() {
            missing.push("email");
        }
        if self.phone_normalized.is_empty() {
            missing.push("phone");
        }
        missing
    }

    /// Apply the validation policy, yielding a dispatchable donation.
    pub fn resolve(self, policy: ValidationPolicy) -> Result<Donation, DonationError> {
        if policy == ValidationPolicy::Strict {
            let missing = self.missing_fields();
            if !missing.is_empty() {
                return Err(DonationError::MissingField(missing));
            }
        }

        let amount = self
            .amount
            .map(format_amount)
            .unwrap_or_else(|| UNSPECIFIED_AMOUNT.to_string());
        let email = self.email.unwrap_or_else(|| PLACEHOLDER_EMAIL.to_string());
        let phone = if self.phone_normalized.is_empty() {
            TEST_PHONE.to_string()
        } else {
            self.phone_normalized
        };

        Ok(Donation {
            donation_type: self.donation_type,
            amount,
            donor_name: self.donor_name,
            email,
            phone,
        })
    }
}

/// First non-empty string (or number rendered as text) among `keys`.
fn first_text(params: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|key| params.get(*key)).find_map(|value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    })
}

/// Render a JSON number as text, dropping a zero fraction (`3001234567.0`
/// becomes `3001234567`).
fn number_text(n: &Number) -> String {
    parse_decimal(&n.to_string())
        .map(format_amount)
        .unwrap_or_else(|| n.to_string())
}

/// Parse a positive amount from a number, a numeric string, or a
/// unit-currency object (`{"amount": 500, "currency": "PKR"}`).
fn parse_amount(value: &Value) -> Option<Decimal> {
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(&s.trim().replace(',', "")),
        Value::Object(obj) => return obj.get("amount").and_then(parse_amount),
        _ => None,
    };
    parsed.filter(|amount| *amount > Decimal::ZERO)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn person_name(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => obj.get("name").and_then(person_name),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Render an amount without trailing zeros (`500.00` becomes `500`).
pub fn format_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}
