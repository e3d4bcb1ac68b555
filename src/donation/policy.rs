//! Validation and response policies for the donation handler.

use std::fmt;
use std::str::FromStr;

/// How missing donation details are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Reply with a "missing details" message and send nothing.
    #[default]
    Strict,
    /// Substitute defaults and always attempt both sends.
    Lenient,
}

/// How the two channel outcomes combine into the reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponsePolicy {
    /// Success only when both channels delivered.
    #[default]
    AllOrNothing,
    /// Success when at least one channel delivered.
    BestEffort,
}

/// Both policy axes, fixed at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DonationPolicy {
    pub validation: ValidationPolicy,
    pub response: ResponsePolicy,
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!("expected 'strict' or 'lenient', got '{other}'")),
        }
    }
}

impl FromStr for ResponsePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "all-or-nothing" => Ok(Self::AllOrNothing),
            "best-effort" => Ok(Self::BestEffort),
            other => Err(format!(
                "expected 'all-or-nothing' or 'best-effort', got '{other}'"
            )),
        }
    }
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

impl fmt::Display for ResponsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllOrNothing => write!(f, "all-or-nothing"),
            Self::BestEffort => write!(f, "best-effort"),
        }
    }
}
