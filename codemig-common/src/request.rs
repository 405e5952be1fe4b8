//! Request validation for the `n` parameter

use crate::kind::Kind;
use crate::program::MAX_N;
use serde::Serialize;

/// `n` failed validation; no artifact is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Parameter n must be an integer between 0 and {max}, got '{input}'")]
    NotAnInteger { input: String, max: u32 },

    #[error("Parameter n must be >= 0 (allowed range 0 to {max}), got {value}")]
    Negative { value: String, max: u32 },

    #[error("Parameter n must be <= {max} (allowed range 0 to {max}), got {value}")]
    TooLarge { value: String, max: u32 },
}

/// Parse textual `n` the way it arrives in a request path.
///
/// Accepts an optional sign followed by ASCII digits. Anything else,
/// including fractional or exponent forms, is not an integer.
pub fn parse_n(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotAnInteger {
            input: input.to_string(),
            max: MAX_N,
        });
    }

    match trimmed.parse::<i64>() {
        Ok(value) => validate_n(value),
        // Only overflow is left at this point
        Err(_) if trimmed.starts_with('-') => Err(ValidationError::Negative {
            value: trimmed.to_string(),
            max: MAX_N,
        }),
        Err(_) => Err(ValidationError::TooLarge {
            value: digits.to_string(),
            max: MAX_N,
        }),
    }
}

/// Check an integer against `0..=MAX_N`.
pub fn validate_n(value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative {
            value: value.to_string(),
            max: MAX_N,
        });
    }
    match u32::try_from(value) {
        Ok(n) if n <= MAX_N => Ok(n),
        _ => Err(ValidationError::TooLarge {
            value: value.to_string(),
            max: MAX_N,
        }),
    }
}

/// A validated request for code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRequest {
    n: u32,
    kind: Kind,
    client_version: Option<String>,
}

impl ExecutionRequest {
    pub fn new(n: i64, kind: Kind) -> Result<Self, ValidationError> {
        Ok(Self {
            n: validate_n(n)?,
            kind,
            client_version: None,
        })
    }

    /// Declare the source version the client already holds
    pub fn with_client_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.client_version = if version.is_empty() {
            None
        } else {
            Some(version)
        };
        self
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn client_version(&self) -> Option<&str> {
        self.client_version.as_deref()
    }
}
