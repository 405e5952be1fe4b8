//! The closed set of computations a server can describe.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which parameterized algorithm a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Ascending count from 0 through n, one line per number
    Count,
    /// The n-th Fibonacci term
    Fibonacci,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Count, Kind::Fibonacci];

    /// Canonical path segment and wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Count => "count",
            Kind::Fibonacci => "fibonacci",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a path segment does not name a known kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown kind '{0}'. Expected one of: count, nau, fibonacci, fib")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" | "nau" => Ok(Kind::Count),
            "fibonacci" | "fib" => Ok(Kind::Fibonacci),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}
