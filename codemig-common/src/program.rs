//! Canonical program text for each [`Kind`].
//!
//! The server ships this text verbatim and the client only accepts text that
//! matches one of these definitions, so both sides share one copy.

use crate::kind::Kind;

/// Upper bound for `n`, inclusive
pub const MAX_N: u32 = 10_000;

/// Message thrown by the guard embedded in every generated function
pub const GUARD_MESSAGE: &str = "N must be an integer between 0 and 10000";

const COUNT_SOURCE: &str = r#"function printCountToN(n) {
  if (!Number.isInteger(n) || n < 0 || n > 10000) {
    throw new Error("N must be an integer between 0 and 10000");
  }

  for (let i = 0; i <= n; i++) {
    console.log(i);
  }
}
"#;

const FIBONACCI_SOURCE: &str = r#"function fibonacci(n) {
  if (!Number.isInteger(n) || n < 0 || n > 10000) {
    throw new Error("N must be an integer between 0 and 10000");
  }
  if (n === 0) return 0n;
  if (n === 1) return 1n;
  let prev = 0n;
  let curr = 1n;
  for (let i = 2; i <= n; i++) {
    const next = prev + curr;
    prev = curr;
    curr = next;
  }
  return curr;
}
"#;

impl Kind {
    /// Name of the function the source text defines
    pub fn function_name(self) -> &'static str {
        match self {
            Kind::Count => "printCountToN",
            Kind::Fibonacci => "fibonacci",
        }
    }

    /// Source text; depends only on the kind, never on `n`
    pub fn source_text(self) -> &'static str {
        match self {
            Kind::Count => COUNT_SOURCE,
            Kind::Fibonacci => FIBONACCI_SOURCE,
        }
    }

    /// Invocation of the generated function. Count uses the statement form.
    pub fn call_expression(self, n: u32) -> String {
        match self {
            Kind::Count => format!("{}({});", self.function_name(), n),
            Kind::Fibonacci => format!("{}({})", self.function_name(), n),
        }
    }
}
