//! Whitelisted evaluation of source text and call expressions.
//!
//! Source text is accepted only when it matches a known program definition,
//! ignoring whitespace. Call expressions follow
//! `IDENT '(' ['-' | '+'] DIGITS ')' [';']` and nothing else.

use crate::bignum::BigNat;
use crate::error::EvalError;
use crate::output::OutputSink;
use codemig_common::{Kind, GUARD_MESSAGE, MAX_N};
use std::collections::HashMap;

/// Value returned by a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Value {
    Undefined,
    Number(BigNat),
}

/// Bindings visible to a call. Built empty for every execution, so nothing
/// from a previous run or from the host is reachable.
#[derive(Debug, Default)]
pub(crate) struct Scope {
    functions: HashMap<String, Kind>,
}

impl Scope {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Evaluate source text, binding the function it defines
    pub(crate) fn load(&mut self, source: &str) -> Result<Kind, EvalError> {
        let normalized = normalize(source);
        let kind = Kind::ALL
            .into_iter()
            .find(|kind| normalize(kind.source_text()) == normalized)
            .ok_or(EvalError::UnsupportedSource)?;
        self.functions
            .insert(kind.function_name().to_string(), kind);
        Ok(kind)
    }

    /// Evaluate a call expression against the bindings loaded so far
    pub(crate) fn call(
        &self,
        expression: &str,
        out: &mut dyn OutputSink,
    ) -> Result<Value, EvalError> {
        let call = parse_call(expression)?;
        let kind = self
            .functions
            .get(call.name)
            .copied()
            .ok_or_else(|| EvalError::NotDefined(call.name.to_string()))?;
        invoke(kind, call.argument, out)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Call<'a> {
    name: &'a str,
    argument: i64,
}

fn parse_call(expression: &str) -> Result<Call<'_>, EvalError> {
    let invalid = || EvalError::InvalidCall(expression.to_string());

    let text = expression.trim();
    let text = text.strip_suffix(';').unwrap_or(text).trim_end();
    let text = text.strip_suffix(')').ok_or_else(invalid)?;
    let (name, argument) = text.split_once('(').ok_or_else(invalid)?;

    let name = name.trim();
    if !is_identifier(name) {
        return Err(invalid());
    }

    let argument = argument.trim();
    let digits = argument
        .strip_prefix('-')
        .or_else(|| argument.strip_prefix('+'))
        .unwrap_or(argument);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let argument = argument.parse::<i64>().map_err(|_| invalid())?;

    Ok(Call { name, argument })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn normalize(source: &str) -> String {
    source.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn invoke(kind: Kind, argument: i64, out: &mut dyn OutputSink) -> Result<Value, EvalError> {
    // The guard every generated function carries
    let n = u32::try_from(argument)
        .ok()
        .filter(|n| *n <= MAX_N)
        .ok_or_else(|| EvalError::Thrown(GUARD_MESSAGE.to_string()))?;

    match kind {
        Kind::Count => {
            for i in 0..=n {
                out.emit(&i.to_string());
            }
            Ok(Value::Undefined)
        }
        Kind::Fibonacci => Ok(Value::Number(fibonacci(n))),
    }
}

fn fibonacci(n: u32) -> BigNat {
    if n == 0 {
        return BigNat::from_u32(0);
    }
    let mut prev = BigNat::from_u32(0);
    let mut curr = BigNat::from_u32(1);
    for _ in 2..=n {
        let next = prev.add(&curr);
        prev = std::mem::replace(&mut curr, next);
    }
    curr
}
