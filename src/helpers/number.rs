use std::{cmp::Ordering, fmt};

use crate::processor::QueryError;

/// Numeric interpretation of a raw cell value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Plain digit string
    Int(i64),
    /// Anything else that parsed as a decimal float literal
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// Numeric ordering across both variants, so `Int(1)` and `Float(1.0)` are equal.
    ///
    /// `Int` against `Float` is exact, also past 2^53 where `i64 as f64` rounds.
    /// Coerced values are never NaN; a NaN produced by arithmetic compares equal.
    pub fn compare(&self, other: &Number) -> Ordering {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(&b),
            (Number::Int(a), Number::Float(b)) => cmp_int_float(a, b),
            (Number::Float(a), Number::Int(b)) => cmp_int_float(b, a).reverse(),
            (Number::Float(a), Number::Float(b)) => {
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
        }
    }
}

/// 2^63, the first float above every `i64`
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn cmp_int_float(int: i64, float: f64) -> Ordering {
    if float.is_nan() {
        return Ordering::Equal;
    }
    if float >= I64_BOUND {
        return Ordering::Less;
    }
    if float < -I64_BOUND {
        return Ordering::Greater;
    }

    // within range the integral part converts without loss
    let whole = float.trunc();
    int.cmp(&(whole as i64)).then_with(|| {
        0.0_f64
            .partial_cmp(&(float - whole))
            .unwrap_or(Ordering::Equal)
    })
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            // Debug keeps the fractional part: 699.0, not 699
            Number::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// Coerces a raw string into a [`Number`].
///
/// A non-empty run of ASCII digits is an integer. Anything else must be a
/// strict float literal: optional sign, digits, optional decimal point and
/// exponent. Whitespace, hex, `inf`/`nan` and underscores are rejected.
///
/// # Errors
/// [`QueryError::NotANumber`] when neither rule accepts the input.
pub fn coerce_number(raw: &str) -> Result<Number, QueryError> {
    let bytes = raw.as_bytes();

    if !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit) {
        // digit strings wider than i64 fall through to the float rule
        if let Ok(value) = atoi_simd::parse::<i64>(bytes) {
            return Ok(Number::Int(value));
        }
    }

    if !is_float_literal(bytes) {
        return Err(QueryError::NotANumber(raw.to_string()));
    }

    fast_float::parse::<f64, _>(bytes)
        .map(Number::Float)
        .map_err(|_| QueryError::NotANumber(raw.to_string()))
}

/// Rejects early everything the float parser would accept beyond plain
/// decimal notation (special values, whitespace).
fn is_float_literal(bytes: &[u8]) -> bool {
    bytes.iter().any(u8::is_ascii_digit)
        && bytes
            .iter()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}
