//! Built-in type services for the primitive payloads.
//!
//! [`install`] registers them; story formats register their overrides
//! afterwards.

mod boolean;
mod integer;
mod number;
mod string;

pub use boolean::BoolService;
pub use integer::IntegerService;
pub use number::NumberService;
pub use string::StringService;

use crate::config;
use crate::convert;
use crate::operator::Operator;
use crate::registry;
use crate::value::Value;

/// Register the number, integer, boolean and string services.
pub fn install() {
    registry::register(NumberService);
    registry::register(IntegerService);
    registry::register(BoolService);
    registry::register(StringService);
}

// ──────────────────────────────────────────────
// Shared helpers
// ──────────────────────────────────────────────

/// Read `value` as a number for arithmetic and comparison. Integers and
/// numbers always qualify; other payloads only in permissive mode.
pub(crate) fn numeric_operand(value: &Value) -> Option<f64> {
    if let Some(n) = value.downcast_ref::<f64>() {
        return Some(*n);
    }
    if let Some(i) = value.downcast_ref::<i64>() {
        return Some(*i as f64);
    }
    if config::is_strict() {
        None
    } else {
        convert::try_convert::<f64>(value, false)
    }
}

pub(crate) fn compare_numbers(l: f64, r: f64, op: Operator) -> Option<bool> {
    match op {
        Operator::Equals => Some(l == r),
        Operator::GreaterThan => Some(l > r),
        Operator::GreaterThanOrEquals => Some(l >= r),
        Operator::LessThan => Some(l < r),
        Operator::LessThanOrEquals => Some(l <= r),
        _ => None,
    }
}

pub(crate) fn combine_numbers(l: f64, r: f64, op: Operator) -> Option<f64> {
    match op {
        Operator::Add => Some(l + r),
        Operator::Subtract => Some(l - r),
        Operator::Multiply => Some(l * r),
        Operator::Divide => Some(l / r),
        Operator::Modulo => Some(l % r),
        _ => None,
    }
}

/// `f64` to `i64`. Strict requires an integral value in range; permissive
/// truncates toward zero and saturates.
pub(crate) fn number_to_int(n: f64, strict: bool) -> Option<i64> {
    if !strict {
        return Some(n as i64);
    }
    let in_range = n >= i64::MIN as f64 && n < i64::MAX as f64;
    (n.fract() == 0.0 && in_range).then_some(n as i64)
}

/// Parse story text as a number.
///
/// Strict accepts only a complete decimal literal (surrounding whitespace
/// allowed); permissive reads the leading literal and ignores the rest
/// (`"12px"` is 12).
pub(crate) fn parse_number(text: &str, strict: bool) -> Option<f64> {
    let trimmed = text.trim();
    let literal = numeric_prefix(trimmed);
    if literal.is_empty() || (strict && literal.len() != trimmed.len()) {
        return None;
    }
    literal.parse().ok()
}

fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let digits_in = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let whole = digits_in(end);
    end += whole;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_in(end + 1);
        if whole + fraction > 0 {
            end += 1 + fraction;
        }
    }
    if whole + fraction == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_in(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    &text[..end]
}
