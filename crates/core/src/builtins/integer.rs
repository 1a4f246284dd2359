//! `i64` story integers.
//!
//! Integer with integer stays an integer while the result is exact and in
//! range; anything else falls back to number arithmetic.

use crate::convert::TargetType;
use crate::operator::Operator;
use crate::service::TypeService;
use crate::value::Value;

use super::{combine_numbers, compare_numbers, numeric_operand};

pub struct IntegerService;

impl TypeService for IntegerService {
    type Payload = i64;

    fn compare(&self, op: Operator, left: &i64, right: &Value) -> Option<bool> {
        if let Some(r) = right.downcast_ref::<i64>() {
            return compare_numbers_exact(*left, *r, op);
        }
        compare_numbers(*left as f64, numeric_operand(right)?, op)
    }

    fn combine(&self, op: Operator, left: &i64, right: &Value) -> Option<Value> {
        if let Some(r) = right.downcast_ref::<i64>() {
            if let Some(exact) = combine_exact(*left, *r, op) {
                return Some(Value::from(exact));
            }
        }
        combine_numbers(*left as f64, numeric_operand(right)?, op).map(Value::from)
    }

    fn unary(&self, op: Operator, operand: &i64) -> Option<Value> {
        let stepped = match op {
            Operator::Increment => operand.checked_add(1),
            Operator::Decrement => operand.checked_sub(1),
            _ => return None,
        };
        Some(match stepped {
            Some(n) => Value::from(n),
            None if op == Operator::Increment => Value::from(*operand as f64 + 1.0),
            None => Value::from(*operand as f64 - 1.0),
        })
    }

    fn convert_to(&self, payload: &i64, target: TargetType, _strict: bool) -> Option<Value> {
        if target.is::<String>() {
            return Some(Value::from(payload.to_string()));
        }
        if target.is::<f64>() {
            return Some(Value::from(*payload as f64));
        }
        None
    }

    fn convert_from(&self, source: &Value, strict: bool) -> Option<i64> {
        if strict {
            return None;
        }
        if source.is_empty() {
            return Some(0);
        }
        source.downcast_ref::<bool>().map(|b| i64::from(*b))
    }
}

fn compare_numbers_exact(l: i64, r: i64, op: Operator) -> Option<bool> {
    match op {
        Operator::Equals => Some(l == r),
        Operator::GreaterThan => Some(l > r),
        Operator::GreaterThanOrEquals => Some(l >= r),
        Operator::LessThan => Some(l < r),
        Operator::LessThanOrEquals => Some(l <= r),
        _ => None,
    }
}

/// `None` when the result is not an exact in-range integer.
fn combine_exact(l: i64, r: i64, op: Operator) -> Option<i64> {
    match op {
        Operator::Add => l.checked_add(r),
        Operator::Subtract => l.checked_sub(r),
        Operator::Multiply => l.checked_mul(r),
        Operator::Divide => l.checked_rem(r).filter(|rem| *rem == 0).and(l.checked_div(r)),
        Operator::Modulo => l.checked_rem(r),
        _ => None,
    }
}
