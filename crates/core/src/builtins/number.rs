//! `f64` story numbers.

use crate::convert::TargetType;
use crate::operator::Operator;
use crate::service::TypeService;
use crate::value::Value;

use super::{combine_numbers, compare_numbers, number_to_int, numeric_operand};

pub struct NumberService;

impl TypeService for NumberService {
    type Payload = f64;

    fn compare(&self, op: Operator, left: &f64, right: &Value) -> Option<bool> {
        compare_numbers(*left, numeric_operand(right)?, op)
    }

    fn combine(&self, op: Operator, left: &f64, right: &Value) -> Option<Value> {
        combine_numbers(*left, numeric_operand(right)?, op).map(Value::from)
    }

    fn unary(&self, op: Operator, operand: &f64) -> Option<Value> {
        match op {
            Operator::Increment => Some(Value::from(operand + 1.0)),
            Operator::Decrement => Some(Value::from(operand - 1.0)),
            _ => None,
        }
    }

    fn convert_to(&self, payload: &f64, target: TargetType, strict: bool) -> Option<Value> {
        if target.is::<String>() {
            // Display already omits the fraction of integral numbers
            return Some(Value::from(payload.to_string()));
        }
        if target.is::<i64>() {
            return number_to_int(*payload, strict).map(Value::from);
        }
        None
    }

    fn convert_from(&self, source: &Value, strict: bool) -> Option<f64> {
        if strict {
            return None;
        }
        if source.is_empty() {
            return Some(0.0);
        }
        source
            .downcast_ref::<bool>()
            .map(|b| if *b { 1.0 } else { 0.0 })
    }
}
