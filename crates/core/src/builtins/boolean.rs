//! Booleans and story truthiness.

use crate::config;
use crate::convert::{self, TargetType};
use crate::operator::Operator;
use crate::service::TypeService;
use crate::value::Value;

pub struct BoolService;

impl TypeService for BoolService {
    type Payload = bool;

    fn compare(&self, op: Operator, left: &bool, right: &Value) -> Option<bool> {
        match op {
            Operator::Equals => right.downcast_ref::<bool>().map(|r| left == r),
            _ => None,
        }
    }

    fn combine(&self, op: Operator, left: &bool, right: &Value) -> Option<Value> {
        let combined = match op {
            Operator::LogicalAnd => {
                *left && convert::try_convert::<bool>(right, config::is_strict())?
            }
            Operator::LogicalOr => {
                *left || convert::try_convert::<bool>(right, config::is_strict())?
            }
            _ => return None,
        };
        Some(Value::from(combined))
    }

    fn convert_to(&self, payload: &bool, target: TargetType, _strict: bool) -> Option<Value> {
        target
            .is::<String>()
            .then(|| Value::from(payload.to_string()))
    }

    /// Truthiness of any value. Strict mode only reads the words `true` and
    /// `false`; permissive mode treats empty as false, numbers as non-zero,
    /// text as non-empty and not `"false"`, and any other payload as true.
    fn convert_from(&self, source: &Value, strict: bool) -> Option<bool> {
        if let Some(text) = source.downcast_ref::<String>() {
            return text_truthiness(text, strict);
        }
        if strict {
            return None;
        }
        if source.is_empty() {
            return Some(false);
        }
        if let Some(n) = source.downcast_ref::<f64>() {
            return Some(*n != 0.0 && !n.is_nan());
        }
        if let Some(i) = source.downcast_ref::<i64>() {
            return Some(*i != 0);
        }
        Some(true)
    }
}

fn text_truthiness(text: &str, strict: bool) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ if strict => None,
        _ => Some(!text.is_empty() && !text.eq_ignore_ascii_case("false")),
    }
}
