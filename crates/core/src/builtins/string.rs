//! Story text.
//!
//! Strings are read-only, non-keyed containers: every member operation
//! fails here. Story formats that give strings positional access layer their
//! own service over this one.

use crate::config;
use crate::convert::{self, TargetType};
use crate::error::{VarError, VarResult};
use crate::operator::Operator;
use crate::service::TypeService;
use crate::value::Value;

use super::{number_to_int, parse_number};

pub struct StringService;

impl TypeService for StringService {
    type Payload = String;

    fn get_member(&self, _container: &String, key: &Value) -> VarResult<Value> {
        Err(VarError::member_access(format!(
            "string has no member '{}'",
            key
        )))
    }

    fn set_member(&self, _container: &mut String, key: &Value, _value: Value) -> VarResult<()> {
        Err(VarError::member_access(format!(
            "cannot set member '{}' of a string; strings are read-only",
            key
        )))
    }

    fn remove_member(&self, _container: &mut String, key: &Value) -> VarResult<()> {
        Err(VarError::member_access(format!(
            "cannot remove member '{}' of a string; strings are read-only",
            key
        )))
    }

    fn compare(&self, op: Operator, left: &String, right: &Value) -> Option<bool> {
        if op == Operator::Contains {
            return Some(left.contains(text_operand(right)?.as_str()));
        }
        let r = right.downcast_ref::<String>()?;
        match op {
            Operator::Equals => Some(left == r),
            Operator::GreaterThan => Some(left > r),
            Operator::GreaterThanOrEquals => Some(left >= r),
            Operator::LessThan => Some(left < r),
            Operator::LessThanOrEquals => Some(left <= r),
            _ => None,
        }
    }

    fn combine(&self, op: Operator, left: &String, right: &Value) -> Option<Value> {
        match op {
            Operator::Add => {
                let mut joined = left.clone();
                joined.push_str(&text_operand(right)?);
                Some(Value::from(joined))
            }
            _ => None,
        }
    }

    fn convert_to(&self, payload: &String, target: TargetType, strict: bool) -> Option<Value> {
        let number = || parse_number(payload, strict);
        if target.is::<f64>() {
            return number().map(Value::from);
        }
        if target.is::<i64>() {
            if let Ok(exact) = payload.trim().parse::<i64>() {
                return Some(Value::from(exact));
            }
            return number_to_int(number()?, strict).map(Value::from);
        }
        None
    }

    fn convert_from(&self, source: &Value, strict: bool) -> Option<String> {
        (!strict && source.is_empty()).then(String::new)
    }
}

/// Right-hand text: strings always; other payloads only in permissive mode,
/// through their display form.
fn text_operand(value: &Value) -> Option<String> {
    if let Some(text) = value.downcast_ref::<String>() {
        return Some(text.clone());
    }
    if config::is_strict() {
        None
    } else {
        convert::try_convert::<String>(value, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::config::{set_conversion_mode, ConversionMode};
    use crate::registry;

    fn setup(mode: ConversionMode) {
        registry::clear();
        builtins::install();
        set_conversion_mode(mode);
    }

    #[test]
    fn members_are_read_only() {
        setup(ConversionMode::Permissive);
        let mut text = Value::from("hello");
        let key = Value::from("length");
        assert!(matches!(text.get_member(&key), Err(VarError::MemberAccess { .. })));
        assert!(matches!(
            text.set_member(&key, Value::from(1i64)),
            Err(VarError::MemberAccess { .. })
        ));
        assert!(matches!(text.remove_member(&key), Err(VarError::MemberAccess { .. })));
    }

    #[test]
    fn ordering_is_lexicographic() {
        setup(ConversionMode::Strict);
        assert!(Value::from("apple") < Value::from("banana"));
        assert!(Value::from("b").compare(Operator::GreaterThanOrEquals, &Value::from("b")));
    }

    #[test]
    fn contains_is_substring() {
        setup(ConversionMode::Strict);
        let text = Value::from("hello");
        assert!(text.contains(&Value::from("ell")));
        assert!(Value::from("ell").contained_by(&text));
        assert!(!Value::from("hello").contained_by(&Value::from("ell")));
    }

    #[test]
    fn concatenation_by_mode() {
        setup(ConversionMode::Strict);
        assert!(Value::from("room ").combine(Operator::Add, &Value::from(4i64)).is_err());
        setup(ConversionMode::Permissive);
        let joined = Value::from("room ").combine(Operator::Add, &Value::from(4i64)).unwrap();
        assert_eq!(joined.as_string().unwrap(), "room 4");
    }

    #[test]
    fn numeric_parsing_by_mode() {
        setup(ConversionMode::Strict);
        assert_eq!(Value::from("42").as_int().unwrap(), 42);
        assert_eq!(Value::from("2.5").as_number().unwrap(), 2.5);
        assert!(Value::from("12px").as_number().is_err());
        assert!(Value::from("2.5").as_int().is_err());
        setup(ConversionMode::Permissive);
        assert_eq!(Value::from("12px").as_number().unwrap(), 12.0);
        assert_eq!(Value::from("2.5").as_int().unwrap(), 2);
    }

    #[test]
    fn empty_displays_as_empty_string() {
        setup(ConversionMode::Strict);
        assert_eq!(Value::empty().to_display_string(), "");
        assert!(Value::empty().as_string().is_err());
        setup(ConversionMode::Permissive);
        assert_eq!(Value::empty().as_string().unwrap(), "");
    }
}
