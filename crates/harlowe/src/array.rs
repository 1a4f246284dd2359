//! Harlowe arrays: `(a: "rope", 2, true)`.
//!
//! Arrays describe their own behavior instead of registering a service, so
//! they work as soon as a story creates one.

use std::hash::{Hash, Hasher};

use storyvar_core::{Operator, Payload, SelfDescribing, TargetType, Value, VarError, VarResult};
use tracing::trace;

use crate::position::position_to_index;

/// An ordered list of story values. Elements are owned: cloning the array
/// duplicates every element.
#[derive(Debug, Clone, Default)]
pub struct HarloweArray(Vec<Value>);

impl HarloweArray {
    pub fn new() -> Self {
        HarloweArray(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    fn index_of(&self, key: &Value) -> VarResult<usize> {
        let name = key.to_display_string();
        position_to_index(&name, self.0.len()).ok_or_else(|| {
            VarError::member_access(format!(
                "array of {} elements has no position '{}'",
                self.0.len(),
                name
            ))
        })
    }
}

impl From<Vec<Value>> for HarloweArray {
    fn from(elements: Vec<Value>) -> Self {
        HarloweArray(elements)
    }
}

impl FromIterator<Value> for HarloweArray {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        HarloweArray(iter.into_iter().collect())
    }
}

impl Payload for HarloweArray {
    /// Elements compare through their own services (`1` equals `1.0`), so
    /// only the length is stable across equal arrays.
    fn hash_payload(&self, mut state: &mut dyn Hasher) {
        self.0.len().hash(&mut state);
    }

    fn as_self_describing(&self) -> Option<&dyn SelfDescribing> {
        Some(self)
    }

    fn as_self_describing_mut(&mut self) -> Option<&mut dyn SelfDescribing> {
        Some(self)
    }
}

impl SelfDescribing for HarloweArray {
    fn get_member(&self, key: &Value) -> VarResult<Value> {
        if key.to_display_string() == "length" {
            return Ok(Value::from(i64::try_from(self.0.len()).unwrap_or(i64::MAX)));
        }
        let index = self.index_of(key)?;
        Ok(self.0[index].duplicate())
    }

    fn set_member(&mut self, key: &Value, value: Value) -> VarResult<()> {
        let index = self.index_of(key)?;
        trace!(index, "array element replaced");
        self.0[index] = value;
        Ok(())
    }

    fn remove_member(&mut self, key: &Value) -> VarResult<()> {
        let index = self.index_of(key)?;
        self.0.remove(index);
        Ok(())
    }

    fn compare(&self, op: Operator, other: &Value) -> Option<bool> {
        match op {
            Operator::Equals => {
                let other = other.downcast_ref::<HarloweArray>()?;
                Some(
                    self.0.len() == other.0.len()
                        && self.0.iter().zip(&other.0).all(|(a, b)| a == b),
                )
            }
            Operator::Contains => Some(self.0.iter().any(|element| element == other)),
            _ => None,
        }
    }

    fn combine(&self, op: Operator, other: &Value) -> Option<Value> {
        let other = other.downcast_ref::<HarloweArray>()?;
        match op {
            Operator::Add => Some(Value::new(
                self.0.iter().chain(&other.0).cloned().collect::<HarloweArray>(),
            )),
            Operator::Subtract => Some(Value::new(
                self.0
                    .iter()
                    .filter(|element| !other.0.iter().any(|removed| *element == removed))
                    .cloned()
                    .collect::<HarloweArray>(),
            )),
            _ => None,
        }
    }

    fn duplicate(&self) -> Option<Box<dyn Payload>> {
        Some(Box::new(self.clone()))
    }

    fn convert_to(&self, target: TargetType, _strict: bool) -> Option<Value> {
        if !target.is::<String>() {
            return None;
        }
        let joined = self
            .0
            .iter()
            .map(Value::to_display_string)
            .collect::<Vec<_>>()
            .join(",");
        Some(Value::from(joined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use storyvar_core::{set_conversion_mode, ConversionMode};

    fn setup() {
        crate::install().unwrap();
        set_conversion_mode(ConversionMode::Permissive);
    }

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn array(elements: &[&str]) -> Value {
        Value::new(elements.iter().map(|e| Value::from(*e)).collect::<HarloweArray>())
    }

    #[test]
    fn positional_members() {
        setup();
        let mut items = array(&["rope", "torch", "bread"]);
        assert_eq!(items.get_member(&Value::from("2nd")).unwrap(), Value::from("torch"));
        assert_eq!(items.get_member(&Value::from("length")).unwrap(), Value::from(3i64));

        items.set_member(&Value::from("last"), Value::from("cheese")).unwrap();
        items.remove_member(&Value::from(1i64)).unwrap();
        assert_eq!(items, array(&["torch", "cheese"]));

        assert!(matches!(
            items.get_member(&Value::from("3rd")),
            Err(VarError::MemberAccess { .. })
        ));
    }

    #[test]
    fn equality_is_elementwise() {
        setup();
        assert_eq!(array(&["a", "b"]), array(&["a", "b"]));
        assert_ne!(array(&["a", "b"]), array(&["b", "a"]));
        assert_ne!(array(&["a"]), array(&["a", "a"]));
        assert_ne!(array(&["a"]), Value::from("a"));
    }

    #[test]
    fn contains_checks_elements() {
        setup();
        let items = array(&["rope", "torch"]);
        assert!(items.contains(&Value::from("rope")));
        assert!(!items.contains(&Value::from("ope")));
        assert!(Value::from("torch").contained_by(&items));
    }

    #[test]
    fn add_and_subtract() {
        setup();
        let joined = array(&["a", "b"]).combine(Operator::Add, &array(&["c"])).unwrap();
        assert_eq!(joined, array(&["a", "b", "c"]));
        let pruned = array(&["a", "b", "a", "c"])
            .combine(Operator::Subtract, &array(&["a"]))
            .unwrap();
        assert_eq!(pruned, array(&["b", "c"]));
        assert!(array(&["a"]).combine(Operator::Multiply, &array(&["a"])).is_err());
        assert!(array(&["a"]).combine(Operator::Add, &Value::from("b")).is_err());
    }

    #[test]
    fn equal_arrays_hash_alike() {
        setup();
        let ints = Value::new(HarloweArray::from(vec![Value::from(1i64)]));
        let numbers = Value::new(HarloweArray::from(vec![Value::from(1.0)]));
        assert_eq!(ints, numbers);
        assert_eq!(hash_of(&ints), hash_of(&numbers));
    }

    #[test]
    fn subtract_removes_what_the_array_contains() {
        setup();
        let texts = array(&["2"]);
        let numbers = Value::new(HarloweArray::from(vec![Value::from(2i64)]));
        // "2" does not equal 2, so it stays.
        assert!(!texts.contains(&Value::from(2i64)));
        let pruned = texts.combine(Operator::Subtract, &numbers).unwrap();
        assert_eq!(pruned.get_member(&Value::from("length")).unwrap(), Value::from(1i64));
        // 2 equals "2" in permissive mode, so it goes.
        assert!(numbers.contains(&Value::from("2")));
        let pruned = numbers.combine(Operator::Subtract, &texts).unwrap();
        assert_eq!(pruned.get_member(&Value::from("length")).unwrap(), Value::from(0i64));
    }

    #[test]
    fn duplicates_are_deep() {
        setup();
        let original = array(&["rope"]);
        let mut copy = original.duplicate();
        copy.set_member(&Value::from("1st"), Value::from("chain")).unwrap();
        assert_eq!(original, array(&["rope"]));
        assert_eq!(copy, array(&["chain"]));
    }

    #[test]
    fn displays_comma_joined() {
        setup();
        let mixed = Value::new(HarloweArray::from(vec![
            Value::from("rope"),
            Value::from(2i64),
            Value::from(true),
        ]));
        assert_eq!(mixed.to_display_string(), "rope,2,true");
        assert!(mixed.as_number().is_err());
    }
}
