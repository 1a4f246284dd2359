//! The story variable: a uniform container for any payload.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::warn;

use crate::config;
use crate::convert;
use crate::dispatch;
use crate::error::{VarError, VarResult};
use crate::operator::Operator;
use crate::payload::Payload;
use crate::registry;

/// A dynamically-typed story value.
///
/// Holds at most one payload, never another `Value`: wrapping a value in a
/// value collapses the chain and duplicates the innermost payload, so two
/// values never alias mutable state. `Clone` is [`Value::duplicate`].
///
/// Operators, conversions and member access are routed to the payload's
/// registered [`TypeService`](crate::TypeService), or to its
/// [`SelfDescribing`](crate::SelfDescribing) implementation when no service
/// is registered.
#[derive(Default)]
pub struct Value {
    payload: Option<Box<dyn Payload>>,
}

impl Value {
    /// A value with no payload.
    pub fn empty() -> Self {
        Value { payload: None }
    }

    pub fn new<P: Payload>(payload: P) -> Self {
        Self::from_boxed(Box::new(payload))
    }

    pub fn from_boxed(payload: Box<dyn Payload>) -> Self {
        if payload.is::<Value>() {
            // A stored payload is never a Value, so one level reaches the innermost payload.
            return match payload.into_any().downcast::<Value>() {
                Ok(nested) => nested.duplicate(),
                Err(_) => Value::empty(),
            };
        }
        Value {
            payload: Some(payload),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }

    /// Concrete type of the payload, `None` when empty.
    pub fn inner_type(&self) -> Option<TypeId> {
        self.payload().map(|p| p.payload_type_id())
    }

    /// Short payload type name for diagnostics, `"null"` when empty.
    pub fn type_name(&self) -> &'static str {
        self.payload().map_or("null", |p| p.type_name())
    }

    pub fn payload(&self) -> Option<&dyn Payload> {
        self.payload.as_deref()
    }

    pub fn payload_mut(&mut self) -> Option<&mut dyn Payload> {
        self.payload.as_deref_mut()
    }

    pub fn is<T: Payload>(&self) -> bool {
        self.payload().is_some_and(|p| p.is::<T>())
    }

    pub fn downcast_ref<T: Payload>(&self) -> Option<&T> {
        self.payload()?.downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Payload>(&mut self) -> Option<&mut T> {
        self.payload_mut()?.downcast_mut::<T>()
    }

    /// Take the payload out if it is a `T`.
    pub fn into_inner<T: Payload>(self) -> Option<T> {
        let payload = self.payload?;
        payload.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }

    // ──────────────────────────────────────────────
    // Duplication
    // ──────────────────────────────────────────────

    /// Copy this value so that mutating the copy's payload cannot affect
    /// the original.
    ///
    /// Value types are copied plainly. Other payloads are duplicated by
    /// their registered service, else by their self-describing
    /// implementation, else by `Clone`.
    pub fn duplicate(&self) -> Value {
        let Some(payload) = self.payload() else {
            return Value::empty();
        };

        if payload.is_value_type() {
            return Value {
                payload: Some(payload.clone_payload()),
            };
        }

        if let Some(service) = registry::lookup(payload.payload_type_id()) {
            if let Some(copy) = service.duplicate(payload) {
                return Value::from_boxed(copy);
            }
        }

        if let Some(copy) = payload
            .as_self_describing()
            .and_then(|described| described.duplicate())
        {
            if copy.payload_type_id() == payload.payload_type_id() {
                return Value::from_boxed(copy);
            }
            warn!(
                expected = payload.type_name(),
                got = copy.type_name(),
                "duplicate produced the wrong payload type"
            );
        }

        Value {
            payload: Some(payload.clone_payload()),
        }
    }

    // ──────────────────────────────────────────────
    // Members
    // ──────────────────────────────────────────────

    pub fn get_member(&self, key: &Value) -> VarResult<Value> {
        let payload = self
            .payload()
            .ok_or_else(|| VarError::member_access("cannot get members of an empty value"))?;
        if key.is_empty() {
            return Err(VarError::member_access(
                "cannot use an empty value as a member name",
            ));
        }

        if let Some(service) = registry::lookup(payload.payload_type_id()) {
            return service.get_member(payload, key);
        }
        if let Some(described) = payload.as_self_describing() {
            return described.get_member(key);
        }

        Err(VarError::member_access(format!(
            "cannot get member of a value of type {}",
            payload.type_name()
        )))
    }

    pub fn set_member(&mut self, key: &Value, value: Value) -> VarResult<()> {
        let payload = self
            .payload
            .as_deref_mut()
            .ok_or_else(|| VarError::member_access("cannot set members of an empty value"))?;
        if key.is_empty() {
            return Err(VarError::member_access(
                "cannot use an empty value as a member name",
            ));
        }

        if let Some(service) = registry::lookup(payload.payload_type_id()) {
            return service.set_member(payload, key, value);
        }
        let type_name = payload.type_name();
        if let Some(described) = payload.as_self_describing_mut() {
            return described.set_member(key, value);
        }

        Err(VarError::member_access(format!(
            "cannot set member of a value of type {}",
            type_name
        )))
    }

    pub fn remove_member(&mut self, key: &Value) -> VarResult<()> {
        let payload = self
            .payload
            .as_deref_mut()
            .ok_or_else(|| VarError::member_access("cannot remove members of an empty value"))?;

        if let Some(service) = registry::lookup(payload.payload_type_id()) {
            return service.remove_member(payload, key);
        }
        let type_name = payload.type_name();
        if let Some(described) = payload.as_self_describing_mut() {
            return described.remove_member(key);
        }

        Err(VarError::member_access(format!(
            "cannot remove member of a value of type {}",
            type_name
        )))
    }

    /// Use this value as a member name to be applied to a parent later.
    pub fn as_member_of(&self) -> MemberLookup {
        MemberLookup::new(self.duplicate())
    }

    /// Rebind `slot` to this value.
    pub fn put_into(self, slot: &mut Value) {
        *slot = self;
    }

    // ──────────────────────────────────────────────
    // Operators
    // ──────────────────────────────────────────────

    pub fn compare(&self, op: Operator, other: &Value) -> bool {
        dispatch::compare(op, self, other)
    }

    pub fn combine(&self, op: Operator, other: &Value) -> VarResult<Value> {
        dispatch::combine(op, self, other)
    }

    pub fn unary(&self, op: Operator) -> VarResult<Value> {
        dispatch::unary(op, self)
    }

    /// Apply any operator; see [`dispatch::apply`].
    pub fn apply(&self, op: Operator, other: &Value) -> VarResult<Value> {
        dispatch::apply(op, self, other)
    }

    pub fn contains(&self, item: &Value) -> bool {
        dispatch::compare(Operator::Contains, self, item)
    }

    pub fn contained_by(&self, container: &Value) -> bool {
        dispatch::compare(Operator::Contains, container, self)
    }

    pub fn increment(&self) -> VarResult<Value> {
        dispatch::unary(Operator::Increment, self)
    }

    pub fn decrement(&self) -> VarResult<Value> {
        dispatch::unary(Operator::Decrement, self)
    }

    // ──────────────────────────────────────────────
    // Conversions (current conversion mode)
    // ──────────────────────────────────────────────

    /// Convert into a new value holding a `T`.
    pub fn convert_to<T: Payload>(&self) -> VarResult<Value> {
        self.convert_value_to::<T>().map(Value::new)
    }

    pub fn convert_value_to<T: Payload>(&self) -> VarResult<T> {
        convert::convert_or_err::<T>(self, config::is_strict())
    }

    pub fn try_convert_to<T: Payload>(&self) -> Option<T> {
        convert::try_convert::<T>(self, config::is_strict())
    }

    pub fn as_string(&self) -> VarResult<String> {
        self.convert_value_to::<String>()
    }

    pub fn as_number(&self) -> VarResult<f64> {
        self.convert_value_to::<f64>()
    }

    pub fn as_int(&self) -> VarResult<i64> {
        self.convert_value_to::<i64>()
    }

    /// Truthiness, as used by story conditionals.
    pub fn as_bool(&self) -> VarResult<bool> {
        self.convert_value_to::<bool>()
    }

    /// Permissive string form; empty when no conversion exists.
    pub fn to_display_string(&self) -> String {
        convert::try_convert::<String>(self, false).unwrap_or_default()
    }
}

impl Payload for Value {
    fn hash_payload(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        self.duplicate()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload() {
            Some(payload) => f.debug_tuple("Value").field(&payload).finish(),
            None => f.write_str("Value(null)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        dispatch::compare(Operator::Equals, self, other)
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.compare(Operator::Equals, other) {
            Some(Ordering::Equal)
        } else if self.compare(Operator::LessThan, other) {
            Some(Ordering::Less)
        } else if self.compare(Operator::GreaterThan, other) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.payload() {
            None => 0u64.hash(state),
            Some(payload) => {
                payload.payload_type_id().hash(state);
                payload.hash_payload(state);
            }
        }
    }
}

// ──────────────────────────────────────────────
// Primitive conversions
// ──────────────────────────────────────────────

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::new(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::new(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::new(i64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::new(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::new(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::new(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or_else(Value::empty, Into::into)
    }
}

impl TryFrom<&Value> for String {
    type Error = VarError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_string()
    }
}

impl TryFrom<&Value> for f64 {
    type Error = VarError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_number()
    }
}

impl TryFrom<&Value> for i64 {
    type Error = VarError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_int()
    }
}

impl TryFrom<&Value> for bool {
    type Error = VarError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_bool()
    }
}

// ──────────────────────────────────────────────
// Deferred member lookup
// ──────────────────────────────────────────────

/// A member name waiting for its parent, as in "the 2nd of $inventory".
#[derive(Debug, Clone)]
pub struct MemberLookup {
    member: Value,
}

impl MemberLookup {
    pub fn new(member: impl Into<Value>) -> Self {
        MemberLookup {
            member: member.into(),
        }
    }

    pub fn member(&self) -> &Value {
        &self.member
    }

    pub fn get(&self, parent: &Value) -> VarResult<Value> {
        parent.get_member(&self.member)
    }

    pub fn set(&self, parent: &mut Value, value: Value) -> VarResult<()> {
        parent.set_member(&self.member, value)
    }

    pub fn remove(&self, parent: &mut Value) -> VarResult<()> {
        parent.remove_member(&self.member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn nested_values_collapse() {
        let value = Value::new(Value::new(Value::new(5i64)));
        assert_eq!(value.inner_type(), Some(TypeId::of::<i64>()));
        assert_eq!(value.downcast_ref::<i64>(), Some(&5));
    }

    #[test]
    fn wrapping_an_empty_value_is_empty() {
        let value = Value::new(Value::empty());
        assert!(value.is_empty());
        assert_eq!(value.type_name(), "null");
        assert_eq!(value.inner_type(), None);
    }

    #[test]
    fn empty_values_hash_to_sentinel() {
        assert_eq!(hash_of(&Value::empty()), hash_of(&Value::default()));
    }

    #[test]
    fn same_payload_hashes_alike() {
        assert_eq!(hash_of(&Value::from("door")), hash_of(&Value::from("door")));
        assert_eq!(hash_of(&Value::from(0.0)), hash_of(&Value::from(-0.0)));
        assert_ne!(hash_of(&Value::from(1i64)), hash_of(&Value::from(1.0)));
    }

    #[test]
    fn into_inner_checks_type() {
        assert_eq!(Value::from("key").into_inner::<String>(), Some("key".to_string()));
        assert_eq!(Value::from("key").into_inner::<f64>(), None);
        assert_eq!(Value::empty().into_inner::<f64>(), None);
    }

    #[test]
    fn option_maps_none_to_empty() {
        assert!(Value::from(None::<i64>).is_empty());
        assert!(Value::from(Some(3i64)).is::<i64>());
    }

    #[test]
    fn put_into_rebinds_slot() {
        let mut slot = Value::from(1i64);
        Value::from("rebound").put_into(&mut slot);
        assert_eq!(slot.downcast_ref::<String>().map(String::as_str), Some("rebound"));
    }

    #[test]
    fn member_access_on_empty_value_fails() {
        let mut empty = Value::empty();
        let key = Value::from("x");
        assert!(matches!(empty.get_member(&key), Err(VarError::MemberAccess { .. })));
        assert!(matches!(
            empty.set_member(&key, Value::from(1i64)),
            Err(VarError::MemberAccess { .. })
        ));
        assert!(matches!(empty.remove_member(&key), Err(VarError::MemberAccess { .. })));
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Mirror(i64);

    impl Payload for Mirror {
        fn as_self_describing(&self) -> Option<&dyn crate::SelfDescribing> {
            Some(self)
        }
    }

    impl crate::SelfDescribing for Mirror {
        fn duplicate(&self) -> Option<Box<dyn Payload>> {
            Some(Box::new(String::from("not a mirror")))
        }
    }

    #[test]
    fn wrong_type_duplicate_falls_back_to_clone() {
        registry::clear();
        let copy = Value::new(Mirror(7)).duplicate();
        assert_eq!(copy.downcast_ref::<Mirror>(), Some(&Mirror(7)));
    }

    #[test]
    fn debug_shows_payload() {
        assert_eq!(format!("{:?}", Value::from(2i64)), "Value(2)");
        assert_eq!(format!("{:?}", Value::empty()), "Value(null)");
    }
}
