//! Type-service contracts.
//!
//! Two ways to make a payload type interoperable with every operator,
//! conversion and member access:
//!
//! - implement [`TypeService`] for a separate service object and register it
//!   with [`registry::register`](crate::registry::register), or
//! - implement [`SelfDescribing`] on the payload type itself and return it
//!   from [`Payload::as_self_describing`].
//!
//! A registered service always takes precedence over a self-describing
//! implementation of the same payload type.
//!
//! Every capability reports "not handled" by default (`None` for operators
//! and conversions, a member-access error for members), so implementors only
//! write what their type supports.

use std::any::TypeId;

use crate::convert::TargetType;
use crate::error::{VarError, VarResult};
use crate::operator::Operator;
use crate::payload::{short_type_name, Payload};
use crate::value::Value;

// ──────────────────────────────────────────────
// Typed service
// ──────────────────────────────────────────────

/// Capability bundle for one concrete payload type, registered externally.
pub trait TypeService: 'static {
    type Payload: Payload + Clone;

    fn get_member(&self, _container: &Self::Payload, _key: &Value) -> VarResult<Value> {
        Err(VarError::member_access(format!(
            "{} has no members",
            short_type_name::<Self::Payload>()
        )))
    }

    fn set_member(
        &self,
        _container: &mut Self::Payload,
        _key: &Value,
        _value: Value,
    ) -> VarResult<()> {
        Err(VarError::member_access(format!(
            "cannot set members of {}",
            short_type_name::<Self::Payload>()
        )))
    }

    fn remove_member(&self, _container: &mut Self::Payload, _key: &Value) -> VarResult<()> {
        Err(VarError::member_access(format!(
            "cannot remove members of {}",
            short_type_name::<Self::Payload>()
        )))
    }

    /// `Some(result)` when this service defines `op` against `right`.
    fn compare(&self, _op: Operator, _left: &Self::Payload, _right: &Value) -> Option<bool> {
        None
    }

    fn combine(&self, _op: Operator, _left: &Self::Payload, _right: &Value) -> Option<Value> {
        None
    }

    fn unary(&self, _op: Operator, _operand: &Self::Payload) -> Option<Value> {
        None
    }

    /// Copy used when a value holding this payload is duplicated. A type
    /// with shared-mutable semantics returns a handle to the same state.
    fn duplicate(&self, payload: &Self::Payload) -> Self::Payload {
        payload.clone()
    }

    /// Convert a payload of this type into `target`.
    fn convert_to(
        &self,
        _payload: &Self::Payload,
        _target: TargetType,
        _strict: bool,
    ) -> Option<Value> {
        None
    }

    /// Build a payload of this type from `source`, which may be empty.
    fn convert_from(&self, _source: &Value, _strict: bool) -> Option<Self::Payload> {
        None
    }
}

// ──────────────────────────────────────────────
// Erased service
// ──────────────────────────────────────────────

/// Object-safe form of [`TypeService`] stored by the registry.
///
/// Implemented for every `TypeService`; payloads of the wrong type are
/// reported as unsupported rather than panicking.
pub trait DynTypeService {
    fn payload_type(&self) -> TypeId;
    fn payload_type_name(&self) -> &'static str;
    fn get_member(&self, container: &dyn Payload, key: &Value) -> VarResult<Value>;
    fn set_member(&self, container: &mut dyn Payload, key: &Value, value: Value)
        -> VarResult<()>;
    fn remove_member(&self, container: &mut dyn Payload, key: &Value) -> VarResult<()>;
    fn compare(&self, op: Operator, left: &dyn Payload, right: &Value) -> Option<bool>;
    fn combine(&self, op: Operator, left: &dyn Payload, right: &Value) -> Option<Value>;
    fn unary(&self, op: Operator, operand: &dyn Payload) -> Option<Value>;
    fn duplicate(&self, payload: &dyn Payload) -> Option<Box<dyn Payload>>;
    fn convert_to(&self, payload: &dyn Payload, target: TargetType, strict: bool)
        -> Option<Value>;
    fn convert_from(&self, source: &Value, strict: bool) -> Option<Value>;
}

impl<S: TypeService> DynTypeService for S {
    fn payload_type(&self) -> TypeId {
        TypeId::of::<S::Payload>()
    }

    fn payload_type_name(&self) -> &'static str {
        short_type_name::<S::Payload>()
    }

    fn get_member(&self, container: &dyn Payload, key: &Value) -> VarResult<Value> {
        let container = typed::<S>(container)?;
        TypeService::get_member(self, container, key)
    }

    fn set_member(
        &self,
        container: &mut dyn Payload,
        key: &Value,
        value: Value,
    ) -> VarResult<()> {
        let found = container.type_name();
        let container = container
            .downcast_mut::<S::Payload>()
            .ok_or_else(|| mismatch::<S>(found))?;
        TypeService::set_member(self, container, key, value)
    }

    fn remove_member(&self, container: &mut dyn Payload, key: &Value) -> VarResult<()> {
        let found = container.type_name();
        let container = container
            .downcast_mut::<S::Payload>()
            .ok_or_else(|| mismatch::<S>(found))?;
        TypeService::remove_member(self, container, key)
    }

    fn compare(&self, op: Operator, left: &dyn Payload, right: &Value) -> Option<bool> {
        let left = left.downcast_ref::<S::Payload>()?;
        TypeService::compare(self, op, left, right)
    }

    fn combine(&self, op: Operator, left: &dyn Payload, right: &Value) -> Option<Value> {
        let left = left.downcast_ref::<S::Payload>()?;
        TypeService::combine(self, op, left, right)
    }

    fn unary(&self, op: Operator, operand: &dyn Payload) -> Option<Value> {
        let operand = operand.downcast_ref::<S::Payload>()?;
        TypeService::unary(self, op, operand)
    }

    fn duplicate(&self, payload: &dyn Payload) -> Option<Box<dyn Payload>> {
        let payload = payload.downcast_ref::<S::Payload>()?;
        Some(Box::new(TypeService::duplicate(self, payload)))
    }

    fn convert_to(
        &self,
        payload: &dyn Payload,
        target: TargetType,
        strict: bool,
    ) -> Option<Value> {
        let payload = payload.downcast_ref::<S::Payload>()?;
        TypeService::convert_to(self, payload, target, strict)
    }

    fn convert_from(&self, source: &Value, strict: bool) -> Option<Value> {
        TypeService::convert_from(self, source, strict).map(Value::new)
    }
}

fn typed<S: TypeService>(payload: &dyn Payload) -> VarResult<&S::Payload> {
    payload
        .downcast_ref::<S::Payload>()
        .ok_or_else(|| mismatch::<S>(payload.type_name()))
}

fn mismatch<S: TypeService>(found: &str) -> VarError {
    VarError::member_access(format!(
        "service for {} cannot handle a {} payload",
        short_type_name::<S::Payload>(),
        found
    ))
}

// ──────────────────────────────────────────────
// Self-describing payloads
// ──────────────────────────────────────────────

/// Dispatch protocol implemented by a payload type on itself.
///
/// Used for types that cannot be registered externally. Conversion *into*
/// a self-describing type is not part of the contract; register a
/// [`TypeService`] for that.
pub trait SelfDescribing {
    fn get_member(&self, _key: &Value) -> VarResult<Value> {
        Err(VarError::member_access("type does not support getting members"))
    }

    fn set_member(&mut self, _key: &Value, _value: Value) -> VarResult<()> {
        Err(VarError::member_access("type does not support setting members"))
    }

    fn remove_member(&mut self, _key: &Value) -> VarResult<()> {
        Err(VarError::member_access("type does not support removing members"))
    }

    fn compare(&self, _op: Operator, _other: &Value) -> Option<bool> {
        None
    }

    fn combine(&self, _op: Operator, _other: &Value) -> Option<Value> {
        None
    }

    fn unary(&self, _op: Operator) -> Option<Value> {
        None
    }

    /// `None` falls back to the payload's `Clone`.
    fn duplicate(&self) -> Option<Box<dyn Payload>> {
        None
    }

    fn convert_to(&self, _target: TargetType, _strict: bool) -> Option<Value> {
        None
    }
}
