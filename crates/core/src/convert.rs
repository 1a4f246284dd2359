//! Conversion engine.
//!
//! Resolution order for `convert(value, target)`:
//!
//! 1. the payload already is `target`: a duplicate of it;
//! 2. the payload type's registered service, `convert_to`;
//! 3. the payload's self-describing `convert_to`;
//! 4. the target type's registered service, `convert_from` (also consulted
//!    for empty values);
//! 5. otherwise not convertible.
//!
//! `strict` is passed through untouched; only services interpret it.

use std::any::TypeId;
use std::fmt;

use tracing::{trace, warn};

use crate::error::{VarError, VarResult};
use crate::payload::{short_type_name, Payload};
use crate::registry;
use crate::value::Value;

/// The payload type a conversion should produce.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetType {
    id: TypeId,
    name: &'static str,
}

impl TargetType {
    pub fn of<T: Payload>() -> Self {
        TargetType {
            id: TypeId::of::<T>(),
            name: short_type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: Payload>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Debug for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetType({})", self.name)
    }
}

/// Query form: `None` when no step can produce `target`.
pub fn convert(value: &Value, target: TargetType, strict: bool) -> Option<Value> {
    if let Some(payload) = value.payload() {
        if payload.payload_type_id() == target.id {
            return Some(value.duplicate());
        }

        if let Some(service) = registry::lookup(payload.payload_type_id()) {
            if let Some(result) = service.convert_to(payload, target, strict) {
                if let Some(result) = checked(result, target, "source service") {
                    return Some(result);
                }
            }
        }

        if let Some(described) = payload.as_self_describing() {
            if let Some(result) = described.convert_to(target, strict) {
                if let Some(result) = checked(result, target, "self-describing") {
                    return Some(result);
                }
            }
        }
    }

    if let Some(service) = registry::lookup(target.id) {
        if let Some(result) = service.convert_from(value, strict) {
            if let Some(result) = checked(result, target, "target service") {
                return Some(result);
            }
        }
    }

    trace!(
        from = value.type_name(),
        to = target.name,
        strict,
        "no conversion path"
    );
    None
}

/// Typed query form.
pub fn try_convert<T: Payload>(value: &Value, strict: bool) -> Option<T> {
    convert(value, TargetType::of::<T>(), strict)?.into_inner::<T>()
}

/// Required form: fails with [`VarError::Conversion`] naming both types.
pub fn convert_or_err<T: Payload>(value: &Value, strict: bool) -> VarResult<T> {
    try_convert::<T>(value, strict)
        .ok_or_else(|| VarError::conversion(value.type_name(), short_type_name::<T>()))
}

/// A service that answers with the wrong payload type has not converted.
fn checked(result: Value, target: TargetType, path: &'static str) -> Option<Value> {
    if result.inner_type() == Some(target.id) {
        trace!(to = target.name, path, "converted");
        Some(result)
    } else {
        warn!(
            expected = target.name,
            got = result.type_name(),
            path,
            "conversion produced the wrong payload type"
        );
        None
    }
}
