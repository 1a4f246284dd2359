//! Operator dispatcher.
//!
//! The left operand's payload type owns the semantics of every operator:
//! its registered service is asked first, its self-describing
//! implementation second. There is no fallback to the right operand and no
//! automatic promotion.

use tracing::trace;

use crate::error::{VarError, VarResult};
use crate::operator::{Operator, OperatorKind};
use crate::registry;
use crate::value::Value;

/// Comparisons are total: an unsupported pair compares as `false`.
pub fn compare(op: Operator, left: &Value, right: &Value) -> bool {
    let Some(payload) = left.payload() else {
        trace!(%op, "comparison on empty value");
        return false;
    };

    if let Some(service) = registry::lookup(payload.payload_type_id()) {
        if let Some(result) = service.compare(op, payload, right) {
            return result;
        }
    }

    if let Some(described) = payload.as_self_describing() {
        if let Some(result) = described.compare(op, right) {
            return result;
        }
    }

    trace!(
        %op,
        left = payload.type_name(),
        right = right.type_name(),
        "comparison unsupported"
    );
    false
}

pub fn try_combine(op: Operator, left: &Value, right: &Value) -> Option<Value> {
    let payload = left.payload()?;

    if let Some(service) = registry::lookup(payload.payload_type_id()) {
        if let Some(result) = service.combine(op, payload, right) {
            return Some(result);
        }
    }

    payload
        .as_self_describing()
        .and_then(|described| described.combine(op, right))
}

pub fn combine(op: Operator, left: &Value, right: &Value) -> VarResult<Value> {
    try_combine(op, left, right).ok_or_else(|| VarError::TypeCombination {
        op,
        left: left.type_name().to_string(),
        right: Some(right.type_name().to_string()),
    })
}

pub fn try_unary(op: Operator, operand: &Value) -> Option<Value> {
    let payload = operand.payload()?;

    if let Some(service) = registry::lookup(payload.payload_type_id()) {
        if let Some(result) = service.unary(op, payload) {
            return Some(result);
        }
    }

    payload
        .as_self_describing()
        .and_then(|described| described.unary(op))
}

pub fn unary(op: Operator, operand: &Value) -> VarResult<Value> {
    try_unary(op, operand).ok_or_else(|| VarError::TypeCombination {
        op,
        left: operand.type_name().to_string(),
        right: None,
    })
}

/// Route any operator by its category. Comparisons yield a boolean value;
/// `right` is ignored for unary operators.
pub fn apply(op: Operator, left: &Value, right: &Value) -> VarResult<Value> {
    match op.kind() {
        OperatorKind::Comparison => Ok(Value::from(compare(op, left, right))),
        OperatorKind::Combination => combine(op, left, right),
        OperatorKind::Unary => unary(op, left),
    }
}
