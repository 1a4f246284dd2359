//! Harlowe string semantics.
//!
//! Harlowe strings are indexable by position: `(print: "lamp"'s 1st)`
//! prints `l`. Everything other than positional and length access is
//! handled by the string service this one was layered over.

use std::rc::Rc;

use storyvar_core::{
    registry, DynTypeService, Operator, TargetType, TypeService, Value, VarResult,
};
use tracing::trace;

use crate::position::position_to_index;

pub struct HarloweStringService {
    base: Rc<dyn DynTypeService>,
}

impl HarloweStringService {
    pub fn new(base: Rc<dyn DynTypeService>) -> Self {
        HarloweStringService { base }
    }

    /// Layer over whichever string service is currently registered.
    pub fn over_registered() -> VarResult<Self> {
        registry::service_for::<String>().map(Self::new)
    }
}

impl TypeService for HarloweStringService {
    type Payload = String;

    fn get_member(&self, container: &String, key: &Value) -> VarResult<Value> {
        let name = key.to_display_string();
        let length = container.chars().count();
        if name == "length" {
            return Ok(Value::from(i64::try_from(length).unwrap_or(i64::MAX)));
        }

        if let Some(index) = position_to_index(&name, length) {
            let character = container.chars().nth(index).map(String::from);
            trace!(position = %name, index, "string position");
            return Ok(Value::from(character));
        }

        self.base.get_member(container, key)
    }

    fn set_member(&self, container: &mut String, key: &Value, value: Value) -> VarResult<()> {
        self.base.set_member(container, key, value)
    }

    fn remove_member(&self, container: &mut String, key: &Value) -> VarResult<()> {
        self.base.remove_member(container, key)
    }

    fn compare(&self, op: Operator, left: &String, right: &Value) -> Option<bool> {
        self.base.compare(op, left, right)
    }

    fn combine(&self, op: Operator, left: &String, right: &Value) -> Option<Value> {
        self.base.combine(op, left, right)
    }

    fn unary(&self, op: Operator, operand: &String) -> Option<Value> {
        self.base.unary(op, operand)
    }

    fn convert_to(&self, payload: &String, target: TargetType, strict: bool) -> Option<Value> {
        self.base.convert_to(payload, target, strict)
    }

    fn convert_from(&self, source: &Value, strict: bool) -> Option<String> {
        self.base
            .convert_from(source, strict)
            .and_then(Value::into_inner::<String>)
    }
}
