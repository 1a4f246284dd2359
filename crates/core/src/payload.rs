//! The `Payload` trait: what a [`Value`](crate::Value) can hold.
//!
//! A payload is any `'static + Clone + Debug` type that implements
//! [`Payload`]. The four primitives (`f64`, `i64`, `bool`, `String`) are
//! value types; everything else is an extension type whose operators come
//! from a registered [`TypeService`](crate::TypeService) or from its own
//! [`SelfDescribing`] implementation.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::service::SelfDescribing;

/// Object plumbing for payload trait objects.
///
/// Implemented automatically for every `Payload + Clone` type; extension
/// authors never implement it by hand.
pub trait PayloadObject: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    /// Plain structural copy, used when no duplication capability exists.
    fn clone_payload(&self) -> Box<dyn Payload>;
    /// Short type name used in diagnostics (`"f64"`, `"String"`, `"Lantern"`).
    fn type_name(&self) -> &'static str;
}

impl<T: Payload + Clone> PayloadObject for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_payload(&self) -> Box<dyn Payload> {
        Box::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        short_type_name::<T>()
    }
}

/// A type that can live inside a [`Value`](crate::Value).
pub trait Payload: PayloadObject + fmt::Debug {
    /// Value-type payloads are copied plainly on duplication and never reach
    /// a duplication capability.
    fn is_value_type(&self) -> bool {
        false
    }

    /// Feed the payload's own hash into `state`. Payloads that do not
    /// override this hash by type identity alone.
    fn hash_payload(&self, _state: &mut dyn Hasher) {}

    /// Payload types that implement the dispatch protocol themselves return
    /// `Some(self)` here.
    fn as_self_describing(&self) -> Option<&dyn SelfDescribing> {
        None
    }

    fn as_self_describing_mut(&mut self) -> Option<&mut dyn SelfDescribing> {
        None
    }
}

impl dyn Payload {
    /// Concrete type of the payload (not of the box around it).
    pub fn payload_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    pub fn is<T: Payload>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Payload>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Payload>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Last path segment of a type name, without generic arguments.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// ──────────────────────────────────────────────
// Primitives
// ──────────────────────────────────────────────

impl Payload for f64 {
    fn is_value_type(&self) -> bool {
        true
    }

    fn hash_payload(&self, mut state: &mut dyn Hasher) {
        // -0.0 == 0.0, so both must hash alike
        let normalized = if *self == 0.0 { 0.0f64 } else { *self };
        normalized.to_bits().hash(&mut state);
    }
}

impl Payload for i64 {
    fn is_value_type(&self) -> bool {
        true
    }

    fn hash_payload(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}

impl Payload for bool {
    fn is_value_type(&self) -> bool {
        true
    }

    fn hash_payload(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}

impl Payload for String {
    fn is_value_type(&self) -> bool {
        true
    }

    fn hash_payload(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}
