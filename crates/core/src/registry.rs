//! Type-service registry.
//!
//! Maps a concrete payload `TypeId` to the [`TypeService`] handling it.
//!
//! ## Lifecycle
//!
//! The registry is per-thread state with two phases:
//!
//! 1. initialization: built-in services are registered first, story-format
//!    and user services after (a later registration for the same payload
//!    type replaces the earlier one);
//! 2. evaluation: the registry is only read.
//!
//! Registering while values are being evaluated is not supported. The
//! discipline is a precondition on the host, not something enforced by a
//! lock. Services are cloned out of the registry before they run, so a
//! service may itself dispatch on other values.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::error::{VarError, VarResult};
use crate::payload::{short_type_name, Payload};
use crate::service::{DynTypeService, TypeService};

thread_local! {
    static SERVICES: RefCell<HashMap<TypeId, Rc<dyn DynTypeService>>> =
        RefCell::new(HashMap::new());
}

/// Register `service` for its payload type. Last registration wins.
pub fn register<S: TypeService>(service: S) {
    register_shared(Rc::new(service));
}

/// Register an already-erased service, e.g. one previously returned by
/// [`lookup`].
pub fn register_shared(service: Rc<dyn DynTypeService>) {
    let payload = service.payload_type_name();
    let previous = SERVICES.with(|services| {
        services
            .borrow_mut()
            .insert(service.payload_type(), service)
    });
    if previous.is_some() {
        debug!(payload, "type service overridden");
    } else {
        debug!(payload, "type service registered");
    }
}

/// Exact-type lookup. No fallback to related types.
pub fn lookup(type_id: TypeId) -> Option<Rc<dyn DynTypeService>> {
    SERVICES.with(|services| services.borrow().get(&type_id).cloned())
}

/// Typed lookup for code that requires a service to exist.
///
/// A missing service means the engine was initialized incorrectly.
pub fn service_for<T: Payload>() -> VarResult<Rc<dyn DynTypeService>> {
    lookup(TypeId::of::<T>()).ok_or_else(|| VarError::MissingTypeService {
        type_name: short_type_name::<T>().to_string(),
    })
}

pub fn is_registered<T: Payload>() -> bool {
    SERVICES.with(|services| services.borrow().contains_key(&TypeId::of::<T>()))
}

/// Drop every registration on this thread, returning to the start of the
/// initialization phase.
pub fn clear() {
    SERVICES.with(|services| services.borrow_mut().clear());
    debug!("type service registry cleared");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;
    use crate::value::Value;

    #[derive(Debug, Clone, PartialEq)]
    struct Token(u8);

    impl Payload for Token {}

    struct FirstService;

    impl TypeService for FirstService {
        type Payload = Token;

        fn unary(&self, _op: Operator, operand: &Token) -> Option<Value> {
            Some(Value::from(i64::from(operand.0) + 1))
        }
    }

    struct SecondService;

    impl TypeService for SecondService {
        type Payload = Token;

        fn unary(&self, _op: Operator, operand: &Token) -> Option<Value> {
            Some(Value::from(i64::from(operand.0) + 100))
        }
    }

    #[test]
    fn lookup_is_exact_type() {
        clear();
        register(FirstService);
        assert!(lookup(TypeId::of::<Token>()).is_some());
        assert!(lookup(TypeId::of::<u8>()).is_none());
        assert!(is_registered::<Token>());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        clear();
        register(FirstService);
        register(SecondService);
        let service = service_for::<Token>().unwrap();
        let result = service.unary(Operator::Increment, &Token(1)).unwrap();
        assert_eq!(result.downcast_ref::<i64>(), Some(&101));
    }

    #[test]
    fn service_for_missing_type_is_configuration_fault() {
        clear();
        match service_for::<Token>() {
            Err(VarError::MissingTypeService { type_name }) => assert_eq!(type_name, "Token"),
            other => panic!("expected MissingTypeService, got {:?}", other.err()),
        }
    }

    #[test]
    fn clear_removes_registrations() {
        clear();
        register(FirstService);
        clear();
        assert!(!is_registered::<Token>());
    }
}
