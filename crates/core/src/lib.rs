//! storyvar-core: the dynamically-typed story variable.
//!
//! Every story variable, literal and expression result is a [`Value`]. A
//! value holds one payload of any type and routes operators, conversions
//! and member access to that payload's type service.
//!
//! # Extending
//!
//! A payload type becomes fully interoperable by implementing [`Payload`]
//! and then either
//!
//! - registering a [`TypeService`] for it ([`registry::register`]), or
//! - implementing [`SelfDescribing`] on the type itself.
//!
//! The registry is consulted first. See [`dispatch`] and [`convert`] for the
//! exact resolution order.
//!
//! # Initialization
//!
//! ```
//! use storyvar_core::{builtins, Operator, Value, VarConfig};
//!
//! builtins::install();
//! VarConfig::default().apply();
//!
//! let gold = Value::from(10i64);
//! let total = gold.combine(Operator::Add, &Value::from(5i64)).unwrap();
//! assert_eq!(total.as_int().unwrap(), 15);
//! ```

pub mod builtins;
pub mod config;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod operator;
pub mod payload;
pub mod registry;
pub mod service;
pub mod value;

pub use config::{conversion_mode, is_strict, set_conversion_mode, ConversionMode, VarConfig};
pub use convert::TargetType;
pub use error::{VarError, VarResult};
pub use operator::{Operator, OperatorKind};
pub use payload::{short_type_name, Payload, PayloadObject};
pub use service::{DynTypeService, SelfDescribing, TypeService};
pub use value::{MemberLookup, Value};
