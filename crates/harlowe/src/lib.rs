//! storyvar-harlowe: Harlowe story-format behavior for storyvar values.
//!
//! Harlowe adds positional access to strings and a self-describing array
//! type. Call [`install`] once per evaluation thread, before any story
//! code runs; it installs the core built-ins first and layers the Harlowe
//! overrides on top.
//!
//! ```
//! use storyvar_harlowe::{install, HarloweArray};
//! use storyvar_core::Value;
//!
//! install().unwrap();
//!
//! let word = Value::from("lamp");
//! assert_eq!(word.get_member(&Value::from("last")).unwrap(), Value::from("p"));
//!
//! let items = Value::new(HarloweArray::from(vec![Value::from("rope"), Value::from(3i64)]));
//! assert!(items.contains(&Value::from(3i64)));
//! ```

pub mod array;
pub mod position;
pub mod string_service;

pub use array::HarloweArray;
pub use position::position_to_index;
pub use string_service::HarloweStringService;

use storyvar_core::{builtins, registry, VarResult};
use tracing::debug;

/// Register the built-in services, then the Harlowe overrides.
pub fn install() -> VarResult<()> {
    builtins::install();
    registry::register(HarloweStringService::over_registered()?);
    debug!("harlowe services installed");
    Ok(())
}
