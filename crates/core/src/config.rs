//! Conversion mode and host configuration.
//!
//! The strict/permissive switch is per-thread state, set once by the host
//! before evaluation begins. The conversion engine only passes it along;
//! type services decide what "strict" means for their type.

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{VarError, VarResult};

/// How forgiving conversions are about type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    /// Only exact representations convert (`"12"` is a number, `"12px"` is not).
    Strict,
    /// Services may coerce or default (`"12px"` reads as 12, empty reads as 0).
    #[default]
    Permissive,
}

impl ConversionMode {
    pub fn is_strict(self) -> bool {
        self == ConversionMode::Strict
    }
}

thread_local! {
    static MODE: Cell<ConversionMode> = const { Cell::new(ConversionMode::Permissive) };
}

pub fn set_conversion_mode(mode: ConversionMode) {
    MODE.with(|current| current.set(mode));
    debug!(?mode, "conversion mode set");
}

pub fn conversion_mode() -> ConversionMode {
    MODE.with(Cell::get)
}

pub fn is_strict() -> bool {
    conversion_mode().is_strict()
}

/// Host configuration for the value system.
///
/// ```json
/// { "conversion_mode": "strict" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VarConfig {
    pub conversion_mode: ConversionMode,
}

impl VarConfig {
    pub fn from_json_str(text: &str) -> VarResult<Self> {
        serde_json::from_str(text).map_err(|e| VarError::Config {
            message: e.to_string(),
        })
    }

    pub fn from_json(value: &serde_json::Value) -> VarResult<Self> {
        Self::deserialize(value).map_err(|e| VarError::Config {
            message: e.to_string(),
        })
    }

    /// Install this configuration on the current thread.
    pub fn apply(&self) {
        debug!(config = ?self, "applying value configuration");
        set_conversion_mode(self.conversion_mode);
    }
}
