//! Prelude module for common re-exports.
//!
//! ```rust
//! use gpio_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};

// ─── Pins ───────────────────────────────────────────────────────────
pub use crate::pins::{
    GpioBoardMapping, GpioPinMapping, LinuxGpioMappingBuilder, MappingBuilder, MappingError,
    PinConfigError, PinConfigLoader, PinDefinition, ValidationErrors,
};

