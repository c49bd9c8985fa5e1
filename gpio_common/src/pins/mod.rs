//! GPIO pin definitions — JSON pin wiring to board mapping.
//!
//! A custom Linux board describes its pins in a JSON file
//! (`board_defs_file_path`). Loading is strictly linear:
//!
//! ```text
//! read_pin_file → parse_raw_pin_data → validate_all → MappingBuilder::build
//! ```
//!
//! Validation does not stop at the first bad record: every failure is
//! collected into one [`ValidationErrors`] so a file can be fixed in a
//! single edit.

pub mod definition;
pub mod error;
pub mod loader;
pub mod mapping;

pub use definition::{Direction, PinDefinition, PinDefinitions, Pull};
pub use error::{
    PinConfigError, PinConfigResult, PinRuleViolation, PinValidationError, ValidationErrors,
};
pub use loader::{
    PinConfigLoader, clean_path, load_from_file, parse_raw_pin_data, read_pin_file, validate_all,
};
pub use mapping::{
    GpioBoardMapping, GpioPinMapping, LinuxGpioMappingBuilder, MappingBuilder, MappingError,
};
