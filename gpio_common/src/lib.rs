//! GPIO Common Library
//!
//! This crate turns a user-supplied JSON description of GPIO pin wiring into
//! a validated, ordered list of pin definitions and, through a
//! [`pins::MappingBuilder`], into the GPIO mapping table consumed by a board
//! driver. It also carries the TOML configuration loading shared by the
//! board components.
//!
//! # Module Structure
//!
//! - [`pins`] - Pin definitions, loader, validation and board mapping
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust,no_run
//! use gpio_common::pins::{LinuxGpioMappingBuilder, PinConfigLoader};
//!
//! let loader = PinConfigLoader::new(LinuxGpioMappingBuilder::default());
//! let mapping = loader.load_mapping("/etc/gpio/pins.json")?;
//! for (key, pin) in mapping.iter() {
//!     println!("{key}: {} line {}", pin.chip_device, pin.line);
//! }
//! # Ok::<(), gpio_common::pins::PinConfigError>(())
//! ```

pub mod config;
pub mod pins;
pub mod prelude;
