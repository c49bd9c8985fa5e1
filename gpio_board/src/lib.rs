//! # Custom Linux Board
//!
//! Board component for Linux boards whose GPIO wiring is not known in
//! advance. The user points the component at a JSON pin-definition file;
//! the component turns it into the GPIO mapping the generic Linux board
//! driver consumes.
//!
//! # Module Structure
//!
//! - [`config`] - Component configuration (`board.toml`)
//! - [`board`] - Config → `LinuxBoardConfig` conversion
//!
//! # Flow
//!
//! ```text
//! board.toml ──► BoardConfig ──► pin_defs_from_file ──► LinuxBoardConfig ──► board driver
//!                                     │
//!                                     └── gpio_common::pins (read → parse → validate → map)
//! ```

#![deny(missing_docs)]

pub mod board;
pub mod config;

pub use crate::board::{BoardError, LinuxBoardConfig, linux_board_config, pin_defs_from_file};
pub use crate::config::{BoardConfig, CustomLinuxConfig, MODEL};
