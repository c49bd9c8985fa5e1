//! Custom Linux board conversion.
//!
//! Turns a [`BoardConfig`] into the [`LinuxBoardConfig`] consumed by the
//! generic Linux board driver. The driver itself lives outside this crate;
//! it only ever sees a validated mapping.

use std::path::Path;

use gpio_common::config::ConfigError;
use gpio_common::pins::{GpioBoardMapping, MappingBuilder, PinConfigError, PinConfigLoader};
use thiserror::Error;
use tracing::info;

use crate::config::BoardConfig;

/// Board component construction failure.
#[derive(Debug, Error)]
pub enum BoardError {
    /// `board.toml` could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The pin-definition pipeline failed.
    #[error(transparent)]
    Pins(#[from] PinConfigError),
}

/// Configuration handed to the generic Linux board driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxBoardConfig {
    /// Pin key → resolved GPIO addressing, in file order.
    pub gpio_mappings: GpioBoardMapping,
}

/// Load the pin-definition file at `defs_path` and build the driver config.
///
/// Errors from `builder` are returned unchanged inside
/// [`PinConfigError::Mapping`].
pub fn pin_defs_from_file<B: MappingBuilder>(
    defs_path: &Path,
    builder: B,
) -> Result<LinuxBoardConfig, PinConfigError> {
    let gpio_mappings = PinConfigLoader::new(builder).load_mapping(defs_path)?;
    Ok(LinuxBoardConfig { gpio_mappings })
}

/// Build the driver config described by a loaded [`BoardConfig`].
pub fn linux_board_config(config: &BoardConfig) -> Result<LinuxBoardConfig, BoardError> {
    config.validate()?;
    let defs_path = config.defs_path();
    info!(
        "{}: loading pin definitions for {} from {}",
        config.shared.service_name,
        crate::config::MODEL,
        defs_path.display()
    );
    Ok(pin_defs_from_file(&defs_path, config.board.mapping_builder())?)
}
