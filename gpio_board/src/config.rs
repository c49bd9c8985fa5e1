//! Component configuration for the custom Linux board.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! service_name = "board-customlinux-01"
//! log_level = "debug"
//!
//! [board]
//! board_defs_file_path = "pins.json"   # relative to this file
//! default_chip = "gpiochip0"           # for header-only pins
//! ```

use gpio_common::config::{ConfigError, ConfigLoader, SharedConfig};
use gpio_common::pins::LinuxGpioMappingBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Model triple of this board component.
pub const MODEL: &str = "gpio:customlinux:customlinux";

/// The `[board]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomLinuxConfig {
    /// Path to the JSON pin-definition file. Required, non-empty.
    pub board_defs_file_path: String,

    /// GPIO chip for definitions that only carry a header pin label.
    #[serde(default)]
    pub default_chip: Option<String>,
}

impl CustomLinuxConfig {
    /// Validate the section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `board_defs_file_path` is
    /// empty or `default_chip` is set but blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_defs_file_path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "board.board_defs_file_path is required".to_string(),
            ));
        }
        if matches!(&self.default_chip, Some(chip) if chip.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "board.default_chip cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Mapping builder configured from this section.
    pub fn mapping_builder(&self) -> LinuxGpioMappingBuilder {
        match &self.default_chip {
            Some(chip) => LinuxGpioMappingBuilder::new().with_default_chip(chip.clone()),
            None => LinuxGpioMappingBuilder::new(),
        }
    }
}

/// Full component configuration loaded from `board.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Shared component fields.
    pub shared: SharedConfig,

    /// Board-specific fields.
    pub board: CustomLinuxConfig,

    /// Directory of the file this config was loaded from.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

impl BoardConfig {
    /// Load and validate a config file.
    ///
    /// Remembers the file's directory so a relative
    /// `board_defs_file_path` is resolved against it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.validate()?;
        config.config_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.board.validate()
    }

    /// Location of the pin-definition file.
    ///
    /// Absolute paths are used as-is; relative ones are joined to the
    /// config directory when known.
    pub fn defs_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.board.board_defs_file_path);
        match &self.config_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpio_common::config::LogLevel;

    const SAMPLE: &str = r#"
[shared]
service_name = "board-01"
log_level = "debug"

[board]
board_defs_file_path = "pins.json"
default_chip = "gpiochip0"
"#;

    #[test]
    fn parse_sample() {
        let config = BoardConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.shared.log_level, LogLevel::Debug);
        assert_eq!(config.board.board_defs_file_path, "pins.json");
        assert_eq!(config.board.default_chip.as_deref(), Some("gpiochip0"));
        assert!(config.config_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_defs_path_is_parse_error() {
        let result = BoardConfig::from_toml_str("[shared]\nservice_name = \"b\"\n[board]\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn unknown_board_field_rejected() {
        let text = SAMPLE.replace("default_chip", "default_chipp");
        assert!(matches!(
            BoardConfig::from_toml_str(&text),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn empty_defs_path_fails_validation() {
        let mut config = BoardConfig::from_toml_str(SAMPLE).unwrap();
        config.board.board_defs_file_path = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn blank_default_chip_fails_validation() {
        let mut config = BoardConfig::from_toml_str(SAMPLE).unwrap();
        config.board.default_chip = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn defs_path_resolution() {
        let mut config = BoardConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.defs_path(), PathBuf::from("pins.json"));

        config.config_dir = Some(PathBuf::from("/etc/gpio"));
        assert_eq!(config.defs_path(), PathBuf::from("/etc/gpio/pins.json"));

        config.board.board_defs_file_path = "/opt/board/pins.json".to_string();
        assert_eq!(config.defs_path(), PathBuf::from("/opt/board/pins.json"));
    }

    #[test]
    fn mapping_builder_carries_default_chip() {
        let config = BoardConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.board.mapping_builder().default_chip(), Some("gpiochip0"));
    }
}
