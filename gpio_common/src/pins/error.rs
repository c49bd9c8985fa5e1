//! Error types for pin-definition loading.
//!
//! Per-definition failures are [`PinRuleViolation`]s. [`validate_all`]
//! collects one [`PinValidationError`] per invalid definition into a single
//! [`ValidationErrors`] aggregate, so every problem in a file is reported in
//! one pass.
//!
//! [`validate_all`]: super::loader::validate_all

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::mapping::MappingError;

// ─── Per-definition rule violations ─────────────────────────────────

/// The first rule a single pin definition violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinRuleViolation {
    /// A required string field is absent or blank.
    #[error("required field `{0}` is missing or empty")]
    FieldRequired(&'static str),

    /// `name` has leading or trailing whitespace.
    #[error("name must not have leading or trailing whitespace")]
    UntrimmedName,

    /// Neither a header pin label nor a GPIO chip device was given.
    #[error("either `pin` or `device_name` must be set")]
    MissingAddress,

    /// `device_name` is not a bare device name under /dev.
    #[error("device_name {0:?} must be a bare device name such as \"gpiochip0\"")]
    InvalidDeviceName(String),

    /// `device_name` given without a `line_number`.
    #[error("device_name {0:?} requires a line_number")]
    LineNumberRequired(String),

    /// `line_number` given without a `device_name`.
    #[error("line_number {0} requires a device_name")]
    DeviceNameRequired(i64),

    /// Negative chip line offset.
    #[error("line_number on gpio chip must be at least zero, got {0}")]
    NegativeLineNumber(i64),

    /// Chip line offset does not fit a `u32`.
    #[error("line_number {0} exceeds the largest gpio line offset")]
    LineNumberOutOfRange(i64),

    /// Negative PWM channel.
    #[error("pwm_id must be at least zero, got {0}")]
    NegativePwmId(i64),

    /// PWM channel does not fit a `u32`.
    #[error("pwm_id {0} exceeds the largest pwm channel")]
    PwmIdOutOfRange(i64),

    /// `pwm_id` given without the sysfs directory of its chip.
    #[error("must supply pwm_chip_sysfs_dir field for pwm pin")]
    PwmChipDirRequired,

    /// `pwm_chip_sysfs_dir` given without a `pwm_id`.
    #[error("pwm_chip_sysfs_dir {0:?} requires a pwm_id")]
    PwmIdRequired(String),

    /// The name was already used by an earlier definition.
    #[error("duplicate pin name, first defined at index {first_index}")]
    DuplicateName {
        /// Index of the earlier definition with the same name.
        first_index: usize,
    },
}

/// One invalid definition, located by its position in the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pin #{index} ({name:?}): {violation}")]
pub struct PinValidationError {
    /// Zero-based position in the `pins` array.
    pub index: usize,
    /// Name as written in the file (may be empty).
    pub name: String,
    /// Rule that failed.
    pub violation: PinRuleViolation,
}

// ─── Aggregate ──────────────────────────────────────────────────────

/// Every validation failure found in one pin-definition document.
///
/// Never empty when returned from `validate_all`. Errors are kept in
/// document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    source_label: String,
    errors: Vec<PinValidationError>,
}

impl ValidationErrors {
    pub(crate) fn new(source_label: impl Into<String>, errors: Vec<PinValidationError>) -> Self {
        Self {
            source_label: source_label.into(),
            errors,
        }
    }

    /// Label (usually the file path) of the document that failed.
    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    /// Individual failures in document order.
    pub fn errors(&self) -> &[PinValidationError] {
        &self.errors
    }

    /// Number of invalid definitions.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over the individual failures.
    pub fn iter(&self) -> std::slice::Iter<'_, PinValidationError> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} invalid pin definition(s) in {}",
            self.errors.len(),
            self.source_label
        )?;
        for err in &self.errors {
            write!(f, "; {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a PinValidationError;
    type IntoIter = std::slice::Iter<'a, PinValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

// ─── Top-level error ────────────────────────────────────────────────

/// Error returned by the pin-definition pipeline.
///
/// Every variant is fatal to board construction.
#[derive(Debug, Error)]
pub enum PinConfigError {
    /// The file could not be opened or read.
    #[error("failed to read pin definitions from {}: {source}", .path.display())]
    Io {
        /// Cleaned path that was read.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The bytes are not JSON or do not match the document shape.
    #[error("failed to parse pin definitions in {source_label}: {source}")]
    Parse {
        /// Label of the document (original path).
        source_label: String,
        /// Underlying deserializer error with line/column.
        source: serde_json::Error,
    },

    /// One or more definitions failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The mapping builder rejected the validated definitions.
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Convenience result alias.
pub type PinConfigResult<T> = Result<T, PinConfigError>;
