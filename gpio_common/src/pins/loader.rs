//! Pin-definition loader: read → parse → validate → map.
//!
//! Each stage is a separate function so the parse and validation steps can
//! be exercised without touching the filesystem. The source label threaded
//! through the stages is only used in error messages.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use super::definition::{PinDefinition, PinDefinitions};
use super::error::{
    PinConfigError, PinConfigResult, PinRuleViolation, PinValidationError, ValidationErrors,
};
use super::mapping::{GpioBoardMapping, MappingBuilder};

/// Lexically normalize a path.
///
/// Drops `.` components, folds `name/..` pairs and collapses repeated
/// separators. Leading `..` on a relative path is kept; `..` directly under
/// the root is dropped. Symlinks are not resolved. An empty result becomes
/// `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

/// Read the raw bytes of a pin-definition file.
///
/// The path is cleaned first. An empty path fails with
/// `std::io::ErrorKind::InvalidInput`.
pub fn read_pin_file(path: &Path) -> PinConfigResult<Vec<u8>> {
    if path.as_os_str().is_empty() {
        return Err(PinConfigError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "pin definition file path is empty",
            ),
        });
    }

    let cleaned = clean_path(path);
    let data = std::fs::read(&cleaned).map_err(|source| PinConfigError::Io {
        path: cleaned.clone(),
        source,
    })?;
    debug!("Read {} bytes of pin definitions from {}", data.len(), cleaned.display());
    Ok(data)
}

/// Load, parse and validate a pin-definition file.
///
/// I/O errors are returned before any parsing is attempted. The original
/// (uncleaned) path is used as the label in parse and validation errors.
pub fn load_from_file(path: impl AsRef<Path>) -> PinConfigResult<Vec<PinDefinition>> {
    let path = path.as_ref();
    let data = read_pin_file(path)?;
    let label = path.display().to_string();
    let pins = parse_raw_pin_data(&data, &label)?;
    let pins = validate_all(pins, &label)?;
    info!("Loaded {} pin definitions from {label}", pins.len());
    Ok(pins)
}

/// Deserialize raw bytes into the ordered list of pin definitions.
///
/// The top level must be a JSON object. Does not validate individual
/// records.
pub fn parse_raw_pin_data(data: &[u8], source_label: &str) -> PinConfigResult<Vec<PinDefinition>> {
    let parsed: PinDefinitions = serde_json::from_slice(data).map_err(|source| PinConfigError::Parse {
        source_label: source_label.to_string(),
        source,
    })?;
    Ok(parsed.pins)
}

/// Validate every definition and report all failures together.
///
/// Runs each record's own rule in document order, then rejects names
/// already taken by an earlier definition. Each definition contributes at
/// most one error. On success the input is returned unchanged.
pub fn validate_all(
    pins: Vec<PinDefinition>,
    source_label: &str,
) -> Result<Vec<PinDefinition>, ValidationErrors> {
    let errors = {
        let mut errors = Vec::new();
        // name → index of first valid definition with that name.
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for (index, pin) in pins.iter().enumerate() {
            let result = pin.validate().and_then(|()| match seen.get(pin.name.as_str()) {
                Some(&first_index) => Err(PinRuleViolation::DuplicateName { first_index }),
                None => {
                    seen.insert(pin.name.as_str(), index);
                    Ok(())
                }
            });

            if let Err(violation) = result {
                errors.push(PinValidationError {
                    index,
                    name: pin.name.clone(),
                    violation,
                });
            }
        }
        errors
    };

    if errors.is_empty() {
        return Ok(pins);
    }

    warn!(
        "{} of {} pin definitions in {source_label} failed validation",
        errors.len(),
        pins.len()
    );
    Err(ValidationErrors::new(source_label, errors))
}

// ─── PinConfigLoader ────────────────────────────────────────────────

/// Full file-to-mapping pipeline bound to one [`MappingBuilder`].
#[derive(Debug, Clone, Default)]
pub struct PinConfigLoader<B> {
    builder: B,
}

impl<B: MappingBuilder> PinConfigLoader<B> {
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    /// Build the mapping from in-memory JSON.
    pub fn mapping_from_slice(&self, data: &[u8], source_label: &str) -> PinConfigResult<GpioBoardMapping> {
        let pins = parse_raw_pin_data(data, source_label)?;
        let pins = validate_all(pins, source_label)?;
        Ok(self.builder.build(&pins)?)
    }

    /// Load `path` and hand the validated definitions to the builder.
    ///
    /// Builder errors are returned unchanged as [`PinConfigError::Mapping`].
    pub fn load_mapping(&self, path: impl AsRef<Path>) -> PinConfigResult<GpioBoardMapping> {
        let pins = load_from_file(path)?;
        let mapping = self.builder.build(&pins)?;
        debug!("Built GPIO mapping: {} pins, {} with PWM", mapping.len(), mapping.pwm_count());
        Ok(mapping)
    }
}
