//! GPIO board mapping — the table handed to the board driver.
//!
//! Built once from a validated, ordered list of [`PinDefinition`]s by a
//! [`MappingBuilder`]. Immutable after construction. Lookup by pin key is a
//! HashMap hit, iteration follows document order.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use super::definition::{Direction, PinDefinition, Pull};

// ─── Error Types ────────────────────────────────────────────────────

/// Mapping construction failure.
///
/// Returned verbatim to the caller of the loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// No chip device on the definition and no default chip configured.
    #[error("pin {name:?}: no device_name and no default gpio chip configured")]
    UnresolvedChip { name: String },

    /// No line offset on the definition and the header label is not numeric.
    #[error("pin {name:?}: cannot derive a gpio line from header pin {pin:?}")]
    UnresolvedLine { name: String, pin: Option<String> },

    /// A numeric field does not fit the driver's `u32`.
    #[error("pin {name:?}: {field} {value} is out of range")]
    AddressOutOfRange {
        name: String,
        field: &'static str,
        value: i64,
    },

    /// Two definitions resolve to the same key.
    #[error("pin {name:?}: duplicate mapping key")]
    DuplicateKey { name: String },

    /// Error raised by an external board driver.
    #[error("board driver rejected pin definitions: {0}")]
    Driver(String),
}

// ─── GpioPinMapping ─────────────────────────────────────────────────

/// Resolved hardware addressing of one pin.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GpioPinMapping {
    /// Position of the definition in the source file.
    pub ordinal: usize,
    /// GPIO chip device under `/dev`.
    pub chip_device: String,
    /// Line offset on `chip_device`.
    pub line: u32,
    /// Pin name as declared.
    pub gpio_name: String,
    /// Physical header pin label, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_pin: Option<String>,
    /// PWM chip directory under sysfs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pwm_sysfs_dir: Option<PathBuf>,
    /// PWM channel on `pwm_sysfs_dir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pwm_id: Option<u32>,
    /// Hardware PWM available on this pin.
    pub hw_pwm_supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull: Option<Pull>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl GpioPinMapping {
    /// Device node path, e.g. `/dev/gpiochip0`.
    pub fn chip_path(&self) -> PathBuf {
        PathBuf::from("/dev").join(&self.chip_device)
    }
}

// ─── GpioBoardMapping ───────────────────────────────────────────────

/// Pin key → resolved addressing, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpioBoardMapping {
    entries: Vec<(String, GpioPinMapping)>,
    index: HashMap<String, usize>,
}

impl GpioBoardMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Fails if `key` is already present.
    pub fn insert(&mut self, key: impl Into<String>, pin: GpioPinMapping) -> Result<(), MappingError> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(MappingError::DuplicateKey { name: key });
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, pin));
        Ok(())
    }

    /// Look up a pin by key.
    pub fn get(&self, key: &str) -> Option<&GpioPinMapping> {
        self.index.get(key).map(|&idx| &self.entries[idx].1)
    }

    /// Check whether a key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of mapped pins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GpioPinMapping)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of pins with hardware PWM.
    pub fn pwm_count(&self) -> usize {
        self.entries.iter().filter(|(_, p)| p.hw_pwm_supported).count()
    }
}

impl Serialize for GpioBoardMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, pin) in &self.entries {
            map.serialize_entry(key, pin)?;
        }
        map.end()
    }
}

// ─── MappingBuilder ─────────────────────────────────────────────────

/// Converts validated pin definitions into a board mapping.
///
/// This is the seam to the board driver. The definitions passed in are
/// already validated and in document order.
pub trait MappingBuilder {
    fn build(&self, pins: &[PinDefinition]) -> Result<GpioBoardMapping, MappingError>;
}

impl<F> MappingBuilder for F
where
    F: Fn(&[PinDefinition]) -> Result<GpioBoardMapping, MappingError>,
{
    fn build(&self, pins: &[PinDefinition]) -> Result<GpioBoardMapping, MappingError> {
        self(pins)
    }
}

/// Mapping step of the generic Linux board driver.
///
/// Resolves addressing lexically; nothing under `/dev` or `/sys` is touched.
///
/// - chip: `device_name`, else `default_chip`
/// - line: `line_number`, else the header `pin` label parsed as a number
#[derive(Debug, Clone, Default)]
pub struct LinuxGpioMappingBuilder {
    default_chip: Option<String>,
}

impl LinuxGpioMappingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chip used for definitions that only carry a header pin label.
    pub fn with_default_chip(mut self, chip: impl Into<String>) -> Self {
        self.default_chip = Some(chip.into());
        self
    }

    pub fn default_chip(&self) -> Option<&str> {
        self.default_chip.as_deref()
    }

    fn resolve(&self, ordinal: usize, def: &PinDefinition) -> Result<GpioPinMapping, MappingError> {
        let chip_device = def
            .device_name
            .clone()
            .or_else(|| self.default_chip.clone())
            .ok_or_else(|| MappingError::UnresolvedChip {
                name: def.name.clone(),
            })?;

        let line = match def.line_number {
            Some(line) => to_u32(def, "line_number", line)?,
            None => def
                .pin
                .as_deref()
                .and_then(|p| p.trim().parse::<u32>().ok())
                .ok_or_else(|| MappingError::UnresolvedLine {
                    name: def.name.clone(),
                    pin: def.pin.clone(),
                })?,
        };

        let pwm_id = def
            .pwm_id
            .map(|id| to_u32(def, "pwm_id", id))
            .transpose()?;

        Ok(GpioPinMapping {
            ordinal,
            chip_device,
            line,
            gpio_name: def.name.clone(),
            header_pin: def.pin.clone(),
            pwm_sysfs_dir: def.pwm_chip_sysfs_dir.as_ref().map(PathBuf::from),
            pwm_id,
            hw_pwm_supported: pwm_id.is_some(),
            pull: def.pull,
            direction: def.direction,
        })
    }
}

fn to_u32(def: &PinDefinition, field: &'static str, value: i64) -> Result<u32, MappingError> {
    u32::try_from(value).map_err(|_| MappingError::AddressOutOfRange {
        name: def.name.clone(),
        field,
        value,
    })
}

impl MappingBuilder for LinuxGpioMappingBuilder {
    fn build(&self, pins: &[PinDefinition]) -> Result<GpioBoardMapping, MappingError> {
        let mut mapping = GpioBoardMapping::new();
        for (ordinal, def) in pins.iter().enumerate() {
            let resolved = self.resolve(ordinal, def)?;
            mapping.insert(def.name.clone(), resolved)?;
        }
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs() -> Vec<PinDefinition> {
        vec![
            PinDefinition::with_chip_line("GPIO17", "gpiochip0", 17),
            PinDefinition::with_header_pin("LED", "7"),
            PinDefinition::with_chip_line("PWM0", "gpiochip1", 3).with_pwm("/sys/class/pwm/pwmchip0", 0),
        ]
    }

    #[test]
    fn builds_in_document_order() {
        let builder = LinuxGpioMappingBuilder::new().with_default_chip("gpiochip0");
        let mapping = builder.build(&defs()).unwrap();

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["GPIO17", "LED", "PWM0"]);

        let led = mapping.get("LED").unwrap();
        assert_eq!(led.ordinal, 1);
        assert_eq!(led.chip_device, "gpiochip0");
        assert_eq!(led.line, 7);
        assert_eq!(led.header_pin.as_deref(), Some("7"));
        assert!(!led.hw_pwm_supported);

        let pwm = mapping.get("PWM0").unwrap();
        assert_eq!(pwm.chip_path(), PathBuf::from("/dev/gpiochip1"));
        assert_eq!(pwm.pwm_id, Some(0));
        assert!(pwm.hw_pwm_supported);
        assert_eq!(mapping.pwm_count(), 1);
    }

    #[test]
    fn header_pin_without_default_chip_is_unresolved() {
        let err = LinuxGpioMappingBuilder::new().build(&defs()).unwrap_err();
        assert_eq!(err, MappingError::UnresolvedChip { name: "LED".into() });
    }

    #[test]
    fn non_numeric_header_pin_is_unresolved() {
        let builder = LinuxGpioMappingBuilder::new().with_default_chip("gpiochip0");
        let err = builder
            .build(&[PinDefinition::with_header_pin("SDA", "P9_20")])
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::UnresolvedLine {
                name: "SDA".into(),
                pin: Some("P9_20".into()),
            }
        );
    }

    #[test]
    fn out_of_range_line_is_not_replaced_by_header_pin() {
        let mut def = PinDefinition::with_chip_line("A", "gpiochip0", u32::MAX as i64 + 1);
        def.pin = Some("7".into());
        let err = LinuxGpioMappingBuilder::new().build(&[def]).unwrap_err();
        assert_eq!(
            err,
            MappingError::AddressOutOfRange {
                name: "A".into(),
                field: "line_number",
                value: 4_294_967_296,
            }
        );
    }

    #[test]
    fn out_of_range_pwm_id_is_not_dropped() {
        let def = PinDefinition::with_chip_line("A", "gpiochip0", 4).with_pwm("/sys/class/pwm/pwmchip0", -1);
        let err = LinuxGpioMappingBuilder::new().build(&[def]).unwrap_err();
        assert!(matches!(
            err,
            MappingError::AddressOutOfRange { field: "pwm_id", value: -1, .. }
        ));
    }

    #[test]
    fn u32_max_line_and_pwm_id_resolve() {
        let def = PinDefinition::with_chip_line("A", "gpiochip0", u32::MAX as i64)
            .with_pwm("/sys/class/pwm/pwmchip0", u32::MAX as i64);
        let mapping = LinuxGpioMappingBuilder::new().build(&[def]).unwrap();
        let pin = mapping.get("A").unwrap();
        assert_eq!(pin.line, u32::MAX);
        assert_eq!(pin.pwm_id, Some(u32::MAX));
        assert!(pin.hw_pwm_supported);
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut mapping = GpioBoardMapping::new();
        let builder = LinuxGpioMappingBuilder::new();
        let pin = builder
            .resolve(0, &PinDefinition::with_chip_line("A", "gpiochip0", 1))
            .unwrap();
        mapping.insert("A", pin.clone()).unwrap();
        assert_eq!(
            mapping.insert("A", pin),
            Err(MappingError::DuplicateKey { name: "A".into() })
        );
    }

    #[test]
    fn closure_builder() {
        let builder = |pins: &[PinDefinition]| -> Result<GpioBoardMapping, MappingError> {
            Err(MappingError::Driver(format!("{} pins unsupported", pins.len())))
        };
        let err = builder.build(&defs()).unwrap_err();
        assert_eq!(err, MappingError::Driver("3 pins unsupported".into()));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let builder = LinuxGpioMappingBuilder::new().with_default_chip("gpiochip0");
        let mapping = builder.build(&defs()).unwrap();
        let json = serde_json::to_string(&mapping).unwrap();
        let gpio17 = json.find("\"GPIO17\"").unwrap();
        let led = json.find("\"LED\"").unwrap();
        let pwm = json.find("\"PWM0\"").unwrap();
        assert!(gpio17 < led && led < pwm);
        assert!(json.contains("\"hw_pwm_supported\":true"));
    }
}
