//! Pin definition records.
//!
//! Deserialized from the pin-definition JSON file. A document looks like:
//!
//! ```json
//! {
//!   "pins": [
//!     { "name": "GPIO17", "pin": "11", "device_name": "gpiochip0", "line_number": 17 },
//!     { "name": "PWM0", "device_name": "gpiochip0", "line_number": 18,
//!       "pwm_chip_sysfs_dir": "/sys/class/pwm/pwmchip0", "pwm_id": 0 },
//!     { "name": "LED", "pin": "7", "direction": "output", "pull": "none" }
//!   ]
//! }
//! ```
//!
//! Integers that have a sign constraint are read as `i64` so a negative value
//! surfaces as a validation failure on that record, not as a parse error for
//! the whole file. Unknown fields are ignored.

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor, value::MapAccessDeserializer};
use serde::{Deserialize, Serialize};

use super::error::PinRuleViolation;

/// Largest `line_number` a gpiochip line offset can hold.
pub const MAX_LINE_OFFSET: i64 = u32::MAX as i64;

/// Largest `pwm_id` a sysfs PWM channel can hold.
pub const MAX_PWM_ID: i64 = u32::MAX as i64;

// ─── Hints ──────────────────────────────────────────────────────────

/// Line bias hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pull {
    Up,
    Down,
    None,
}

/// Line direction hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

// ─── PinDefinition ──────────────────────────────────────────────────

/// One GPIO pin entry from the pin-definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinDefinition {
    /// Stable pin key used by the board driver (e.g. `"GPIO17"`).
    pub name: String,

    /// Physical header pin label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,

    /// GPIO chip device under `/dev` (e.g. `"gpiochip0"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,

    /// Line offset on `device_name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<i64>,

    /// PWM chip directory under sysfs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwm_chip_sysfs_dir: Option<String>,

    /// PWM channel on `pwm_chip_sysfs_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwm_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull: Option<Pull>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl PinDefinition {
    /// Create a definition addressed only by its header pin label.
    pub fn with_header_pin(name: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pin: Some(pin.into()),
            device_name: None,
            line_number: None,
            pwm_chip_sysfs_dir: None,
            pwm_id: None,
            pull: None,
            direction: None,
        }
    }

    /// Create a definition addressed by chip device and line offset.
    pub fn with_chip_line(name: impl Into<String>, device_name: impl Into<String>, line: i64) -> Self {
        Self {
            name: name.into(),
            pin: None,
            device_name: Some(device_name.into()),
            line_number: Some(line),
            pwm_chip_sysfs_dir: None,
            pwm_id: None,
            pull: None,
            direction: None,
        }
    }

    /// Attach a PWM channel.
    pub fn with_pwm(mut self, sysfs_dir: impl Into<String>, pwm_id: i64) -> Self {
        self.pwm_chip_sysfs_dir = Some(sysfs_dir.into());
        self.pwm_id = Some(pwm_id);
        self
    }

    /// True when a PWM channel is configured.
    pub fn has_pwm(&self) -> bool {
        self.pwm_id.is_some()
    }

    /// Check this record on its own.
    ///
    /// Rules are checked in a fixed order and the first violation is
    /// returned. Cross-record rules (duplicate names) live in
    /// [`validate_all`](super::loader::validate_all).
    pub fn validate(&self) -> Result<(), PinRuleViolation> {
        if self.name.trim().is_empty() {
            return Err(PinRuleViolation::FieldRequired("name"));
        }
        if self.name.trim() != self.name {
            return Err(PinRuleViolation::UntrimmedName);
        }

        if self.pin.is_none() && self.device_name.is_none() {
            return Err(PinRuleViolation::MissingAddress);
        }

        if let Some(pin) = &self.pin {
            if pin.trim().is_empty() {
                return Err(PinRuleViolation::FieldRequired("pin"));
            }
        }

        match (&self.device_name, self.line_number) {
            (Some(dev), _) if dev.trim().is_empty() => {
                return Err(PinRuleViolation::FieldRequired("device_name"));
            }
            (Some(dev), _) if !is_bare_device_name(dev) => {
                return Err(PinRuleViolation::InvalidDeviceName(dev.clone()));
            }
            (Some(dev), None) => {
                return Err(PinRuleViolation::LineNumberRequired(dev.clone()));
            }
            (None, Some(line)) => return Err(PinRuleViolation::DeviceNameRequired(line)),
            (_, Some(line)) if line < 0 => return Err(PinRuleViolation::NegativeLineNumber(line)),
            (_, Some(line)) if line > MAX_LINE_OFFSET => {
                return Err(PinRuleViolation::LineNumberOutOfRange(line));
            }
            _ => {}
        }

        match (&self.pwm_chip_sysfs_dir, self.pwm_id) {
            (_, Some(id)) if id < 0 => Err(PinRuleViolation::NegativePwmId(id)),
            (_, Some(id)) if id > MAX_PWM_ID => Err(PinRuleViolation::PwmIdOutOfRange(id)),
            (None, Some(_)) => Err(PinRuleViolation::PwmChipDirRequired),
            (Some(dir), Some(_)) if dir.trim().is_empty() => Err(PinRuleViolation::PwmChipDirRequired),
            (Some(dir), None) => Err(PinRuleViolation::PwmIdRequired(dir.clone())),
            _ => Ok(()),
        }
    }
}

/// `gpiochip0` yes, `/dev/gpiochip0` or `gpio chip` no.
fn is_bare_device_name(name: &str) -> bool {
    !name.contains('/') && !name.chars().any(char::is_whitespace)
}

// ─── PinDefinitions ─────────────────────────────────────────────────

/// Top-level shape of the pin-definition file.
///
/// `pins` is required; its order is the ordinal numbering handed to the
/// board driver. Only a JSON object is accepted at the top level; the
/// derived struct visitor would also take a positional array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PinDefinitions {
    pub pins: Vec<PinDefinition>,
}

impl<'de> Deserialize<'de> for PinDefinitions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Document {
            pins: Vec<PinDefinition>,
        }

        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = PinDefinitions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object with a `pins` array")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                let doc = Document::deserialize(MapAccessDeserializer::new(map))?;
                Ok(PinDefinitions { pins: doc.pins })
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

impl From<Vec<PinDefinition>> for PinDefinitions {
    fn from(pins: Vec<PinDefinition>) -> Self {
        Self { pins }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_pin_only_is_valid() {
        let def = PinDefinition::with_header_pin("GPIO1", "1");
        assert_eq!(def.validate(), Ok(()));
    }

    #[test]
    fn chip_line_with_pwm_is_valid() {
        let def = PinDefinition::with_chip_line("PWM0", "gpiochip0", 18)
            .with_pwm("/sys/class/pwm/pwmchip0", 0);
        assert_eq!(def.validate(), Ok(()));
        assert!(def.has_pwm());
    }

    #[test]
    fn blank_name_rejected_first() {
        let mut def = PinDefinition::with_header_pin("  ", "");
        assert_eq!(def.validate(), Err(PinRuleViolation::FieldRequired("name")));
        def.name = "X".into();
        assert_eq!(def.validate(), Err(PinRuleViolation::FieldRequired("pin")));
    }

    #[test]
    fn surrounding_whitespace_in_name_rejected() {
        let def = PinDefinition::with_header_pin("A ", "1");
        assert_eq!(def.validate(), Err(PinRuleViolation::UntrimmedName));
        let def = PinDefinition::with_header_pin("\tA", "1");
        assert_eq!(def.validate(), Err(PinRuleViolation::UntrimmedName));
        let def = PinDefinition::with_header_pin("LED 1", "1");
        assert_eq!(def.validate(), Ok(()));
    }

    #[test]
    fn missing_address_rejected() {
        let mut def = PinDefinition::with_header_pin("GPIO1", "1");
        def.pin = None;
        assert_eq!(def.validate(), Err(PinRuleViolation::MissingAddress));
    }

    #[test]
    fn device_name_rules() {
        let def = PinDefinition::with_chip_line("A", "/dev/gpiochip0", 1);
        assert_eq!(
            def.validate(),
            Err(PinRuleViolation::InvalidDeviceName("/dev/gpiochip0".into()))
        );

        let def = PinDefinition::with_chip_line("A", "", 1);
        assert_eq!(def.validate(), Err(PinRuleViolation::FieldRequired("device_name")));

        let mut def = PinDefinition::with_chip_line("A", "gpiochip1", 1);
        def.line_number = None;
        assert_eq!(
            def.validate(),
            Err(PinRuleViolation::LineNumberRequired("gpiochip1".into()))
        );
    }

    #[test]
    fn line_number_rules() {
        let def = PinDefinition::with_chip_line("A", "gpiochip0", -3);
        assert_eq!(def.validate(), Err(PinRuleViolation::NegativeLineNumber(-3)));

        let mut def = PinDefinition::with_header_pin("A", "3");
        def.line_number = Some(3);
        assert_eq!(def.validate(), Err(PinRuleViolation::DeviceNameRequired(3)));
    }

    #[test]
    fn line_number_upper_bound() {
        let def = PinDefinition::with_chip_line("A", "gpiochip0", MAX_LINE_OFFSET);
        assert_eq!(def.validate(), Ok(()));

        let def = PinDefinition::with_chip_line("A", "gpiochip0", MAX_LINE_OFFSET + 1);
        assert_eq!(
            def.validate(),
            Err(PinRuleViolation::LineNumberOutOfRange(4_294_967_296))
        );
    }

    #[test]
    fn pwm_id_upper_bound() {
        let def = PinDefinition::with_chip_line("A", "gpiochip0", 4)
            .with_pwm("/sys/class/pwm/pwmchip0", MAX_PWM_ID);
        assert_eq!(def.validate(), Ok(()));

        let def = PinDefinition::with_chip_line("A", "gpiochip0", 4)
            .with_pwm("/sys/class/pwm/pwmchip0", MAX_PWM_ID + 1);
        assert_eq!(def.validate(), Err(PinRuleViolation::PwmIdOutOfRange(4_294_967_296)));
    }

    #[test]
    fn document_must_be_an_object() {
        let err = serde_json::from_str::<PinDefinitions>(r#"[[{"name":"A","pin":"1"}]]"#).unwrap_err();
        assert_eq!(err.line(), 1);
        assert!(err.column() > 0);

        let err = serde_json::from_str::<PinDefinitions>("\n  42").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.column() > 0);

        let err = serde_json::from_str::<PinDefinitions>(r#"{"pinz":[]}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `pins`"));
    }

    #[test]
    fn pwm_rules() {
        let mut def = PinDefinition::with_chip_line("A", "gpiochip0", 4);
        def.pwm_id = Some(1);
        assert_eq!(def.validate(), Err(PinRuleViolation::PwmChipDirRequired));

        let def = PinDefinition::with_chip_line("A", "gpiochip0", 4).with_pwm("/sys/class/pwm/pwmchip0", -1);
        assert_eq!(def.validate(), Err(PinRuleViolation::NegativePwmId(-1)));

        let mut def = PinDefinition::with_chip_line("A", "gpiochip0", 4);
        def.pwm_chip_sysfs_dir = Some("/sys/class/pwm/pwmchip0".into());
        assert_eq!(
            def.validate(),
            Err(PinRuleViolation::PwmIdRequired("/sys/class/pwm/pwmchip0".into()))
        );
    }

    #[test]
    fn hints_deserialize_lowercase() {
        let def: PinDefinition = serde_json::from_str(
            r#"{"name":"LED","pin":"7","pull":"up","direction":"output","vendor_extra":1}"#,
        )
        .unwrap();
        assert_eq!(def.pull, Some(Pull::Up));
        assert_eq!(def.direction, Some(Direction::Output));
        assert_eq!(def.validate(), Ok(()));
    }

    #[test]
    fn absent_options_are_not_serialized() {
        let json = serde_json::to_string(&PinDefinition::with_header_pin("GPIO1", "1")).unwrap();
        assert_eq!(json, r#"{"name":"GPIO1","pin":"1"}"#);
    }
}
