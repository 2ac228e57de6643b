//! Accessory information reported to the host.

use serde::{Deserialize, Serialize};

/// Static descriptive fields the host shows for the light accessory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInfo {
    /// Manufacturer name.
    pub manufacturer: String,
    /// Model string.
    pub model: String,
    /// Serial number.
    pub serial_number: String,
    /// Name displayed for the light.
    pub display_name: String,
}

impl AccessoryInfo {
    /// Create accessory information with the default manufacturer fields.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }
}

impl Default for AccessoryInfo {
    fn default() -> Self {
        Self {
            manufacturer: "Aerogarden".to_string(),
            model: "Default-Model".to_string(),
            serial_number: "Default-Serial".to_string(),
            display_name: "Aerogarden Light".to_string(),
        }
    }
}
