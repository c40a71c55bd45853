use crate::provider::BatteryProvider;
use serde_derive::Deserialize;

fn default_true() -> bool {
    true
}

fn default_discovery_topic() -> String {
    "homeassistant/".to_string()
}

/// Battery section of the configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct BatteryConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub provider: BatteryProvider,
}

/// Home Assistant auto-discovery section of the configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HassConfig {
    #[serde(default)]
    pub enabled: bool,
    // discovery prefix, must carry its trailing slash
    #[serde(default = "default_discovery_topic")]
    pub topic: String,
    #[serde(default = "default_true")]
    pub retain: bool,
    #[serde(default = "default_true")]
    pub expire: bool,
}

impl Default for HassConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            topic: default_discovery_topic(),
            retain: true,
            expire: true,
        }
    }
}

/// Everything the discovery publisher reads from the configuration store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HassSettings {
    pub serial: String,
    pub mqtt_prefix: String,
    pub battery: BatteryConfig,
    pub hass: HassConfig,
}
