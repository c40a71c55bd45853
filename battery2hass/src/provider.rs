use serde_derive::Deserialize;
use std::fmt;

/// Source of the battery telemetry, selected in the configuration by its
/// numeric value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum BatteryProvider {
    #[default]
    Pylontech,
    JkBms,
    // state of charge is read from an arbitrary MQTT topic
    MqttSoc,
    VictronSmartShunt,
    Other(u8),
}

impl From<u8> for BatteryProvider {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Pylontech,
            1 => Self::JkBms,
            2 => Self::MqttSoc,
            3 => Self::VictronSmartShunt,
            other => Self::Other(other),
        }
    }
}

impl From<BatteryProvider> for u8 {
    fn from(provider: BatteryProvider) -> Self {
        match provider {
            BatteryProvider::Pylontech => 0,
            BatteryProvider::JkBms => 1,
            BatteryProvider::MqttSoc => 2,
            BatteryProvider::VictronSmartShunt => 3,
            BatteryProvider::Other(other) => other,
        }
    }
}

impl fmt::Display for BatteryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pylontech => write!(f, "Pylontech"),
            Self::JkBms => write!(f, "JK BMS"),
            Self::MqttSoc => write!(f, "SoC from MQTT"),
            Self::VictronSmartShunt => write!(f, "Victron SmartShunt"),
            Self::Other(value) => write!(f, "unknown provider {value}"),
        }
    }
}
