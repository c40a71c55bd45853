//! Static descriptions of the entities announced to Home Assistant, one table
//! per battery provider.

use crate::provider::BatteryProvider;

/// Kind of Home Assistant entity, determines the discovery component and
/// which characters are dropped from the entity id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Sensor,
    BinarySensor,
}

impl EntityKind {
    pub fn component(self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::BinarySensor => "binary_sensor",
        }
    }
}

/// Derives the entity id from a human readable caption.
///
/// Spaces become underscores, `.`, `(` and `)` are dropped (binary sensors
/// additionally drop `:`) and the result is lowercased. Uniqueness is not
/// checked here.
pub fn sanitize(caption: &str, kind: EntityKind) -> String {
    caption
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            '.' | '(' | ')' => None,
            ':' if kind == EntityKind::BinarySensor => None,
            c => Some(c),
        })
        .collect::<String>()
        .to_lowercase()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorDescriptor {
    pub caption: &'static str,
    pub icon: Option<&'static str>,
    // appended to "<prefix>battery/" to form the state topic
    pub topic: &'static str,
    pub device_class: Option<&'static str>,
    pub state_class: Option<&'static str>,
    pub unit: Option<&'static str>,
}

impl SensorDescriptor {
    /// Plain sensor without any classification.
    const fn plain(caption: &'static str, icon: &'static str, topic: &'static str) -> Self {
        Self {
            caption,
            icon: Some(icon),
            topic,
            device_class: None,
            state_class: None,
            unit: None,
        }
    }

    /// Measurement with the given device class and unit.
    const fn measurement(
        caption: &'static str,
        icon: Option<&'static str>,
        topic: &'static str,
        device_class: Option<&'static str>,
        unit: &'static str,
    ) -> Self {
        Self {
            caption,
            icon,
            topic,
            device_class,
            state_class: Some("measurement"),
            unit: Some(unit),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinarySensorDescriptor {
    pub caption: &'static str,
    pub icon: Option<&'static str>,
    pub topic: &'static str,
    pub payload_on: &'static str,
    pub payload_off: &'static str,
}

impl BinarySensorDescriptor {
    /// Flag published as "1"/"0" by all providers.
    const fn flag(caption: &'static str, icon: &'static str, topic: &'static str) -> Self {
        Self {
            caption,
            icon: Some(icon),
            topic,
            payload_on: "1",
            payload_off: "0",
        }
    }
}

/// Entities announced for one battery provider.
#[derive(Clone, Copy, Debug)]
pub struct ProviderTable {
    // whether the sensors common to all providers are announced as well
    pub shared: bool,
    pub sensors: &'static [SensorDescriptor],
    pub binary_sensors: &'static [BinarySensorDescriptor],
}

impl ProviderTable {
    pub fn for_provider(provider: BatteryProvider) -> Self {
        match provider {
            BatteryProvider::Pylontech => PYLONTECH,
            BatteryProvider::JkBms => JK_BMS,
            // the MQTT provider neither re-publishes the SoC under a known
            // topic nor knows the manufacturer, discovery makes no sense there
            BatteryProvider::MqttSoc => EMPTY.without_shared(),
            BatteryProvider::VictronSmartShunt | BatteryProvider::Other(_) => EMPTY,
        }
    }

    const fn without_shared(self) -> Self {
        Self {
            shared: false,
            ..self
        }
    }

    /// Sensors in publishing order, the shared ones first.
    pub fn all_sensors(&self) -> impl Iterator<Item = &'static SensorDescriptor> {
        let shared: &'static [SensorDescriptor] = if self.shared { &SHARED_SENSORS } else { &[] };
        shared.iter().chain(self.sensors.iter())
    }

    pub fn len(&self) -> usize {
        self.all_sensors().count() + self.binary_sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub const SHARED_SENSORS: [SensorDescriptor; 3] = [
    SensorDescriptor::plain("Manufacturer", "mdi:factory", "manufacturer"),
    SensorDescriptor {
        caption: "Data Age",
        icon: Some("mdi:timer-sand"),
        topic: "dataAge",
        device_class: Some("duration"),
        state_class: Some("measurement"),
        unit: Some("s"),
    },
    SensorDescriptor {
        caption: "State of Charge (SoC)",
        icon: Some("mdi:battery-medium"),
        topic: "stateOfCharge",
        device_class: Some("battery"),
        state_class: Some("measurement"),
        unit: Some("%"),
    },
];

const EMPTY: ProviderTable = ProviderTable {
    shared: true,
    sensors: &[],
    binary_sensors: &[],
};

const PYLONTECH: ProviderTable = ProviderTable {
    shared: true,
    sensors: &PYLONTECH_SENSORS,
    binary_sensors: &PYLONTECH_BINARY_SENSORS,
};

const PYLONTECH_SENSORS: [SensorDescriptor; 7] = [
    SensorDescriptor::measurement("Battery voltage", None, "voltage", Some("voltage"), "V"),
    SensorDescriptor::measurement("Battery current", None, "current", Some("current"), "A"),
    SensorDescriptor::measurement("Temperature", None, "temperature", Some("temperature"), "°C"),
    SensorDescriptor::measurement(
        "State of Health (SOH)",
        Some("mdi:heart-plus"),
        "stateOfHealth",
        None,
        "%",
    ),
    SensorDescriptor::measurement(
        "Charge voltage (BMS)",
        None,
        "settings/chargeVoltage",
        Some("voltage"),
        "V",
    ),
    SensorDescriptor::measurement(
        "Charge current limit",
        None,
        "settings/chargeCurrentLimitation",
        Some("current"),
        "A",
    ),
    SensorDescriptor::measurement(
        "Discharge current limit",
        None,
        "settings/dischargeCurrentLimitation",
        Some("current"),
        "A",
    ),
];

#[rustfmt::skip]
const PYLONTECH_BINARY_SENSORS: [BinarySensorDescriptor; 20] = [
    BinarySensorDescriptor::flag("Alarm Discharge current", "mdi:alert", "alarm/overCurrentDischarge"),
    BinarySensorDescriptor::flag("Warning Discharge current", "mdi:alert-outline", "warning/highCurrentDischarge"),
    BinarySensorDescriptor::flag("Alarm Temperature low", "mdi:thermometer-low", "alarm/underTemperature"),
    BinarySensorDescriptor::flag("Warning Temperature low", "mdi:thermometer-low", "warning/lowTemperature"),
    BinarySensorDescriptor::flag("Alarm Temperature high", "mdi:thermometer-high", "alarm/overTemperature"),
    BinarySensorDescriptor::flag("Warning Temperature high", "mdi:thermometer-high", "warning/highTemperature"),
    BinarySensorDescriptor::flag("Alarm Voltage low", "mdi:alert", "alarm/underVoltage"),
    BinarySensorDescriptor::flag("Warning Voltage low", "mdi:alert-outline", "warning/lowVoltage"),
    BinarySensorDescriptor::flag("Alarm Voltage high", "mdi:alert", "alarm/overVoltage"),
    BinarySensorDescriptor::flag("Warning Voltage high", "mdi:alert-outline", "warning/highVoltage"),
    BinarySensorDescriptor::flag("Alarm BMS internal", "mdi:alert", "alarm/bmsInternal"),
    BinarySensorDescriptor::flag("Warning BMS internal", "mdi:alert-outline", "warning/bmsInternal"),
    BinarySensorDescriptor::flag("Alarm High charge current", "mdi:alert", "alarm/overCurrentCharge"),
    BinarySensorDescriptor::flag("Warning High charge current", "mdi:alert-outline", "warning/highCurrentCharge"),
    BinarySensorDescriptor::flag("Charge enabled", "mdi:battery-arrow-up", "charging/chargeEnabled"),
    BinarySensorDescriptor::flag("Discharge enabled", "mdi:battery-arrow-down", "charging/dischargeEnabled"),
    BinarySensorDescriptor::flag("Charge immediately", "mdi:alert", "charging/chargeImmediately"),
    // request flags of CAN frame 0x35C (bits 4 and 3) and the cell imbalance
    // bit of the warning frame 0x359, published by the Pylontech stats as
    // chargeImmediately2, fullChargeRequest and cellImbalance
    BinarySensorDescriptor::flag("Charge immediately 2", "mdi:alert", "charging/chargeImmediately2"),
    BinarySensorDescriptor::flag("Full charge request", "mdi:alert", "charging/fullChargeRequest"),
    BinarySensorDescriptor::flag("Warning Cell imbalance", "mdi:alert-outline", "warning/cellImbalance"),
];

const JK_BMS: ProviderTable = ProviderTable {
    shared: true,
    sensors: &JK_BMS_SENSORS,
    binary_sensors: &JK_BMS_BINARY_SENSORS,
};

const JK_BMS_SENSORS: [SensorDescriptor; 6] = [
    SensorDescriptor::measurement(
        "Voltage",
        Some("mdi:battery-charging"),
        "BatteryVoltageMilliVolt",
        Some("voltage"),
        "mV",
    ),
    SensorDescriptor::measurement(
        "Current",
        Some("mdi:current-dc"),
        "BatteryCurrentMilliAmps",
        Some("current"),
        "mA",
    ),
    SensorDescriptor::measurement(
        "BMS Temperature",
        Some("mdi:thermometer"),
        "BmsTempCelsius",
        Some("temperature"),
        "°C",
    ),
    SensorDescriptor::measurement(
        "Cell Voltage Diff",
        Some("mdi:battery-alert"),
        "CellDiffMilliVolt",
        Some("voltage"),
        "mV",
    ),
    SensorDescriptor::plain("Charge Cycles", "mdi:counter", "BatteryCycles"),
    SensorDescriptor::plain("Cycle Capacity", "mdi:battery-sync", "BatteryCycleCapacity"),
];

// alarms of the JK BMS share caption prefix, icon family and topic folder
macro_rules! jk_alarm {
    ($caption:literal, $icon:literal, $topic:literal) => {
        BinarySensorDescriptor::flag(
            concat!("Alarm: ", $caption),
            concat!("mdi:", $icon),
            concat!("alarms/", $topic),
        )
    };
}

#[rustfmt::skip]
const JK_BMS_BINARY_SENSORS: [BinarySensorDescriptor; 15] = [
    BinarySensorDescriptor::flag("Charging Possible", "mdi:battery-arrow-up", "status/ChargingActive"),
    BinarySensorDescriptor::flag("Discharging Possible", "mdi:battery-arrow-down", "status/DischargingActive"),
    BinarySensorDescriptor::flag("Balancing Active", "mdi:scale-balance", "status/BalancingActive"),
    jk_alarm!("Low Capacity", "battery-alert-variant-outline", "LowCapacity"),
    jk_alarm!("BMS Overtemperature", "thermometer-alert", "BmsOvertemperature"),
    jk_alarm!("Charging Overvoltage", "fuse-alert", "ChargingOvervoltage"),
    jk_alarm!("Discharge Undervoltage", "fuse-alert", "DischargeUndervoltage"),
    jk_alarm!("Battery Overtemperature", "thermometer-alert", "BatteryOvertemperature"),
    jk_alarm!("Charging Overcurrent", "fuse-alert", "ChargingOvercurrent"),
    jk_alarm!("Discharging Overcurrent", "fuse-alert", "DischargeOvercurrent"),
    jk_alarm!("Cell Voltage Difference", "battery-alert", "CellVoltageDifference"),
    jk_alarm!("Battery Box Overtemperature", "thermometer-alert", "BatteryBoxOvertemperature"),
    jk_alarm!("Battery Undertemperature", "thermometer-alert", "BatteryUndertemperature"),
    jk_alarm!("Cell Overvoltage", "battery-alert", "CellOvervoltage"),
    jk_alarm!("Cell Undervoltage", "battery-alert", "CellUndervoltage"),
];
