use serde_derive::Serialize;

/// `DeviceConfig` is used to define the configuration for a Home Assistant device
/// in the MQTT discovery protocol and is used to group entities together.
///
/// Keys use the abbreviated form accepted by Home Assistant.
#[derive(Serialize, Clone, Debug)]
pub struct DeviceConfig {
    pub name: String,
    #[serde(rename = "ids")]
    pub identifiers: String,
    #[serde(rename = "cu")]
    pub configuration_url: String,
    #[serde(rename = "mf")]
    pub manufacturer: &'static str,
    #[serde(rename = "mdl")]
    pub model: String,
    #[serde(rename = "sw")]
    pub sw_version: &'static str, // Software version of the application that supplies the discovered MQTT item.
}

/// `SensorConfig` is used to define the configuration for a Home Assistant sensor entity
/// in the MQTT discovery protocol.
///
/// More information about the MQTT discovery protocol can be found here:
/// https://www.home-assistant.io/docs/mqtt/discovery/
///
/// More information about the Home assistant sensor entities can be found here:
/// https://developers.home-assistant.io/docs/core/entity/sensor/
///
#[derive(Serialize, Debug)]
pub struct SensorConfig<'a> {
    name: &'a str, // The name of the sensor.
    #[serde(rename = "stat_t")]
    state_topic: String, // The MQTT topic where sensor readings will be published.
    #[serde(rename = "uniq_id")]
    unique_id: String, //  A globally unique identifier for the sensor.
    // exclude optional if they are not provided
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<&'a str>,
    #[serde(rename = "unit_of_meas", skip_serializing_if = "Option::is_none")]
    unit_of_measurement: Option<&'a str>,
    #[serde(rename = "dev")]
    device: DeviceConfig, // The device that the sensor belongs to, used to group entities together.
    #[serde(rename = "exp_aft", skip_serializing_if = "Option::is_none")]
    expire_after: Option<u64>, // Seconds after which the state becomes unavailable.
    #[serde(rename = "dev_cla", skip_serializing_if = "Option::is_none")]
    device_class: Option<&'a str>, // e.g. voltage, current, temperature, etc.
    #[serde(rename = "stat_cla", skip_serializing_if = "Option::is_none")]
    state_class: Option<&'a str>, // e.g. measurement, total_increasing, etc.
}

impl<'a> SensorConfig<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &'a str,
        state_topic: String,
        unique_id: String,
        icon: Option<&'a str>,
        unit_of_measurement: Option<&'a str>,
        device: DeviceConfig,
        expire_after: Option<u64>,
        device_class: Option<&'a str>,
        state_class: Option<&'a str>,
    ) -> Self {
        Self {
            name,
            state_topic,
            unique_id,
            icon,
            unit_of_measurement,
            device,
            expire_after,
            device_class,
            state_class,
        }
    }
}

/// `BinarySensorConfig` is the on/off counterpart of [`SensorConfig`].
///
/// https://www.home-assistant.io/integrations/binary_sensor.mqtt/
#[derive(Serialize, Debug)]
pub struct BinarySensorConfig<'a> {
    name: &'a str,
    #[serde(rename = "uniq_id")]
    unique_id: String,
    #[serde(rename = "stat_t")]
    state_topic: String,
    #[serde(rename = "pl_on")]
    payload_on: &'a str,
    #[serde(rename = "pl_off")]
    payload_off: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<&'a str>,
    #[serde(rename = "dev")]
    device: DeviceConfig,
}

impl<'a> BinarySensorConfig<'a> {
    pub fn new(
        name: &'a str,
        unique_id: String,
        state_topic: String,
        payload_on: &'a str,
        payload_off: &'a str,
        icon: Option<&'a str>,
        device: DeviceConfig,
    ) -> Self {
        Self {
            name,
            unique_id,
            state_topic,
            payload_on,
            payload_off,
            icon,
            device,
        }
    }
}
