use crate::battery_config::HassSettings;
use crate::battery_stats::BatteryStats;
use crate::home_assistant_config::{BinarySensorConfig, DeviceConfig, SensorConfig};
use crate::loop_task::LoopTask;
use crate::mqtt_config::MqttConfig;
use crate::mqtt_wrapper::{MqttWrapper, QoS};
use crate::network::NetworkSettings;
use crate::provider::BatteryProvider;
use crate::sensors::{
    sanitize, BinarySensorDescriptor, EntityKind, ProviderTable, SensorDescriptor,
};
use crate::BUILD_VERSION;

use log::{debug, error, info};
use serde::Serialize;
use std::time::Duration;

/// Vendor reported for the battery device in Home Assistant.
pub const DEVICE_MANUFACTURER: &str = "OpenDTU";

// three missed full publishes mark the entity unavailable. rounded up, as 0
// would tell Home Assistant to never expire the value
fn expire_after_secs(full_publish_interval: Duration) -> u64 {
    let expiry = full_publish_interval.saturating_mul(3);
    let secs = if expiry.subsec_nanos() > 0 {
        expiry.as_secs().saturating_add(1)
    } else {
        expiry.as_secs()
    };
    secs.max(1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishState {
    // discovery configs have to be (re-)sent
    Pending,
    Clean,
}

/// Announces the battery sensors to Home Assistant via MQTT auto-discovery.
///
/// Configs are sent once after (re-)connecting to the broker and after
/// settings changes, see [`BatteryHass::tick`].
pub struct BatteryHass<MQTT: MqttWrapper, STATS: BatteryStats, NET: NetworkSettings> {
    client: MQTT,
    settings: HassSettings,
    stats: STATS,
    network: NET,
    state: PublishState,
}

impl<MQTT, STATS, NET> BatteryHass<MQTT, STATS, NET>
where
    MQTT: MqttWrapper,
    STATS: BatteryStats,
    NET: NetworkSettings,
{
    pub fn new(config: &MqttConfig, settings: HassSettings, stats: STATS, network: NET) -> Self {
        let client = MQTT::new(config, "-battery-hass");
        Self::with_client(client, settings, stats, network)
    }

    pub fn with_client(client: MQTT, settings: HassSettings, stats: STATS, network: NET) -> Self {
        Self {
            client,
            settings,
            stats,
            network,
            state: PublishState::Pending,
        }
    }

    pub fn client(&self) -> &MQTT {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut MQTT {
        &mut self.client
    }

    pub fn settings(&self) -> &HassSettings {
        &self.settings
    }

    pub fn state(&self) -> PublishState {
        self.state
    }

    /// Forces the discovery configs to be sent again on the next tick.
    pub fn request_publish(&mut self) {
        self.state = PublishState::Pending;
    }

    /// Applies new settings, a change triggers another publish pass.
    pub fn update_settings(&mut self, settings: HassSettings) {
        if settings != self.settings {
            debug!("battery discovery settings changed");
            self.settings = settings;
            self.request_publish();
        }
    }

    fn publish_all(&mut self) {
        let provider = self.settings.battery.provider;
        let table = ProviderTable::for_provider(provider);
        info!(
            "Publishing {} Home Assistant discovery configs for {provider}",
            table.len()
        );

        for sensor in table.all_sensors() {
            self.publish_sensor(sensor);
        }
        for sensor in table.binary_sensors {
            self.publish_binary_sensor(sensor);
        }
    }

    fn state_topic(&self, topic: &str) -> String {
        // the serial is omitted to stay compatible with existing state topics
        format!("{}battery/{}", self.settings.mqtt_prefix, topic)
    }

    fn config_topic(&self, kind: EntityKind, sensor_id: &str) -> String {
        format!(
            "{}/dtu_battery_{}/{}/config",
            kind.component(),
            self.settings.serial,
            sensor_id
        )
    }

    fn unique_id(&self, sensor_id: &str) -> String {
        format!("{}_{}", self.settings.serial, sensor_id)
    }

    pub fn publish_sensor(&mut self, sensor: &SensorDescriptor) {
        let sensor_id = sanitize(sensor.caption, EntityKind::Sensor);
        let config_topic = self.config_topic(EntityKind::Sensor, &sensor_id);

        let expire_after = self
            .settings
            .hass
            .expire
            .then(|| expire_after_secs(self.stats.full_publish_interval()));

        let config = SensorConfig::new(
            sensor.caption,
            self.state_topic(sensor.topic),
            self.unique_id(&sensor_id),
            sensor.icon,
            sensor.unit,
            self.create_device_info(),
            expire_after,
            sensor.device_class,
            sensor.state_class,
        );
        self.publish_json(&config_topic, &config);
    }

    pub fn publish_binary_sensor(&mut self, sensor: &BinarySensorDescriptor) {
        let sensor_id = sanitize(sensor.caption, EntityKind::BinarySensor);
        let config_topic = self.config_topic(EntityKind::BinarySensor, &sensor_id);

        let config = BinarySensorConfig::new(
            sensor.caption,
            self.unique_id(&sensor_id),
            self.state_topic(sensor.topic),
            sensor.payload_on,
            sensor.payload_off,
            sensor.icon,
            self.create_device_info(),
        );
        self.publish_json(&config_topic, &config);
    }

    fn create_device_info(&self) -> DeviceConfig {
        let serial = &self.settings.serial;
        let manufacturer = self.stats.manufacturer();

        let name = match self.settings.battery.provider {
            BatteryProvider::JkBms => format!("JK BMS ({manufacturer})"),
            _ => format!("Battery({serial})"),
        };

        DeviceConfig {
            name,
            identifiers: serial.clone(),
            configuration_url: format!("http://{}", self.network.local_ip()),
            manufacturer: DEVICE_MANUFACTURER,
            model: manufacturer,
            sw_version: BUILD_VERSION,
        }
    }

    fn publish_json<T: Serialize>(&mut self, subtopic: &str, config: &T) {
        let payload = match serde_json::to_string(config) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize discovery config for {subtopic}: {e}");
                return;
            }
        };
        self.publish(subtopic, payload);
    }

    fn publish(&mut self, subtopic: &str, payload: String) {
        let topic = format!("{}{}", self.settings.hass.topic, subtopic);
        debug!("Publishing to {topic} with payload {payload}");

        if let Err(e) =
            self.client
                .publish(topic, QoS::AtMostOnce, self.settings.hass.retain, payload)
        {
            error!("Failed to publish message: {e:?}");
        }
    }
}

impl<MQTT, STATS, NET> LoopTask for BatteryHass<MQTT, STATS, NET>
where
    MQTT: MqttWrapper,
    STATS: BatteryStats,
    NET: NetworkSettings,
{
    fn tick(&mut self) {
        if !self.settings.battery.enabled || !self.settings.hass.enabled {
            return;
        }

        // transient connection losses between two ticks go unnoticed
        if !self.client.is_connected() {
            self.state = PublishState::Pending;
            return;
        }

        // only publish once when (re-)connecting or on settings changes
        if self.state == PublishState::Clean {
            return;
        }

        self.publish_all();
        self.state = PublishState::Clean;
    }
}
