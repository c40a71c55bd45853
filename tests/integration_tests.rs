use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use anyhow::anyhow;
use battery2hass::{
    battery_config::{BatteryConfig, HassConfig, HassSettings},
    battery_stats::BatteryStats,
    home_assistant::{BatteryHass, PublishState},
    loop_task::LoopTask,
    mqtt_config::MqttConfig,
    mqtt_wrapper::{MqttWrapper, QoS},
    network::NetworkSettings,
    provider::BatteryProvider,
};
use serde_json::Value;

struct MqttTester {
    published_values: Vec<(String, bool, Vec<u8>)>,
    connected: bool,
    failing: bool,
}

impl MqttTester {
    pub fn len(&self) -> usize {
        self.published_values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn topics(&self) -> Vec<&str> {
        self.published_values
            .iter()
            .map(|(topic, _, _)| topic.as_str())
            .collect()
    }

    fn payload(&self, topic: &str) -> Value {
        let (_, _, payload) = self
            .published_values
            .iter()
            .find(|(t, _, _)| t == topic)
            .unwrap_or_else(|| panic!("nothing published to {topic}"));
        serde_json::from_slice(payload).unwrap()
    }
}

impl MqttWrapper for MqttTester {
    fn publish<S, V>(&mut self, topic: S, _qos: QoS, retain: bool, payload: V) -> anyhow::Result<()>
    where
        S: Into<String>,
        V: Into<Vec<u8>>,
    {
        if self.failing {
            return Err(anyhow!("broker gone"));
        }
        self.published_values.push((topic.into(), retain, payload.into()));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn new(_config: &MqttConfig, _suffix: &str) -> Self {
        Self {
            published_values: Vec::new(),
            connected: true,
            failing: false,
        }
    }
}

struct FixedStats {
    manufacturer: &'static str,
    interval: Duration,
}

impl BatteryStats for FixedStats {
    fn manufacturer(&self) -> String {
        self.manufacturer.to_string()
    }

    fn full_publish_interval(&self) -> Duration {
        self.interval
    }
}

struct FixedNetwork;

impl NetworkSettings for FixedNetwork {
    fn local_ip(&self) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(192, 168, 1, 42))
    }
}

type Publisher = BatteryHass<MqttTester, FixedStats, FixedNetwork>;

fn settings(provider: BatteryProvider) -> HassSettings {
    HassSettings {
        serial: "123456789".to_string(),
        mqtt_prefix: "solar/".to_string(),
        battery: BatteryConfig {
            enabled: true,
            provider,
        },
        hass: HassConfig {
            enabled: true,
            ..HassConfig::default()
        },
    }
}

fn publisher(settings: HassSettings) -> Publisher {
    publisher_with_interval(settings, Duration::from_secs(10))
}

fn publisher_with_interval(settings: HassSettings, interval: Duration) -> Publisher {
    BatteryHass::new(
        &MqttConfig {
            host: "frob".to_owned(),
            port: Some(1234),
            client_id: Some("myclient".to_string()),
            ..MqttConfig::default()
        },
        settings,
        FixedStats {
            manufacturer: "PYLON",
            interval,
        },
        FixedNetwork,
    )
}

const SOC_TOPIC: &str = "homeassistant/sensor/dtu_battery_123456789/state_of_charge_soc/config";

#[test]
fn publish_one_message() {
    let mut mqtt = MqttTester::new(&MqttConfig::default(), "-test");
    let result = mqtt.publish("foo", QoS::AtMostOnce, true, "Hooray".to_string());
    assert!(result.is_ok());
    assert!(!mqtt.is_empty());
    assert_eq!(mqtt.len(), 1);
}

#[test]
fn pylontech_publishes_full_table() {
    let mut hass = publisher(settings(BatteryProvider::Pylontech));
    hass.tick();

    let mqtt = hass.client();
    assert_eq!(mqtt.len(), 3 + 7 + 20);
    let topics = mqtt.topics();
    assert_eq!(topics.iter().filter(|t| t.contains("/sensor/")).count(), 10);
    assert_eq!(
        topics.iter().filter(|t| t.contains("/binary_sensor/")).count(),
        20
    );
    // shared sensors come first
    assert_eq!(
        topics[0],
        "homeassistant/sensor/dtu_battery_123456789/manufacturer/config"
    );
    assert_eq!(topics[2], SOC_TOPIC);
    assert!(mqtt.published_values.iter().all(|(_, retain, _)| *retain));
    assert_eq!(hass.state(), PublishState::Clean);
}

#[test]
fn sensor_payload() {
    let mut hass = publisher(settings(BatteryProvider::Pylontech));
    hass.tick();

    let soc = hass.client().payload(SOC_TOPIC);
    assert_eq!(soc["name"], "State of Charge (SoC)");
    assert_eq!(soc["stat_t"], "solar/battery/stateOfCharge");
    assert_eq!(soc["uniq_id"], "123456789_state_of_charge_soc");
    assert_eq!(soc["icon"], "mdi:battery-medium");
    assert_eq!(soc["unit_of_meas"], "%");
    assert_eq!(soc["dev_cla"], "battery");
    assert_eq!(soc["stat_cla"], "measurement");
    assert_eq!(soc["exp_aft"], 30);

    let dev = &soc["dev"];
    assert_eq!(dev["name"], "Battery(123456789)");
    assert_eq!(dev["ids"], "123456789");
    assert_eq!(dev["cu"], "http://192.168.1.42");
    assert_eq!(dev["mf"], "OpenDTU");
    assert_eq!(dev["mdl"], "PYLON");
    assert_eq!(dev["sw"], battery2hass::BUILD_VERSION);
}

#[test]
fn optional_fields_are_omitted() {
    let mut hass = publisher(settings(BatteryProvider::Pylontech));
    hass.tick();

    let mqtt = hass.client();
    let manufacturer =
        mqtt.payload("homeassistant/sensor/dtu_battery_123456789/manufacturer/config");
    for key in ["unit_of_meas", "dev_cla", "stat_cla"] {
        assert!(manufacturer.get(key).is_none(), "{key}");
    }

    let voltage =
        mqtt.payload("homeassistant/sensor/dtu_battery_123456789/battery_voltage/config");
    assert!(voltage.get("icon").is_none());
    assert_eq!(voltage["stat_t"], "solar/battery/voltage");
}

#[test]
fn binary_sensor_payload() {
    let mut hass = publisher(settings(BatteryProvider::Pylontech));
    hass.tick();

    let alarm = hass.client().payload(
        "homeassistant/binary_sensor/dtu_battery_123456789/alarm_discharge_current/config",
    );
    assert_eq!(alarm["name"], "Alarm Discharge current");
    assert_eq!(alarm["uniq_id"], "123456789_alarm_discharge_current");
    assert_eq!(alarm["stat_t"], "solar/battery/alarm/overCurrentDischarge");
    assert_eq!(alarm["pl_on"], "1");
    assert_eq!(alarm["pl_off"], "0");
    assert_eq!(alarm["icon"], "mdi:alert");
    assert_eq!(alarm["dev"]["ids"], "123456789");
    assert!(alarm.get("exp_aft").is_none());
    assert!(alarm.get("dev_cla").is_none());
}

#[test]
fn jk_bms_device_and_alarms() {
    let mut hass = publisher(settings(BatteryProvider::JkBms));
    hass.tick();

    let mqtt = hass.client();
    assert_eq!(mqtt.len(), 3 + 6 + 15);

    let alarm = mqtt.payload(
        "homeassistant/binary_sensor/dtu_battery_123456789/alarm_low_capacity/config",
    );
    assert_eq!(alarm["name"], "Alarm: Low Capacity");
    assert_eq!(alarm["icon"], "mdi:battery-alert-variant-outline");
    assert_eq!(alarm["stat_t"], "solar/battery/alarms/LowCapacity");
    assert_eq!(alarm["dev"]["name"], "JK BMS (PYLON)");

    let cycles = mqtt.payload("homeassistant/sensor/dtu_battery_123456789/charge_cycles/config");
    assert_eq!(cycles["stat_t"], "solar/battery/BatteryCycles");
    assert!(cycles.get("unit_of_meas").is_none());
}

#[test]
fn mqtt_soc_provider_publishes_nothing() {
    let mut hass = publisher(settings(BatteryProvider::MqttSoc));
    hass.tick();

    assert!(hass.client().is_empty());
    assert_eq!(hass.state(), PublishState::Clean);
}

#[test]
fn victron_and_unknown_providers_get_shared_sensors() {
    for provider in [BatteryProvider::VictronSmartShunt, BatteryProvider::Other(7)] {
        let mut hass = publisher(settings(provider));
        hass.tick();

        let topics = hass.client().topics();
        assert_eq!(topics.len(), 3, "{provider}");
        assert!(topics.contains(&SOC_TOPIC));
    }
}

#[test]
fn disconnected_defers_publishing() {
    let mut hass = publisher(settings(BatteryProvider::Pylontech));
    hass.client_mut().connected = false;
    hass.tick();

    assert!(hass.client().is_empty());
    assert_eq!(hass.state(), PublishState::Pending);

    hass.client_mut().connected = true;
    hass.tick();
    assert_eq!(hass.client().len(), 30);
}

#[test]
fn publishes_only_once() {
    let mut hass = publisher(settings(BatteryProvider::Pylontech));
    hass.tick();
    hass.tick();
    hass.tick();

    assert_eq!(hass.client().len(), 30);
}

#[test]
fn reconnect_triggers_republish() {
    let mut hass = publisher(settings(BatteryProvider::VictronSmartShunt));
    hass.tick();
    assert_eq!(hass.client().len(), 3);

    hass.client_mut().connected = false;
    hass.tick();
    assert_eq!(hass.state(), PublishState::Pending);

    hass.client_mut().connected = true;
    hass.tick();
    assert_eq!(hass.client().len(), 6);
}

#[test]
fn disabled_features_publish_nothing() {
    let mut battery_off = settings(BatteryProvider::Pylontech);
    battery_off.battery.enabled = false;
    let mut hass_off = settings(BatteryProvider::Pylontech);
    hass_off.hass.enabled = false;

    for settings in [battery_off, hass_off] {
        let mut hass = publisher(settings);
        hass.client_mut().connected = false;
        hass.tick();
        hass.client_mut().connected = true;
        hass.tick();

        assert!(hass.client().is_empty());
        assert_eq!(hass.state(), PublishState::Pending);
    }
}

#[test]
fn settings_change_triggers_republish() {
    let mut hass = publisher(settings(BatteryProvider::VictronSmartShunt));
    hass.tick();

    hass.update_settings(settings(BatteryProvider::VictronSmartShunt));
    assert_eq!(hass.state(), PublishState::Clean);

    let mut changed = settings(BatteryProvider::VictronSmartShunt);
    changed.hass.topic = "ha/".to_string();
    hass.update_settings(changed);
    assert_eq!(hass.state(), PublishState::Pending);
    assert_eq!(hass.settings().hass.topic, "ha/");
    hass.tick();

    let topics = hass.client().topics();
    assert_eq!(topics.len(), 6);
    assert_eq!(
        topics[5],
        "ha/sensor/dtu_battery_123456789/state_of_charge_soc/config"
    );
}

#[test]
fn request_publish_repeats_pass() {
    let mut hass = publisher(settings(BatteryProvider::VictronSmartShunt));
    hass.tick();
    hass.request_publish();
    hass.tick();

    assert_eq!(hass.client().len(), 6);
}

#[test]
fn expiry_and_retain_follow_settings() {
    let mut settings = settings(BatteryProvider::VictronSmartShunt);
    settings.hass.expire = false;
    settings.hass.retain = false;
    let mut hass = publisher(settings);
    hass.tick();

    let mqtt = hass.client();
    assert!(mqtt.payload(SOC_TOPIC).get("exp_aft").is_none());
    assert!(mqtt.published_values.iter().all(|(_, retain, _)| !*retain));
}

#[test]
fn publish_errors_do_not_abort_pass() {
    let mut hass = publisher(settings(BatteryProvider::Pylontech));
    hass.client_mut().failing = true;
    hass.tick();

    // failures are not retried
    assert_eq!(hass.state(), PublishState::Clean);
    hass.client_mut().failing = false;
    hass.tick();
    assert!(hass.client().is_empty());
}

#[test]
fn expiry_rounds_up_to_whole_seconds() {
    let cases = [
        (Duration::from_millis(200), 1),
        (Duration::from_millis(500), 2),
        (Duration::from_millis(1500), 5),
        (Duration::from_secs(10), 30),
        (Duration::MAX, u64::MAX),
    ];
    for (interval, expected) in cases {
        let mut hass =
            publisher_with_interval(settings(BatteryProvider::VictronSmartShunt), interval);
        hass.tick();

        assert_eq!(
            hass.client().payload(SOC_TOPIC)["exp_aft"],
            expected,
            "{interval:?}"
        );
    }
}
