use std::{env, fs, path::PathBuf, time::Duration};

use battery2hass::{
    battery_config::{BatteryConfig, HassConfig, HassSettings},
    mqtt_config::MqttConfig,
    provider::BatteryProvider,
};
use log::{info, warn};
use serde_derive::Deserialize;

static TICK_INTERVAL_DEFAULT: u64 = 1_000;
static FULL_PUBLISH_INTERVAL_DEFAULT: u64 = 60;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BatterySection {
    #[serde(flatten)]
    pub battery: BatteryConfig,
    // reported as model of the Home Assistant device
    pub manufacturer: Option<String>,
    // seconds between two full publishes of the battery values
    pub full_publish_interval: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dtu_serial: String,
    pub tick_interval: Option<u64>,
    pub mqtt: Option<MqttConfig>,
    pub battery: Option<BatterySection>,
    pub home_assistant: Option<HassConfig>,
}

impl Config {
    pub fn is_valid(&self) -> bool {
        !self.dtu_serial.is_empty() && self.mqtt.as_ref().is_some_and(|x| x.is_valid())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval.unwrap_or(TICK_INTERVAL_DEFAULT))
    }

    pub fn manufacturer(&self) -> String {
        self.battery
            .as_ref()
            .and_then(|b| b.manufacturer.clone())
            .unwrap_or_default()
    }

    pub fn full_publish_interval(&self) -> Duration {
        Duration::from_secs(
            self.battery
                .as_ref()
                .and_then(|b| b.full_publish_interval)
                .unwrap_or(FULL_PUBLISH_INTERVAL_DEFAULT),
        )
    }

    pub fn hass_settings(&self) -> HassSettings {
        HassSettings {
            serial: self.dtu_serial.clone(),
            mqtt_prefix: self.mqtt.clone().unwrap_or_default().prefix().to_string(),
            battery: self
                .battery
                .as_ref()
                .map(|b| b.battery.clone())
                .unwrap_or_default(),
            hass: self.home_assistant.clone().unwrap_or_default(),
        }
    }

    // config.toml in the working dir, or next to the executable if the former does not exist
    fn path() -> PathBuf {
        let filename = "config.toml";
        let local = PathBuf::from(filename);
        if local.exists() {
            return local;
        }
        match env::current_exe() {
            Ok(mut path) => {
                path.pop();
                path.push(filename);
                info!("{filename} not found in working dir, trying {}", path.display());
                path
            }
            Err(e) => {
                warn!("Unable to get current executable path: {e}");
                local
            }
        }
    }

    pub fn load() -> Config {
        // parse config from TOML file if present
        let path = Self::path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Could not read {}: {e}", path.display());
                "".into()
            }
        };
        let mut config = match toml::from_str::<Config>(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("toml config unparsable: {e}");
                Config::default()
            }
        };
        config.apply_env();
        config
    }

    // overwrite config if environment variables are set
    fn apply_env(&mut self) {
        // $DTU_SERIAL
        if let Ok(serial) = env::var("DTU_SERIAL") {
            self.dtu_serial = serial;
        }
        // $BATTERY_PROVIDER
        if let Ok(provider) = env::var("BATTERY_PROVIDER") {
            match provider.parse::<u8>() {
                Ok(provider) => {
                    self.battery
                        .get_or_insert_with(BatterySection::default)
                        .battery
                        .provider = BatteryProvider::from(provider);
                }
                Err(e) => warn!("ignoring BATTERY_PROVIDER={provider}: {e}"),
            }
        }
        // $MQTT_BROKER_HOST
        if let Ok(host) = env::var("MQTT_BROKER_HOST") {
            self.mqtt.get_or_insert(MqttConfig::default()).host = host;
        }
        // $MQTT_USERNAME (optional)
        if let Ok(username) = env::var("MQTT_USERNAME") {
            self.mqtt.get_or_insert(MqttConfig::default()).username = Some(username);
        }
        // $MQTT_PASSWORD (optional)
        if let Ok(password) = env::var("MQTT_PASSWORD") {
            self.mqtt.get_or_insert(MqttConfig::default()).password = Some(password);
        }
        // $MQTT_PORT (optional)
        if let Ok(port) = env::var("MQTT_PORT") {
            self.mqtt.get_or_insert(MqttConfig::default()).port = Some(port.parse().unwrap_or(1883));
        }
    }
}
