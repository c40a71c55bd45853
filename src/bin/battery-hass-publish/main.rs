mod collaborators;
mod config;
mod logging;
mod rumqttc_wrapper;

use battery2hass::home_assistant::BatteryHass;
use battery2hass::loop_task::LoopTask;
use battery2hass::BUILD_VERSION;
use collaborators::{ConfiguredBatteryStats, LocalNetwork};
use config::Config;
use rumqttc_wrapper::RumqttcWrapper;
use std::process::ExitCode;
use std::thread;

use log::{error, info};

fn main() -> ExitCode {
    logging::init_logger();
    info!("Running revision: {BUILD_VERSION}");
    if std::env::args().len() > 1 {
        error!("Arguments passed. Tool is configured by config.toml in its path");
    }

    let config = Config::load();
    let Some(mqtt_config) = config.mqtt.as_ref().filter(|_| config.is_valid()) else {
        error!("Configuration needs a dtu_serial and an [mqtt] host");
        return ExitCode::FAILURE;
    };

    let settings = config.hass_settings();
    info!(
        "battery: {}, provider: {}, home assistant discovery: {}",
        if settings.battery.enabled { "enabled" } else { "disabled" },
        settings.battery.provider,
        if settings.hass.enabled { "enabled" } else { "disabled" },
    );

    let stats = ConfiguredBatteryStats {
        manufacturer: config.manufacturer(),
        full_publish_interval: config.full_publish_interval(),
    };

    let mut tasks: Vec<Box<dyn LoopTask>> = vec![Box::new(BatteryHass::<RumqttcWrapper, _, _>::new(
        mqtt_config,
        settings,
        stats,
        LocalNetwork,
    ))];

    let tick_interval = config.tick_interval();
    info!(
        "ticking every {:.2}s",
        tick_interval.as_millis() as f64 / 1000.
    );
    loop {
        tasks.iter_mut().for_each(|task| task.tick());
        thread::sleep(tick_interval);
    }
}
