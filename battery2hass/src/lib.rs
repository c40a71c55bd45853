// externally visible interfaces
pub mod battery_config;
pub mod battery_stats;
pub mod home_assistant;
pub mod loop_task;
pub mod mqtt_config;
pub mod mqtt_wrapper;
pub mod network;
pub mod provider;
pub mod sensors;

// internal interfaces
mod home_assistant_config;

/// Build identifier of the publishing software, reported to Home Assistant as `sw`.
pub const BUILD_VERSION: &str = env!("GIT_HASH");
