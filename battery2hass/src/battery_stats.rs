use std::time::Duration;

/// Live view on the battery telemetry provider.
pub trait BatteryStats {
    /// Manufacturer as reported by the battery (or BMS).
    fn manufacturer(&self) -> String;

    /// Interval in which the provider re-publishes all of its values.
    fn full_publish_interval(&self) -> Duration;
}
