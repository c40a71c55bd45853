use std::{
    net::{IpAddr, Ipv4Addr},
    time::Duration,
};

use battery2hass::{battery_stats::BatteryStats, network::NetworkSettings};
use local_ip_address::local_ip;
use log::warn;

/// Battery stats as far as they are known from the configuration.
pub struct ConfiguredBatteryStats {
    pub manufacturer: String,
    pub full_publish_interval: Duration,
}

impl BatteryStats for ConfiguredBatteryStats {
    fn manufacturer(&self) -> String {
        self.manufacturer.clone()
    }

    fn full_publish_interval(&self) -> Duration {
        self.full_publish_interval
    }
}

/// Looks up the address of the host on every call, it may change with DHCP.
pub struct LocalNetwork;

impl NetworkSettings for LocalNetwork {
    fn local_ip(&self) -> IpAddr {
        local_ip().unwrap_or_else(|e| {
            warn!("could not determine local ip: {e}");
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        })
    }
}
