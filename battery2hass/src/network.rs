use std::net::IpAddr;

/// Network settings of the host running the publisher.
pub trait NetworkSettings {
    fn local_ip(&self) -> IpAddr;
}
