//! Normalized UPnP IGD settings.
//!
//! [`UpnpConfig`] is what every pipeline stage exchanges. `Absent` means the
//! `service upnp` subtree is not configured and the daemon must be torn down;
//! `Present` carries the settings to render.

use std::fmt::{self, Display, Formatter};
use std::net::Ipv4Addr;

use serde::Serialize;
use uuid::Uuid;

pub const DEFAULT_NOTIFY_INTERVAL: u32 = 60;
pub const DEFAULT_CLEAN_RULESET_INTERVAL: u32 = 600;

/// Desired state of the UPnP service for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpnpConfig {
    Absent,
    Present(FeatureSettings),
}

impl UpnpConfig {
    pub fn is_present(&self) -> bool {
        matches!(self, UpnpConfig::Present(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSettings {
    pub secure_mode: bool,
    pub report_system_uptime: bool,
    pub notify_interval_seconds: u32,
    pub clean_ruleset_interval_seconds: u32,
    /// Generated per extraction; never carried over between runs.
    pub instance_id: Uuid,
    pub outbound_interface: Option<String>,
    pub listen_interfaces: Vec<String>,
    /// One entry per listen interface, in the same order.
    pub listen_networks: Vec<ListenNetwork>,
}

impl FeatureSettings {
    /// Settings with every default applied and a fresh instance id.
    pub fn with_defaults() -> Self {
        Self {
            secure_mode: false,
            report_system_uptime: true,
            notify_interval_seconds: DEFAULT_NOTIFY_INTERVAL,
            clean_ruleset_interval_seconds: DEFAULT_CLEAN_RULESET_INTERVAL,
            instance_id: Uuid::new_v4(),
            outbound_interface: None,
            listen_interfaces: Vec::new(),
            listen_networks: Vec::new(),
        }
    }
}

/// An interface address with the prefix length taken from its netmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListenNetwork {
    pub address: Ipv4Addr,
    pub prefix_len: u8,
}

impl ListenNetwork {
    pub fn new(address: Ipv4Addr, prefix_len: u8) -> Self {
        Self {
            address,
            prefix_len: prefix_len.min(32),
        }
    }

    /// Network address with host bits cleared.
    pub fn network(&self) -> Ipv4Addr {
        let mask = prefix_to_mask(self.prefix_len);
        Ipv4Addr::from(u32::from(self.address) & mask)
    }
}

/// Renders as `<network>/<prefix>`, e.g. `192.168.1.0/24`.
impl Display for ListenNetwork {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix_len)
    }
}

fn prefix_to_mask(prefix_len: u8) -> u32 {
    match prefix_len {
        0 => 0,
        n => u32::MAX << (32 - u32::from(n.min(32))),
    }
}

/// Prefix length of a contiguous netmask, `None` if the mask has holes.
pub fn netmask_prefix_len(netmask: Ipv4Addr) -> Option<u8> {
    let bits = u32::from(netmask);
    let prefix = bits.leading_ones();
    if bits.checked_shl(prefix).unwrap_or(0) != 0 {
        return None;
    }
    u8::try_from(prefix).ok()
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::{netmask_prefix_len, FeatureSettings, ListenNetwork};

    #[test]
    fn defaults_match_daemon_expectations() {
        let settings = FeatureSettings::with_defaults();
        assert!(!settings.secure_mode);
        assert!(settings.report_system_uptime);
        assert_eq!(settings.notify_interval_seconds, 60);
        assert_eq!(settings.clean_ruleset_interval_seconds, 600);
        assert!(settings.outbound_interface.is_none());
        assert!(settings.listen_interfaces.is_empty());
    }

    #[test]
    fn each_construction_gets_a_new_instance_id() {
        let a = FeatureSettings::with_defaults();
        let b = FeatureSettings::with_defaults();
        assert_ne!(a.instance_id, b.instance_id);
    }

    #[test]
    fn network_clears_host_bits() {
        let net = ListenNetwork::new(Ipv4Addr::new(192, 168, 1, 1), 24);
        assert_eq!(net.to_string(), "192.168.1.0/24");

        let host = ListenNetwork::new(Ipv4Addr::new(10, 0, 0, 9), 32);
        assert_eq!(host.to_string(), "10.0.0.9/32");

        let any = ListenNetwork::new(Ipv4Addr::new(10, 0, 0, 9), 0);
        assert_eq!(any.to_string(), "0.0.0.0/0");
    }

    #[test]
    fn netmask_prefix_len_handles_contiguous_masks() {
        assert_eq!(netmask_prefix_len(Ipv4Addr::new(255, 255, 255, 0)), Some(24));
        assert_eq!(netmask_prefix_len(Ipv4Addr::new(255, 255, 255, 255)), Some(32));
        assert_eq!(netmask_prefix_len(Ipv4Addr::new(255, 255, 240, 0)), Some(20));
        assert_eq!(netmask_prefix_len(Ipv4Addr::UNSPECIFIED), Some(0));
    }

    #[test]
    fn netmask_prefix_len_rejects_holes() {
        assert_eq!(netmask_prefix_len(Ipv4Addr::new(255, 0, 255, 0)), None);
        assert_eq!(netmask_prefix_len(Ipv4Addr::new(0, 0, 0, 255)), None);
    }
}
