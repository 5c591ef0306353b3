//! Reads the `service upnp` subtree into [`UpnpConfig`].

use std::net::Ipv4Addr;

use config_tree::{ConfigStore, ScopedStore};
use thiserror::Error;
use tracing::debug;

use crate::environment::{Environment, EnvironmentError};
use crate::settings::{netmask_prefix_len, FeatureSettings, ListenNetwork, UpnpConfig};

pub const BASE_PATH: &[&str] = &["service", "upnp"];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("listen-on interface \"{interface}\" has no IPv4 address")]
    NoIpv4Address { interface: String },
    #[error("interface \"{interface}\" has a non-contiguous netmask {netmask}")]
    InvalidNetmask { interface: String, netmask: Ipv4Addr },
    #[error("invalid value \"{value}\" for {path}")]
    InvalidValue { path: String, value: String },
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

/// Build the settings for this run from `store` rooted at `base`.
///
/// Returns [`UpnpConfig::Absent`] without further reads when `base` does not
/// exist. Listen networks come from the live addresses of the listen
/// interfaces; interfaces missing from the system are skipped here and
/// rejected by verification.
pub fn get_config<S, E>(store: &S, base: &[&str], env: &E) -> Result<UpnpConfig, ExtractError>
where
    S: ConfigStore + ?Sized,
    E: Environment + ?Sized,
{
    if !store.exists(base) {
        debug!(base = %base.join(" "), "upnp not configured");
        return Ok(UpnpConfig::Absent);
    }
    let conf = ScopedStore::new(store, base);
    let mut upnp = FeatureSettings::with_defaults();

    upnp.outbound_interface = conf.return_value(&["outbound-interface"]);
    upnp.secure_mode = conf.exists(&["secure-mode"]);
    if let Some(seconds) = read_seconds(&conf, "notify-interval")? {
        upnp.notify_interval_seconds = seconds;
    }
    if let Some(seconds) = read_seconds(&conf, "clean-ruleset-interval")? {
        upnp.clean_ruleset_interval_seconds = seconds;
    }

    upnp.listen_interfaces = conf.return_values(&["listen-on"]);
    let present = env.interfaces()?;
    for interface in &upnp.listen_interfaces {
        if !present.contains(interface) {
            debug!(%interface, "listen-on interface not present, skipping address lookup");
            continue;
        }
        upnp.listen_networks.push(listen_network(env, interface)?);
    }

    debug!(
        outbound = ?upnp.outbound_interface,
        listen = ?upnp.listen_interfaces,
        instance_id = %upnp.instance_id,
        "extracted upnp settings"
    );
    Ok(UpnpConfig::Present(upnp))
}

fn listen_network<E>(env: &E, interface: &str) -> Result<ListenNetwork, ExtractError>
where
    E: Environment + ?Sized,
{
    let assignment = env
        .ipv4_address(interface)?
        .ok_or_else(|| ExtractError::NoIpv4Address {
            interface: interface.to_string(),
        })?;
    let prefix_len =
        netmask_prefix_len(assignment.netmask).ok_or_else(|| ExtractError::InvalidNetmask {
            interface: interface.to_string(),
            netmask: assignment.netmask,
        })?;
    Ok(ListenNetwork::new(assignment.address, prefix_len))
}

fn read_seconds<S>(conf: &S, key: &str) -> Result<Option<u32>, ExtractError>
where
    S: ConfigStore + ?Sized,
{
    let Some(raw) = conf.return_value(&[key]) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|_| ExtractError::InvalidValue {
            path: key.to_string(),
            value: raw,
        })
}
