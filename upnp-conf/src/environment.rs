//! Network interface queries.
//!
//! The pipeline only needs two facts about the host: which interfaces exist
//! and the first IPv4 address/netmask of a named interface. [`SystemEnvironment`]
//! answers from `getifaddrs(3)`. [`StaticEnvironment`] answers from a fixed
//! table, built in code or loaded from a TOML file.

use std::collections::{BTreeMap, BTreeSet};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::{Path, PathBuf};

use nix::ifaddrs::getifaddrs;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("failed to enumerate network interfaces: {0}")]
    Query(#[from] nix::Error),
    #[error("failed to read interface table {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid interface table {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// An IPv4 address assigned to an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Assignment {
    pub address: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

pub trait Environment {
    /// Names of every interface present on the system.
    fn interfaces(&self) -> Result<BTreeSet<String>, EnvironmentError>;

    /// First IPv4 assignment of `name`, `None` if it has none.
    fn ipv4_address(&self, name: &str) -> Result<Option<Ipv4Assignment>, EnvironmentError>;
}

impl Ipv4Assignment {
    /// An address reported without a netmask is a single host (/32).
    pub fn new(address: Ipv4Addr, netmask: Option<Ipv4Addr>) -> Self {
        Self {
            address,
            netmask: netmask.unwrap_or(Ipv4Addr::BROADCAST),
        }
    }
}

/// Live interface state from the kernel.
///
/// The first `AF_INET` entry of an interface wins. A kernel entry without a
/// netmask becomes a /32, see [`Ipv4Assignment::new`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn interfaces(&self) -> Result<BTreeSet<String>, EnvironmentError> {
        Ok(getifaddrs()?.map(|ifa| ifa.interface_name).collect())
    }

    fn ipv4_address(&self, name: &str) -> Result<Option<Ipv4Assignment>, EnvironmentError> {
        for ifa in getifaddrs()? {
            if ifa.interface_name != name {
                continue;
            }
            let Some(address) = ifa.address.as_ref().and_then(|a| a.as_sockaddr_in()) else {
                continue;
            };
            let netmask = ifa
                .netmask
                .as_ref()
                .and_then(|m| m.as_sockaddr_in())
                .map(|m| *SocketAddrV4::from(*m).ip());
            return Ok(Some(Ipv4Assignment::new(
                *SocketAddrV4::from(*address).ip(),
                netmask,
            )));
        }
        Ok(None)
    }
}

/// A fixed interface table.
///
/// An interface listed with an address but no netmask is treated as a /32,
/// the same as [`SystemEnvironment`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticEnvironment {
    interfaces: BTreeMap<String, Option<Ipv4Assignment>>,
}

#[derive(Debug, Deserialize)]
struct InterfaceTable {
    #[serde(default, rename = "interface")]
    interfaces: Vec<StaticInterface>,
}

#[derive(Debug, Deserialize)]
struct StaticInterface {
    name: String,
    #[serde(default)]
    address: Option<Ipv4Addr>,
    #[serde(default)]
    netmask: Option<Ipv4Addr>,
}

impl StaticEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interface without any IPv4 address.
    pub fn with_interface(mut self, name: impl Into<String>) -> Self {
        self.interfaces.insert(name.into(), None);
        self
    }

    pub fn with_ipv4(
        mut self,
        name: impl Into<String>,
        address: Ipv4Addr,
        netmask: Ipv4Addr,
    ) -> Self {
        self.interfaces
            .insert(name.into(), Some(Ipv4Assignment { address, netmask }));
        self
    }

    /// Load a table of `[[interface]]` entries from a TOML file.
    pub fn load(path: &Path) -> Result<Self, EnvironmentError> {
        let raw = std::fs::read_to_string(path).map_err(|source| EnvironmentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| EnvironmentError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        let table: InterfaceTable = toml::from_str(raw)?;
        let interfaces = table
            .interfaces
            .into_iter()
            .map(|iface| {
                let assignment = iface
                    .address
                    .map(|address| Ipv4Assignment::new(address, iface.netmask));
                (iface.name, assignment)
            })
            .collect();
        Ok(Self { interfaces })
    }
}

impl Environment for StaticEnvironment {
    fn interfaces(&self) -> Result<BTreeSet<String>, EnvironmentError> {
        Ok(self.interfaces.keys().cloned().collect())
    }

    fn ipv4_address(&self, name: &str) -> Result<Option<Ipv4Assignment>, EnvironmentError> {
        Ok(self.interfaces.get(name).copied().flatten())
    }
}
