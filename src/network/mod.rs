pub mod alias;
pub mod endpoint;
pub mod registry;
pub mod sorting;
pub mod stats;

use std::net::IpAddr;

use pnet::datalink::{self, NetworkInterface};
use pnet::util::MacAddr;
use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};

/// Parse a hardware address written with either `:` or `-` separators.
pub fn parse_mac(raw: &str) -> Result<MacAddr> {
    raw.trim()
        .replace('-', ":")
        .parse::<MacAddr>()
        .map_err(|_| ReconError::InvalidAddress(raw.to_string()))
}

/// Canonical string form used as the registry key (lowercase, colon separated).
pub fn canonical_mac(raw: &str) -> String {
    match parse_mac(raw) {
        Ok(mac) => mac.to_string(),
        Err(_) => raw.trim().to_lowercase(),
    }
}

/// Descriptor of a local interface or gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub hw_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<IpAddr>,
}

impl Interface {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            hw_address: None,
            ip_address: None,
        }
    }

    /// Look up an interface by name, falling back to a bare descriptor.
    ///
    /// Monitor interfaces usually have no IP, so a missing address is not an error.
    pub fn find(name: &str) -> Self {
        datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == name)
            .map(|iface| Self::from(&iface))
            .unwrap_or_else(|| Self::new(name))
    }
}

impl From<&NetworkInterface> for Interface {
    fn from(iface: &NetworkInterface) -> Self {
        Self {
            name: iface.name.clone(),
            hw_address: iface.mac.map(|mac| mac.to_string()),
            ip_address: iface.ips.iter().map(|ip| ip.ip()).find(IpAddr::is_ipv4),
        }
    }
}
