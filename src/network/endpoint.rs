use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pnet::util::MacAddr;
use serde::{Deserialize, Serialize};

/// A discovered Ethernet host or 802.11 station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub hw_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<IpAddr>,
    pub name: Option<String>,
    /// 802.11 channel, zero when unknown. Absent for LAN hosts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<u8>,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Set once `on_lost` has fired for the current absence.
    #[serde(skip)]
    pub(crate) missed: bool,
}

impl Endpoint {
    pub(crate) fn new(hw_address: String, now: DateTime<Utc>) -> Self {
        Self {
            hw_address,
            ip_address: None,
            name: None,
            channel: None,
            first_seen: now,
            last_seen: now,
            missed: false,
        }
    }

    pub fn hw(&self) -> Option<MacAddr> {
        self.hw_address.parse().ok()
    }

    /// ESSID for access points, hostname for LAN hosts, empty when unknown.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn since_first_seen(&self, now: DateTime<Utc>) -> Duration {
        (now - self.first_seen).to_std().unwrap_or_default()
    }

    pub fn since_last_seen(&self, now: DateTime<Utc>) -> Duration {
        (now - self.last_seen).to_std().unwrap_or_default()
    }
}

/// One observation of an endpoint, as reported by capture or a LAN collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sighting {
    pub hw_address: MacAddr,
    pub ip_address: Option<IpAddr>,
    pub name: Option<String>,
    pub channel: Option<u8>,
}

impl Sighting {
    pub fn new(hw_address: MacAddr) -> Self {
        Self {
            hw_address,
            ip_address: None,
            name: None,
            channel: None,
        }
    }

    pub fn with_ip(mut self, ip: IpAddr) -> Self {
        self.ip_address = Some(ip);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = Some(channel);
        self
    }
}
