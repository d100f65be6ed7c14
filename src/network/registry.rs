//! Live endpoint table shared by the LAN host list and the 802.11 station list.
//!
//! The table itself is generic; an [`EndpointKind`] decides how a sighting is
//! keyed, how it refreshes an existing entry and what `has` matches against.

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use pnet::util::MacAddr;
use serde::{Deserialize, Serialize};

use super::alias::AliasStore;
use super::endpoint::{Endpoint, Sighting};
use super::{Interface, canonical_mac};
use crate::error::Result;

pub type EndpointCallback = Arc<dyn Fn(&Endpoint) + Send + Sync>;

/// Policy hooks that distinguish one registry flavour from another.
pub trait EndpointKind: Send + Sync + 'static {
    const NAME: &'static str;

    /// Unique key a sighting is stored under.
    fn key(sighting: &Sighting) -> String {
        sighting.hw_address.to_string()
    }

    /// Initialise a freshly created endpoint from its first sighting.
    fn create(endpoint: &mut Endpoint, sighting: &Sighting);

    /// Fold a later sighting into an existing endpoint.
    fn refresh(endpoint: &mut Endpoint, sighting: &Sighting);

    /// Whether `needle` (already canonicalised) identifies `endpoint`.
    fn matches(endpoint: &Endpoint, needle: &str) -> bool {
        endpoint.hw_address == needle
    }
}

/// Ethernet/IP hosts on the local network.
pub struct Lan;

impl EndpointKind for Lan {
    const NAME: &'static str = "lan";

    fn create(endpoint: &mut Endpoint, sighting: &Sighting) {
        endpoint.ip_address = sighting.ip_address;
        endpoint.name = sighting.name.clone();
    }

    fn refresh(endpoint: &mut Endpoint, sighting: &Sighting) {
        if sighting.ip_address.is_some() {
            endpoint.ip_address = sighting.ip_address;
        }
        if sighting.name.is_some() {
            endpoint.name = sighting.name.clone();
        }
    }

    fn matches(endpoint: &Endpoint, needle: &str) -> bool {
        endpoint.hw_address == needle
            || endpoint
                .ip_address
                .is_some_and(|ip| ip.to_string() == needle)
    }
}

/// 802.11 access points and stations.
pub struct WiFi;

impl EndpointKind for WiFi {
    const NAME: &'static str = "wifi";

    fn create(endpoint: &mut Endpoint, sighting: &Sighting) {
        endpoint.name = sighting.name.clone();
        endpoint.channel = Some(sighting.channel.unwrap_or(0));
    }

    fn refresh(endpoint: &mut Endpoint, sighting: &Sighting) {
        if let Some(channel) = sighting.channel
            && channel != 0
        {
            endpoint.channel = Some(channel);
        }
        // Data frames carry no SSID, so the first beacon to name a station wins.
        if endpoint.name.is_none() && sighting.name.is_some() {
            endpoint.name = sighting.name.clone();
        }
    }
}

/// Serialized form of a registry, used for status reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub interface: Interface,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<Interface>,
    pub endpoints: Vec<Endpoint>,
    pub aliases: BTreeMap<String, String>,
}

pub struct Registry<K: EndpointKind> {
    iface: Interface,
    gateway: Option<Interface>,
    endpoints: Mutex<HashMap<String, Endpoint>>,
    aliases: AliasStore,
    missed_after: Duration,
    on_new: EndpointCallback,
    on_lost: EndpointCallback,
    _kind: PhantomData<K>,
}

impl<K: EndpointKind> Registry<K> {
    fn with_parts(
        iface: Interface,
        gateway: Option<Interface>,
        aliases: AliasStore,
        on_new: EndpointCallback,
        on_lost: EndpointCallback,
    ) -> Self {
        Self {
            iface,
            gateway,
            endpoints: Mutex::new(HashMap::new()),
            aliases,
            missed_after: crate::config::Liveness::default().missed_after,
            on_new,
            on_lost,
            _kind: PhantomData,
        }
    }

    /// Override how long an endpoint may go unseen before it counts as missed.
    pub fn with_missed_after(mut self, missed_after: Duration) -> Self {
        self.missed_after = missed_after;
        self
    }

    pub fn interface(&self) -> &Interface {
        &self.iface
    }

    /// Create the endpoint for an unseen key, or refresh the existing one.
    ///
    /// `on_new` runs after the table lock is released, exactly once per creation.
    pub fn observe(&self, sighting: &Sighting) -> Endpoint {
        let key = K::key(sighting);
        let now = Utc::now();

        let (endpoint, created) = {
            let mut endpoints = self.endpoints.lock();
            match endpoints.get_mut(&key) {
                Some(existing) => {
                    existing.last_seen = now;
                    existing.missed = false;
                    K::refresh(existing, sighting);
                    (existing.clone(), false)
                }
                None => {
                    let mut endpoint = Endpoint::new(key.clone(), now);
                    K::create(&mut endpoint, sighting);
                    endpoints.insert(key, endpoint.clone());
                    (endpoint, true)
                }
            }
        };

        if created {
            tracing::debug!("New {} endpoint {}", K::NAME, endpoint.hw_address);
            (self.on_new)(&endpoint);
        }
        endpoint
    }

    pub fn get(&self, hw_address: &str) -> Option<Endpoint> {
        self.endpoints.lock().get(&canonical_mac(hw_address)).cloned()
    }

    /// Point-in-time copy of every endpoint, in no particular order.
    pub fn list(&self) -> Vec<Endpoint> {
        self.endpoints.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.endpoints.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.lock().is_empty()
    }

    pub fn has(&self, ip_or_hw: &str) -> bool {
        let needle = canonical_mac(ip_or_hw);
        self.endpoints
            .lock()
            .values()
            .any(|endpoint| K::matches(endpoint, &needle))
    }

    pub fn set_alias_for(&self, hw_address: &str, label: &str) -> bool {
        let key = canonical_mac(hw_address);
        if !self.endpoints.lock().contains_key(&key) {
            return false;
        }
        self.aliases.set(&key, label)
    }

    pub fn aliases(&self) -> &AliasStore {
        &self.aliases
    }

    /// Whether `hw_address` has gone unseen for longer than the missed threshold.
    ///
    /// The first query that observes the transition fires `on_lost`; a fresh
    /// observation re-arms it.
    pub fn was_missed(&self, hw_address: &str) -> bool {
        let now = Utc::now();
        let lost = {
            let mut endpoints = self.endpoints.lock();
            let Some(endpoint) = endpoints.get_mut(&canonical_mac(hw_address)) else {
                return false;
            };
            if endpoint.since_last_seen(now) <= self.missed_after {
                return false;
            }
            if endpoint.missed {
                return true;
            }
            endpoint.missed = true;
            endpoint.clone()
        };

        tracing::debug!("Lost {} endpoint {}", K::NAME, lost.hw_address);
        (self.on_lost)(&lost);
        true
    }

    /// Delete an endpoint without firing `on_lost`.
    pub fn remove(&self, hw_address: &str) -> Option<Endpoint> {
        self.endpoints.lock().remove(&canonical_mac(hw_address))
    }

    /// Drop every endpoint. Aliases are left untouched.
    pub fn clear(&self) {
        self.endpoints.lock().clear();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            interface: self.iface.clone(),
            gateway: self.gateway.clone(),
            endpoints: self.list(),
            aliases: self.aliases.snapshot(),
        }
    }

    pub fn marshal_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.snapshot())?)
    }
}

impl Registry<Lan> {
    pub fn new(
        iface: Interface,
        gateway: Interface,
        aliases: AliasStore,
        on_new: EndpointCallback,
        on_lost: EndpointCallback,
    ) -> Self {
        Self::with_parts(iface, Some(gateway), aliases, on_new, on_lost)
    }

    pub fn gateway(&self) -> Option<&Interface> {
        self.gateway.as_ref()
    }

    pub fn add_if_new(&self, ip: IpAddr, hw_address: MacAddr, hostname: Option<&str>) -> Endpoint {
        let mut sighting = Sighting::new(hw_address).with_ip(ip);
        if let Some(hostname) = hostname {
            sighting = sighting.with_name(hostname);
        }
        self.observe(&sighting)
    }
}

impl Registry<WiFi> {
    pub fn new(
        iface: Interface,
        aliases: AliasStore,
        on_new: EndpointCallback,
        on_lost: EndpointCallback,
    ) -> Self {
        Self::with_parts(iface, None, aliases, on_new, on_lost)
    }

    pub fn add_if_new(
        &self,
        name: &str,
        hw_address: MacAddr,
        has_name: bool,
        channel: u8,
    ) -> Endpoint {
        let mut sighting = Sighting::new(hw_address).with_channel(channel);
        if has_name {
            sighting = sighting.with_name(name);
        }
        self.observe(&sighting)
    }
}
