//! Station table rendering for `wifi.show`.

use chrono::{DateTime, Utc};
use colored::Colorize;
use tabled::{Table, Tabled};

use crate::config::Liveness;
use crate::network::alias::AliasStore;
use crate::network::endpoint::Endpoint;
use crate::network::sorting::SortBy;
use crate::network::stats::{TrafficStats, format_bytes};

/// Visual weight given to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    Bold,
    Dim,
}

impl Emphasis {
    fn apply(self, text: &str) -> String {
        match self {
            Emphasis::Normal => text.to_string(),
            Emphasis::Bold => text.bold().to_string(),
            Emphasis::Dim => text.dimmed().to_string(),
        }
    }
}

/// Highlight the address of stations that joined recently, once the session
/// is old enough for "recent" to mean something.
pub fn address_emphasis(
    endpoint: &Endpoint,
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
    liveness: &Liveness,
) -> Emphasis {
    let since_started = (now - started_at).to_std().unwrap_or_default();
    if since_started > liveness.just_joined * 2
        && endpoint.since_first_seen(now) <= liveness.just_joined
    {
        Emphasis::Bold
    } else {
        Emphasis::Normal
    }
}

/// Bold for recently active stations, dim for stale ones.
pub fn seen_emphasis(
    endpoint: &Endpoint,
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
    liveness: &Liveness,
) -> Emphasis {
    let since_started = (now - started_at).to_std().unwrap_or_default();
    let since_last_seen = endpoint.since_last_seen(now);
    if since_started > liveness.alive && since_last_seen <= liveness.alive {
        Emphasis::Bold
    } else if since_last_seen > liveness.present {
        Emphasis::Dim
    } else {
        Emphasis::Normal
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct StationRow {
    #[tabled(rename = "BSSID")]
    pub bssid: String,
    #[tabled(rename = "SSID")]
    pub ssid: String,
    #[tabled(rename = "Alias")]
    pub alias: String,
    #[tabled(rename = "Channel")]
    pub channel: String,
    #[tabled(rename = "Traffic")]
    pub traffic: String,
    #[tabled(rename = "Last Seen")]
    pub last_seen: String,
}

pub struct ShowContext<'a> {
    pub stats: &'a TrafficStats,
    pub aliases: &'a AliasStore,
    pub liveness: &'a Liveness,
    pub started_at: DateTime<Utc>,
}

impl ShowContext<'_> {
    pub fn row(&self, endpoint: &Endpoint, now: DateTime<Utc>) -> StationRow {
        let bytes = endpoint
            .hw()
            .map(|hw| self.stats.bytes_for(hw))
            .unwrap_or(0);
        let traffic = if bytes > 0 { format_bytes(bytes) } else { String::new() };
        let seen = endpoint
            .last_seen
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
            .to_string();

        StationRow {
            bssid: address_emphasis(endpoint, self.started_at, now, self.liveness)
                .apply(&endpoint.hw_address),
            ssid: endpoint.display_name().to_string(),
            alias: self.aliases.get(&endpoint.hw_address),
            channel: endpoint.channel.unwrap_or(0).to_string(),
            traffic,
            last_seen: seen_emphasis(endpoint, self.started_at, now, self.liveness).apply(&seen),
        }
    }

    pub fn rows(&self, mut endpoints: Vec<Endpoint>, by: SortBy) -> Vec<StationRow> {
        by.sort(&mut endpoints);
        let now = Utc::now();
        endpoints.iter().map(|endpoint| self.row(endpoint, now)).collect()
    }

    pub fn render(&self, endpoints: Vec<Endpoint>, by: SortBy) -> String {
        Table::new(self.rows(endpoints, by)).to_string()
    }
}
