//! Runtime configuration. Defaults come from constants, environment variables
//! override them, and CLI flags override both (see `main.rs`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SNAPLEN: i32 = 65536;
/// A zero timeout makes libpcap block until a frame arrives.
pub const BLOCK_FOREVER: i32 = 0;
pub const DEFAULT_DEAUTH_DELAY_MS: u64 = 2;

/// Time windows used to classify endpoint liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liveness {
    /// Endpoints first seen within this window are highlighted as new.
    pub just_joined: Duration,
    /// Endpoints seen within this window are highlighted as active.
    pub alive: Duration,
    /// Endpoints not seen within this window are dimmed.
    pub present: Duration,
    /// Elapsed time since last observation after which an endpoint counts as missed.
    pub missed_after: Duration,
}

impl Default for Liveness {
    fn default() -> Self {
        Self {
            just_joined: Duration::from_secs(10),
            alive: Duration::from_secs(10),
            present: Duration::from_secs(60),
            missed_after: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconConfig {
    pub interface: String,
    /// When set, frames are replayed from this capture file instead of the interface.
    pub replay: Option<PathBuf>,
    pub snaplen: i32,
    pub read_timeout_ms: i32,
    pub deauth_delay: Duration,
    pub liveness: Liveness,
    pub alias_file: Option<PathBuf>,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            interface: "wlan0".to_string(),
            replay: None,
            snaplen: DEFAULT_SNAPLEN,
            read_timeout_ms: BLOCK_FOREVER,
            deauth_delay: Duration::from_millis(DEFAULT_DEAUTH_DELAY_MS),
            liveness: Liveness::default(),
            alias_file: None,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.parse::<T>().ok())
}

impl ReconConfig {
    /// Build a configuration from defaults overridden by `RECON_*` variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(interface) = env::var("RECON_INTERFACE") {
            config.interface = interface;
        }
        if let Some(snaplen) = env_parse::<i32>("RECON_SNAPLEN") {
            config.snaplen = snaplen;
        }
        if let Some(delay) = env_parse::<u64>("RECON_DEAUTH_DELAY_MS") {
            config.deauth_delay = Duration::from_millis(delay);
        }
        if let Some(secs) = env_parse::<u64>("RECON_MISSED_AFTER_SECS") {
            config.liveness.missed_after = Duration::from_secs(secs);
        }
        if let Ok(path) = env::var("RECON_ALIAS_FILE") {
            config.alias_file = Some(PathBuf::from(path));
        }

        config
    }
}
