use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use pnet::util::MacAddr;

/// Cumulative byte counters per hardware address.
///
/// Counts are not split by direction: a frame is credited to every address it
/// carries, so the same bytes may be counted for receiver, transmitter and BSSID.
#[derive(Debug, Clone, Default)]
pub struct TrafficStats {
    counters: Arc<Mutex<HashMap<MacAddr, u64>>>,
}

impl TrafficStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `bytes` to the total for `hw_address`. Absent or zero addresses are ignored.
    pub fn collect(&self, hw_address: Option<MacAddr>, bytes: u64) {
        let Some(mac) = hw_address else {
            return;
        };
        if mac == MacAddr::zero() {
            return;
        }
        let mut counters = self.counters.lock();
        let total = counters.entry(mac).or_insert(0);
        *total = total.saturating_add(bytes);
    }

    /// Total bytes seen for `hw_address`, zero when never seen.
    pub fn bytes_for(&self, hw_address: MacAddr) -> u64 {
        self.counters.lock().get(&hw_address).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counters.lock().len()
    }
}

/// Render a byte count the way the show table expects ("1.2 kB", "532 B").
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "kB", "MB", "GB", "TB", "PB"];

    if bytes < 1000 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn mac(s: &str) -> MacAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_unseen_address_is_zero() {
        let stats = TrafficStats::new();
        assert_eq!(stats.bytes_for(mac("aa:bb:cc:dd:ee:ff")), 0);
    }

    #[test]
    fn test_collect_accumulates() {
        let stats = TrafficStats::new();
        let addr = mac("aa:bb:cc:dd:ee:ff");
        stats.collect(Some(addr), 100);
        stats.collect(Some(addr), 50);

        assert_eq!(stats.bytes_for(addr), 150);
    }

    #[test]
    fn test_absent_and_zero_addresses_are_noops() {
        let stats = TrafficStats::new();
        stats.collect(None, 100);
        stats.collect(Some(MacAddr::zero()), 100);

        assert_eq!(stats.len(), 0);
    }

    #[test]
    fn test_concurrent_writers() {
        let stats = TrafficStats::new();
        let addr = mac("00:11:22:33:44:55");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = stats.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        stats.collect(Some(addr), 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(stats.bytes_for(addr), 4000);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(999), "999 B");
        assert_eq!(format_bytes(1500), "1.5 kB");
        assert_eq!(format_bytes(2_000_000), "2.0 MB");
    }
}
