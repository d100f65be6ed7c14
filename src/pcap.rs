//! Capture device handling. Opens monitor-mode captures on a live interface or
//! replays a capture file, and exposes the write path used for injection.

use std::path::Path;

use pcap::{Active, Capture, Offline};

use crate::config::ReconConfig;
use crate::error::{ReconError, Result};

/// Write path for forged frames.
pub trait FrameInjector: Send {
    fn inject(&mut self, frame: &[u8]) -> Result<()>;
}

impl FrameInjector for Capture<Active> {
    fn inject(&mut self, frame: &[u8]) -> Result<()> {
        self.sendpacket(frame).map_err(ReconError::from)
    }
}

/// Source of frames for the capture loop.
pub enum CaptureHandle {
    Live(Capture<Active>),
    Replay(Capture<Offline>),
}

/// Open `interface` in monitor mode with the configured snap length and timeout.
///
/// Every step propagates its error; a handle dropped on the way out is closed.
pub fn open_monitor(interface: &str, config: &ReconConfig) -> Result<Capture<Active>> {
    let capture = Capture::from_device(interface)?
        .rfmon(true)
        .snaplen(config.snaplen)
        .timeout(config.read_timeout_ms)
        .open()?;

    tracing::info!(
        "Opened {} in monitor mode (snaplen {}, timeout {}ms)",
        interface,
        config.snaplen,
        config.read_timeout_ms
    );
    Ok(capture)
}

/// Open a radiotap capture file for replay.
pub fn open_replay(file_path: &Path) -> Result<Capture<Offline>> {
    let capture = Capture::from_file(file_path)?;
    tracing::info!("Replaying frames from {}", file_path.display());
    Ok(capture)
}

/// Open the frame source and, for live interfaces, a second handle for injection.
pub fn open(config: &ReconConfig) -> Result<(CaptureHandle, Option<Box<dyn FrameInjector>>)> {
    match &config.replay {
        Some(path) => Ok((CaptureHandle::Replay(open_replay(path)?), None)),
        None => {
            let reader = open_monitor(&config.interface, config)?;
            let writer = open_monitor(&config.interface, config)?;
            Ok((CaptureHandle::Live(reader), Some(Box::new(writer))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Dot11Builder, create_test_pcap};

    #[test]
    fn test_open_replay_reads_frames() {
        let bssid = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        let packets = vec![
            Dot11Builder::with_radiotap(&Dot11Builder::beacon(bssid, "lab-net"), 2412),
            Dot11Builder::with_radiotap(&Dot11Builder::beacon(bssid, "lab-net"), 2412),
        ];
        let pcap_file = create_test_pcap(packets).unwrap();

        let mut capture = open_replay(pcap_file.path()).unwrap();
        let mut count = 0;
        while capture.next_packet().is_ok() {
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_open_replay_missing_file() {
        let result = open_replay(Path::new("/nonexistent/capture.pcap"));
        assert!(matches!(result, Err(ReconError::Configuration(_))));
    }

    #[test]
    fn test_open_unknown_interface_fails() {
        let config = ReconConfig {
            interface: "definitely-not-an-interface0".to_string(),
            ..Default::default()
        };
        assert!(open(&config).is_err());
    }
}
