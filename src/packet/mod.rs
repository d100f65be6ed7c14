pub mod dot11;
pub mod forge;

use pnet::util::MacAddr;
use radiotap::Radiotap;

use crate::packet::dot11::{Dot11Header, InformationElement};

const FCS_LEN: usize = 4;

pub fn mac_bytes(mac: MacAddr) -> [u8; 6] {
    [mac.0, mac.1, mac.2, mac.3, mac.4, mac.5]
}

/// Radio metadata taken from the radiotap header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadioInfo {
    /// Channel frequency in MHz, zero when the header carries no channel field.
    pub frequency: u16,
    pub fcs: bool,
}

/// A captured radiotap frame split into the layers the classifiers look at.
///
/// Any layer that fails to decode is simply absent.
#[derive(Debug, Clone, Copy)]
pub struct CapturedFrame<'a> {
    data: &'a [u8],
    radio: Option<RadioInfo>,
    dot11: Option<Dot11Header<'a>>,
}

impl<'a> CapturedFrame<'a> {
    pub fn decode(data: &'a [u8]) -> Self {
        let radiotap = match Radiotap::from_bytes(data) {
            Ok(radiotap) => radiotap,
            Err(e) => {
                tracing::trace!("Skipping frame without radiotap header: {:?}", e);
                return Self {
                    data,
                    radio: None,
                    dot11: None,
                };
            }
        };

        let radio = RadioInfo {
            frequency: radiotap.channel.map(|channel| channel.freq).unwrap_or(0),
            fcs: radiotap.flags.is_some_and(|flags| flags.fcs),
        };

        let mut payload = data.get(radiotap.header.length..).unwrap_or(&[]);
        if radio.fcs && payload.len() >= FCS_LEN {
            payload = &payload[..payload.len() - FCS_LEN];
        }

        Self {
            data,
            radio: Some(radio),
            dot11: Dot11Header::new(payload),
        }
    }

    /// Total captured length, radiotap header included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn radio(&self) -> Option<RadioInfo> {
        self.radio
    }

    pub fn dot11(&self) -> Option<Dot11Header<'a>> {
        self.dot11
    }

    pub fn information_element(&self) -> Option<InformationElement<'a>> {
        self.dot11?.first_element()
    }
}
