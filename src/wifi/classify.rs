//! Frame classification: access point discovery, client discovery and
//! per-address traffic accounting.

use pnet::util::MacAddr;

use crate::network::endpoint::Endpoint;
use crate::network::registry::{Registry, WiFi};
use crate::network::stats::TrafficStats;
use crate::packet::CapturedFrame;
use crate::packet::dot11::{ELEMENT_ID_SSID, FrameType};

const BAND_2GHZ_FIRST: u16 = 2412;
const BAND_2GHZ_LAST: u16 = 2484;

/// Channel number for a frequency in MHz.
///
/// Only the 2.4 GHz band is mapped; anything above it yields 0 (unknown). The
/// 2484 MHz Japanese channel maps to 15 rather than 14.
pub fn channel_for_frequency(frequency: u16) -> u8 {
    if !(BAND_2GHZ_FIRST..=BAND_2GHZ_LAST).contains(&frequency) {
        return 0;
    }
    ((frequency - BAND_2GHZ_FIRST) / 5 + 1) as u8
}

/// Register the sender of a broadcast beacon or probe response carrying an SSID.
pub fn discover_access_point(frame: &CapturedFrame<'_>, wifi: &Registry<WiFi>) -> Option<Endpoint> {
    let radio = frame.radio()?;
    let element = frame.information_element()?;
    if element.id != ELEMENT_ID_SSID {
        return None;
    }
    let dot11 = frame.dot11()?;

    if dot11.get_address1() != MacAddr::broadcast() || element.info.is_empty() {
        return None;
    }
    let bssid = dot11.get_address3()?;
    let ssid = String::from_utf8_lossy(element.info);
    let channel = channel_for_frequency(radio.frequency);

    Some(wifi.add_if_new(&ssid, bssid, true, channel))
}

/// Register the station behind a data frame sent to the access point `bss`.
pub fn discover_client(
    bss: MacAddr,
    frame: &CapturedFrame<'_>,
    wifi: &Registry<WiFi>,
) -> Option<Endpoint> {
    let radio = frame.radio()?;
    let dot11 = frame.dot11()?;
    if dot11.get_type() != FrameType::Data {
        return None;
    }
    if !dot11.to_ds() || dot11.from_ds() {
        return None;
    }
    if dot11.get_address1() != bss {
        return None;
    }
    let station = dot11.get_address2()?;
    let channel = channel_for_frequency(radio.frequency);

    Some(wifi.add_if_new("", station, false, channel))
}

/// Credit the whole captured length to every address the frame carries.
pub fn update_stats(frame: &CapturedFrame<'_>, stats: &TrafficStats) {
    let Some(dot11) = frame.dot11() else {
        return;
    };
    let bytes = frame.len() as u64;

    stats.collect(Some(dot11.get_address1()), bytes);
    stats.collect(dot11.get_address2(), bytes);
    stats.collect(dot11.get_address3(), bytes);
    stats.collect(dot11.get_address4(), bytes);
}
