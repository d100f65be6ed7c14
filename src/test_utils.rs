use pnet::util::MacAddr;

use crate::packet::mac_bytes;

/// Builder for creating synthetic 802.11 frames for testing
pub struct Dot11Builder;

fn header(
    frame_control: [u8; 2],
    addr1: MacAddr,
    addr2: MacAddr,
    addr3: MacAddr,
    seq: u16,
) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(64);
    buffer.extend_from_slice(&frame_control);
    buffer.extend_from_slice(&[0x00, 0x00]); // duration
    buffer.extend_from_slice(&mac_bytes(addr1));
    buffer.extend_from_slice(&mac_bytes(addr2));
    buffer.extend_from_slice(&mac_bytes(addr3));
    buffer.extend_from_slice(&(seq << 4).to_le_bytes());
    buffer
}

impl Dot11Builder {
    /// Beacon broadcast by `bssid` announcing `ssid`
    pub fn beacon(bssid: MacAddr, ssid: &str) -> Vec<u8> {
        Self::management_with_ssid([0x80, 0x00], MacAddr::broadcast(), bssid, ssid)
    }

    /// Probe response from `bssid` to `station`
    pub fn probe_response(bssid: MacAddr, station: MacAddr, ssid: &str) -> Vec<u8> {
        Self::management_with_ssid([0x50, 0x00], station, bssid, ssid)
    }

    fn management_with_ssid(
        frame_control: [u8; 2],
        dst: MacAddr,
        bssid: MacAddr,
        ssid: &str,
    ) -> Vec<u8> {
        let mut buffer = header(frame_control, dst, bssid, bssid, 1);

        // Fixed parameters: timestamp(8) + beacon interval(2) + capabilities(2)
        buffer.extend_from_slice(&[0u8; 8]);
        buffer.extend_from_slice(&100u16.to_le_bytes());
        buffer.extend_from_slice(&0x0411u16.to_le_bytes());

        // SSID element followed by supported rates
        buffer.push(0);
        buffer.push(ssid.len() as u8);
        buffer.extend_from_slice(ssid.as_bytes());
        buffer.extend_from_slice(&[0x01, 0x04, 0x82, 0x84, 0x8b, 0x96]);

        buffer
    }

    /// Data frame sent by `station` to the access point `bssid` (ToDS set)
    pub fn data_to_ap(bssid: MacAddr, station: MacAddr) -> Vec<u8> {
        let mut buffer = header([0x08, 0x01], bssid, station, MacAddr::broadcast(), 7);
        buffer.extend_from_slice(&[0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00, 0x08, 0x00]);
        buffer.extend_from_slice(b"data_payload");
        buffer
    }

    /// Data frame sent by the access point `bssid` to `station` (FromDS set)
    pub fn data_from_ap(bssid: MacAddr, station: MacAddr) -> Vec<u8> {
        let mut buffer = header([0x08, 0x02], station, bssid, bssid, 8);
        buffer.extend_from_slice(b"data_payload");
        buffer
    }

    /// WDS data frame carrying all four addresses
    pub fn wds(addr1: MacAddr, addr2: MacAddr, addr3: MacAddr, addr4: MacAddr) -> Vec<u8> {
        let mut buffer = header([0x08, 0x03], addr1, addr2, addr3, 9);
        buffer.extend_from_slice(&mac_bytes(addr4));
        buffer.extend_from_slice(b"wds_payload");
        buffer
    }

    /// Prepend a radiotap header carrying the channel frequency
    pub fn with_radiotap(frame: &[u8], frequency: u16) -> Vec<u8> {
        let mut buffer = vec![
            0x00, 0x00, // version, pad
            0x0c, 0x00, // header length (12)
            0x08, 0x00, 0x00, 0x00, // present: channel
        ];
        buffer.extend_from_slice(&frequency.to_le_bytes());
        buffer.extend_from_slice(&0x00a0u16.to_le_bytes()); // 2GHz + CCK
        buffer.extend_from_slice(frame);
        buffer
    }

    /// Prepend a radiotap header with no fields present
    pub fn with_bare_radiotap(frame: &[u8]) -> Vec<u8> {
        let mut buffer = vec![0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
        buffer.extend_from_slice(frame);
        buffer
    }
}

/// Generate a synthetic radiotap pcap file for testing
pub fn create_test_pcap(packets: Vec<Vec<u8>>) -> std::io::Result<tempfile::NamedTempFile> {
    use pcap_file::pcap::{PcapHeader, PcapPacket, PcapWriter};

    let temp_file = tempfile::NamedTempFile::new()?;
    let file = temp_file.reopen()?;

    let mut pcap_writer = PcapWriter::with_header(
        file,
        PcapHeader {
            datalink: pcap_file::DataLink::IEEE802_11_RADIOTAP,
            ..Default::default()
        },
    )
    .map_err(|e| std::io::Error::other(format!("Pcap write error: {}", e)))?;

    for (i, packet_data) in packets.iter().enumerate() {
        let packet = PcapPacket {
            timestamp: std::time::Duration::from_secs(1700000000 + i as u64),
            orig_len: packet_data.len() as u32,
            data: std::borrow::Cow::Borrowed(packet_data),
        };
        pcap_writer
            .write_packet(&packet)
            .map_err(|e| std::io::Error::other(format!("Packet write error: {}", e)))?;
    }

    Ok(temp_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beacon_creation() {
        let frame = Dot11Builder::beacon("aa:bb:cc:dd:ee:ff".parse().unwrap(), "lab-net");
        assert_eq!(frame[0], 0x80);
        assert_eq!(&frame[4..10], &[0xff; 6]);
    }

    #[test]
    fn test_radiotap_prefix() {
        let frame = Dot11Builder::with_radiotap(&[0x80, 0x00], 2437);
        assert_eq!(frame.len(), 14);
        assert_eq!(u16::from_le_bytes([frame[8], frame[9]]), 2437);
    }

    #[test]
    fn test_pcap_creation() {
        let bssid: MacAddr = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        let packets = vec![
            Dot11Builder::with_radiotap(&Dot11Builder::beacon(bssid, "lab-net"), 2412),
            Dot11Builder::with_radiotap(
                &Dot11Builder::data_to_ap(bssid, "00:11:22:33:44:55".parse().unwrap()),
                2412,
            ),
        ];

        let pcap_file = create_test_pcap(packets).unwrap();
        assert!(pcap_file.path().exists());
    }
}
