//! Borrowed view over an IEEE 802.11 MAC header.
//!
//! Layout reference (all multi-byte fields little endian):
//!   0..2 frame control, 2..4 duration, 4..10 addr1, 10..16 addr2,
//!   16..22 addr3, 22..24 sequence control, 24..30 addr4 (WDS data only)

use pnet::util::MacAddr;

pub const ELEMENT_ID_SSID: u8 = 0;

const FLAG_TO_DS: u8 = 0x01;
const FLAG_FROM_DS: u8 = 0x02;
const FLAG_ORDER: u8 = 0x80;

/// Fixed parameters (timestamp, interval, capabilities) ahead of the elements.
const BEACON_FIXED_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Management,
    Control,
    Data,
    Extension,
}

impl From<u8> for FrameType {
    fn from(bits: u8) -> Self {
        match bits & 0x03 {
            0 => FrameType::Management,
            1 => FrameType::Control,
            2 => FrameType::Data,
            _ => FrameType::Extension,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ManagementSubtype {
    ProbeResponse = 5,
    Beacon = 8,
    Disassociation = 10,
    Deauthentication = 12,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InformationElement<'a> {
    pub id: u8,
    pub info: &'a [u8],
}

#[derive(Debug, Clone, Copy)]
pub struct Dot11Header<'a> {
    data: &'a [u8],
}

fn mac_at(data: &[u8], offset: usize) -> Option<MacAddr> {
    let b = data.get(offset..offset + 6)?;
    Some(MacAddr::new(b[0], b[1], b[2], b[3], b[4], b[5]))
}

impl<'a> Dot11Header<'a> {
    /// Frame control, duration and the receiver address are mandatory.
    pub const MIN_LEN: usize = 10;

    pub fn new(data: &'a [u8]) -> Option<Self> {
        if data.len() < Self::MIN_LEN {
            return None;
        }
        Some(Self { data })
    }

    pub fn get_frame_control(&self) -> u16 {
        u16::from_le_bytes([self.data[0], self.data[1]])
    }

    pub fn get_type(&self) -> FrameType {
        FrameType::from(self.data[0] >> 2)
    }

    pub fn get_subtype(&self) -> u8 {
        self.data[0] >> 4
    }

    pub fn is_management(&self, subtype: ManagementSubtype) -> bool {
        self.get_type() == FrameType::Management && self.get_subtype() == subtype as u8
    }

    fn flags(&self) -> u8 {
        self.data[1]
    }

    pub fn to_ds(&self) -> bool {
        self.flags() & FLAG_TO_DS != 0
    }

    pub fn from_ds(&self) -> bool {
        self.flags() & FLAG_FROM_DS != 0
    }

    /// Receiver / destination.
    pub fn get_address1(&self) -> MacAddr {
        mac_at(self.data, 4).unwrap_or_else(MacAddr::zero)
    }

    /// Transmitter / source. Absent on ACK and CTS frames.
    pub fn get_address2(&self) -> Option<MacAddr> {
        mac_at(self.data, 10)
    }

    /// BSSID for management frames, varies with the DS bits for data frames.
    pub fn get_address3(&self) -> Option<MacAddr> {
        if self.get_type() == FrameType::Control {
            return None;
        }
        mac_at(self.data, 16)
    }

    /// Only present on data frames travelling between distribution systems.
    pub fn get_address4(&self) -> Option<MacAddr> {
        if self.get_type() == FrameType::Data && self.to_ds() && self.from_ds() {
            mac_at(self.data, 24)
        } else {
            None
        }
    }

    pub fn get_sequence_number(&self) -> Option<u16> {
        if self.get_type() == FrameType::Control {
            return None;
        }
        let raw = self.data.get(22..24)?;
        Some(u16::from_le_bytes([raw[0], raw[1]]) >> 4)
    }

    fn header_len(&self) -> usize {
        match self.get_type() {
            FrameType::Management => {
                if self.flags() & FLAG_ORDER != 0 {
                    28
                } else {
                    24
                }
            }
            FrameType::Data => {
                let mut len = 24;
                if self.to_ds() && self.from_ds() {
                    len += 6;
                }
                // QoS subtypes carry a two byte QoS control field.
                if self.get_subtype() & 0x08 != 0 {
                    len += 2;
                    if self.flags() & FLAG_ORDER != 0 {
                        len += 4;
                    }
                }
                len
            }
            FrameType::Control | FrameType::Extension => self.data.len(),
        }
    }

    /// Frame body following the MAC header.
    pub fn payload(&self) -> &'a [u8] {
        self.data.get(self.header_len()..).unwrap_or(&[])
    }

    /// First tagged element of a beacon or probe response body.
    pub fn first_element(&self) -> Option<InformationElement<'a>> {
        if !self.is_management(ManagementSubtype::Beacon)
            && !self.is_management(ManagementSubtype::ProbeResponse)
        {
            return None;
        }
        let elements = self.payload().get(BEACON_FIXED_LEN..)?;
        let id = *elements.first()?;
        let len = *elements.get(1)? as usize;
        let info = elements.get(2..2 + len)?;
        Some(InformationElement { id, info })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Dot11Builder;

    fn mac(s: &str) -> MacAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_too_short_is_rejected() {
        assert!(Dot11Header::new(&[0x80, 0x00, 0x00]).is_none());
    }

    #[test]
    fn test_beacon_fields() {
        let frame = Dot11Builder::beacon(mac("aa:bb:cc:dd:ee:ff"), "lab-net");
        let header = Dot11Header::new(&frame).unwrap();

        assert_eq!(header.get_type(), FrameType::Management);
        assert!(header.is_management(ManagementSubtype::Beacon));
        assert_eq!(header.get_address1(), MacAddr::broadcast());
        assert_eq!(header.get_address2(), Some(mac("aa:bb:cc:dd:ee:ff")));
        assert_eq!(header.get_address3(), Some(mac("aa:bb:cc:dd:ee:ff")));
        assert_eq!(header.get_address4(), None);

        let element = header.first_element().unwrap();
        assert_eq!(element.id, ELEMENT_ID_SSID);
        assert_eq!(element.info, b"lab-net");
    }

    #[test]
    fn test_data_to_ds_flags() {
        let frame = Dot11Builder::data_to_ap(mac("11:11:11:11:11:11"), mac("22:22:22:22:22:22"));
        let header = Dot11Header::new(&frame).unwrap();

        assert_eq!(header.get_type(), FrameType::Data);
        assert!(header.to_ds());
        assert!(!header.from_ds());
        assert_eq!(header.get_address1(), mac("11:11:11:11:11:11"));
        assert_eq!(header.get_address2(), Some(mac("22:22:22:22:22:22")));
        assert!(header.first_element().is_none());
    }

    #[test]
    fn test_wds_frame_has_fourth_address() {
        let frame = Dot11Builder::wds(
            mac("01:00:00:00:00:01"),
            mac("02:00:00:00:00:02"),
            mac("03:00:00:00:00:03"),
            mac("04:00:00:00:00:04"),
        );
        let header = Dot11Header::new(&frame).unwrap();

        assert_eq!(header.get_address4(), Some(mac("04:00:00:00:00:04")));
    }

    #[test]
    fn test_ack_has_only_receiver() {
        let frame = [0xd4, 0x00, 0x00, 0x00, 1, 2, 3, 4, 5, 6];
        let header = Dot11Header::new(&frame).unwrap();

        assert_eq!(header.get_type(), FrameType::Control);
        assert_eq!(header.get_address2(), None);
        assert_eq!(header.get_address3(), None);
        assert_eq!(header.get_sequence_number(), None);
    }

    #[test]
    fn test_truncated_element_is_ignored() {
        let mut frame = Dot11Builder::beacon(mac("aa:bb:cc:dd:ee:ff"), "lab-net");
        // MAC header, fixed fields, then the SSID id, length and two of its seven bytes.
        frame.truncate(24 + BEACON_FIXED_LEN + 4);
        let header = Dot11Header::new(&frame).unwrap();

        assert!(header.first_element().is_none());
    }
}
