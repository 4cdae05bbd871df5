//! # M-Bus Frames
//!
//! The three telegram shapes on the wire:
//!
//! ```text
//! ACK      E5
//! SHORT    10 C A CS 16
//! CONTROL  68 03 03 68 C A CI CS 16
//! LONG     68 L L 68 C A CI <data> CS 16
//! ```
//!
//! An [`MBusFrame`] owns the raw octets and a kind tag. Construction only looks
//! at the start octet; [`MBusFrame::verify`] checks markers and lengths. Every
//! accessor is bounds-checked and reports a short buffer as an error instead of
//! panicking.
//!
//! The checksum is exposed through [`MBusFrame::checksum`] and
//! [`MBusFrame::checksum_matches`] but is not enforced by `verify()`.

use crate::constants::{
    MBUS_FRAME_ACK, MBUS_FRAME_CONTROL_LENGTH_FIELD, MBUS_FRAME_LONG_MIN_LENGTH,
    MBUS_FRAME_LONG_OVERHEAD, MBUS_FRAME_LONG_START, MBUS_FRAME_SHORT_LENGTH,
    MBUS_FRAME_SHORT_START, MBUS_FRAME_STOP, MBUS_OFFSET_A_FIELD_LONG, MBUS_OFFSET_A_FIELD_SHORT,
    MBUS_OFFSET_CI_FIELD, MBUS_OFFSET_C_FIELD_LONG, MBUS_OFFSET_C_FIELD_SHORT,
};
use crate::error::MBusError;
use crate::mbus::address::AField;
use crate::mbus::control::{CField, CIField};

/// Represents the different types of M-Bus frames.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MBusFrameType {
    Ack,
    Short,
    Control,
    Long,
}

impl MBusFrameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MBusFrameType::Ack => "ack",
            MBusFrameType::Short => "short",
            MBusFrameType::Control => "control",
            MBusFrameType::Long => "long",
        }
    }
}

/// Represents an M-Bus frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MBusFrame {
    frame_type: MBusFrameType,
    data: Vec<u8>,
}

impl MBusFrame {
    /// Tags a buffer by its start octet. No other validation happens here.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, MBusError> {
        let frame_type = match data.first() {
            None => return Err(MBusError::Truncated { offset: 0, len: 0 }),
            Some(&MBUS_FRAME_ACK) => MBusFrameType::Ack,
            Some(&MBUS_FRAME_SHORT_START) => MBusFrameType::Short,
            Some(&MBUS_FRAME_LONG_START) => match data.get(1) {
                Some(&MBUS_FRAME_CONTROL_LENGTH_FIELD) => MBusFrameType::Control,
                Some(_) => MBusFrameType::Long,
                None => {
                    return Err(MBusError::Truncated {
                        offset: 1,
                        len: data.len(),
                    })
                }
            },
            Some(&other) => return Err(MBusError::UnknownFrameStart(other)),
        };
        Ok(MBusFrame { frame_type, data })
    }

    pub fn frame_type(&self) -> MBusFrameType {
        self.frame_type
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checks start markers, stop marker and declared length.
    pub fn verify(&self) -> Result<(), MBusError> {
        let len = self.data.len();
        match self.frame_type {
            MBusFrameType::Ack => self.expect_octet(0, MBUS_FRAME_ACK),
            MBusFrameType::Short => {
                if len < MBUS_FRAME_SHORT_LENGTH {
                    return Err(MBusError::Truncated { offset: len, len });
                }
                self.expect_octet(0, MBUS_FRAME_SHORT_START)?;
                self.expect_stop(MBUS_FRAME_SHORT_LENGTH - 1)
            }
            MBusFrameType::Control | MBusFrameType::Long => {
                if len < MBUS_FRAME_LONG_MIN_LENGTH {
                    return Err(MBusError::Truncated { offset: len, len });
                }
                self.expect_octet(0, MBUS_FRAME_LONG_START)?;
                let (first, second) = (self.data[1], self.data[2]);
                if first != second {
                    return Err(MBusError::LengthFieldMismatch { first, second });
                }
                self.expect_octet(3, MBUS_FRAME_LONG_START)?;
                let declared = first as usize + MBUS_FRAME_LONG_OVERHEAD;
                if len < declared {
                    return Err(MBusError::Truncated {
                        offset: declared - 1,
                        len,
                    });
                }
                // Trailing octets beyond the declared length are tolerated;
                // the stop octet is always the last one in the buffer.
                self.expect_stop(len - 1)
            }
        }
    }

    /// `verify()` collapsed to a flag.
    pub fn is_valid(&self) -> bool {
        self.verify().is_ok()
    }

    fn expect_octet(&self, offset: usize, expected: u8) -> Result<(), MBusError> {
        let found = self.octet(offset)?;
        if found != expected {
            return Err(MBusError::InvalidStartByte {
                offset,
                expected,
                found,
            });
        }
        Ok(())
    }

    fn expect_stop(&self, offset: usize) -> Result<(), MBusError> {
        let found = self.octet(offset)?;
        if found != MBUS_FRAME_STOP {
            return Err(MBusError::InvalidStopByte { found });
        }
        Ok(())
    }

    /// Bounds-checked octet access.
    pub fn octet(&self, offset: usize) -> Result<u8, MBusError> {
        self.data.get(offset).copied().ok_or(MBusError::Truncated {
            offset,
            len: self.data.len(),
        })
    }

    fn field_offset(&self, short: usize, long: usize) -> Result<usize, MBusError> {
        match self.frame_type {
            MBusFrameType::Ack => Err(MBusError::UnexpectedFrameType {
                expected: "short, control or long",
                found: self.frame_type.as_str(),
            }),
            MBusFrameType::Short => Ok(short),
            MBusFrameType::Control | MBusFrameType::Long => Ok(long),
        }
    }

    fn field_at(&self, field: &'static str, offset: usize) -> Result<u8, MBusError> {
        self.data
            .get(offset)
            .copied()
            .ok_or(MBusError::InsufficientLength {
                field,
                needed: offset + 1,
                len: self.data.len(),
            })
    }

    /// C field: offset 1 in a short frame, offset 4 in control/long frames.
    pub fn control_field(&self) -> Result<CField, MBusError> {
        let offset = self.field_offset(MBUS_OFFSET_C_FIELD_SHORT, MBUS_OFFSET_C_FIELD_LONG)?;
        self.field_at("C field", offset).map(CField::decode)
    }

    /// A field: offset 2 in a short frame, offset 5 in control/long frames.
    pub fn address_field(&self) -> Result<AField, MBusError> {
        let offset = self.field_offset(MBUS_OFFSET_A_FIELD_SHORT, MBUS_OFFSET_A_FIELD_LONG)?;
        self.field_at("A field", offset).map(AField::new)
    }

    /// CI field of a control or long frame.
    pub fn ci_field(&self) -> Result<CIField, MBusError> {
        match self.frame_type {
            MBusFrameType::Control | MBusFrameType::Long => self
                .field_at("CI field", MBUS_OFFSET_CI_FIELD)
                .map(CIField::decode),
            other => Err(MBusError::UnexpectedFrameType {
                expected: "control or long",
                found: other.as_str(),
            }),
        }
    }

    /// Index of the stop octet (the last octet of the buffer).
    pub fn stop_byte_index(&self) -> usize {
        self.data.len().saturating_sub(1)
    }

    /// Index of the checksum octet. Payload data ends right before it.
    pub fn last_data_index(&self) -> usize {
        self.data.len().saturating_sub(2)
    }

    /// Arithmetic sum (mod 256) over the checksummed region, if the frame has one.
    pub fn checksum(&self) -> Option<u8> {
        let region = match self.frame_type {
            MBusFrameType::Ack => return None,
            MBusFrameType::Short => self.data.get(1..3)?,
            MBusFrameType::Control | MBusFrameType::Long => {
                let l = *self.data.get(1)? as usize;
                self.data.get(4..4 + l)?
            }
        };
        Some(calculate_checksum(region))
    }

    /// Compares the computed checksum with the transmitted one.
    pub fn checksum_matches(&self) -> bool {
        let index = match self.frame_type {
            MBusFrameType::Ack => return true,
            MBusFrameType::Short => 3,
            MBusFrameType::Control | MBusFrameType::Long => match self.data.get(1) {
                Some(l) => 4 + *l as usize,
                None => return false,
            },
        };
        match (self.checksum(), self.data.get(index)) {
            (Some(calculated), Some(&transmitted)) => calculated == transmitted,
            _ => false,
        }
    }
}

impl TryFrom<Vec<u8>> for MBusFrame {
    type Error = MBusError;

    fn try_from(data: Vec<u8>) -> Result<Self, Self::Error> {
        MBusFrame::from_bytes(data)
    }
}

impl TryFrom<&[u8]> for MBusFrame {
    type Error = MBusError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        MBusFrame::from_bytes(data.to_vec())
    }
}

/// Calculates the M-Bus checksum: sum of the octets, truncated to one octet.
pub fn calculate_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Total frame length announced by the first octets of a frame.
///
/// Returns `Ok(None)` while the prefix is too short to tell, which lets a
/// reader stop as soon as a complete frame has arrived.
pub fn expected_frame_len(prefix: &[u8]) -> Result<Option<usize>, MBusError> {
    match prefix.first() {
        None => Ok(None),
        Some(&MBUS_FRAME_ACK) => Ok(Some(1)),
        Some(&MBUS_FRAME_SHORT_START) => Ok(Some(MBUS_FRAME_SHORT_LENGTH)),
        Some(&MBUS_FRAME_LONG_START) => Ok(prefix
            .get(1)
            .map(|l| *l as usize + MBUS_FRAME_LONG_OVERHEAD)),
        Some(&other) => Err(MBusError::UnknownFrameStart(other)),
    }
}

/// Packs a short frame: 10 C A CS 16.
pub fn pack_short_frame(control: u8, address: u8) -> Vec<u8> {
    vec![
        MBUS_FRAME_SHORT_START,
        control,
        address,
        control.wrapping_add(address),
        MBUS_FRAME_STOP,
    ]
}

/// Packs a control or long frame: 68 L L 68 C A CI data CS 16.
///
/// Fails when the user data does not fit the one-octet length field.
pub fn pack_long_frame(control: u8, address: u8, ci: u8, data: &[u8]) -> Result<Vec<u8>, MBusError> {
    let l = u8::try_from(data.len() + 3)
        .map_err(|_| MBusError::Other(format!("user data too long: {} octets", data.len())))?;
    let mut out = Vec::with_capacity(data.len() + 9);
    out.push(MBUS_FRAME_LONG_START);
    out.push(l);
    out.push(l);
    out.push(MBUS_FRAME_LONG_START);
    out.push(control);
    out.push(address);
    out.push(ci);
    out.extend_from_slice(data);
    out.push(calculate_checksum(&out[4..]));
    out.push(MBUS_FRAME_STOP);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_is_truncated() {
        let err = MBusFrame::from_bytes(Vec::new()).unwrap_err();
        assert!(err.is_bounds());
    }

    #[test]
    fn test_unknown_start() {
        assert_eq!(
            MBusFrame::from_bytes(vec![0xAA]),
            Err(MBusError::UnknownFrameStart(0xAA))
        );
    }

    #[test]
    fn test_short_frame_accessors() {
        let frame = MBusFrame::from_bytes(pack_short_frame(0x5B, 0x01)).unwrap();
        assert_eq!(frame.frame_type(), MBusFrameType::Short);
        frame.verify().unwrap();
        assert!(frame.checksum_matches());
        assert_eq!(frame.address_field().unwrap().value(), 0x01);
        assert!(frame.control_field().unwrap().is_from_master());
        assert!(frame.ci_field().is_err());
    }

    #[test]
    fn test_ack_has_no_fields() {
        let frame = MBusFrame::from_bytes(vec![0xE5]).unwrap();
        assert!(frame.is_valid());
        assert!(frame.control_field().is_err());
        assert_eq!(frame.checksum(), None);
    }

    #[test]
    fn test_pack_long_frame_checksum() {
        let bytes = pack_long_frame(0x53, 0xFE, 0x51, &[0x01, 0x7A, 0x05]).unwrap();
        let frame = MBusFrame::from_bytes(bytes).unwrap();
        assert_eq!(frame.frame_type(), MBusFrameType::Long);
        frame.verify().unwrap();
        assert!(frame.checksum_matches());
    }

    #[test]
    fn test_expected_frame_len() {
        assert_eq!(expected_frame_len(&[]), Ok(None));
        assert_eq!(expected_frame_len(&[0xE5]), Ok(Some(1)));
        assert_eq!(expected_frame_len(&[0x68]), Ok(None));
        assert_eq!(expected_frame_len(&[0x68, 0x31]), Ok(Some(0x31 + 6)));
        assert!(expected_frame_len(&[0x00]).is_err());
    }
}
