//! # Variable data telegrams (RSP_UD, CI 0x72)
//!
//! ```text
//! 0  1  2  3  4 5 6  7..10  11..12 13  14  15  16  17..18 19..     len-2 len-1
//! 68 L  L  68 C A CI ident  manuf  ver med acc sts sig    records  CS    16
//! ```
//!
//! [`parse_telegram`] validates the frame, decodes the fixed header and walks
//! the records up to the checksum octet. Any error aborts the whole parse.

use crate::constants::{
    MBUS_DIB_DIF_MORE_RECORDS_FOLLOW, MBUS_OFFSET_FIRST_RECORD, MBUS_OFFSET_IDENTIFICATION,
    MBUS_VARIABLE_HEADER_MIN_LENGTH,
};
use crate::error::MBusError;
use crate::mbus::address::AField;
use crate::mbus::control::{CField, CIField};
use crate::mbus::frame::{MBusFrame, MBusFrameType};
use crate::payload::data_encoding::decode_manufacturer;
use crate::payload::record::{decode_records, DataRecord};
use bitflags::bitflags;
use nom::{bytes::complete::take, number::complete::be_u8, sequence::tuple, IResult};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Device class announced in the fixed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediumType(u8);

impl MediumType {
    pub fn new(code: u8) -> Self {
        MediumType(code)
    }

    pub fn code(&self) -> u8 {
        self.0
    }

    pub fn name(&self) -> &'static str {
        match self.0 {
            0x00 => "Other",
            0x01 => "Oil",
            0x02 => "ELECTRICITY",
            0x03 => "GAS",
            0x04 => "Heat",
            0x05 => "STEAM",
            0x06 => "HOT_WATER",
            0x07 => "WATER",
            0x08 => "Heat Cost Allocator",
            0x09 => "Compressed Air",
            0x0A => "Cooling load meter OUT",
            0x0B => "Cooling load meter IN",
            0x0C => "Heat: inlet",
            0x0D => "Heat / Cooling load meter",
            0x0E => "Bus / System",
            0x0F => "Unknown Medium",
            0x10 => "Irrigation Water",
            0x11 => "Water data logger",
            0x12 => "Gas data logger",
            0x13 => "Gas converter",
            0x14 => "Heat Value",
            0x15 => "Hot Water (>=90°C)",
            0x16 => "COLD_WATER",
            0x17 => "DUAL_WATER",
            0x18 => "PRESSURE",
            0x19 => "A/D Converter",
            0x1A => "SMOKE",
            0x1B => "ROOM_SENSOR",
            0x1C => "GAS_DETECTOR",
            0x20 => "Breaker (Electricity)",
            0x21 => "Valve (Gas or Water)",
            0x25 => "Customer Unit (Display)",
            0x28 => "WASTE_WATER",
            0x29 => "GARBAGE",
            0x30 => "SERVICE_UNIT",
            0x36 => "Radio Control Unit (System Side)",
            0x37 => "Radio Control Unit (Meter Side)",
            _ => "- undefined -",
        }
    }
}

impl fmt::Display for MediumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for MediumType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

bitflags! {
    /// Status octet of the fixed header.
    ///
    /// Bits 1-2 carry the application state (busy, error, both meaning an
    /// abnormal condition), bits 6-8 are manufacturer specific.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const APPLICATION_BUSY  = 0b0000_0001;
        const APPLICATION_ERROR = 0b0000_0010;
        const POWER_LOW         = 0b0000_0100;
        const PERMANENT_ERROR   = 0b0000_1000;
        const TEMPORARY_ERROR   = 0b0001_0000;
        const MANUFACTURER_1    = 0b0010_0000;
        const MANUFACTURER_2    = 0b0100_0000;
        const MANUFACTURER_3    = 0b1000_0000;
    }
}

impl StatusFlags {
    /// Busy and error together.
    pub fn is_abnormal(&self) -> bool {
        self.contains(StatusFlags::APPLICATION_BUSY | StatusFlags::APPLICATION_ERROR)
    }
}

/// A decoded RSP_UD telegram. Serialises to the established JSON layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTelegram {
    pub identification_number: String,
    pub manufacturer: String,
    pub version: u8,
    pub medium: MediumType,
    pub access_number: u8,
    pub status: u8,
    pub address: u8,
    pub signature: Vec<u8>,
    #[serde(rename = "Records")]
    pub records: BTreeMap<usize, DataRecord>,
    #[serde(skip)]
    control: u8,
    #[serde(skip)]
    control_information: u8,
}

struct Header<'a> {
    identification: &'a [u8],
    manufacturer: &'a [u8],
    version: u8,
    medium: u8,
    access_number: u8,
    status: u8,
    signature: &'a [u8],
}

fn header(input: &[u8]) -> IResult<&[u8], Header<'_>> {
    let (rest, (identification, manufacturer, version, medium, access_number, status, signature)) =
        tuple((
            take(4usize),
            take(2usize),
            be_u8,
            be_u8,
            be_u8,
            be_u8,
            take(2usize),
        ))(input)?;

    Ok((
        rest,
        Header {
            identification,
            manufacturer,
            version,
            medium,
            access_number,
            status,
            signature,
        },
    ))
}

impl ParsedTelegram {
    /// Decodes a verified long frame.
    pub fn from_frame(frame: &MBusFrame) -> Result<Self, MBusError> {
        match frame.frame_type() {
            MBusFrameType::Long => {}
            other => {
                return Err(MBusError::UnexpectedFrameType {
                    expected: "long",
                    found: other.as_str(),
                })
            }
        }

        let data = frame.as_bytes();
        if data.len() < MBUS_VARIABLE_HEADER_MIN_LENGTH {
            return Err(MBusError::Truncated {
                offset: data.len(),
                len: data.len(),
            });
        }
        frame.verify()?;

        let (_, h) = header(&data[MBUS_OFFSET_IDENTIFICATION..]).map_err(|_| {
            MBusError::InsufficientLength {
                field: "fixed header",
                needed: MBUS_OFFSET_FIRST_RECORD,
                len: data.len(),
            }
        })?;

        let identification_number = h
            .identification
            .iter()
            .rev()
            .map(|b| format!("{:02X}", b))
            .collect::<String>();

        let records = decode_records(data, MBUS_OFFSET_FIRST_RECORD, frame.last_data_index())?;

        Ok(ParsedTelegram {
            identification_number,
            manufacturer: decode_manufacturer(h.manufacturer)?,
            version: h.version,
            medium: MediumType::new(h.medium),
            access_number: h.access_number,
            status: h.status,
            address: frame.address_field()?.value(),
            signature: h.signature.to_vec(),
            records,
            control: frame.control_field()?.encode(),
            control_information: frame.ci_field()?.code(),
        })
    }

    pub fn control_field(&self) -> CField {
        CField::decode(self.control)
    }

    pub fn ci_field(&self) -> CIField {
        CIField::decode(self.control_information)
    }

    pub fn address_field(&self) -> AField {
        AField::new(self.address)
    }

    /// The sender's primary address; fails outside 1..=250.
    pub fn slave_address(&self) -> Result<u8, MBusError> {
        self.address_field().slave_address()
    }

    pub fn status_flags(&self) -> StatusFlags {
        StatusFlags::from_bits_retain(self.status)
    }

    /// True when the last record announces that the slave holds more data.
    pub fn more_records_follow(&self) -> bool {
        self.records
            .values()
            .last()
            .map(|r| r.dif == MBUS_DIB_DIF_MORE_RECORDS_FOLLOW)
            .unwrap_or(false)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, MBusError> {
        let out = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        out.map_err(|e| MBusError::Other(format!("JSON encoding failed: {}", e)))
    }
}

/// Parses one complete RSP_UD telegram.
pub fn parse_telegram(data: &[u8]) -> Result<ParsedTelegram, MBusError> {
    let frame = MBusFrame::try_from(data)?;
    ParsedTelegram::from_frame(&frame)
}
