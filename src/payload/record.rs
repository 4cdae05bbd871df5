//! # Variable data records
//!
//! A record is a DIB (DIF + DIFE chain), a VIB (VIF + VIFE chain, possibly
//! with manufacturer octets) and the value octets whose shape the DIF
//! announces. [`decode_record`] walks exactly one record and returns the
//! offset of the next one; [`decode_records`] repeats it over the payload.

use crate::constants::{
    MBUS_DIB_VIF_EXTENSION_BIT, MBUS_DIB_VIF_TIME_POINT_DATE, MBUS_DIB_VIF_TIME_POINT_DATE_TIME,
};
use crate::error::MBusError;
use crate::payload::data_encoding::{
    decode_ascii, decode_bcd, decode_date, decode_date_time, decode_real32, decode_real64,
    decode_scaled_bcd, decode_scaled_int, format_value,
};
use crate::payload::dif::{self, DIFEField, DIFField, DataLength};
use crate::payload::vif::{VIFEField, VIFField, VifKind};
use crate::util::hex::encode_hex_upper;
use log::{debug, trace};
use nom::bytes::complete::take;
use nom::error::Error as NomError;
use nom::number::complete::be_u8;
use serde::Serialize;
use std::collections::BTreeMap;

/// One decoded data record. Field names follow the established JSON layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRecord {
    #[serde(rename = "DIF")]
    pub dif: u8,
    #[serde(rename = "DIFE")]
    pub dife: Vec<u8>,
    /// Effective VIF: for 0xFB/0xFD this is the octet that follows.
    #[serde(rename = "VIF")]
    pub vif: u8,
    #[serde(rename = "VIFE")]
    pub vife: Vec<u8>,
    #[serde(rename = "VIFEM")]
    pub vifem: Vec<u8>,
    pub value: String,
    pub function: &'static str,
    pub unit: String,
    pub name: &'static str,
    pub exponent: f64,
}

impl DataRecord {
    fn manufacturer_data(dif: u8, dife: Vec<u8>) -> Self {
        DataRecord {
            dif,
            dife,
            vif: 0,
            vife: Vec::new(),
            vifem: Vec::new(),
            value: String::new(),
            function: "",
            unit: String::new(),
            name: "",
            exponent: 1.0,
        }
    }

    pub fn storage_number(&self) -> u64 {
        dif::storage_number(self.dif, &self.dife)
    }

    pub fn tariff(&self) -> u32 {
        dif::tariff(&self.dife)
    }

    pub fn device_unit(&self) -> u32 {
        dif::device_unit(&self.dife)
    }

    /// True for the 0x0F/0x1F record that ends the standard payload.
    pub fn is_manufacturer_data(&self) -> bool {
        DIFField::new(self.dif).is_manufacturer_specific()
    }
}

/// Sub-encoding selected by the LVAR octet of a variable length value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LvarEncoding {
    /// 0x00..=0xBF: that many ASCII characters.
    Ascii(usize),
    /// 0xC0..=0xCF
    PositiveBcd(usize),
    /// 0xD0..=0xDF
    NegativeBcd(usize),
    /// 0xE0..=0xEF
    Binary(usize),
    /// 0xF0..=0xFA
    Real(usize),
    /// 0xFB..=0xFF
    Reserved,
}

impl From<u8> for LvarEncoding {
    fn from(lvar: u8) -> Self {
        match lvar {
            0x00..=0xBF => LvarEncoding::Ascii(lvar as usize),
            0xC0..=0xCF => LvarEncoding::PositiveBcd((lvar - 0xC0) as usize),
            0xD0..=0xDF => LvarEncoding::NegativeBcd((lvar - 0xD0) as usize),
            0xE0..=0xEF => LvarEncoding::Binary((lvar - 0xE0) as usize),
            0xF0..=0xFA => LvarEncoding::Real((lvar - 0xF0) as usize),
            0xFB..=0xFF => LvarEncoding::Reserved,
        }
    }
}

/// Bounds-checked reader over `data[..end]`.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8], pos: usize, end: usize) -> Self {
        Cursor {
            data,
            pos,
            end: end.min(data.len()),
        }
    }

    fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..self.end).unwrap_or(&[])
    }

    fn next(&mut self) -> Result<u8, MBusError> {
        let (_, b) = be_u8::<_, NomError<&[u8]>>(self.remaining()).map_err(|_| self.truncated())?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], MBusError> {
        let (_, bytes) =
            take::<_, _, NomError<&[u8]>>(n)(self.remaining()).map_err(|_| self.truncated())?;
        self.pos += n;
        Ok(bytes)
    }

    fn truncated(&self) -> MBusError {
        MBusError::Truncated {
            offset: self.pos,
            len: self.end,
        }
    }
}

/// Unit and name as they evolve while the VIB is consumed.
struct Description {
    unit: String,
    name: &'static str,
}

/// Decodes the record starting at `offset`, never reading at or past `end`.
///
/// Returns `None` in place of a record for an idle filler octet. The second
/// element is the offset one past the last consumed octet.
pub fn decode_record(
    data: &[u8],
    offset: usize,
    end: usize,
) -> Result<(Option<DataRecord>, usize), MBusError> {
    let mut cur = Cursor::new(data, offset, end);

    let dif = DIFField::new(cur.next()?);
    if dif.is_idle_filler() {
        trace!("Idle filler at offset {}", offset);
        return Ok((None, cur.pos));
    }

    let mut dife = Vec::new();
    if dif.has_extension() {
        loop {
            let field = DIFEField::new(cur.next()?);
            dife.push(field.value());
            if !field.has_extension() {
                break;
            }
        }
    }

    if dif.is_manufacturer_specific() {
        debug!(
            "Manufacturer specific data from offset {} to {}: {}",
            cur.pos,
            cur.end,
            encode_hex_upper(cur.remaining())
        );
        let next = cur.end;
        return Ok((Some(DataRecord::manufacturer_data(dif.value(), dife)), next));
    }

    let vif = VIFField::new(cur.next()?);
    let mut effective_vif = vif.value();
    let mut vife = Vec::new();
    let mut vifem = Vec::new();
    let exponent;
    let mut description;

    match vif.kind() {
        VifKind::Extension(_) => {
            let true_vif = VIFEField::new(cur.next()?, vif.value());
            let entry = true_vif.entry();
            effective_vif = true_vif.value();
            exponent = entry.exponent;
            description = Description {
                unit: entry.unit.to_string(),
                name: entry.name,
            };
            if true_vif.has_extension() {
                read_vife_chain(&mut cur, vif.value(), &mut vife, &mut vifem, &mut description)?;
            }
        }
        VifKind::ManufacturerSpecific => {
            vifem.push(cur.next()?);
            exponent = 1.0;
            description = Description {
                unit: String::new(),
                name: "",
            };
        }
        VifKind::PlainText => {
            let n = cur.next()? as usize;
            let text = cur.take(n)?;
            exponent = vif.exponent();
            description = Description {
                unit: decode_ascii(text),
                name: vif.name(),
            };
            if vif.has_extension() {
                read_vife_chain(&mut cur, vif.value(), &mut vife, &mut vifem, &mut description)?;
            }
        }
        VifKind::Primary => {
            exponent = vif.exponent();
            description = Description {
                unit: vif.unit().to_string(),
                name: vif.name(),
            };
            if vif.has_extension() {
                read_vife_chain(&mut cur, vif.value(), &mut vife, &mut vifem, &mut description)?;
            }
        }
    }

    let is_primary = vif.kind() == VifKind::Primary;
    let value = match dif.data_length() {
        DataLength::NoData | DataLength::SelectionForReadout | DataLength::SpecialFunctions => {
            String::new()
        }
        DataLength::Int16 if is_primary && vif.code() == MBUS_DIB_VIF_TIME_POINT_DATE => {
            decode_date(cur.take(2)?)?
        }
        DataLength::Int32 if is_primary && vif.code() == MBUS_DIB_VIF_TIME_POINT_DATE_TIME => {
            decode_date_time(cur.take(4)?)?
        }
        DataLength::Real32 => decode_real32(cur.take(4)?, exponent)?,
        length @ (DataLength::Bcd2
        | DataLength::Bcd4
        | DataLength::Bcd6
        | DataLength::Bcd8
        | DataLength::Bcd12) => {
            decode_scaled_bcd(cur.take(length.octets().unwrap_or(0))?, exponent)
        }
        length @ (DataLength::Int8
        | DataLength::Int16
        | DataLength::Int24
        | DataLength::Int32
        | DataLength::Int48
        | DataLength::Int64) => {
            decode_scaled_int(cur.take(length.octets().unwrap_or(0))?, exponent)?
        }
        DataLength::VariableLength => decode_variable(&mut cur, exponent)?,
    };

    trace!(
        "Record at {}: DIF 0x{:02X} VIF 0x{:02X} value {:?} next {}",
        offset,
        dif.value(),
        effective_vif,
        value,
        cur.pos
    );

    let record = DataRecord {
        dif: dif.value(),
        dife,
        vif: effective_vif,
        vife,
        vifem,
        value: value.trim().to_string(),
        function: dif.data_category().name(),
        unit: description.unit,
        name: description.name,
        exponent,
    };

    Ok((Some(record), cur.pos))
}

/// VIFE octets are looked up in the table chosen by the literal parent VIF.
/// A 0xFF octet switches the remainder of the chain to manufacturer octets.
fn read_vife_chain(
    cur: &mut Cursor<'_>,
    parent_vif: u8,
    vife: &mut Vec<u8>,
    vifem: &mut Vec<u8>,
    description: &mut Description,
) -> Result<(), MBusError> {
    loop {
        let field = VIFEField::new(cur.next()?, parent_vif);

        if field.is_manufacturer_marker() {
            loop {
                let b = cur.next()?;
                vifem.push(b);
                if b & MBUS_DIB_VIF_EXTENSION_BIT == 0 {
                    return Ok(());
                }
            }
        }

        vife.push(field.value());
        let entry = field.entry();
        description.unit = entry.unit.to_string();
        description.name = entry.name;

        if !field.has_extension() {
            return Ok(());
        }
    }
}

fn decode_variable(cur: &mut Cursor<'_>, exponent: f64) -> Result<String, MBusError> {
    let at = cur.pos;
    let lvar = cur.next()?;

    match LvarEncoding::from(lvar) {
        LvarEncoding::Ascii(n) => Ok(decode_ascii(cur.take(n)?)),
        LvarEncoding::PositiveBcd(n) => Ok(decode_scaled_bcd(cur.take(n)?, exponent)),
        LvarEncoding::NegativeBcd(n) => {
            Ok(format_value(-decode_bcd(cur.take(n)?).abs() as f64 * exponent))
        }
        LvarEncoding::Binary(n) if n <= 8 => decode_scaled_int(cur.take(n)?, exponent),
        LvarEncoding::Binary(n) => Ok(encode_hex_upper(cur.take(n)?)),
        LvarEncoding::Real(4) => decode_real32(cur.take(4)?, exponent),
        LvarEncoding::Real(8) => decode_real64(cur.take(8)?, exponent),
        LvarEncoding::Real(n) => Ok(encode_hex_upper(cur.take(n)?)),
        LvarEncoding::Reserved => Err(MBusError::InvalidLvar { offset: at, lvar }),
    }
}

/// Decodes every record in `data[start..end]`, keyed by discovery order.
///
/// The first error aborts the walk; no partial map is returned.
pub fn decode_records(
    data: &[u8],
    start: usize,
    end: usize,
) -> Result<BTreeMap<usize, DataRecord>, MBusError> {
    let mut records = BTreeMap::new();
    let mut offset = start;

    while offset < end {
        let (record, next) = decode_record(data, offset, end)?;
        if let Some(record) = record {
            records.insert(records.len(), record);
        }
        offset = next;
    }

    Ok(records)
}
