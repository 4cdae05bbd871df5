//! # M-Bus Data Encoding and Decoding
//!
//! This module provides functions for decoding the value encodings used in
//! M-Bus data records (little-endian integers, BCD, IEEE-754 reals, compound
//! CP16 dates and CP32 date-times) and for the 2-octet manufacturer code.
//!
//! Numeric values are multiplied by the record's exponent and rendered with
//! six decimals, e.g. `"1389817000.000000"`.

use crate::error::MBusError;
use crate::util::hex::encode_hex_upper;
use log::warn;
use nom::{
    bytes::complete::take,
    combinator::map,
    number::complete::{le_u16, le_u24, le_u32, le_u64, le_u8},
    IResult,
};

/// Renders a scaled value the way records carry it.
pub fn format_value(value: f64) -> String {
    format!("{:.6}", value).trim().to_string()
}

/// Decodes an unsigned little-endian integer of `size` octets (0..=8).
pub fn decode_int(input: &[u8], size: usize) -> IResult<&[u8], u64> {
    match size {
        1 => map(le_u8, u64::from)(input),
        2 => map(le_u16, u64::from)(input),
        3 => map(le_u24, u64::from)(input),
        4 => map(le_u32, u64::from)(input),
        8 => le_u64(input),
        0..=8 => map(take(size), |bytes: &[u8]| {
            bytes
                .iter()
                .rev()
                .fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
        })(input),
        _ => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        ))),
    }
}

/// Unsigned little-endian integer spanning the whole slice.
pub fn decode_uint(bytes: &[u8]) -> Result<u64, MBusError> {
    decode_int(bytes, bytes.len())
        .map(|(_, v)| v)
        .map_err(|_| MBusError::InsufficientLength {
            field: "integer",
            needed: 8,
            len: bytes.len(),
        })
}

/// Integer record value: little-endian, scaled by `exponent`.
pub fn decode_scaled_int(bytes: &[u8], exponent: f64) -> Result<String, MBusError> {
    let raw = decode_uint(bytes)?;
    Ok(format_value(raw as f64 * exponent))
}

/// Decodes packed BCD stored least significant octet first.
///
/// A most significant nibble of 0xF marks a negative value. Any other
/// nibble above 9 makes the whole value unreadable and it decodes as 0.
pub fn decode_bcd(bytes: &[u8]) -> i64 {
    let mut value: i64 = 0;
    let mut negative = false;

    for (i, byte) in bytes.iter().rev().enumerate() {
        for (j, nibble) in [byte >> 4, byte & 0x0F].into_iter().enumerate() {
            if i == 0 && j == 0 && nibble == 0x0F {
                negative = true;
                continue;
            }
            if nibble > 9 {
                warn!(
                    "Invalid BCD digit 0x{:X} in {}, decoding as 0",
                    nibble,
                    encode_hex_upper(bytes)
                );
                return 0;
            }
            value = value.saturating_mul(10).saturating_add(i64::from(nibble));
        }
    }

    if negative {
        -value
    } else {
        value
    }
}

pub fn decode_scaled_bcd(bytes: &[u8], exponent: f64) -> String {
    format_value(decode_bcd(bytes) as f64 * exponent)
}

/// Encodes `value` as `octets` BCD octets, least significant octet first.
pub fn encode_bcd(mut value: u64, octets: usize) -> Vec<u8> {
    let mut result = vec![0u8; octets];
    for byte in result.iter_mut() {
        let ones = (value % 10) as u8;
        value /= 10;
        let tens = (value % 10) as u8;
        value /= 10;
        *byte = (tens << 4) | ones;
    }
    result
}

/// IEEE-754 single precision, little-endian, scaled by `exponent`.
pub fn decode_real32(bytes: &[u8], exponent: f64) -> Result<String, MBusError> {
    let raw: [u8; 4] = bytes.try_into().map_err(|_| MBusError::InsufficientLength {
        field: "real32",
        needed: 4,
        len: bytes.len(),
    })?;
    Ok(format_value(f64::from(f32::from_le_bytes(raw)) * exponent))
}

/// IEEE-754 double precision, little-endian, scaled by `exponent`.
pub fn decode_real64(bytes: &[u8], exponent: f64) -> Result<String, MBusError> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| MBusError::InsufficientLength {
        field: "real64",
        needed: 8,
        len: bytes.len(),
    })?;
    Ok(format_value(f64::from_le_bytes(raw) * exponent))
}

/// ASCII text is transmitted last character first.
pub fn decode_ascii(bytes: &[u8]) -> String {
    bytes.iter().rev().map(|b| *b as char).collect()
}

fn compound_year(low: u8, high: u8) -> u16 {
    let base = ((low & 0xE0) >> 5) | ((high & 0xF0) >> 1);
    let year = 1900 + u16::from(base);
    if year < 1980 {
        year + 100
    } else {
        year
    }
}

/// Type G, compound CP16: `YYYY-MM-DD`.
///
/// Every bit pattern decodes, even to a calendar date that does not exist.
pub fn decode_date(bytes: &[u8]) -> Result<String, MBusError> {
    let [b0, b1] = <[u8; 2]>::try_from(bytes).map_err(|_| MBusError::InvalidTimeLength {
        expected: 2,
        actual: bytes.len(),
    })?;

    let day = b0 & 0x1F;
    let month = b1 & 0x0F;
    let year = compound_year(b0, b1);

    Ok(format!("{:04}-{:02}-{:02}", year, month, day))
}

/// Type F, compound CP32: `YYYY-MM-DDTHH:MM:00Z`.
pub fn decode_date_time(bytes: &[u8]) -> Result<String, MBusError> {
    let [b0, b1, b2, b3] =
        <[u8; 4]>::try_from(bytes).map_err(|_| MBusError::InvalidTimeLength {
            expected: 4,
            actual: bytes.len(),
        })?;

    let minute = b0 & 0x3F;
    let hour = b1 & 0x1F;
    let day = b2 & 0x1F;
    let month = b3 & 0x0F;
    let year = compound_year(b2, b3);

    Ok(format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:00Z",
        year, month, day, hour, minute
    ))
}

/// Decodes the packed 3-letter manufacturer code (5 bits per letter, +64).
pub fn decode_manufacturer(bytes: &[u8]) -> Result<String, MBusError> {
    let (_, id) = le_u16::<_, nom::error::Error<&[u8]>>(bytes).map_err(|_| {
        MBusError::InsufficientLength {
            field: "manufacturer",
            needed: 2,
            len: bytes.len(),
        }
    })?;

    Ok([(id >> 10) & 0x1F, (id >> 5) & 0x1F, id & 0x1F]
        .iter()
        .map(|v| (*v as u8 + 64) as char)
        .collect())
}

/// Packs a 3-letter code (`A`..=`Z`) into its 2-octet wire form.
pub fn encode_manufacturer(code: &str) -> Result<[u8; 2], MBusError> {
    let letters = code.as_bytes();
    if letters.len() != 3 || !letters.iter().all(u8::is_ascii_uppercase) {
        return Err(MBusError::InvalidManufacturer);
    }

    let id = letters
        .iter()
        .fold(0u16, |acc, c| (acc << 5) | u16::from(c - 64));
    Ok(id.to_le_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_int_widths() {
        assert_eq!(decode_uint(&[0x2A]).unwrap(), 42);
        assert_eq!(decode_uint(&[0xF9, 0x34, 0x15]).unwrap(), 1_389_817);
        assert_eq!(
            decode_uint(&[0x01, 0x00, 0x00, 0x00, 0x00, 0x01]).unwrap(),
            0x0100_0000_0001
        );
        assert_eq!(decode_uint(&[]).unwrap(), 0);
        assert!(decode_uint(&[0u8; 9]).is_err());
    }

    #[test]
    fn test_scaled_int() {
        assert_eq!(
            decode_scaled_int(&[0xF9, 0x34, 0x15], 1e3).unwrap(),
            "1389817000.000000"
        );
        assert_eq!(decode_scaled_int(&[0x01, 0x00], 0.1).unwrap(), "0.100000");
    }

    #[test]
    fn test_bcd() {
        assert_eq!(decode_bcd(&[0x78, 0x56, 0x34, 0x12]), 12_345_678);
        assert_eq!(decode_bcd(&[0x27, 0x02]), 227);
        assert_eq!(decode_bcd(&[0x34, 0xF2]), -234);
        assert_eq!(decode_bcd(&[0xBD, 0xEB, 0xDD, 0xDD]), 0);
        assert_eq!(decode_scaled_bcd(&[0x27, 0x02], 0.1), "22.700000");
        assert_eq!(encode_bcd(12_345_678, 4), vec![0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_real32() {
        assert_eq!(decode_real32(&[0, 0, 0, 0], 1.0).unwrap(), "0.000000");
        assert_eq!(
            decode_real32(&[0x00, 0x00, 0x20, 0x41], 1.0).unwrap(),
            "10.000000"
        );
        assert!(decode_real32(&[0, 0], 1.0).is_err());
    }

    #[test]
    fn test_dates() {
        assert_eq!(decode_date(&[0xBF, 0x1C]).unwrap(), "2013-12-31");
        assert_eq!(decode_date(&[0xDF, 0x1C]).unwrap(), "2014-12-31");
        assert_eq!(
            decode_date_time(&[0x00, 0x0C, 0xE3, 0xB3]).unwrap(),
            "1995-03-03T12:00:00Z"
        );
        assert_eq!(
            decode_date(&[0xBF]),
            Err(MBusError::InvalidTimeLength {
                expected: 2,
                actual: 1
            })
        );
        assert!(decode_date_time(&[0; 6]).is_err());
    }

    #[test]
    fn test_manufacturer() {
        assert_eq!(decode_manufacturer(&[0xB4, 0x05]).unwrap(), "AMT");
        assert_eq!(decode_manufacturer(&[0x93, 0x15]).unwrap(), "ELS");
        assert_eq!(encode_manufacturer("ELS").unwrap(), [0x93, 0x15]);
        assert_eq!(encode_manufacturer("els"), Err(MBusError::InvalidManufacturer));
        assert!(decode_manufacturer(&[0xB4]).is_err());
    }
}
