//! # Hex Encoding/Decoding Utilities
//!
//! Telegrams are usually captured and exchanged as hex text. This module turns
//! the common spellings into octets and back:
//!
//! - contiguous: `"680A0A68"`
//! - spaced: `"68 0A 0A 68"`
//! - prefixed: `"0x68 0x0A 0x0A 0x68"` (also comma separated)
//!
//! ## Usage
//!
//! ```rust
//! use mbus_telegram::util::hex::{decode_hex, encode_hex_upper};
//!
//! let data = decode_hex("0x68 0x0A 0x0A 0x68").unwrap();
//! assert_eq!(data, vec![0x68, 0x0A, 0x0A, 0x68]);
//! assert_eq!(encode_hex_upper(&data), "680A0A68");
//! ```

use crate::error::MBusError;
use thiserror::Error;

/// Errors that can occur during hex operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HexError {
    #[error("Invalid hex character: {0}")]
    InvalidCharacter(char),

    #[error("Odd number of hex characters: {0}")]
    OddLength(usize),

    #[error("Empty hex string")]
    EmptyString,
}

impl From<HexError> for MBusError {
    fn from(_: HexError) -> Self {
        MBusError::InvalidHexString
    }
}

/// Encode bytes to lowercase hex string
pub fn encode_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Encode bytes to uppercase hex string
pub fn encode_hex_upper(data: &[u8]) -> String {
    hex::encode_upper(data)
}

/// Decode hex text to bytes.
///
/// Accepts upper and lower case digits, whitespace or comma separators and
/// an optional `0x`/`0X` prefix on every token.
pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, HexError> {
    let mut cleaned = String::with_capacity(hex_str.len());
    for token in hex_str.split(|c: char| c.is_whitespace() || c == ',') {
        let token = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        cleaned.push_str(token);
    }

    if cleaned.is_empty() {
        return Err(HexError::EmptyString);
    }

    if let Some(bad) = cleaned.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(HexError::InvalidCharacter(bad));
    }

    if cleaned.len() % 2 != 0 {
        return Err(HexError::OddLength(cleaned.len()));
    }

    hex::decode(&cleaned).map_err(|_| HexError::OddLength(cleaned.len()))
}

/// Format hex data for compact display (useful for logs)
///
/// Formats data as "68 31 31 68" with spaces between bytes.
pub fn format_hex_compact(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
