//! # M-Bus Error Handling
//!
//! This module defines the MBusError enum, which represents the different error
//! types that can occur while validating frames, decoding records and talking
//! to a device over the serial line.
//!
//! Errors fall into a few families that callers treat differently:
//!
//! - structural: a frame marker or length octet is wrong
//! - bounds: decoding ran past the end of the supplied buffer
//! - domain: a field holds a value that is not allowed where it is used
//! - transport: the serial port failed, or is held by another process
//!
//! Unknown table codes are never errors; they resolve to an "unrecognized" entry.

use thiserror::Error;

/// Represents the different error types that can occur in the M-Bus crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MBusError {
    /// Indicates an error related to the serial port communication.
    #[error("Serial port error: {0}")]
    SerialPortError(String),

    /// The serial port is opened by someone else. Retried by the transport.
    #[error("Serial port busy: {0}")]
    PortBusy(String),

    /// No answer arrived within the read window.
    #[error("Timed out waiting for a response from address {address}")]
    Timeout { address: u8 },

    /// The first octet is not one of 0xE5, 0x10 or 0x68.
    #[error("Unknown frame start octet: 0x{0:02X}")]
    UnknownFrameStart(u8),

    /// A start marker did not match.
    #[error("Invalid start octet at offset {offset}: expected 0x{expected:02X}, found 0x{found:02X}")]
    InvalidStartByte { offset: usize, expected: u8, found: u8 },

    /// The frame does not end with 0x16.
    #[error("Invalid stop octet: expected 0x16, found 0x{found:02X}")]
    InvalidStopByte { found: u8 },

    /// The two length octets of a long frame differ.
    #[error("Length octets differ: 0x{first:02X} != 0x{second:02X}")]
    LengthFieldMismatch { first: u8, second: u8 },

    /// The frame is of a different kind than the operation needs.
    #[error("Unexpected frame type: expected {expected}, found {found}")]
    UnexpectedFrameType {
        expected: &'static str,
        found: &'static str,
    },

    /// A read went past the end of the buffer.
    #[error("Truncated telegram: offset {offset} is out of range for buffer length {len}")]
    Truncated { offset: usize, len: usize },

    /// A fixed-offset field accessor found the buffer too short.
    #[error("Insufficient length for {field}: need {needed} octets, have {len}")]
    InsufficientLength {
        field: &'static str,
        needed: usize,
        len: usize,
    },

    /// An address octet outside 1..=250 where a slave address is required.
    #[error("Invalid slave address: {0}")]
    InvalidAddress(u8),

    /// A variable-length descriptor in the reserved range.
    #[error("Invalid LVAR 0x{lvar:02X} at offset {offset}")]
    InvalidLvar { offset: usize, lvar: u8 },

    /// A compound date/time decoder received the wrong number of octets.
    #[error("Invalid time data length: expected {expected} octets, got {actual}")]
    InvalidTimeLength { expected: usize, actual: usize },

    /// Indicates an invalid hexadecimal string was provided.
    #[error("Invalid hexadecimal string")]
    InvalidHexString,

    /// Indicates an invalid manufacturer ID.
    #[error("Invalid manufacturer")]
    InvalidManufacturer,

    /// A catch‑all error for uncategorized cases.
    #[error("Other error: {0}")]
    Other(String),
}

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MBusError>;

impl MBusError {
    /// True for errors caused by running off the end of the buffer.
    pub fn is_bounds(&self) -> bool {
        matches!(
            self,
            MBusError::Truncated { .. } | MBusError::InsufficientLength { .. }
        )
    }

    /// True for start/stop/length marker failures.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            MBusError::UnknownFrameStart(_)
                | MBusError::InvalidStartByte { .. }
                | MBusError::InvalidStopByte { .. }
                | MBusError::LengthFieldMismatch { .. }
                | MBusError::UnexpectedFrameType { .. }
                | MBusError::InvalidLvar { .. }
        )
    }

    /// True when the serial port is held by another process.
    pub fn is_port_busy(&self) -> bool {
        matches!(self, MBusError::PortBusy(_))
    }

    /// True for failures that originate in the serial transport.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            MBusError::SerialPortError(_) | MBusError::PortBusy(_) | MBusError::Timeout { .. }
        )
    }
}

impl From<std::io::Error> for MBusError {
    fn from(err: std::io::Error) -> Self {
        MBusError::SerialPortError(err.to_string())
    }
}
