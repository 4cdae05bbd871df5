//! # mbus-telegram - Wired M-Bus (Meter-Bus) telegram codec
//!
//! The mbus-telegram crate decodes the variable data telegrams sent by wired
//! M-Bus meters (heat, water, gas, electricity) and talks to them over a
//! serial line.
//!
//! ## Features
//!
//! - Validate ACK, short, control and long frames
//! - Decode the address, control and control-information fields
//! - Walk the data records of an RSP_UD telegram (DIF/DIFE, VIF/VIFE,
//!   manufacturer specific extensions, plain text units)
//! - Decode integer, BCD, real and CP16/CP32 date values with their units
//! - Ping and read slaves over a serial port, scan an address range
//! - Serialise everything to JSON
//!
//! ## Usage
//!
//! ```rust
//! use mbus_telegram::parse_telegram;
//!
//! let data = [
//!     0x68, 0x0A, 0x0A, 0x68, 0x08, 0x01, 0x72, 0x78, 0x56, 0x34, 0x12, 0x24, 0x40, 0x01,
//!     0x07, 0x55, 0x00, 0x00, 0x00, 0x16,
//! ];
//! let telegram = parse_telegram(&data).unwrap();
//! assert_eq!(telegram.identification_number, "12345678");
//! ```

pub mod constants;
pub mod error;
pub mod logging;
pub mod mbus;
pub mod mbus_device_manager;
pub mod payload;
pub mod util;

pub use crate::error::MBusError;
pub use crate::logging::{init_logger, log_info};

// Link layer
pub use mbus::{
    AField, CField, CIField, MBusFrame, MBusFrameType, MBusProtocol, MockTransport, SerialConfig,
    SerialTransport, Transport,
};
pub use mbus_device_manager::{DeviceState, MBusDeviceManager, PingState, ScanConfig, ScanReport};

// Application layer
pub use payload::{parse_telegram, DataRecord, MediumType, ParsedTelegram, StatusFlags};

/// Ping a slave on a serial port.
///
/// # Arguments
/// * `port` - Serial port path (e.g., "/dev/ttyUSB0" on Linux, "COM3" on Windows)
/// * `address` - Primary address of the slave
///
/// # Returns
/// * `PingState` - `state` is true when the slave acknowledged; transport
///   errors are reported in `error`
pub async fn ping(port: &str, address: u8) -> PingState {
    MBusDeviceManager::new(port, SerialTransport::new(port))
        .ping(address)
        .await
}

/// Read the class 2 data of a slave on a serial port.
///
/// # Arguments
/// * `port` - Serial port path
/// * `address` - Primary address of the slave
///
/// # Returns
/// * `DeviceState` - the decoded telegram in `data`, or the first transport,
///   frame or record error in `error`
pub async fn read(port: &str, address: u8) -> DeviceState {
    MBusDeviceManager::new(port, SerialTransport::new(port))
        .read(address)
        .await
}
