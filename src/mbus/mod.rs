//! The mbus module contains the link layer of the M-Bus protocol: frame
//! validation and packing, the A/C/CI field decoders, the master requests
//! and the serial transport that carries them.

pub mod address;
pub mod control;
pub mod frame;
pub mod mbus_protocol;
pub mod serial;
pub mod serial_mock;

pub use address::{AField, AddressClass};
pub use control::{CField, CIField, Direction};
pub use frame::*;
pub use mbus_protocol::{req_ud2, short_command, snd_nke, MBusProtocol, Transport};
pub use serial::{SerialConfig, SerialTransport};
pub use serial_mock::MockTransport;

