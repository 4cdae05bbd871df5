//! # Address Field (A field)
//!
//! One octet naming the slave a frame is addressed to (or sent from).
//!
//! | Value   | Meaning                         |
//! |---------|---------------------------------|
//! | 0       | unconfigured slave              |
//! | 1..=250 | primary slave address           |
//! | 251     | reserved                        |
//! | 252     | reserved                        |
//! | 253     | network layer (secondary addr.) |
//! | 254     | broadcast, all slaves reply     |
//! | 255     | broadcast, no reply             |

use crate::constants::{
    MBUS_ADDRESS_BROADCAST_NOREPLY, MBUS_ADDRESS_BROADCAST_REPLY, MBUS_ADDRESS_NETWORK_LAYER,
    MBUS_ADDRESS_SLAVE_MAX, MBUS_ADDRESS_SLAVE_MIN, MBUS_ADDRESS_UNCONFIGURED,
};
use crate::error::MBusError;
use serde::Serialize;

/// Classification of an address octet. Every octet maps to exactly one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AddressClass {
    Unconfigured,
    Slave(u8),
    Reserved(u8),
    NetworkLayer,
    BroadcastWithReply,
    BroadcastNoReply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AField(u8);

impl AField {
    pub fn new(b: u8) -> Self {
        AField(b)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn class(&self) -> AddressClass {
        match self.0 {
            MBUS_ADDRESS_UNCONFIGURED => AddressClass::Unconfigured,
            MBUS_ADDRESS_SLAVE_MIN..=MBUS_ADDRESS_SLAVE_MAX => AddressClass::Slave(self.0),
            MBUS_ADDRESS_NETWORK_LAYER => AddressClass::NetworkLayer,
            MBUS_ADDRESS_BROADCAST_REPLY => AddressClass::BroadcastWithReply,
            MBUS_ADDRESS_BROADCAST_NOREPLY => AddressClass::BroadcastNoReply,
            other => AddressClass::Reserved(other),
        }
    }

    pub fn is_unconfigured(&self) -> bool {
        self.0 == MBUS_ADDRESS_UNCONFIGURED
    }

    pub fn is_slave_address(&self) -> bool {
        (MBUS_ADDRESS_SLAVE_MIN..=MBUS_ADDRESS_SLAVE_MAX).contains(&self.0)
    }

    pub fn is_broadcast_with_reply(&self) -> bool {
        self.0 == MBUS_ADDRESS_BROADCAST_REPLY
    }

    pub fn is_broadcast_no_reply(&self) -> bool {
        self.0 == MBUS_ADDRESS_BROADCAST_NOREPLY
    }

    pub fn is_network_layer(&self) -> bool {
        self.0 == MBUS_ADDRESS_NETWORK_LAYER
    }

    /// The primary slave address, or `InvalidAddress` outside 1..=250.
    pub fn slave_address(&self) -> Result<u8, MBusError> {
        if self.is_slave_address() {
            Ok(self.0)
        } else {
            Err(MBusError::InvalidAddress(self.0))
        }
    }
}

impl From<u8> for AField {
    fn from(b: u8) -> Self {
        AField(b)
    }
}
