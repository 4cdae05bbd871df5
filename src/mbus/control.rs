//! # Control Field (C field) and Control Information Field (CI field)
//!
//! The C field layout depends on the direction bit:
//!
//! ```text
//!   bit   8     7     6     5     4   3   2   1
//!   M→S   res   1     FCB   FCV   F3  F2  F1  F0
//!   S→M   res   0     ACD   DFC   F3  F2  F1  F0
//! ```
//!
//! The CI field names the application layer operation carried by a long frame.

use crate::constants::{
    MBUS_CONTROL_MASK_ACD, MBUS_CONTROL_MASK_DFC, MBUS_CONTROL_MASK_DIR_M2S,
    MBUS_CONTROL_MASK_FCB, MBUS_CONTROL_MASK_FCV, MBUS_CONTROL_MASK_FUNCTION,
    MBUS_CONTROL_MASK_RESERVED,
};
use crate::util::bits::{assign_bit, has_bit};
use serde::Serialize;
use std::fmt;

/// Who sent the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// Calling direction, bit 7 set.
    MasterToSlave,
    /// Reply direction, bit 7 clear.
    SlaveToMaster,
}

/// Decoded control octet.
///
/// Only the flag pair belonging to `direction` is ever set by [`CField::decode`];
/// [`CField::encode`] ignores the other pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CField {
    pub reserved: bool,
    pub direction: Direction,
    /// Frame count bit (master to slave).
    pub fcb: bool,
    /// Frame count bit valid (master to slave).
    pub fcv: bool,
    /// Access demand (slave to master).
    pub acd: bool,
    /// Data flow control (slave to master).
    pub dfc: bool,
    pub f3: bool,
    pub f2: bool,
    pub f1: bool,
    pub f0: bool,
}

impl CField {
    pub fn decode(b: u8) -> Self {
        let from_master = b & MBUS_CONTROL_MASK_DIR_M2S != 0;
        CField {
            reserved: b & MBUS_CONTROL_MASK_RESERVED != 0,
            direction: if from_master {
                Direction::MasterToSlave
            } else {
                Direction::SlaveToMaster
            },
            fcb: from_master && b & MBUS_CONTROL_MASK_FCB != 0,
            fcv: from_master && b & MBUS_CONTROL_MASK_FCV != 0,
            acd: !from_master && b & MBUS_CONTROL_MASK_ACD != 0,
            dfc: !from_master && b & MBUS_CONTROL_MASK_DFC != 0,
            f3: has_bit(b, 4),
            f2: has_bit(b, 3),
            f1: has_bit(b, 2),
            f0: has_bit(b, 1),
        }
    }

    pub fn encode(&self) -> u8 {
        let from_master = self.is_from_master();
        let mut b = 0u8;
        b = assign_bit(b, 8, self.reserved);
        b = assign_bit(b, 7, from_master);
        b = assign_bit(b, 6, if from_master { self.fcb } else { self.acd });
        b = assign_bit(b, 5, if from_master { self.fcv } else { self.dfc });
        b = assign_bit(b, 4, self.f3);
        b = assign_bit(b, 3, self.f2);
        b = assign_bit(b, 2, self.f1);
        b = assign_bit(b, 1, self.f0);
        b
    }

    pub fn is_from_master(&self) -> bool {
        self.direction == Direction::MasterToSlave
    }

    pub fn is_from_slave(&self) -> bool {
        !self.is_from_master()
    }

    /// The four function bits F3..F0.
    pub fn function(&self) -> u8 {
        self.encode() & MBUS_CONTROL_MASK_FUNCTION
    }

    /// Name of the standard command this control octet represents, if any.
    pub fn command_name(&self) -> Option<&'static str> {
        let b = self.encode() & !MBUS_CONTROL_MASK_RESERVED;
        match b {
            0x40 => Some("SND_NKE"),
            0x53 | 0x73 => Some("SND_UD"),
            0x5A | 0x7A => Some("REQ_UD1"),
            0x5B | 0x7B => Some("REQ_UD2"),
            0x08 | 0x18 | 0x28 | 0x38 => Some("RSP_UD"),
            _ => None,
        }
    }
}

impl From<u8> for CField {
    fn from(b: u8) -> Self {
        CField::decode(b)
    }
}

impl fmt::Display for CField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.encode();
        let func = b & MBUS_CONTROL_MASK_FUNCTION;
        if self.is_from_master() {
            write!(f, "C=0x{b:02X} M->S FCB={} FCV={} F=0x{func:X}", u8::from(self.fcb), u8::from(self.fcv))
        } else {
            write!(f, "C=0x{b:02X} S->M ACD={} DFC={} F=0x{func:X}", u8::from(self.acd), u8::from(self.dfc))
        }
    }
}

/// Control information codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CIField {
    ApplicationReset,
    DataSend,
    SelectionOfSlaves,
    SynchronizeAction,
    VariableDataStructure72,
    VariableDataStructure76,
    RequestReadoutCompleteRam,
    SendUserDataNotStandardizedRamWrite,
    InitializeTestCalibrationMode,
    EepromRead,
    StartSoftwareTest,
    Baudrate300,
    Baudrate600,
    Baudrate1200,
    Baudrate2400,
    Baudrate4800,
    Baudrate9600,
    Baudrate19200,
    Baudrate38400,
    /// 0x90..=0x97, the index is the low three bits.
    HashingCode(u8),
    Undefined(u8),
}

impl CIField {
    pub fn decode(b: u8) -> Self {
        match b {
            0x50 => CIField::ApplicationReset,
            0x51 => CIField::DataSend,
            0x52 => CIField::SelectionOfSlaves,
            0x54 => CIField::SynchronizeAction,
            0x72 => CIField::VariableDataStructure72,
            0x76 => CIField::VariableDataStructure76,
            0xB1 => CIField::RequestReadoutCompleteRam,
            0xB2 => CIField::SendUserDataNotStandardizedRamWrite,
            0xB3 => CIField::InitializeTestCalibrationMode,
            0xB4 => CIField::EepromRead,
            0xB6 => CIField::StartSoftwareTest,
            0xB8 => CIField::Baudrate300,
            0xB9 => CIField::Baudrate600,
            0xBA => CIField::Baudrate1200,
            0xBB => CIField::Baudrate2400,
            0xBC => CIField::Baudrate4800,
            0xBD => CIField::Baudrate9600,
            0xBE => CIField::Baudrate19200,
            0xBF => CIField::Baudrate38400,
            0x90..=0x97 => CIField::HashingCode(b & 0x07),
            other => CIField::Undefined(other),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            CIField::ApplicationReset => 0x50,
            CIField::DataSend => 0x51,
            CIField::SelectionOfSlaves => 0x52,
            CIField::SynchronizeAction => 0x54,
            CIField::VariableDataStructure72 => 0x72,
            CIField::VariableDataStructure76 => 0x76,
            CIField::RequestReadoutCompleteRam => 0xB1,
            CIField::SendUserDataNotStandardizedRamWrite => 0xB2,
            CIField::InitializeTestCalibrationMode => 0xB3,
            CIField::EepromRead => 0xB4,
            CIField::StartSoftwareTest => 0xB6,
            CIField::Baudrate300 => 0xB8,
            CIField::Baudrate600 => 0xB9,
            CIField::Baudrate1200 => 0xBA,
            CIField::Baudrate2400 => 0xBB,
            CIField::Baudrate4800 => 0xBC,
            CIField::Baudrate9600 => 0xBD,
            CIField::Baudrate19200 => 0xBE,
            CIField::Baudrate38400 => 0xBF,
            CIField::HashingCode(n) => 0x90 | (n & 0x07),
            CIField::Undefined(b) => *b,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CIField::ApplicationReset => "APPLICATION_RESET",
            CIField::DataSend => "DATA_SEND",
            CIField::SelectionOfSlaves => "SELECTION_OF_SLAVES",
            CIField::SynchronizeAction => "SYNCHRONIZE_ACTION",
            CIField::VariableDataStructure72 => "VARIABLE_DATA_STRUCTURE_72",
            CIField::VariableDataStructure76 => "VARIABLE_DATA_STRUCTURE_76",
            CIField::RequestReadoutCompleteRam => "REQUEST_READOUT_COMPLETE_RAM",
            CIField::SendUserDataNotStandardizedRamWrite => {
                "SEND_USER_DATA_NOT_STANDARDIZED_RAM_WRITE"
            }
            CIField::InitializeTestCalibrationMode => "INITIALIZE_TEST_CALIBRATION_MODE",
            CIField::EepromRead => "EEPROM_READ",
            CIField::StartSoftwareTest => "START_SOFTWARE_TEST",
            CIField::Baudrate300 => "BAUDRATE_300",
            CIField::Baudrate600 => "BAUDRATE_600",
            CIField::Baudrate1200 => "BAUDRATE_1200",
            CIField::Baudrate2400 => "BAUDRATE_2400",
            CIField::Baudrate4800 => "BAUDRATE_4800",
            CIField::Baudrate9600 => "BAUDRATE_9600",
            CIField::Baudrate19200 => "BAUDRATE_19200",
            CIField::Baudrate38400 => "BAUDRATE_38400",
            CIField::HashingCode(0) => "CODES_USED_FOR_HASHING_0",
            CIField::HashingCode(1) => "CODES_USED_FOR_HASHING_1",
            CIField::HashingCode(2) => "CODES_USED_FOR_HASHING_2",
            CIField::HashingCode(3) => "CODES_USED_FOR_HASHING_3",
            CIField::HashingCode(4) => "CODES_USED_FOR_HASHING_4",
            CIField::HashingCode(5) => "CODES_USED_FOR_HASHING_5",
            CIField::HashingCode(6) => "CODES_USED_FOR_HASHING_6",
            CIField::HashingCode(_) => "CODES_USED_FOR_HASHING_7",
            CIField::Undefined(_) => "UNDEFINED",
        }
    }

    /// Baud rate requested by a baud rate switch code.
    pub fn baudrate(&self) -> Option<u32> {
        match self {
            CIField::Baudrate300 => Some(300),
            CIField::Baudrate600 => Some(600),
            CIField::Baudrate1200 => Some(1200),
            CIField::Baudrate2400 => Some(2400),
            CIField::Baudrate4800 => Some(4800),
            CIField::Baudrate9600 => Some(9600),
            CIField::Baudrate19200 => Some(19200),
            CIField::Baudrate38400 => Some(38400),
            _ => None,
        }
    }
}

impl From<u8> for CIField {
    fn from(b: u8) -> Self {
        CIField::decode(b)
    }
}

impl fmt::Display for CIField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
