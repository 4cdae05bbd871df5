//! M-Bus Protocol Constants
//!
//! Frame markers, field masks and control codes used by the telegram codec,
//! based on the EN 13757 standard.

// ----------------------------------------------------------------------------
// Frame markers
// ----------------------------------------------------------------------------

/// Single character acknowledgement
pub const MBUS_FRAME_ACK: u8 = 0xE5;

/// Short frame start
pub const MBUS_FRAME_SHORT_START: u8 = 0x10;

/// Control and long frame start (appears twice)
pub const MBUS_FRAME_LONG_START: u8 = 0x68;

/// Stop octet for short, control and long frames
pub const MBUS_FRAME_STOP: u8 = 0x16;

/// Length of a short frame
pub const MBUS_FRAME_SHORT_LENGTH: usize = 5;

/// Octets a long frame carries beyond its L field: 68 L L 68 ... CS 16
pub const MBUS_FRAME_LONG_OVERHEAD: usize = 6;

/// Smallest long/control frame: 68 L L 68 CS 16
pub const MBUS_FRAME_LONG_MIN_LENGTH: usize = 6;

/// L field value of a control frame (C, A, CI only)
pub const MBUS_FRAME_CONTROL_LENGTH_FIELD: u8 = 0x03;

// ----------------------------------------------------------------------------
// Long frame header offsets (0-based)
// ----------------------------------------------------------------------------

pub const MBUS_OFFSET_C_FIELD_LONG: usize = 4;
pub const MBUS_OFFSET_A_FIELD_LONG: usize = 5;
pub const MBUS_OFFSET_CI_FIELD: usize = 6;
pub const MBUS_OFFSET_C_FIELD_SHORT: usize = 1;
pub const MBUS_OFFSET_A_FIELD_SHORT: usize = 2;
pub const MBUS_OFFSET_IDENTIFICATION: usize = 7;
pub const MBUS_OFFSET_MANUFACTURER: usize = 11;
pub const MBUS_OFFSET_VERSION: usize = 13;
pub const MBUS_OFFSET_MEDIUM: usize = 14;
pub const MBUS_OFFSET_ACCESS_NUMBER: usize = 15;
pub const MBUS_OFFSET_STATUS: usize = 16;
pub const MBUS_OFFSET_SIGNATURE: usize = 17;

/// First variable data record
pub const MBUS_OFFSET_FIRST_RECORD: usize = 19;

/// Shortest buffer that carries a complete variable data header plus stop octet
pub const MBUS_VARIABLE_HEADER_MIN_LENGTH: usize = 20;

// ----------------------------------------------------------------------------
// Address field
// ----------------------------------------------------------------------------

pub const MBUS_ADDRESS_UNCONFIGURED: u8 = 0x00;
pub const MBUS_ADDRESS_SLAVE_MIN: u8 = 1;
pub const MBUS_ADDRESS_SLAVE_MAX: u8 = 250;
pub const MBUS_ADDRESS_NETWORK_LAYER: u8 = 0xFD;
pub const MBUS_ADDRESS_BROADCAST_REPLY: u8 = 0xFE;
pub const MBUS_ADDRESS_BROADCAST_NOREPLY: u8 = 0xFF;

// ----------------------------------------------------------------------------
// Control field
// ----------------------------------------------------------------------------

// Control masks (full control bytes for common commands)
pub const MBUS_CONTROL_MASK_SND_NKE: u8 = 0x40;
pub const MBUS_CONTROL_MASK_SND_UD: u8 = 0x53; // includes DIR M2S
pub const MBUS_CONTROL_MASK_REQ_UD2: u8 = 0x5B; // includes DIR M2S
pub const MBUS_CONTROL_MASK_REQ_UD1: u8 = 0x5A; // includes DIR M2S
pub const MBUS_CONTROL_MASK_RSP_UD: u8 = 0x08; // S2M response

// Control flag bits
pub const MBUS_CONTROL_MASK_RESERVED: u8 = 0x80;
pub const MBUS_CONTROL_MASK_DIR_M2S: u8 = 0x40;
pub const MBUS_CONTROL_MASK_FCB: u8 = 0x20;
pub const MBUS_CONTROL_MASK_FCV: u8 = 0x10;
pub const MBUS_CONTROL_MASK_ACD: u8 = 0x20;
pub const MBUS_CONTROL_MASK_DFC: u8 = 0x10;
pub const MBUS_CONTROL_MASK_FUNCTION: u8 = 0x0F;

// ----------------------------------------------------------------------------
// Data information block
// ----------------------------------------------------------------------------

/// DIF (Data Information Field) mask for data length
pub const MBUS_DATA_RECORD_DIF_MASK_DATA: u8 = 0x0F;

/// DIF mask for function
pub const MBUS_DATA_RECORD_DIF_MASK_FUNCTION: u8 = 0x30;

/// DIF mask for storage number
pub const MBUS_DATA_RECORD_DIF_MASK_STORAGE_NO: u8 = 0x40;

/// DIFE (Data Information Field Extension) mask for storage number
pub const MBUS_DATA_RECORD_DIFE_MASK_STORAGE_NO: u8 = 0x0F;

/// DIFE mask for tariff
pub const MBUS_DATA_RECORD_DIFE_MASK_TARIFF: u8 = 0x30;

/// DIFE mask for device
pub const MBUS_DATA_RECORD_DIFE_MASK_DEVICE: u8 = 0x40;

/// DIF idle filler
pub const MBUS_DIB_DIF_IDLE_FILLER: u8 = 0x2F;

/// DIF manufacturer specific
pub const MBUS_DIB_DIF_MANUFACTURER_SPECIFIC: u8 = 0x0F;

/// DIF more records follow
pub const MBUS_DIB_DIF_MORE_RECORDS_FOLLOW: u8 = 0x1F;

/// DIF extension bit
pub const MBUS_DIB_DIF_EXTENSION_BIT: u8 = 0x80;

// ----------------------------------------------------------------------------
// Value information block
// ----------------------------------------------------------------------------

/// VIF without extension
pub const MBUS_DIB_VIF_WITHOUT_EXTENSION: u8 = 0x7F;

/// VIF extension bit
pub const MBUS_DIB_VIF_EXTENSION_BIT: u8 = 0x80;

/// Redirect to the first extension table
pub const MBUS_DIB_VIF_EXTENSION_FB: u8 = 0xFB;

/// Redirect to the second extension table
pub const MBUS_DIB_VIF_EXTENSION_FD: u8 = 0xFD;

/// Manufacturer specific VIF (with and without extension bit)
pub const MBUS_DIB_VIF_MANUFACTURER_SPECIFIC: u8 = 0x7F;
pub const MBUS_DIB_VIF_MANUFACTURER_SPECIFIC_EXT: u8 = 0xFF;

/// Plain text VIF: a length octet and ASCII unit follow
pub const MBUS_DIB_VIF_PLAIN_TEXT: u8 = 0x7C;

/// VIFE switching the rest of the chain to manufacturer octets
pub const MBUS_DIB_VIFE_MANUFACTURER_SPECIFIC: u8 = 0xFF;

/// Time point VIFs
pub const MBUS_DIB_VIF_TIME_POINT_DATE: u8 = 0x6C;
pub const MBUS_DIB_VIF_TIME_POINT_DATE_TIME: u8 = 0x6D;

// ----------------------------------------------------------------------------
// Control information (CI) codes
// ----------------------------------------------------------------------------

pub const MBUS_CONTROL_INFO_APPLICATION_RESET: u8 = 0x50;
pub const MBUS_CONTROL_INFO_DATA_SEND: u8 = 0x51;
pub const MBUS_CONTROL_INFO_SELECT_SLAVE: u8 = 0x52;
pub const MBUS_CONTROL_INFO_SYNCHRONIZE_ACTION: u8 = 0x54;
pub const MBUS_CONTROL_INFO_RESP_VARIABLE: u8 = 0x72;
pub const MBUS_CONTROL_INFO_RESP_VARIABLE_MSB: u8 = 0x76;

// ----------------------------------------------------------------------------
// Serial line defaults
// ----------------------------------------------------------------------------

pub const MBUS_DEFAULT_BAUDRATE: u32 = 2400;
