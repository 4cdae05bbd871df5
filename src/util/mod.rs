//! # Utility Modules
//!
//! Bit manipulation over single octets and hex text conversion, shared by the
//! field decoders, the CLI and the tests.

pub mod bits;
pub mod hex;

pub use bits::{assign_bit, bool_to_int, clear_bit, has_bit, set_bit, slice_byte};
pub use hex::{decode_hex, encode_hex, encode_hex_upper, format_hex_compact, HexError};
