//! Unit tests for the bit and hex helpers in `util`.

use mbus_telegram::util::bits::*;
use mbus_telegram::util::hex::{decode_hex, encode_hex, encode_hex_upper, format_hex_compact, HexError};

#[test]
fn test_bit_positions_are_one_based() {
    assert!(has_bit(0x01, 1));
    assert!(has_bit(0x80, 8));
    assert!(!has_bit(0x80, 7));
    assert!(!has_bit(0xFF, 0));
    assert!(!has_bit(0xFF, 9));
}

#[test]
fn test_set_clear_assign() {
    assert_eq!(set_bit(0x00, 7), 0x40);
    assert_eq!(clear_bit(0xFF, 1), 0xFE);
    assert_eq!(assign_bit(0x00, 8, true), 0x80);
    assert_eq!(assign_bit(0x80, 8, false), 0x00);
    assert_eq!(set_bit(0x00, 9), 0x00);
}

#[test]
fn test_slice_byte() {
    assert_eq!(slice_byte(0b1011_0100, 3, 4), 0b1101);
    assert_eq!(slice_byte(0xFF, 1, 8), 0xFF);
    assert_eq!(bool_to_int(true), 1);
    assert_eq!(bool_to_int(false), 0);
}

#[test]
fn test_hex_round_trip() {
    let data = decode_hex("68 0A 0A 68").unwrap();
    assert_eq!(data, vec![0x68, 0x0A, 0x0A, 0x68]);
    assert_eq!(encode_hex_upper(&data), "680A0A68");
    assert_eq!(encode_hex(&data), "680a0a68");
    assert_eq!(format_hex_compact(&data), "68 0a 0a 68");
}

#[test]
fn test_hex_errors() {
    assert_eq!(decode_hex("6"), Err(HexError::OddLength(1)));
    assert_eq!(decode_hex("6X"), Err(HexError::InvalidCharacter('X')));
    assert_eq!(decode_hex(""), Err(HexError::EmptyString));
}
