//! # Bit Helpers
//!
//! Bit access over a single octet. Positions are 1-based: position 1 is the
//! least significant bit (0x01) and position 8 the most significant (0x80),
//! which is how the field layouts in EN 13757 number their bits.

/// Mask for the bit at `pos` (1..=8). Positions outside the range give 0.
#[inline]
fn mask(pos: u8) -> u8 {
    match pos {
        1..=8 => 1 << (pos - 1),
        _ => 0,
    }
}

/// Returns true when the bit at `pos` is set.
#[inline]
pub fn has_bit(b: u8, pos: u8) -> bool {
    b & mask(pos) != 0
}

/// Sets the bit at `pos`.
#[inline]
pub fn set_bit(b: u8, pos: u8) -> u8 {
    b | mask(pos)
}

/// Clears the bit at `pos`.
#[inline]
pub fn clear_bit(b: u8, pos: u8) -> u8 {
    b & !mask(pos)
}

/// Sets or clears the bit at `pos` depending on `value`.
#[inline]
pub fn assign_bit(b: u8, pos: u8, value: bool) -> u8 {
    if value {
        set_bit(b, pos)
    } else {
        clear_bit(b, pos)
    }
}

/// Extracts `length` bits starting at `start` (1-based), shifted down to bit 1.
///
/// `slice_byte(0b0000_1101, 2, 2) == 0b10`
pub fn slice_byte(b: u8, start: u8, length: u8) -> u8 {
    if start == 0 || start > 8 || length == 0 {
        return 0;
    }
    let length = length.min(9 - start);
    let shifted = (b as u16) >> (start - 1);
    (shifted & ((1u16 << length) - 1)) as u8
}

/// Converts a flag into 0 or 1.
#[inline]
pub fn bool_to_int(b: bool) -> u8 {
    u8::from(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_bit_positions() {
        assert!(has_bit(0x01, 1));
        assert!(!has_bit(0x01, 2));
        assert!(has_bit(0x80, 8));
        assert!(!has_bit(0xFF, 0));
        assert!(!has_bit(0xFF, 9));
    }

    #[test]
    fn test_set_and_clear() {
        assert_eq!(set_bit(0x10, 1), 0x11);
        assert_eq!(clear_bit(0x01, 1), 0x00);
        assert_eq!(assign_bit(0x00, 7, true), 0x40);
        assert_eq!(assign_bit(0x40, 7, false), 0x00);
    }

    #[test]
    fn test_slice_byte() {
        assert_eq!(slice_byte(0b0000_1101, 2, 2), 0b10);
        assert_eq!(slice_byte(0xB5, 5, 2), 0b11);
        assert_eq!(slice_byte(0xFF, 7, 4), 0b11);
        assert_eq!(slice_byte(0xFF, 0, 4), 0);
    }

    #[test]
    fn test_bool_to_int() {
        assert_eq!(bool_to_int(true), 1);
        assert_eq!(bool_to_int(false), 0);
    }
}
