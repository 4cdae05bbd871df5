use mbus_telegram::error::MBusError;
use mbus_telegram::payload::data_encoding::*;

#[test]
fn test_format_value() {
    assert_eq!(format_value(0.0), "0.000000");
    assert_eq!(format_value(-1.5), "-1.500000");
    assert_eq!(format_value(1e-7), "0.000000");
    assert_eq!(format_value(22.7), "22.700000");
}

#[test]
fn test_decode_int() {
    assert_eq!(decode_int(&[0x01, 0x02, 0xAA], 2), Ok((&[0xAA][..], 0x0201)));
    assert_eq!(decode_int(&[0x01, 0x02, 0x03], 3).unwrap().1, 0x030201);
    assert_eq!(
        decode_int(&[0x01, 0x00, 0x00, 0x00, 0x00, 0x80], 6).unwrap().1,
        0x8000_0000_0001
    );
    assert!(decode_int(&[0x01], 2).is_err());
}

#[test]
fn test_decode_uint_is_unsigned() {
    assert_eq!(decode_uint(&[0xFF, 0xFF]).unwrap(), 0xFFFF);
    assert_eq!(decode_scaled_int(&[0xFF], 1.0).unwrap(), "255.000000");
    assert_eq!(
        decode_uint(&[0; 9]),
        Err(MBusError::InsufficientLength {
            field: "integer",
            needed: 8,
            len: 9
        })
    );
}

#[test]
fn test_bcd_values() {
    assert_eq!(decode_bcd(&[0x45, 0x23, 0x01]), 12345);
    assert_eq!(decode_bcd(&[0x99, 0x99, 0x99, 0x99, 0x99, 0x99]), 999_999_999_999);
    assert_eq!(decode_bcd(&[0x01, 0xF0]), -1);
    assert_eq!(decode_bcd(&[0x0A]), 0);
    assert_eq!(decode_bcd(&[]), 0);
    assert_eq!(decode_scaled_bcd(&[0x30, 0x07], 86400.0), "63072000.000000");
}

#[test]
fn test_encode_bcd() {
    assert_eq!(encode_bcd(730, 2), vec![0x30, 0x07]);
    assert_eq!(encode_bcd(1, 3), vec![0x01, 0x00, 0x00]);
    assert_eq!(decode_bcd(&encode_bcd(987_654, 3)), 987_654);
}

#[test]
fn test_reals() {
    assert_eq!(
        decode_real32(&[0x22, 0xF3, 0x26, 0x42], 1.0).unwrap(),
        "41.737434"
    );
    assert_eq!(
        decode_real64(&2.25f64.to_le_bytes(), 10.0).unwrap(),
        "22.500000"
    );
    assert_eq!(
        decode_real64(&[0; 4], 1.0),
        Err(MBusError::InsufficientLength {
            field: "real64",
            needed: 8,
            len: 4
        })
    );
}

#[test]
fn test_ascii_is_reversed() {
    assert_eq!(decode_ascii(b"CBA"), "ABC");
    assert_eq!(decode_ascii(&[]), "");
}

#[test]
fn test_date_time_examples() {
    assert_eq!(
        decode_date_time(&[0x19, 0x0F, 0x8A, 0x17]).unwrap(),
        "2012-07-10T15:25:00Z"
    );
    assert_eq!(
        decode_date_time(&[0x09, 0x0D, 0xCD, 0x13]).unwrap(),
        "2014-03-13T13:09:00Z"
    );
    assert_eq!(decode_date(&[0xBF, 0x15]).unwrap(), "2013-05-31");
}

#[test]
fn test_date_year_window() {
    // Base year 0 lands in 2000, base 80 stays in 1980
    assert_eq!(decode_date(&[0x01, 0x01]).unwrap(), "2000-01-01");
    assert_eq!(decode_date(&[0x01, 0xA1]).unwrap(), "1980-01-01");
}

#[test]
fn test_date_impossible_values_still_decode() {
    assert_eq!(decode_date(&[0x00, 0x00]).unwrap(), "2000-00-00");
    assert_eq!(
        decode_date_time(&[0x3F, 0x1F, 0x00, 0x0F]).unwrap(),
        "2000-15-00T31:63:00Z"
    );
}

#[test]
fn test_manufacturer_codes() {
    assert_eq!(decode_manufacturer(&[0x83, 0x14]).unwrap(), "EDC");
    assert_eq!(decode_manufacturer(&[0xC5, 0x14]).unwrap(), "EFE");
    assert_eq!(encode_manufacturer("EDC").unwrap(), [0x83, 0x14]);
    assert_eq!(encode_manufacturer("AB"), Err(MBusError::InvalidManufacturer));
    assert_eq!(encode_manufacturer("A1C"), Err(MBusError::InvalidManufacturer));
}
