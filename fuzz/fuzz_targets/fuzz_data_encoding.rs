#![no_main]

use libfuzzer_sys::fuzz_target;
use mbus_telegram::payload::data_encoding::{
    decode_bcd, decode_date, decode_date_time, decode_manufacturer, decode_real32, decode_real64,
    decode_uint,
};
use mbus_telegram::payload::decode_records;

fuzz_target!(|data: &[u8]| {
    let _ = decode_records(data, 0, data.len());

    for len in 0..=data.len().min(8) {
        let _ = decode_bcd(&data[..len]);
        let _ = decode_uint(&data[..len]);
    }

    if data.len() >= 8 {
        let _ = decode_real32(&data[..4], 1.0);
        let _ = decode_real64(&data[..8], 1e-3);
        let _ = decode_date(&data[..2]);
        let _ = decode_date_time(&data[..4]);
        let _ = decode_manufacturer(&data[..2]);
    }
});
