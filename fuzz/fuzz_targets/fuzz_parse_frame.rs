#![no_main]

use libfuzzer_sys::fuzz_target;
use mbus_telegram::{parse_telegram, MBusFrame};

fuzz_target!(|data: &[u8]| {
    // Malformed input must come back as an error, never a panic
    let _ = parse_telegram(data);

    if let Ok(frame) = MBusFrame::try_from(data) {
        let _ = frame.verify();
        let _ = frame.checksum_matches();
        let _ = frame.control_field();
        let _ = frame.address_field();
        let _ = frame.ci_field();
    }

    // Force matching length octets so the record walk is reached more often
    if data.len() >= 20 && data[0] == 0x68 {
        let mut fixed = data.to_vec();
        let l = (data.len() - 6).min(255) as u8;
        fixed[1] = l;
        fixed[2] = l;
        fixed[3] = 0x68;
        if let Some(last) = fixed.last_mut() {
            *last = 0x16;
        }
        let _ = parse_telegram(&fixed);
    }
});
