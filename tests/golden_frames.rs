//! Complete telegrams captured from real heat meters.

use mbus_telegram::error::MBusError;
use mbus_telegram::{parse_telegram, DataRecord, MBusFrame, MBusFrameType, ParsedTelegram};

fn hex_to_bytes(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}

fn parse(hex: &str) -> ParsedTelegram {
    parse_telegram(&hex_to_bytes(hex)).unwrap()
}

fn assert_record(record: &DataRecord, value: &str, unit: &str, name: &str, function: &str) {
    assert_eq!(record.value, value, "value of {:?}", record);
    assert_eq!(record.unit, unit, "unit of {:?}", record);
    assert_eq!(record.name, name, "name of {:?}", record);
    assert_eq!(record.function, function, "function of {:?}", record);
}

const EXAMPLE_DATA_01_HEX: &str = "6831316808017245585703B40534049E0027B60306F934150315C6004D052E00000000053D00000000055B22F32642055FC7DA0D42FA16";

const EDC_HEX: &str = "68AEAE682801729508121183140204170000008400863B230000008400863CD10100008440863B000000008440863C0000000085005B2B4BAC4185005F20D7AC4185405B0000B84285405F0000B84285003B8400353F85403B0000000095003B95CFB24395403B0000000085002B0000000085402B0000000095002BD39F904695402B00000000046D190F8A1784007C0143F30D000084407C01439D01000084007C01630100000084407C0163010000000F2F16";

const APPLICATION_BUSY_HEX: &str = "68040468080170088116";

const EFE_ENGELMANN_HEX: &str = "68A1A16808007245330824C5140004662700000478917B6F01046D172ECC13041500000000441500000000840115000000000406000000004406000000008401060000000084100600000000C410060000000084110600000000426CBF1C026CDF1C8420060000000084300600000000043B00000000143B19000000042B00000000142B0B000000025B1600025F150004610900000002230C0201FD17000490280B000000EB16";

const ELS_ELSTER_HEX: &str = "686868680800725139494493152F04A17000000C06000000008C1006000000008C2013000000000C13000000003C2BBDEBDDDD3B3BBDEBDD0A5A27020A5E26020A6201000A273007046D090DCD134C06000000004C1300000000CC100600000000CC201300000000426CBF154016";

#[test]
fn test_golden_frames_verify() {
    for hex in [
        EXAMPLE_DATA_01_HEX,
        EDC_HEX,
        APPLICATION_BUSY_HEX,
        EFE_ENGELMANN_HEX,
        ELS_ELSTER_HEX,
    ] {
        let frame = MBusFrame::try_from(hex_to_bytes(hex)).unwrap();
        assert_eq!(frame.frame_type(), MBusFrameType::Long);
        frame.verify().unwrap();
        assert!(frame.checksum_matches(), "checksum of {}", hex);
    }
}

#[test]
fn test_example_data_01() {
    let telegram = parse(EXAMPLE_DATA_01_HEX);
    assert_eq!(telegram.identification_number, "03575845");
    assert_eq!(telegram.manufacturer, "AMT");
    assert_eq!(telegram.version, 0x34);
    assert_eq!(telegram.medium.name(), "Heat");
    assert_eq!(telegram.access_number, 0x9E);
    assert_eq!(telegram.status, 0);
    assert_eq!(telegram.signature, vec![0x27, 0xB6]);
    assert_eq!(telegram.address, 1);
    assert_eq!(telegram.records.len(), 6);

    let r = &telegram.records;
    assert_record(&r[&0], "1389817000.000000", "Wh", "Energy", "INSTANTANEOUS");
    assert_eq!(r[&0].exponent, 1e3);
    assert_record(&r[&1], "504647.000000", "m^3", "Volume", "INSTANTANEOUS");
    assert_record(&r[&2], "0.000000", "W", "Power", "INSTANTANEOUS");
    assert_record(&r[&3], "0.000000", "m^3/h", "Volume Flow", "INSTANTANEOUS");
    assert_record(&r[&4], "41.737434", "°C", "Flow temperature", "INSTANTANEOUS");
    assert_record(&r[&5], "35.463650", "°C", "Return temperature", "INSTANTANEOUS");
    assert!(!telegram.more_records_follow());
}

#[test]
fn test_edc() {
    let telegram = parse(EDC_HEX);
    assert_eq!(telegram.identification_number, "11120895");
    assert_eq!(telegram.manufacturer, "EDC");
    assert_eq!(telegram.version, 2);
    assert_eq!(telegram.access_number, 0x17);
    assert_eq!(telegram.control_field().encode(), 0x28);
    assert_eq!(telegram.records.len(), 22);

    let r = &telegram.records;

    // Energy with combinable VIFEs that have no table row
    assert_eq!(r[&0].dife, vec![0x00]);
    assert_eq!(r[&0].vif, 0x86);
    assert_eq!(r[&0].vife, vec![0x3B]);
    assert_eq!(r[&0].exponent, 1e3);
    assert_record(&r[&0], "35000.000000", "", "", "INSTANTANEOUS");
    assert_eq!(r[&1].vife, vec![0x3C]);
    assert_record(&r[&1], "465000.000000", "", "", "INSTANTANEOUS");
    assert_record(&r[&3], "0.000000", "", "", "INSTANTANEOUS");
    assert_eq!(r[&2].dife, vec![0x40]);
    assert_eq!(r[&2].device_unit(), 1);

    assert_record(&r[&4], "21.536703", "°C", "Flow temperature", "INSTANTANEOUS");
    assert_record(&r[&5], "21.605042", "°C", "Return temperature", "INSTANTANEOUS");
    assert_record(&r[&6], "92.000000", "°C", "Flow temperature", "INSTANTANEOUS");
    assert_record(&r[&8], "0.000707", "m^3/h", "Volume Flow", "INSTANTANEOUS");
    assert_record(&r[&10], "0.357622", "m^3/h", "Volume Flow", "MAXIMUM");
    assert_record(&r[&14], "18511.912109", "W", "Power", "MAXIMUM");

    assert_record(
        &r[&16],
        "2012-07-10T15:25:00Z",
        "-",
        "Time point (date & time)",
        "INSTANTANEOUS",
    );

    // Plain text units
    assert_record(&r[&17], "3571.000000", "C", "Plain text VIF", "INSTANTANEOUS");
    assert_record(&r[&18], "413.000000", "C", "Plain text VIF", "INSTANTANEOUS");
    assert_record(&r[&19], "1.000000", "c", "Plain text VIF", "INSTANTANEOUS");
    assert_record(&r[&20], "1.000000", "c", "Plain text VIF", "INSTANTANEOUS");

    // Manufacturer data closes the payload
    assert_eq!(r[&21].dif, 0x0F);
    assert!(r[&21].is_manufacturer_data());
    assert_eq!(r[&21].value, "");
    assert!(!telegram.more_records_follow());
}

#[test]
fn test_application_busy_error() {
    let data = hex_to_bytes(APPLICATION_BUSY_HEX);
    let frame = MBusFrame::try_from(data.as_slice()).unwrap();
    assert!(frame.is_valid());
    assert_eq!(frame.ci_field().unwrap().code(), 0x70);

    let err = parse_telegram(&data).unwrap_err();
    assert_eq!(err, MBusError::Truncated { offset: 10, len: 10 });
    assert!(err.is_bounds());
}

#[test]
fn test_efe_engelmann() {
    let telegram = parse(EFE_ENGELMANN_HEX);
    assert_eq!(telegram.identification_number, "24083345");
    assert_eq!(telegram.manufacturer, "EFE");
    assert_eq!(telegram.address, 0);
    assert_eq!(telegram.status, 0x27);
    assert!(telegram.slave_address().is_err());
    assert_eq!(telegram.records.len(), 25);

    let r = &telegram.records;
    assert_record(&r[&0], "24083345.000000", "-", "Fabrication No", "INSTANTANEOUS");
    assert_record(
        &r[&1],
        "2014-03-12T14:23:00Z",
        "-",
        "Time point (date & time)",
        "INSTANTANEOUS",
    );

    assert_eq!(r[&3].storage_number(), 1);
    assert_eq!(r[&8].tariff(), 1);
    assert_eq!(r[&4].storage_number(), 2);
    assert_eq!(r[&9].storage_number(), 1);

    assert_record(&r[&11], "2013-12-31", "-", "Time point (date)", "INSTANTANEOUS");
    assert_record(&r[&12], "2014-12-31", "-", "Time point (date)", "INSTANTANEOUS");
    assert_record(&r[&16], "0.025000", "m^3/h", "Volume Flow", "MAXIMUM");
    assert_record(&r[&18], "11.000000", "W", "Power", "MAXIMUM");
    assert_record(&r[&21], "0.090000", "K", "Temperature difference", "INSTANTANEOUS");

    // 0xFD redirects to the extension table
    assert_eq!(r[&23].dif, 0x01);
    assert_eq!(r[&23].vif, 0x17);
    assert_record(&r[&23], "0.000000", "", "Error flags", "INSTANTANEOUS");

    assert_eq!(r[&24].vif, 0x90);
    assert_eq!(r[&24].vife, vec![0x28]);
    assert_eq!(r[&24].exponent, 1e-6);
    assert_record(&r[&24], "0.000011", "", "", "INSTANTANEOUS");
}

#[test]
fn test_els_elster() {
    let telegram = parse(ELS_ELSTER_HEX);
    assert_eq!(telegram.identification_number, "44493951");
    assert_eq!(telegram.manufacturer, "ELS");
    assert_eq!(telegram.version, 0x2F);
    assert_eq!(telegram.status, 0x70);
    assert_eq!(telegram.records.len(), 16);

    let r = &telegram.records;
    assert_eq!(r[&1].dife, vec![0x10]);
    assert_record(&r[&2], "0.000000", "m^3", "Volume", "INSTANTANEOUS");

    // BCD with invalid digits decodes as zero
    assert_record(&r[&4], "0.000000", "W", "Power", "VALUE_DURING_ERROR");
    assert_record(&r[&5], "0.000000", "m^3/h", "Volume Flow", "VALUE_DURING_ERROR");

    assert_record(&r[&6], "22.700000", "°C", "Flow temperature", "INSTANTANEOUS");
    assert_record(&r[&7], "22.600000", "°C", "Return temperature", "INSTANTANEOUS");
    assert_record(&r[&8], "0.100000", "K", "Temperature difference", "INSTANTANEOUS");
    assert_record(&r[&9], "63072000.000000", "s", "Operating time [days]", "INSTANTANEOUS");
    assert_record(
        &r[&10],
        "2014-03-13T13:09:00Z",
        "-",
        "Time point (date & time)",
        "INSTANTANEOUS",
    );
    assert_record(&r[&15], "2013-05-31", "-", "Time point (date)", "INSTANTANEOUS");
    assert_eq!(r[&15].storage_number(), 1);
}

#[test]
fn test_json_layout() {
    let telegram = parse(EXAMPLE_DATA_01_HEX);
    let json: serde_json::Value = serde_json::from_str(&telegram.to_json(false).unwrap()).unwrap();

    assert_eq!(json["identification_number"], "03575845");
    assert_eq!(json["manufacturer"], "AMT");
    assert_eq!(json["medium"], "Heat");
    assert_eq!(json["signature"], serde_json::json!([0x27, 0xB6]));

    let record = &json["Records"]["4"];
    assert_eq!(record["DIF"], 0x05);
    assert_eq!(record["VIF"], 0x5B);
    assert_eq!(record["DIFE"], serde_json::json!([]));
    assert_eq!(record["value"], "41.737434");
    assert_eq!(record["unit"], "°C");
    assert_eq!(record["function"], "INSTANTANEOUS");
    assert!(json.get("control").is_none());
}

#[test]
fn test_trailing_octets_reach_the_record_walk() {
    let mut data = hex_to_bytes(EXAMPLE_DATA_01_HEX);
    let stop = data.pop().unwrap();
    data.extend_from_slice(&[0x00, 0x00]);
    data.push(stop);

    let frame = MBusFrame::try_from(data.as_slice()).unwrap();
    assert!(frame.is_valid());

    // The old checksum octet now reads as a DIF whose VIF is missing
    assert_eq!(
        parse_telegram(&data).unwrap_err(),
        MBusError::Truncated { offset: 55, len: 55 }
    );
}
