//! Address, control and control-information field decoding.

use mbus_telegram::error::MBusError;
use mbus_telegram::mbus::{AddressClass, Direction};
use mbus_telegram::{AField, CField, CIField};

#[test]
fn test_address_classes() {
    assert!(AField::new(0).is_unconfigured());
    assert!(AField::new(1).is_slave_address());
    assert!(AField::new(250).is_slave_address());
    assert!(!AField::new(251).is_slave_address());
    assert!(AField::new(253).is_network_layer());
    assert!(AField::new(254).is_broadcast_with_reply());
    assert!(AField::new(255).is_broadcast_no_reply());
    assert_eq!(AField::from(252).class(), AddressClass::Reserved(252));
}

#[test]
fn test_slave_address() {
    assert_eq!(AField::new(5).slave_address(), Ok(5));
    assert_eq!(
        AField::new(0xFD).slave_address(),
        Err(MBusError::InvalidAddress(0xFD))
    );
}

#[test]
fn test_snd_nke_control() {
    let c = CField::decode(0x40);
    assert_eq!(c.direction, Direction::MasterToSlave);
    assert!(!c.fcb && !c.fcv);
    assert!(!c.acd && !c.dfc);
    assert_eq!(c.function(), 0x0);
    assert_eq!(c.command_name(), Some("SND_NKE"));
    assert_eq!(c.encode(), 0x40);
}

#[test]
fn test_snd_ud_without_fcb() {
    let c = CField::decode(0x53);
    assert!(c.is_from_master());
    assert!(c.fcv);
    assert!(!c.fcb);
    assert!(c.f1 && c.f0);
    assert!(!c.f3 && !c.f2);
    assert_eq!(c.encode(), 0x53);
}

#[test]
fn test_snd_ud_control() {
    let c = CField::decode(0x73);
    assert!(c.is_from_master());
    assert!(c.fcb);
    assert!(c.fcv);
    assert_eq!(c.function(), 0x3);
    assert_eq!(c.command_name(), Some("SND_UD"));
    assert_eq!(c.encode(), 0x73);
}

#[test]
fn test_rsp_ud_control() {
    let c = CField::decode(0x28);
    assert!(c.is_from_slave());
    assert!(c.acd);
    assert!(!c.dfc);
    assert!(!c.fcb && !c.fcv);
    assert!(c.f3);
    assert!(!c.f2 && !c.f1 && !c.f0);
    assert_eq!(c.command_name(), Some("RSP_UD"));
    assert_eq!(c.encode(), 0x28);
}

#[test]
fn test_control_display() {
    assert_eq!(
        CField::decode(0x5B).to_string(),
        "C=0x5B M->S FCB=0 FCV=1 F=0xB"
    );
    assert_eq!(
        CField::decode(0x08).to_string(),
        "C=0x08 S->M ACD=0 DFC=0 F=0x8"
    );
}

#[test]
fn test_ci_codes() {
    assert_eq!(CIField::decode(0x72), CIField::VariableDataStructure72);
    assert_eq!(CIField::decode(0x72).as_str(), "VARIABLE_DATA_STRUCTURE_72");
    assert_eq!(CIField::decode(0x51).as_str(), "DATA_SEND");
    assert_eq!(CIField::decode(0x93), CIField::HashingCode(3));
    assert_eq!(CIField::decode(0x93).as_str(), "CODES_USED_FOR_HASHING_3");
    assert_eq!(CIField::decode(0x00), CIField::Undefined(0x00));
    assert_eq!(CIField::decode(0x00).as_str(), "UNDEFINED");
}

#[test]
fn test_ci_baudrate_switch() {
    assert_eq!(CIField::decode(0xBD).baudrate(), Some(9600));
    assert_eq!(CIField::decode(0xB8).baudrate(), Some(300));
    assert_eq!(CIField::decode(0x72).baudrate(), None);
}

#[test]
fn test_ci_code_round_trip() {
    for b in 0..=255u8 {
        assert_eq!(CIField::decode(b).code(), b);
    }
}
