//! VIF/VIFE Mapping Tables and Lookup Functions
//!
//! Static unit/name/exponent data for Value Information Fields as defined in
//! EN 13757-3. Four tables exist:
//!
//! - the primary table, keyed by the VIF without its extension bit
//! - the 0xFB and 0xFD extension tables, keyed by the octet after the
//!   redirecting VIF
//! - combinable VIFEs that refine a primary VIF
//!
//! Tables are stored as `(code, unit, exponent, name)` tuples and indexed once
//! into hash maps on first use. Lookups never fail: a missing key resolves to
//! [`VifEntry::UNRECOGNIZED`].

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One row of a VIF table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VifEntry {
    pub unit: &'static str,
    pub name: &'static str,
    pub exponent: f64,
}

impl VifEntry {
    /// Returned for codes absent from a table.
    pub const UNRECOGNIZED: VifEntry = VifEntry {
        unit: "",
        name: "",
        exponent: 1.0,
    };

    pub fn is_recognized(&self) -> bool {
        *self != VifEntry::UNRECOGNIZED
    }
}

/// Which table a code is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VifTable {
    Primary,
    ExtensionFB,
    ExtensionFD,
    Combinable,
}

impl VifTable {
    /// Table for the VIFE chain that follows a VIF with the given raw value.
    pub fn for_vife_of(parent_vif: u8) -> VifTable {
        match parent_vif {
            0xFB => VifTable::ExtensionFB,
            0xFD => VifTable::ExtensionFD,
            _ => VifTable::Combinable,
        }
    }

    fn codes(&self) -> &'static [(u8, &'static str, f64, &'static str)] {
        match self {
            VifTable::Primary => VIF_CODES,
            VifTable::ExtensionFB => VIFE_FB_CODES,
            VifTable::ExtensionFD => VIFE_FD_CODES,
            VifTable::Combinable => VIFE_CODES,
        }
    }
}

/// Primary VIF table, keyed by the VIF without its extension bit.
pub const VIF_CODES: &[(u8, &str, f64, &str)] = &[
    (0x00, "Wh", 1e-3, "Energy"),
    (0x01, "Wh", 1e-2, "Energy"),
    (0x02, "Wh", 1e-1, "Energy"),
    (0x03, "Wh", 1.0, "Energy"),
    (0x04, "Wh", 1e1, "Energy"),
    (0x05, "Wh", 1e2, "Energy"),
    (0x06, "Wh", 1e3, "Energy"),
    (0x07, "Wh", 1e4, "Energy"),
    (0x08, "J", 1.0, "Energy"),
    (0x09, "J", 1e1, "Energy"),
    (0x0A, "J", 1e2, "Energy"),
    (0x0B, "J", 1e3, "Energy"),
    (0x0C, "J", 1e4, "Energy"),
    (0x0D, "J", 1e5, "Energy"),
    (0x0E, "J", 1e6, "Energy"),
    (0x0F, "J", 1e7, "Energy"),
    (0x10, "m^3", 1e-6, "Volume"),
    (0x11, "m^3", 1e-5, "Volume"),
    (0x12, "m^3", 1e-4, "Volume"),
    (0x13, "m^3", 1e-3, "Volume"),
    (0x14, "m^3", 1e-2, "Volume"),
    (0x15, "m^3", 1e-1, "Volume"),
    (0x16, "m^3", 1.0, "Volume"),
    (0x17, "m^3", 1e1, "Volume"),
    (0x18, "kg", 1e-6, "Mass"),
    (0x19, "kg", 1e-5, "Mass"),
    (0x1A, "kg", 1e-4, "Mass"),
    (0x1B, "kg", 1e-3, "Mass"),
    (0x1C, "kg", 1e-2, "Mass"),
    (0x1D, "kg", 1e-1, "Mass"),
    (0x1E, "kg", 1.0, "Mass"),
    (0x1F, "kg", 1e1, "Mass"),
    (0x20, "s", 1.0, "On time [seconds]"),
    (0x21, "s", 60.0, "On time [minutes]"),
    (0x22, "s", 3600.0, "On time [hours]"),
    (0x23, "s", 86400.0, "On time [days]"),
    (0x24, "s", 1.0, "Operating time [seconds]"),
    (0x25, "s", 60.0, "Operating time [minutes]"),
    (0x26, "s", 3600.0, "Operating time [hours]"),
    (0x27, "s", 86400.0, "Operating time [days]"),
    (0x28, "W", 1e-3, "Power"),
    (0x29, "W", 1e-2, "Power"),
    (0x2A, "W", 1e-1, "Power"),
    (0x2B, "W", 1.0, "Power"),
    (0x2C, "W", 1e1, "Power"),
    (0x2D, "W", 1e2, "Power"),
    (0x2E, "W", 1e3, "Power"),
    (0x2F, "W", 1e4, "Power"),
    (0x30, "J/h", 1.0, "Power"),
    (0x31, "J/h", 1e1, "Power"),
    (0x32, "J/h", 1e2, "Power"),
    (0x33, "J/h", 1e3, "Power"),
    (0x34, "J/h", 1e4, "Power"),
    (0x35, "J/h", 1e5, "Power"),
    (0x36, "J/h", 1e6, "Power"),
    (0x37, "J/h", 1e7, "Power"),
    (0x38, "m^3/h", 1e-6, "Volume Flow"),
    (0x39, "m^3/h", 1e-5, "Volume Flow"),
    (0x3A, "m^3/h", 1e-4, "Volume Flow"),
    (0x3B, "m^3/h", 1e-3, "Volume Flow"),
    (0x3C, "m^3/h", 1e-2, "Volume Flow"),
    (0x3D, "m^3/h", 1e-1, "Volume Flow"),
    (0x3E, "m^3/h", 1.0, "Volume Flow"),
    (0x3F, "m^3/h", 1e1, "Volume Flow"),
    (0x40, "m^3/min", 1e-7, "Volume Flow"),
    (0x41, "m^3/min", 1e-6, "Volume Flow"),
    (0x42, "m^3/min", 1e-5, "Volume Flow"),
    (0x43, "m^3/min", 1e-4, "Volume Flow"),
    (0x44, "m^3/min", 1e-3, "Volume Flow"),
    (0x45, "m^3/min", 1e-2, "Volume Flow"),
    (0x46, "m^3/min", 1e-1, "Volume Flow"),
    (0x47, "m^3/min", 1.0, "Volume Flow"),
    (0x48, "m^3/s", 1e-9, "Volume Flow"),
    (0x49, "m^3/s", 1e-8, "Volume Flow"),
    (0x4A, "m^3/s", 1e-7, "Volume Flow"),
    (0x4B, "m^3/s", 1e-6, "Volume Flow"),
    (0x4C, "m^3/s", 1e-5, "Volume Flow"),
    (0x4D, "m^3/s", 1e-4, "Volume Flow"),
    (0x4E, "m^3/s", 1e-3, "Volume Flow"),
    (0x4F, "m^3/s", 1e-2, "Volume Flow"),
    (0x50, "kg/h", 1e-3, "Mass Flow"),
    (0x51, "kg/h", 1e-2, "Mass Flow"),
    (0x52, "kg/h", 1e-1, "Mass Flow"),
    (0x53, "kg/h", 1.0, "Mass Flow"),
    (0x54, "kg/h", 1e1, "Mass Flow"),
    (0x55, "kg/h", 1e2, "Mass Flow"),
    (0x56, "kg/h", 1e3, "Mass Flow"),
    (0x57, "kg/h", 1e4, "Mass Flow"),
    (0x58, "°C", 1e-3, "Flow temperature"),
    (0x59, "°C", 1e-2, "Flow temperature"),
    (0x5A, "°C", 1e-1, "Flow temperature"),
    (0x5B, "°C", 1.0, "Flow temperature"),
    (0x5C, "°C", 1e-3, "Return temperature"),
    (0x5D, "°C", 1e-2, "Return temperature"),
    (0x5E, "°C", 1e-1, "Return temperature"),
    (0x5F, "°C", 1.0, "Return temperature"),
    (0x60, "K", 1e-3, "Temperature difference"),
    (0x61, "K", 1e-2, "Temperature difference"),
    (0x62, "K", 1e-1, "Temperature difference"),
    (0x63, "K", 1.0, "Temperature difference"),
    (0x64, "°C", 1e-3, "External temperature"),
    (0x65, "°C", 1e-2, "External temperature"),
    (0x66, "°C", 1e-1, "External temperature"),
    (0x67, "°C", 1.0, "External temperature"),
    (0x68, "bar", 1e-3, "Pressure"),
    (0x69, "bar", 1e-2, "Pressure"),
    (0x6A, "bar", 1e-1, "Pressure"),
    (0x6B, "bar", 1.0, "Pressure"),
    (0x6C, "-", 1.0, "Time point (date)"),
    (0x6D, "-", 1.0, "Time point (date & time)"),
    (0x6E, "-", 1.0, "H.C.A."),
    (0x6F, "-", 1.0, "Reserved"),
    (0x70, "s", 1.0, "Averaging Duration"),
    (0x71, "s", 60.0, "Averaging Duration"),
    (0x72, "s", 3600.0, "Averaging Duration"),
    (0x73, "s", 86400.0, "Averaging Duration"),
    (0x74, "s", 1.0, "Actuality Duration"),
    (0x75, "s", 60.0, "Actuality Duration"),
    (0x76, "s", 3600.0, "Actuality Duration"),
    (0x77, "s", 86400.0, "Actuality Duration"),
    (0x78, "-", 1.0, "Fabrication No"),
    (0x79, "-", 1.0, "(Enhanced) Identification"),
    (0x7A, "-", 1.0, "Bus Address"),
    (0x7B, "-", 1.0, "Extension of VIF codes (0xFB table)"),
    (0x7C, "-", 1.0, "Plain text VIF"),
    (0x7D, "-", 1.0, "Extension of VIF codes (0xFD table)"),
    (0x7E, "-", 1.0, "Any VIF"),
    (0x7F, "-", 1.0, "Manufacturer specific"),
];

/// Extension table selected by VIF 0xFB, keyed by the following octet's low 7 bits.
pub const VIFE_FB_CODES: &[(u8, &str, f64, &str)] = &[
    (0x00, "Wh", 1e5, "Energy"),
    (0x01, "Wh", 1e6, "Energy"),
    (0x08, "J", 1e8, "Energy"),
    (0x09, "J", 1e9, "Energy"),
    (0x10, "m^3", 1e2, "Volume"),
    (0x11, "m^3", 1e3, "Volume"),
    (0x18, "kg", 1e5, "Mass"),
    (0x19, "kg", 1e6, "Mass"),
    (0x21, "feet^3", 1e-1, "Volume"),
    (0x22, "American gallon", 1e-1, "Volume"),
    (0x23, "American gallon", 1.0, "Volume"),
    (0x24, "American gallon/min", 1e-3, "Volume flow"),
    (0x25, "American gallon/min", 1.0, "Volume flow"),
    (0x26, "American gallon/h", 1.0, "Volume flow"),
    (0x28, "W", 1e5, "Power"),
    (0x29, "W", 1e6, "Power"),
    (0x30, "J/h", 1e8, "Power"),
    (0x31, "J/h", 1e9, "Power"),
    (0x58, "°F", 1e-3, "Flow temperature"),
    (0x59, "°F", 1e-2, "Flow temperature"),
    (0x5A, "°F", 1e-1, "Flow temperature"),
    (0x5B, "°F", 1.0, "Flow temperature"),
    (0x5C, "°F", 1e-3, "Return temperature"),
    (0x5D, "°F", 1e-2, "Return temperature"),
    (0x5E, "°F", 1e-1, "Return temperature"),
    (0x5F, "°F", 1.0, "Return temperature"),
    (0x60, "°F", 1e-3, "Temperature difference"),
    (0x61, "°F", 1e-2, "Temperature difference"),
    (0x62, "°F", 1e-1, "Temperature difference"),
    (0x63, "°F", 1.0, "Temperature difference"),
    (0x64, "°F", 1e-3, "External temperature"),
    (0x65, "°F", 1e-2, "External temperature"),
    (0x66, "°F", 1e-1, "External temperature"),
    (0x67, "°F", 1.0, "External temperature"),
    (0x70, "°F", 1e-3, "Cold / Warm Temperature Limit"),
    (0x71, "°F", 1e-2, "Cold / Warm Temperature Limit"),
    (0x72, "°F", 1e-1, "Cold / Warm Temperature Limit"),
    (0x73, "°F", 1.0, "Cold / Warm Temperature Limit"),
    (0x74, "°C", 1e-3, "Cold / Warm Temperature Limit"),
    (0x75, "°C", 1e-2, "Cold / Warm Temperature Limit"),
    (0x76, "°C", 1e-1, "Cold / Warm Temperature Limit"),
    (0x77, "°C", 1.0, "Cold / Warm Temperature Limit"),
    (0x78, "W", 1e-3, "Cumul count max power"),
    (0x79, "W", 1e-2, "Cumul count max power"),
    (0x7A, "W", 1e-1, "Cumul count max power"),
    (0x7B, "W", 1.0, "Cumul count max power"),
    (0x7C, "W", 1e1, "Cumul count max power"),
    (0x7D, "W", 1e2, "Cumul count max power"),
    (0x7E, "W", 1e3, "Cumul count max power"),
    (0x7F, "W", 1e4, "Cumul count max power"),
];

/// Extension table selected by VIF 0xFD, keyed by the following octet's low 7 bits.
pub const VIFE_FD_CODES: &[(u8, &str, f64, &str)] = &[
    (0x00, "Currency units", 1e-3, "Credit"),
    (0x01, "Currency units", 1e-2, "Credit"),
    (0x02, "Currency units", 1e-1, "Credit"),
    (0x03, "Currency units", 1.0, "Credit"),
    (0x04, "Currency units", 1e-3, "Debit"),
    (0x05, "Currency units", 1e-2, "Debit"),
    (0x06, "Currency units", 1e-1, "Debit"),
    (0x07, "Currency units", 1.0, "Debit"),
    (0x08, "", 1.0, "Access Number (transmission count)"),
    (0x09, "", 1.0, "Medium"),
    (0x0A, "", 1.0, "Manufacturer"),
    (0x0B, "", 1.0, "Parameter set identification"),
    (0x0C, "", 1.0, "Model / Version"),
    (0x0D, "", 1.0, "Hardware version"),
    (0x0E, "", 1.0, "Firmware version"),
    (0x0F, "", 1.0, "Software version"),
    (0x10, "", 1.0, "Customer location"),
    (0x11, "", 1.0, "Customer"),
    (0x12, "", 1.0, "Access Code User"),
    (0x13, "", 1.0, "Access Code Operator"),
    (0x14, "", 1.0, "Access Code System Operator"),
    (0x15, "", 1.0, "Access Code Developer"),
    (0x16, "", 1.0, "Password"),
    (0x17, "", 1.0, "Error flags"),
    (0x18, "", 1.0, "Error mask"),
    (0x19, "", 1.0, "Reserved"),
    (0x1A, "", 1.0, "Digital Output"),
    (0x1B, "", 1.0, "Digital Input"),
    (0x1C, "Baud", 1.0, "Baudrate"),
    (0x1D, "Bittimes", 1.0, "Response delay time"),
    (0x1F, "", 1.0, "Reserved"),
    (0x20, "", 1.0, "First storage # for cyclic storage"),
    (0x21, "", 1.0, "Last storage # for cyclic storage"),
    (0x22, "", 1.0, "Size of storage block"),
    (0x24, "s", 1.0, "Storage interval"),
    (0x25, "s", 60.0, "Storage interval"),
    (0x26, "s", 3600.0, "Storage interval"),
    (0x27, "s", 86400.0, "Storage interval"),
    (0x28, "s", 2_629_743.83, "Storage interval"),
    (0x29, "s", 31_556_926.0, "Storage interval"),
    (0x2C, "s", 1.0, "Duration since last readout"),
    (0x2D, "s", 60.0, "Duration since last readout"),
    (0x2E, "s", 3600.0, "Duration since last readout"),
    (0x2F, "s", 86400.0, "Duration since last readout"),
    (0x31, "s", 60.0, "Duration of tariff"),
    (0x32, "s", 3600.0, "Duration of tariff"),
    (0x33, "s", 86400.0, "Duration of tariff"),
    (0x34, "s", 1.0, "Period of tariff"),
    (0x35, "s", 60.0, "Period of tariff"),
    (0x36, "s", 3600.0, "Period of tariff"),
    (0x37, "s", 86400.0, "Period of tariff"),
    (0x38, "s", 2_629_743.83, "Period of tariff"),
    (0x39, "s", 31_556_926.0, "Period of tariff"),
    (0x3A, "", 1.0, "Dimensionless"),
    (0x40, "V", 1e-9, "Voltage"),
    (0x41, "V", 1e-8, "Voltage"),
    (0x42, "V", 1e-7, "Voltage"),
    (0x43, "V", 1e-6, "Voltage"),
    (0x44, "V", 1e-5, "Voltage"),
    (0x45, "V", 1e-4, "Voltage"),
    (0x46, "V", 1e-3, "Voltage"),
    (0x47, "V", 1e-2, "Voltage"),
    (0x48, "V", 1e-1, "Voltage"),
    (0x49, "V", 1.0, "Voltage"),
    (0x4A, "V", 1e1, "Voltage"),
    (0x4B, "V", 1e2, "Voltage"),
    (0x4C, "V", 1e3, "Voltage"),
    (0x4D, "V", 1e4, "Voltage"),
    (0x4E, "V", 1e5, "Voltage"),
    (0x4F, "V", 1e6, "Voltage"),
    (0x50, "A", 1e-12, "Current"),
    (0x51, "A", 1e-11, "Current"),
    (0x52, "A", 1e-10, "Current"),
    (0x53, "A", 1e-9, "Current"),
    (0x54, "A", 1e-8, "Current"),
    (0x55, "A", 1e-7, "Current"),
    (0x56, "A", 1e-6, "Current"),
    (0x57, "A", 1e-5, "Current"),
    (0x58, "A", 1e-4, "Current"),
    (0x59, "A", 1e-3, "Current"),
    (0x5A, "A", 1e-2, "Current"),
    (0x5B, "A", 1e-1, "Current"),
    (0x5C, "A", 1.0, "Current"),
    (0x5D, "A", 1e1, "Current"),
    (0x5E, "A", 1e2, "Current"),
    (0x5F, "A", 1e3, "Current"),
    (0x60, "", 1.0, "Reset counter"),
    (0x61, "", 1.0, "Cumulation counter"),
    (0x62, "", 1.0, "Control signal"),
    (0x63, "", 1.0, "Day of week"),
    (0x64, "", 1.0, "Week number"),
    (0x65, "", 1.0, "Time point of day changer"),
    (0x66, "", 1.0, "State of parameter activation"),
    (0x67, "", 1.0, "Special supplier information"),
    (0x68, "hours", 1.0, "Duration since last cumulation"),
    (0x69, "days", 1.0, "Duration since last cumulation"),
    (0x6A, "months", 1.0, "Duration since last cumulation"),
    (0x6B, "years", 1.0, "Duration since last cumulation"),
    (0x6C, "hours", 1.0, "Operating time battery [hours]"),
    (0x6D, "days", 1.0, "Operating time battery [days]"),
    (0x6E, "months", 1.0, "Operating time battery [months]"),
    (0x6F, "years", 1.0, "Operating time battery [years]"),
    (0x70, "", 1.0, "Date and time of battery change"),
];

/// Combinable VIFEs following a primary VIF.
pub const VIFE_CODES: &[(u8, &str, f64, &str)] = &[
    (0x0E, "", 1.0, "Firmware version"),
    (0x20, "per second", 1.0, ""),
    (0x21, "per minute", 1.0, ""),
    (0x22, "per hour", 1.0, ""),
    (0x23, "per day", 1.0, ""),
    (0x24, "per week", 1.0, ""),
    (0x25, "per month", 1.0, ""),
    (0x26, "per year", 1.0, ""),
    (0x60, "per second", 1.0, ""),
    (0x61, "per minute", 1.0, ""),
];

type Index = HashMap<u8, VifEntry>;

fn build_index(table: VifTable) -> Index {
    table
        .codes()
        .iter()
        .map(|(code, unit, exponent, name)| {
            (
                *code,
                VifEntry {
                    unit: *unit,
                    name: *name,
                    exponent: *exponent,
                },
            )
        })
        .collect()
}

static PRIMARY: Lazy<Index> = Lazy::new(|| build_index(VifTable::Primary));
static EXTENSION_FB: Lazy<Index> = Lazy::new(|| build_index(VifTable::ExtensionFB));
static EXTENSION_FD: Lazy<Index> = Lazy::new(|| build_index(VifTable::ExtensionFD));
static COMBINABLE: Lazy<Index> = Lazy::new(|| build_index(VifTable::Combinable));

/// Looks up a code (extension bit ignored) in the given table.
pub fn lookup(table: VifTable, code: u8) -> Option<VifEntry> {
    let index: &Index = match table {
        VifTable::Primary => &PRIMARY,
        VifTable::ExtensionFB => &EXTENSION_FB,
        VifTable::ExtensionFD => &EXTENSION_FD,
        VifTable::Combinable => &COMBINABLE,
    };
    index.get(&(code & 0x7F)).copied()
}

/// Like [`lookup`], but resolves misses to [`VifEntry::UNRECOGNIZED`].
pub fn lookup_or_unrecognized(table: VifTable, code: u8) -> VifEntry {
    lookup(table, code).unwrap_or(VifEntry::UNRECOGNIZED)
}

pub fn lookup_primary_vif(code: u8) -> Option<VifEntry> {
    lookup(VifTable::Primary, code)
}

pub fn lookup_vife_fb(code: u8) -> Option<VifEntry> {
    lookup(VifTable::ExtensionFB, code)
}

pub fn lookup_vife_fd(code: u8) -> Option<VifEntry> {
    lookup(VifTable::ExtensionFD, code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_table_is_complete() {
        for code in 0..=0x7Fu8 {
            assert!(lookup_primary_vif(code).is_some(), "missing 0x{code:02X}");
        }
    }

    #[test]
    fn test_extension_bit_is_ignored() {
        assert_eq!(lookup_primary_vif(0x86), lookup_primary_vif(0x06));
        assert_eq!(lookup_vife_fd(0x97), lookup_vife_fd(0x17));
    }

    #[test]
    fn test_all_rows_indexed() {
        for table in [
            VifTable::Primary,
            VifTable::ExtensionFB,
            VifTable::ExtensionFD,
            VifTable::Combinable,
        ] {
            for (code, unit, exponent, name) in table.codes() {
                let entry = lookup(table, *code).unwrap();
                assert_eq!(entry.unit, *unit);
                assert_eq!(entry.name, *name);
                assert_eq!(entry.exponent, *exponent);
            }
        }
    }

    #[test]
    fn test_miss_is_unrecognized() {
        assert_eq!(lookup_vife_fb(0x02), None);
        assert_eq!(
            lookup_or_unrecognized(VifTable::ExtensionFB, 0x02),
            VifEntry::UNRECOGNIZED
        );
        assert!(!VifEntry::UNRECOGNIZED.is_recognized());
    }
}
