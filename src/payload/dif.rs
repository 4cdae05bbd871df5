//! # Data Information Field (DIF) and its extensions (DIFE)
//!
//! ```text
//! DIF   bit 8   extension follows
//!       bit 7   storage number LSB
//!       bit 6-5 function (instantaneous, maximum, minimum, value during error)
//!       bit 4-1 data length/type code
//!
//! DIFE  bit 8   extension follows
//!       bit 7   device unit
//!       bit 6-5 tariff
//!       bit 4-1 storage number
//! ```

use crate::constants::{
    MBUS_DATA_RECORD_DIFE_MASK_DEVICE, MBUS_DATA_RECORD_DIFE_MASK_STORAGE_NO,
    MBUS_DATA_RECORD_DIFE_MASK_TARIFF, MBUS_DATA_RECORD_DIF_MASK_DATA,
    MBUS_DATA_RECORD_DIF_MASK_FUNCTION, MBUS_DATA_RECORD_DIF_MASK_STORAGE_NO,
    MBUS_DIB_DIF_EXTENSION_BIT, MBUS_DIB_DIF_IDLE_FILLER, MBUS_DIB_DIF_MANUFACTURER_SPECIFIC,
    MBUS_DIB_DIF_MORE_RECORDS_FOLLOW,
};

/// Value length/type selected by the low nibble of the DIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataLength {
    NoData,
    Int8,
    Int16,
    Int24,
    Int32,
    Real32,
    Int48,
    Int64,
    SelectionForReadout,
    Bcd2,
    Bcd4,
    Bcd6,
    Bcd8,
    VariableLength,
    Bcd12,
    SpecialFunctions,
}

impl DataLength {
    pub fn from_code(code: u8) -> Self {
        match code & MBUS_DATA_RECORD_DIF_MASK_DATA {
            0x0 => DataLength::NoData,
            0x1 => DataLength::Int8,
            0x2 => DataLength::Int16,
            0x3 => DataLength::Int24,
            0x4 => DataLength::Int32,
            0x5 => DataLength::Real32,
            0x6 => DataLength::Int48,
            0x7 => DataLength::Int64,
            0x8 => DataLength::SelectionForReadout,
            0x9 => DataLength::Bcd2,
            0xA => DataLength::Bcd4,
            0xB => DataLength::Bcd6,
            0xC => DataLength::Bcd8,
            0xD => DataLength::VariableLength,
            0xE => DataLength::Bcd12,
            _ => DataLength::SpecialFunctions,
        }
    }

    /// Value octets that follow the VIB. `None` for the variable-length code,
    /// whose size is given by the LVAR octet.
    pub fn octets(&self) -> Option<usize> {
        match self {
            DataLength::NoData | DataLength::SelectionForReadout | DataLength::SpecialFunctions => {
                Some(0)
            }
            DataLength::Int8 | DataLength::Bcd2 => Some(1),
            DataLength::Int16 | DataLength::Bcd4 => Some(2),
            DataLength::Int24 | DataLength::Bcd6 => Some(3),
            DataLength::Int32 | DataLength::Real32 | DataLength::Bcd8 => Some(4),
            DataLength::Int48 | DataLength::Bcd12 => Some(6),
            DataLength::Int64 => Some(8),
            DataLength::VariableLength => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataLength::NoData => "NO_DATA",
            DataLength::Int8 => "BIT_8_INTEGER",
            DataLength::Int16 => "BIT_16_INTEGER",
            DataLength::Int24 => "BIT_24_INTEGER",
            DataLength::Int32 => "BIT_32_INTEGER",
            DataLength::Real32 => "BIT_32_REAL",
            DataLength::Int48 => "BIT_48_INTEGER",
            DataLength::Int64 => "BIT_64_INTEGER",
            DataLength::SelectionForReadout => "SELECTION_FOR_READOUT",
            DataLength::Bcd2 => "BCD_2_DIGIT",
            DataLength::Bcd4 => "BCD_4_DIGIT",
            DataLength::Bcd6 => "BCD_6_DIGIT",
            DataLength::Bcd8 => "BCD_8_DIGIT",
            DataLength::VariableLength => "VARIABLE_LENGTH",
            DataLength::Bcd12 => "BCD_12_DIGIT",
            DataLength::SpecialFunctions => "SPECIAL_FUNCTIONS",
        }
    }

    pub fn is_bcd(&self) -> bool {
        matches!(
            self,
            DataLength::Bcd2
                | DataLength::Bcd4
                | DataLength::Bcd6
                | DataLength::Bcd8
                | DataLength::Bcd12
        )
    }
}

/// Function field of the DIF (bits 5-6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataCategory {
    Instantaneous,
    Maximum,
    Minimum,
    ValueDuringError,
}

impl DataCategory {
    pub fn name(&self) -> &'static str {
        match self {
            DataCategory::Instantaneous => "INSTANTANEOUS",
            DataCategory::Maximum => "MAXIMUM",
            DataCategory::Minimum => "MINIMUM",
            DataCategory::ValueDuringError => "VALUE_DURING_ERROR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DIFField(u8);

impl DIFField {
    pub fn new(b: u8) -> Self {
        DIFField(b)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn has_extension(&self) -> bool {
        self.0 & MBUS_DIB_DIF_EXTENSION_BIT != 0
    }

    pub fn data_length_code(&self) -> u8 {
        self.0 & MBUS_DATA_RECORD_DIF_MASK_DATA
    }

    pub fn data_length(&self) -> DataLength {
        DataLength::from_code(self.0)
    }

    pub fn data_category(&self) -> DataCategory {
        match (self.0 & MBUS_DATA_RECORD_DIF_MASK_FUNCTION) >> 4 {
            0 => DataCategory::Instantaneous,
            1 => DataCategory::Maximum,
            2 => DataCategory::Minimum,
            _ => DataCategory::ValueDuringError,
        }
    }

    /// Least significant bit of the storage number.
    pub fn storage_number(&self) -> u8 {
        (self.0 & MBUS_DATA_RECORD_DIF_MASK_STORAGE_NO) >> 6
    }

    /// Always 0. The DIF layout has no tariff bits; they only appear in
    /// DIFEs, see `dif::tariff`.
    pub fn tariff(&self) -> u8 {
        0
    }

    /// Always 0. The DIF layout has no device unit bit; it only appears in
    /// DIFEs, see `dif::device_unit`.
    pub fn device_unit(&self) -> u8 {
        0
    }

    /// 0x0F / 0x1F: manufacturer data runs to the end of the telegram.
    pub fn is_manufacturer_specific(&self) -> bool {
        self.0 == MBUS_DIB_DIF_MANUFACTURER_SPECIFIC || self.0 == MBUS_DIB_DIF_MORE_RECORDS_FOLLOW
    }

    /// 0x1F also announces that the slave has more records to send.
    pub fn more_records_follow(&self) -> bool {
        self.0 == MBUS_DIB_DIF_MORE_RECORDS_FOLLOW
    }

    pub fn is_idle_filler(&self) -> bool {
        self.0 == MBUS_DIB_DIF_IDLE_FILLER
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DIFEField(u8);

impl DIFEField {
    pub fn new(b: u8) -> Self {
        DIFEField(b)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn has_extension(&self) -> bool {
        self.0 & MBUS_DIB_DIF_EXTENSION_BIT != 0
    }

    /// Always 0. The DIFE layout has no length code; the DIF alone
    /// announces the value length.
    pub fn data_length_code(&self) -> u8 {
        0
    }

    pub fn storage_number(&self) -> u8 {
        self.0 & MBUS_DATA_RECORD_DIFE_MASK_STORAGE_NO
    }

    pub fn tariff(&self) -> u8 {
        (self.0 & MBUS_DATA_RECORD_DIFE_MASK_TARIFF) >> 4
    }

    pub fn device_unit(&self) -> u8 {
        (self.0 & MBUS_DATA_RECORD_DIFE_MASK_DEVICE) >> 6
    }
}

/// Storage number assembled from the DIF bit and every DIFE nibble.
pub fn storage_number(dif: u8, dife: &[u8]) -> u64 {
    let mut storage = DIFField::new(dif).storage_number() as u64;
    for (i, b) in dife.iter().enumerate().take(15) {
        storage |= (DIFEField::new(*b).storage_number() as u64) << (1 + 4 * i);
    }
    storage
}

/// Tariff assembled from the DIFE chain, two bits per extension.
pub fn tariff(dife: &[u8]) -> u32 {
    dife.iter()
        .enumerate()
        .take(16)
        .fold(0, |acc, (i, b)| acc | (DIFEField::new(*b).tariff() as u32) << (2 * i))
}

/// Device unit (subunit) assembled from the DIFE chain, one bit per extension.
pub fn device_unit(dife: &[u8]) -> u32 {
    dife.iter()
        .enumerate()
        .take(32)
        .fold(0, |acc, (i, b)| acc | (DIFEField::new(*b).device_unit() as u32) << i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_has_a_length() {
        for code in 0..16u8 {
            let length = DataLength::from_code(code);
            match length {
                DataLength::VariableLength => assert_eq!(length.octets(), None),
                _ => assert!(length.octets().is_some()),
            }
        }
        assert_eq!(DataLength::from_code(0x0F).octets(), Some(0));
    }

    #[test]
    fn test_dif_fields() {
        let dif = DIFField::new(0x8C);
        assert!(dif.has_extension());
        assert_eq!(dif.data_length(), DataLength::Bcd8);
        assert_eq!(dif.data_category(), DataCategory::Instantaneous);
        assert_eq!(dif.storage_number(), 0);

        let dif = DIFField::new(0x5A);
        assert_eq!(dif.storage_number(), 1);
        assert_eq!(dif.data_category(), DataCategory::Maximum);
        assert_eq!(DIFField::new(0x3C).data_category(), DataCategory::ValueDuringError);
    }

    #[test]
    fn test_dife_fields() {
        let dife = DIFEField::new(0x63);
        assert!(!dife.has_extension());
        assert_eq!(dife.storage_number(), 3);
        assert_eq!(dife.tariff(), 2);
        assert_eq!(dife.device_unit(), 1);
    }

    #[test]
    fn test_layout_fixed_accessors() {
        for b in 0..=255u8 {
            assert_eq!(DIFField::new(b).tariff(), 0);
            assert_eq!(DIFField::new(b).device_unit(), 0);
            assert_eq!(DIFEField::new(b).data_length_code(), 0);
        }
    }

    #[test]
    fn test_chain_aggregation() {
        assert_eq!(storage_number(0x44, &[]), 1);
        assert_eq!(storage_number(0xC4, &[0x10]), 1);
        assert_eq!(storage_number(0x84, &[0x01]), 2);
        assert_eq!(tariff(&[0x90, 0x20]), 0b1001);
        assert_eq!(device_unit(&[0xC0, 0x40]), 0b11);
    }
}
