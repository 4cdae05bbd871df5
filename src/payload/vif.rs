//! # Value Information Field (VIF) and its extensions (VIFE)
//!
//! The low 7 bits of a VIF select unit, name and decimal exponent from the
//! primary table; bit 8 announces a VIFE. A few codes are special:
//!
//! - `0xFB` / `0xFD`: the next octet is the real VIF, looked up in the
//!   matching extension table
//! - `0x7F` / `0xFF`: manufacturer specific, the next octet is opaque
//! - `0x7C` / `0xFC`: plain text unit, a length octet and ASCII follow
//!
//! Which table a VIFE is resolved in is decided by the raw value of the VIF
//! it extends, never by the VIFE itself.

use crate::constants::{
    MBUS_DIB_VIFE_MANUFACTURER_SPECIFIC, MBUS_DIB_VIF_EXTENSION_BIT, MBUS_DIB_VIF_EXTENSION_FB,
    MBUS_DIB_VIF_EXTENSION_FD, MBUS_DIB_VIF_MANUFACTURER_SPECIFIC,
    MBUS_DIB_VIF_MANUFACTURER_SPECIFIC_EXT, MBUS_DIB_VIF_PLAIN_TEXT,
    MBUS_DIB_VIF_WITHOUT_EXTENSION,
};
use crate::payload::vif_maps::{lookup, lookup_or_unrecognized, VifEntry, VifTable};

/// How the decoder has to treat a VIF octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VifKind {
    /// Ordinary primary table code.
    Primary,
    /// The next octet is the true VIF, resolved in the given extension table.
    Extension(VifTable),
    /// The next octet is an opaque manufacturer descriptor.
    ManufacturerSpecific,
    /// A length octet and ASCII unit text follow.
    PlainText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VIFField(u8);

impl VIFField {
    pub fn new(b: u8) -> Self {
        VIFField(b)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// The VIF without its extension bit.
    pub fn code(&self) -> u8 {
        self.0 & MBUS_DIB_VIF_WITHOUT_EXTENSION
    }

    pub fn has_extension(&self) -> bool {
        self.0 & MBUS_DIB_VIF_EXTENSION_BIT != 0
    }

    pub fn kind(&self) -> VifKind {
        match self.0 {
            MBUS_DIB_VIF_EXTENSION_FB => VifKind::Extension(VifTable::ExtensionFB),
            MBUS_DIB_VIF_EXTENSION_FD => VifKind::Extension(VifTable::ExtensionFD),
            MBUS_DIB_VIF_MANUFACTURER_SPECIFIC | MBUS_DIB_VIF_MANUFACTURER_SPECIFIC_EXT => {
                VifKind::ManufacturerSpecific
            }
            b if b & MBUS_DIB_VIF_WITHOUT_EXTENSION == MBUS_DIB_VIF_PLAIN_TEXT => {
                VifKind::PlainText
            }
            _ => VifKind::Primary,
        }
    }

    pub fn entry(&self) -> VifEntry {
        lookup_or_unrecognized(VifTable::Primary, self.0)
    }

    pub fn unit(&self) -> &'static str {
        self.entry().unit
    }

    pub fn name(&self) -> &'static str {
        self.entry().name
    }

    pub fn exponent(&self) -> f64 {
        self.entry().exponent
    }
}

/// A VIFE together with the raw VIF it extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VIFEField {
    b: u8,
    parent_vif: u8,
}

impl VIFEField {
    pub fn new(b: u8, parent_vif: u8) -> Self {
        VIFEField { b, parent_vif }
    }

    pub fn value(&self) -> u8 {
        self.b
    }

    pub fn parent_vif(&self) -> u8 {
        self.parent_vif
    }

    pub fn has_extension(&self) -> bool {
        self.b & MBUS_DIB_VIF_EXTENSION_BIT != 0
    }

    /// 0xFF switches the rest of the chain to manufacturer octets.
    pub fn is_manufacturer_marker(&self) -> bool {
        self.b == MBUS_DIB_VIFE_MANUFACTURER_SPECIFIC
    }

    pub fn table(&self) -> VifTable {
        VifTable::for_vife_of(self.parent_vif)
    }

    /// Table row, or `None` when the code is not listed.
    pub fn lookup(&self) -> Option<VifEntry> {
        lookup(self.table(), self.b)
    }

    pub fn entry(&self) -> VifEntry {
        self.lookup().unwrap_or(VifEntry::UNRECOGNIZED)
    }

    pub fn unit(&self) -> &'static str {
        self.entry().unit
    }

    pub fn name(&self) -> &'static str {
        self.entry().name
    }

    pub fn exponent(&self) -> f64 {
        self.entry().exponent
    }
}
