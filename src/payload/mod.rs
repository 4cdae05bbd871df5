//! The payload module contains the components responsible for decoding the
//! application data of an M-Bus telegram: data information (DIF/DIFE), value
//! information (VIF/VIFE) and the unit tables behind it, the value codecs,
//! the record walker and the fixed telegram header.

pub mod data_encoding;
pub mod dif;
pub mod record;
pub mod telegram;
pub mod vif;
pub mod vif_maps;

pub use data_encoding::*;
pub use dif::{DIFEField, DIFField, DataCategory, DataLength};
pub use record::{decode_record, decode_records, DataRecord, LvarEncoding};
pub use telegram::{parse_telegram, MediumType, ParsedTelegram, StatusFlags};
pub use vif::{VIFEField, VIFField, VifKind};
pub use vif_maps::{lookup, lookup_or_unrecognized, VifEntry, VifTable};
