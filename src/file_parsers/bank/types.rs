use std::fmt::Display;

use nom::number::Endianness;
use serde::Serialize;

use crate::{error::DecodeError, registry::BankRegistry};

/// Byte order of every multi-byte field in a bank record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum ByteOrder {
    Big,
    Little,
}

impl From<ByteOrder> for Endianness {
    fn from(value: ByteOrder) -> Self {
        match value {
            ByteOrder::Big => Endianness::Big,
            ByteOrder::Little => Endianness::Little,
        }
    }
}

/// On-disk variant, decides how the per-entry bank pointer is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchemaVersion {
    /// Pointer is an absolute file position
    V1,
    /// Pointer is a displacement from the pointer field itself, measured from the bank start
    V2,
}

impl SchemaVersion {
    /// Key a bank recorded at `record_position` is registered under, so that pointers written
    /// with this schema resolve to it. Records are expected at or after the bank start.
    pub fn registry_key(&self, record_position: u64, bank_start_position: u64) -> u64 {
        match self {
            SchemaVersion::V1 => record_position,
            SchemaVersion::V2 => record_position.saturating_sub(bank_start_position),
        }
    }
}

impl TryFrom<u32> for SchemaVersion {
    type Error = DecodeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SchemaVersion::V1),
            2 => Ok(SchemaVersion::V2),
            x => Err(DecodeError::UnsupportedSchemaVersion(x)),
        }
    }
}

impl std::str::FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let version: u32 = s
            .parse()
            .map_err(|_| format!("Invalid schema version {s:?}"))?;

        SchemaVersion::try_from(version).map_err(|e| e.to_string())
    }
}

/// Value type stored by a bank, encoded as a u32
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BankType {
    Invalid, // 0
    Bool,    // 1
    Int8,    // 2
    Uint8,   // 3
    Int16,   // 4
    Uint16,  // 5
    Int32,   // 6
    UInt32,  // 7
    Int64,   // 8
    UInt64,  // 9
}

impl BankType {
    pub fn from_raw(raw: u32) -> Option<Self> {
        use BankType::*;
        let kind = match raw {
            0 => Invalid,
            1 => Bool,
            2 => Int8,
            3 => Uint8,
            4 => Int16,
            5 => Uint16,
            6 => Int32,
            7 => UInt32,
            8 => Int64,
            9 => UInt64,
            _ => return None,
        };

        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    /// `min_entry_num` of the owning bank plus this entry's index
    pub r#type: i32,
    pub size: i32,
    pub position: i32,
    /// Offset of the name inside the owning bank's name table
    pub name_offset: i32,
    pub bank_hash: u32,
    /// Registry key of the bank this entry points at
    pub linked_bank: Option<u64>,
}

impl Entry {
    /// Look up the linked bank in the registry it was resolved against
    pub fn linked_bank_in<'r>(&self, registry: &'r BankRegistry) -> Option<&'r Bank> {
        self.linked_bank.and_then(|key| registry.get(key))
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "Empty")
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bank {
    pub name: String,
    pub entries: Vec<Entry>,
    pub r#type: u32,
    pub min_entry_num: i32,
    pub max_entry_num: i32,
    pub size: i32,
    pub alignment: i32,
    #[serde(skip)]
    pub name_table: Vec<u8>,
    pub byte_order: ByteOrder,
}

impl Bank {
    pub fn kind(&self) -> Option<BankType> {
        BankType::from_raw(self.r#type)
    }

    /// Entry whose computed type is `entry_type`
    pub fn entry(&self, entry_type: i32) -> Option<&Entry> {
        let index = i64::from(entry_type) - i64::from(self.min_entry_num);
        usize::try_from(index)
            .ok()
            .and_then(|index| self.entries.get(index))
    }
}

impl Display for Bank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "Empty")
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BankType, SchemaVersion};
    use crate::error::DecodeError;

    #[test]
    fn test_schema_version() {
        assert_eq!(SchemaVersion::try_from(1), Ok(SchemaVersion::V1));
        assert_eq!(SchemaVersion::try_from(2), Ok(SchemaVersion::V2));
        assert_eq!(
            SchemaVersion::try_from(3),
            Err(DecodeError::UnsupportedSchemaVersion(3))
        );
        assert_eq!("2".parse::<SchemaVersion>(), Ok(SchemaVersion::V2));
        assert!("two".parse::<SchemaVersion>().is_err());
    }

    #[test]
    fn test_registry_key() {
        assert_eq!(SchemaVersion::V1.registry_key(0x140, 0x40), 0x140);
        assert_eq!(SchemaVersion::V2.registry_key(0x140, 0x40), 0x100);
    }

    #[test]
    fn test_bank_type() {
        assert_eq!(BankType::from_raw(0), Some(BankType::Invalid));
        assert_eq!(BankType::from_raw(7), Some(BankType::UInt32));
        assert_eq!(BankType::from_raw(10), None);
    }
}
