use anyhow::{Context, Result};

use crate::{
    cursor::Cursor, error::DecodeError, file_parsers::FileParser, registry::BankRegistry,
};

pub mod parser;
pub mod types;
use parser::decode_bank;
use types::{ByteOrder, SchemaVersion};

#[derive(Debug, Clone, Copy)]
pub struct BankOptions {
    pub byte_order: ByteOrder,
    pub schema_version: SchemaVersion,
    /// Absolute stream offset of the first byte handed to the parser
    pub base_position: u64,
}

impl Default for BankOptions {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            schema_version: SchemaVersion::V1,
            base_position: 0,
        }
    }
}

/// Decode banks stored back to back until the input runs out.
///
/// Each bank is registered before the next one is decoded, so entries may link to any bank
/// earlier in the sequence. The first bank marks the start that relative pointers count from.
pub fn parse_bank_sequence(
    bytes: &[u8],
    options: &BankOptions,
) -> std::result::Result<BankRegistry, DecodeError> {
    let mut cursor = Cursor::with_base(bytes, options.base_position);
    let bank_start_position = cursor.position();
    let mut registry = BankRegistry::new();

    while !cursor.is_empty() {
        let record_position = cursor.position();
        let bank = decode_bank(
            &mut cursor,
            options.byte_order,
            bank_start_position,
            &registry,
            options.schema_version,
        )?;

        let key = options
            .schema_version
            .registry_key(record_position, bank_start_position);
        registry.insert(key, bank);
    }

    Ok(registry)
}

pub struct BankParser {
    pub options: BankOptions,
}

impl FileParser for BankParser {
    type Output = BankRegistry;

    fn parse(&self, bytes: &[u8]) -> Result<Self::Output> {
        parse_bank_sequence(bytes, &self.options).context("Failed to parse bank sequence")
    }
}
