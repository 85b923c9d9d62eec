use log::{debug, trace};
use nom::{
    bytes::complete::take,
    error::context,
    number::{complete as num, Endianness},
    IResult,
};

use super::types::*;
use crate::{
    cursor::Cursor,
    error::{BankParseError, DecodeError, Result},
    file_parsers::shared::null_terminated_ascii,
    registry::BankRegistry,
};

/// Fixed size of one entry record, pointer included
pub const ENTRY_SIZE: usize = 32;

type PResult<'a, O> = IResult<&'a [u8], O, BankParseError<&'a [u8]>>;

#[derive(Debug, PartialEq)]
struct Header {
    min_entry_num: i32,
    max_entry_num: i32,
    size: i32,
    alignment: i32,
    name_table_size: i32,
    r#type: u32,
}

fn header<'a>(endian: Endianness) -> impl FnMut(&'a [u8]) -> PResult<'a, Header> {
    move |input| {
        let (input, min_entry_num) = num::i32(endian)(input)?;
        let (input, max_entry_num) = num::i32(endian)(input)?;
        let (input, size) = num::i32(endian)(input)?;
        let (input, alignment) = num::i32(endian)(input)?;
        let (input, _unk1) = num::u32(endian)(input)?;
        let (input, name_table_size) = num::i32(endian)(input)?;
        // Two flags, never seen set
        let (input, _unk2) = num::u8(input)?;
        let (input, _unk3) = num::u8(input)?;
        let (input, _unk4) = num::u16(endian)(input)?;
        let (input, r#type) = num::u32(endian)(input)?;

        let header = Header {
            min_entry_num,
            max_entry_num,
            size,
            alignment,
            name_table_size,
            r#type,
        };

        Ok((input, header))
    }
}

/// Number of entry records the header announces, if they fit in `remaining` bytes
fn entry_count(header: &Header, remaining: usize) -> Option<usize> {
    let count = i64::from(header.max_entry_num) - i64::from(header.min_entry_num) + 1;

    usize::try_from(count)
        .ok()
        .filter(|count| count.checked_mul(ENTRY_SIZE).is_some_and(|n| n <= remaining))
}

/// Everything a single bank decode needs besides the bytes themselves
struct BankDecoder<'a, 'r> {
    stream: Cursor<'a>,
    endian: Endianness,
    byte_order: ByteOrder,
    bank_start_position: u64,
    registry: &'r BankRegistry,
    schema_version: SchemaVersion,
}

impl<'a> BankDecoder<'a, '_> {
    /// Turn an entry's raw pointer field into a registry key.
    ///
    /// A resolved position of 0 is a null pointer. In [SchemaVersion::V1] that is a raw 0, in
    /// [SchemaVersion::V2] it is a displacement pointing back at the bank start.
    fn resolve_pointer(&self, entry: usize, field_position: u64, raw: i64) -> Result<Option<u64>> {
        let position = match self.schema_version {
            SchemaVersion::V1 => Some(raw),
            SchemaVersion::V2 => {
                let field = i64::try_from(field_position).ok();
                let start = i64::try_from(self.bank_start_position).ok();

                field
                    .zip(start)
                    .and_then(|(field, start)| field.checked_sub(start))
                    .and_then(|relative| relative.checked_add(raw))
            }
        };

        if position == Some(0) {
            return Ok(None);
        }

        let dangling = DecodeError::DanglingBankReference {
            entry,
            position: position.unwrap_or(raw),
        };

        let key = position
            .and_then(|p| u64::try_from(p).ok())
            .filter(|key| self.registry.contains(*key))
            .ok_or(dangling)?;

        trace!("Entry {entry} links to bank at {key:#x}");

        Ok(Some(key))
    }

    fn entry(&self, input: &'a [u8], index: usize, entry_type: i32) -> PResult<'a, Entry> {
        let endian = self.endian;

        let (input, bank_hash) = num::u32(endian)(input)?;
        let (input, size) = num::i32(endian)(input)?;
        let (input, position) = num::i32(endian)(input)?;
        let (input, name_offset) = num::i32(endian)(input)?;
        let (input, _unk1) = num::u32(endian)(input)?;
        let (input, _unk2) = num::u16(endian)(input)?;
        let (input, _unk3) = num::i16(endian)(input)?;

        let field_position = self.stream.position_of(input);
        let (input, pointer) = num::i64(endian)(input)?;
        let linked_bank = self
            .resolve_pointer(index, field_position, pointer)
            .map_err(BankParseError::fail)?;

        let entry = Entry {
            // Filled in once the name table has been read
            name: String::new(),
            r#type: entry_type,
            size,
            position,
            name_offset,
            bank_hash,
            linked_bank,
        };

        Ok((input, entry))
    }

    fn bank(&self, input: &'a [u8]) -> PResult<'a, Bank> {
        let (input, header) = context("bank header", header(self.endian))(input)?;

        let Some(count) = entry_count(&header, input.len()) else {
            return Err(BankParseError::fail(DecodeError::InvalidEntryRange {
                min: header.min_entry_num,
                max: header.max_entry_num,
                remaining: input.len(),
            }));
        };

        let mut entries = Vec::with_capacity(count);
        let mut input = input;
        let types = header.min_entry_num..=header.max_entry_num;
        for (index, entry_type) in types.take(count).enumerate() {
            let (rest, entry) =
                context("bank entry", |i: &'a [u8]| self.entry(i, index, entry_type))(input)?;
            entries.push(entry);
            input = rest;
        }

        let table_size = usize::try_from(header.name_table_size)
            .ok()
            .filter(|size| *size <= input.len())
            .ok_or_else(|| {
                BankParseError::fail(DecodeError::TruncatedNameTable {
                    expected: header.name_table_size,
                    available: input.len(),
                })
            })?;
        let (input, name_table) = context("bank name table", take(table_size))(input)?;

        // Offset 0 is reserved, the bank's own name always sits at 1
        let name = null_terminated_ascii(name_table, 1).map_err(BankParseError::fail)?;

        for entry in entries.iter_mut() {
            entry.name =
                null_terminated_ascii(name_table, entry.name_offset).map_err(BankParseError::fail)?;
        }

        let bank = Bank {
            name,
            entries,
            r#type: header.r#type,
            min_entry_num: header.min_entry_num,
            max_entry_num: header.max_entry_num,
            size: header.size,
            alignment: header.alignment,
            name_table: name_table.to_vec(),
            byte_order: self.byte_order,
        };

        Ok((input, bank))
    }

    fn decode_error(&self, error: nom::Err<BankParseError<&'a [u8]>>) -> DecodeError {
        match error {
            nom::Err::Error(e) | nom::Err::Failure(e) => match e {
                BankParseError::Decode(e) => e,
                BankParseError::Eof { input, context, .. } => DecodeError::UnexpectedEof {
                    position: self.stream.position_of(input),
                    context: context.unwrap_or("bank"),
                },
            },
            // Complete parsers only
            nom::Err::Incomplete(_) => DecodeError::UnexpectedEof {
                position: self.stream.position(),
                context: "bank",
            },
        }
    }
}

/// Decode one bank starting at the cursor.
///
/// `bank_start_position` is the base that [SchemaVersion::V2] pointers are measured from. Every
/// bank an entry may point at must already be in `registry`. On success the cursor sits just
/// past the bank's name table; on failure it is left untouched.
pub fn decode_bank(
    cursor: &mut Cursor<'_>,
    byte_order: ByteOrder,
    bank_start_position: u64,
    registry: &BankRegistry,
    schema_version: SchemaVersion,
) -> Result<Bank> {
    let decoder = BankDecoder {
        stream: cursor.clone(),
        endian: byte_order.into(),
        byte_order,
        bank_start_position,
        registry,
        schema_version,
    };

    let record_position = cursor.position();
    let (rest, bank) = decoder
        .bank(cursor.remaining())
        .map_err(|e| decoder.decode_error(e))?;
    cursor.advance_to(rest);

    debug!(
        "Decoded bank {:?} at {record_position:#x}: {} entries, type {}",
        bank.name,
        bank.entries.len(),
        bank.r#type
    );

    Ok(bank)
}
