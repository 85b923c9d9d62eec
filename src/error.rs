use nom::error::{ContextError, ErrorKind, ParseError};
use thiserror::Error;

/// Everything that can go wrong while decoding a bank
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The header's entry bounds describe a negative count, or more entries than the stream holds
    #[error("Invalid entry range: min {min}, max {max} ({remaining} bytes left for entries)")]
    InvalidEntryRange { min: i32, max: i32, remaining: usize },

    /// An entry points at a position with no decoded bank registered
    #[error("Entry {entry} links to position {position:#x}, but no bank is registered there")]
    DanglingBankReference { entry: usize, position: i64 },

    #[error("Name table needs {expected} bytes, but only {available} remain")]
    TruncatedNameTable { expected: i32, available: usize },

    /// Offset is outside the name table, or the string runs off its end
    #[error("Name offset {offset} is out of bounds for a {len} byte name table")]
    NameOffsetOutOfBounds { offset: i64, len: usize },

    #[error("Non-ASCII byte {byte:#04x} in name at offset {offset}")]
    NonAsciiName { offset: usize, byte: u8 },

    /// The cursor ran out of bytes
    #[error("Unexpected end of stream at {position:#x} while reading {context}")]
    UnexpectedEof {
        position: u64,
        context: &'static str,
    },

    #[error("Unsupported bank schema version: {0}")]
    UnsupportedSchemaVersion(u32),
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Nom error type for the bank parsers.
///
/// Short reads stay as [BankParseError::Eof] so the caller can turn the leftover input back into
/// an absolute stream position. Format violations are raised as [BankParseError::Decode] failures.
#[derive(Debug, PartialEq)]
pub enum BankParseError<I> {
    Eof {
        input: I,
        kind: ErrorKind,
        context: Option<&'static str>,
    },
    Decode(DecodeError),
}

impl<I> BankParseError<I> {
    /// Wrap a decode error as an unrecoverable nom failure
    pub fn fail(error: DecodeError) -> nom::Err<Self> {
        nom::Err::Failure(Self::Decode(error))
    }
}

impl<I> ParseError<I> for BankParseError<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Self::Eof {
            input,
            kind,
            context: None,
        }
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I> ContextError<I> for BankParseError<I> {
    fn add_context(_input: I, ctx: &'static str, other: Self) -> Self {
        match other {
            // Innermost context wins
            Self::Eof {
                input,
                kind,
                context: None,
            } => Self::Eof {
                input,
                kind,
                context: Some(ctx),
            },
            other => other,
        }
    }
}
