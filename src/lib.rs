use std::sync::OnceLock;

pub mod commands;
pub mod cursor;
pub mod error;
pub mod file_parsers;
pub mod registry;

pub use cursor::Cursor;
pub use error::DecodeError;
pub use file_parsers::bank::{
    parse_bank_sequence,
    parser::decode_bank,
    types::{Bank, BankType, ByteOrder, Entry, SchemaVersion},
    BankOptions, BankParser,
};
pub use registry::BankRegistry;

/// Application-level verbosity
pub static VERBOSE: OnceLock<bool> = OnceLock::new();
