pub mod dump;
pub mod info;

use std::path::Path;

use anyhow::{ensure, Context, Result};

use crate::{file_parsers::FileParser, BankOptions, BankParser, BankRegistry};

/// Read a file from disk and decode every bank in it, skipping `options.base_position` bytes
pub fn load_banks(path: &Path, options: &BankOptions) -> Result<BankRegistry> {
    let contents =
        std::fs::read(path).with_context(|| format!("Failed to read file {:?}", path))?;

    let offset = usize::try_from(options.base_position).context("Offset too large")?;
    ensure!(
        offset <= contents.len(),
        "Offset {offset:#x} is past the end of {:?} ({} bytes)",
        path,
        contents.len()
    );

    let parser = BankParser { options: *options };
    parser.parse(&contents[offset..])
}
