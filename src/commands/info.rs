use std::{
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};

use super::load_banks;
use crate::{BankOptions, BankRegistry};

fn write_summary(out: &mut impl Write, banks: &BankRegistry) -> Result<()> {
    for (key, bank) in banks.iter() {
        let kind = match bank.kind() {
            Some(kind) => format!("{kind:?}"),
            None => format!("{:#x}", bank.r#type),
        };
        let links = bank
            .entries
            .iter()
            .filter(|e| e.linked_bank.is_some())
            .count();

        writeln!(
            out,
            "{key:#010x} {bank} type={kind} entries={} links={links}",
            bank.entries.len()
        )
        .context("Failed to write summary")?;
    }

    Ok(())
}

/// Print one line per bank in the file
pub fn print_info(path: &Path, options: &BankOptions) -> Result<()> {
    let banks = load_banks(path, options)?;

    let mut stdout = BufWriter::new(io::stdout().lock());
    write_summary(&mut stdout, &banks)?;

    stdout.flush().context("Failed to flush stdout")
}
