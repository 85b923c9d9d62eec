use std::{collections::HashSet, fs::create_dir_all, path::Path};

use anyhow::{ensure, Context, Result};
use glob::Pattern;

use super::load_banks;
use crate::{BankOptions, VERBOSE};

fn process_file(path: &Path, output_path: &Path, options: &BankOptions) -> Result<usize> {
    let banks = load_banks(path, options)?;

    // Write to file
    create_dir_all(output_path.parent().context("No parent directory")?)
        .context("Failed to create output dirs")?;
    let f = std::fs::File::create(output_path)
        .with_context(|| format!("Failed to create file {:?}", output_path))?;
    serde_json::to_writer_pretty(f, &banks).context("Failed to serialise banks to JSON")?;

    Ok(banks.len())
}

/// Decode every file matching the patterns and write the banks out as JSON
pub fn dump_banks(patterns: &[Pattern], output_folder: &Path, options: &BankOptions) -> Result<()> {
    let mut paths = vec![];
    for pattern in patterns {
        let matches = glob::glob(pattern.as_str())
            .with_context(|| format!("Invalid glob pattern {:?}", pattern.as_str()))?;

        // Print and filter out unreadable paths
        paths.extend(matches.filter_map(|p| {
            p.inspect_err(|e| eprintln!("Failed to read path: {:?}", e))
                .ok()
        }));
    }
    paths.sort();
    paths.dedup();

    // Inputs sharing a file name would land on the same JSON file
    let mut written = HashSet::new();

    paths
        .iter()
        .filter(|path| path.is_file())
        .map(|path| -> Result<_> {
            let file_name = path.file_name().context("Path has no file name")?;
            let output_path = output_folder.join(file_name).with_extension("json");
            ensure!(
                written.insert(output_path.clone()),
                "Skipping {:?}: {:?} was already written by another input",
                path,
                output_path
            );

            let count = process_file(path, &output_path, options)
                .with_context(|| format!("Failed to process file: {:?}", path))?;

            Ok((path, count))
        })
        // Report results
        .for_each(|result| match result {
            Ok((path, count)) => eprintln!("Extracted {count} banks: {}", path.display()),
            Err(e) => {
                let error_message = if VERBOSE.get().copied().unwrap_or(false) {
                    format!("{e:?}")
                } else {
                    format!("{e}")
                };
                eprintln!("Failed to extract banks: {error_message}");
            }
        });

    Ok(())
}
