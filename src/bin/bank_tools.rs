use std::path::PathBuf;

use anyhow::{Context, Result};
use bank_tools::{
    commands::{dump::dump_banks, info::print_info},
    BankOptions, ByteOrder, SchemaVersion, VERBOSE,
};
use clap::{Parser, Subcommand};
use glob::Pattern;

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode bank files and write them out as JSON
    Dump {
        /// Path to the folder to write the JSON files to
        output_folder: PathBuf,
        /// Glob patterns selecting the bank files
        #[arg(num_args = 1.., required = true)]
        globs: Vec<Pattern>,
    },
    /// Print a one line summary of every bank in a file
    Info {
        /// Path to the bank file
        path: PathBuf,
    },
}

/// Decodes animation bank tables into something readable.
#[derive(Parser, Debug)]
#[command(name = "bank_tools")]
#[clap(version)]
struct Cli {
    /// Byte order the banks were written with
    #[arg(short, long, value_enum, default_value_t = ByteOrder::Little)]
    endian: ByteOrder,

    /// Bank schema version (1 or 2)
    #[arg(short, long, default_value = "1")]
    schema: SchemaVersion,

    /// Number of bytes to skip before the first bank
    #[arg(long, default_value_t = 0)]
    offset: u64,

    /// Verbose printing of non-fatal error messages
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug)]
struct Args {
    options: BankOptions,
    command: Command,
    verbose: bool,
}

/// Validates user input and constructs a valid input state
fn parse_args() -> Result<Args> {
    let cli = Cli::parse();

    let options = BankOptions {
        byte_order: cli.endian,
        schema_version: cli.schema,
        base_position: cli.offset,
    };

    Ok(Args {
        options,
        command: cli.command,
        verbose: cli.verbose,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    VERBOSE.set(args.verbose).ok();

    match args.command {
        Command::Dump {
            output_folder,
            globs,
        } => dump_banks(&globs, &output_folder, &args.options).context("Dump command failed")?,
        Command::Info { path } => {
            print_info(&path, &args.options).context("Info command failed")?
        }
    }

    Ok(())
}
