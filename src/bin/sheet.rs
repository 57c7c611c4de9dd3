//! CLI tool to edit a delimited table with a list of commands.
//!
//! Usage:
//!   sheet [-d DELIM] [Commands for editing the table]
//!   sheet [-d DELIM] [Row selection] [Command for processing the data]
//!
//! Reads the table from stdin (or `--input`) and writes the result to stdout
//! (or `--output`). Nothing is written if any command fails.

use clap::Parser;
use sheet_rs::{CommandRegistry, DEFAULT_DELIMITERS, SheetConfig, SheetError, edit_table};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage:
  sheet [-d DELIM] [Commands for editing the table]
or
  sheet [-d DELIM] [Row selection] [Command for processing the data]";

/// Edit a delimited table in place.
///
/// Layout commands (irow, arow, drow, drows, icol, acol, dcol, dcols) may
/// only be combined with each other. Selection commands (rows, beginswith,
/// contains) may be followed by one data command (cset, tolower, toupper,
/// round, int, copy, swap, move). Use `-` for the last row or column.
#[derive(Parser)]
#[command(name = "sheet", version)]
struct Cli {
    /// Delimiter characters; the first one is used in the output
    #[arg(short, long, default_value = DEFAULT_DELIMITERS)]
    delim: String,

    /// Read the table from a file instead of stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Debug logging and a summary on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Commands and their parameters
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    commands: Vec<String>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn read_input(path: Option<&str>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path),
        None => {
            let mut input = Vec::new();
            io::stdin().read_to_end(&mut input)?;
            Ok(input)
        }
    }
}

fn fail(err: &SheetError) -> ! {
    eprintln!("{err}");
    if err.shows_usage() {
        eprintln!();
        eprintln!("{USAGE}");
    }
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = SheetConfig::with_delimiters(&cli.delim).unwrap_or_else(|e| fail(&e));

    let input = match read_input(cli.input.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            let source = cli.input.as_deref().unwrap_or("stdin");
            eprintln!("Error reading input '{source}': {e}");
            process::exit(1);
        }
    };

    let registry = CommandRegistry::standard();
    let report =
        edit_table(&registry, &input, &cli.commands, &config).unwrap_or_else(|e| fail(&e));

    if let Some(out_path) = &cli.output {
        if let Some(parent) = Path::new(out_path.as_str()).parent()
            && !parent.as_os_str().is_empty()
            && fs::create_dir_all(parent).is_err()
        {
            eprintln!("Error creating output directory for '{out_path}'");
            process::exit(1);
        }
        if let Err(e) = fs::write(out_path, &report.output) {
            eprintln!("Error writing output file '{out_path}': {e}");
            process::exit(1);
        }
    } else if let Err(e) = io::stdout().write_all(&report.output) {
        eprintln!("Error writing output: {e}");
        process::exit(1);
    }

    if cli.verbose {
        eprintln!(
            "Rows: {} in -> {} out, {} commands",
            report.rows_in, report.rows_out, report.commands
        );
    }
}
