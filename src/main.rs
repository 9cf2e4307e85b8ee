//! Ltlauto binary crate.

use std::io::{self, Write};

use clap::Parser;
use fs_err as fs;

use ltlauto::check_with;
use ltlauto::options::{CliOptions, TraceLevel};

fn main() {
    if let Err(error) = ltlauto_main() {
        // discard result as we cannot further propagate a write error
        let _ = writeln!(io::stderr(), "Error: {}", error);
        std::process::exit(1);
    }
}

/// Initialize the logging framework with the given trace level.
///
/// # Errors
///
/// Returns an error if the logging framework has already been initialized.
fn initialize_logging(level: TraceLevel) -> io::Result<()> {
    env_logger::builder()
        .filter(None, level.into())
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}

/// Main function that parses the options, builds the formula,
/// calls the checking procedure and writes the output.
///
/// # Errors
///
/// Returns an error if the formula cannot be translated,
/// or if an I/O error occurred, e.g. from creating the output file.
fn ltlauto_main() -> ltlauto::Result<()> {
    let options = CliOptions::parse();
    initialize_logging(options.trace_level)?;

    let formula = options.formula();
    let result = check_with(&formula, &options.check_options)?;

    let mut stdout = io::stdout();
    writeln!(stdout, "{}", result.status())?;
    if let Some(lasso) = result.lasso() {
        writeln!(stdout, "{}", lasso)?;
    }
    if let Some(automaton) = result.automaton() {
        if let Some(output_file) = &options.output_file {
            let file = fs::File::create(output_file)?;
            automaton.write(file)?;
        } else {
            automaton.write(stdout)?;
        }
    }
    Ok(())
}
