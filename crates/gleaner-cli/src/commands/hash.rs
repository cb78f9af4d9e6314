//! Hash command implementation.

use crate::cli::HashArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use gleaner_domain::Fingerprint;

/// Execute the hash command.
pub fn execute_hash(args: HashArgs, formatter: &Formatter) -> Result<()> {
    if args.text.trim().is_empty() {
        return Err(CliError::InvalidInput("Text must not be empty".to_string()));
    }
    println!("{}", formatter.format_hash(&Fingerprint::of(&args.text))?);
    Ok(())
}
