//! Process command implementation.

use crate::cli::ProcessArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::vault::Vault;

/// Execute the process command.
pub async fn execute_process(
    args: ProcessArgs,
    vault: &Vault,
    formatter: &Formatter,
) -> Result<()> {
    let note = vault.note_path(&args.note)?;
    let mut pipeline = vault.pipeline()?;
    let summary = pipeline.process_note(&note).await?;

    println!("{}", formatter.format_run(&summary)?);
    Ok(())
}
