//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::vault::Vault;
use gleaner_domain::metadata::split_document;
use gleaner_domain::traits::DocumentStore;
use gleaner_domain::Watermark;

/// Execute the extract command.
///
/// Read-only: nothing is classified and the watermark is left alone.
pub fn execute_extract(args: ExtractArgs, vault: &Vault, formatter: &Formatter) -> Result<()> {
    let note = vault.note_path(&args.note)?;
    let text = vault.store().read(&note)?;

    let offset = if args.all {
        0
    } else {
        Watermark::from_metadata(&split_document(&text).0).last_processed_offset
    };
    let extraction = vault.extractor()?.extract(&text, offset);

    println!("{}", formatter.format_entries(&extraction.entries, extraction.start_offset)?);
    Ok(())
}
