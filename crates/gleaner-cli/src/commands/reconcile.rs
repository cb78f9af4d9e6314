//! Reconcile command implementation.

use crate::error::Result;
use crate::output::Formatter;
use crate::vault::Vault;

/// Execute the reconcile command.
pub async fn execute_reconcile(vault: &Vault, formatter: &Formatter) -> Result<()> {
    let mut pipeline = vault.pipeline()?;
    let report = pipeline.reconcile().await?;

    println!("{}", formatter.format_reconcile(&report)?);
    Ok(())
}
