//! Digest and weekly-review command implementations.

use crate::cli::WeeklyReviewArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::vault::Vault;
use gleaner_digest::{DigestConfig, Reporter};
use gleaner_filer::Stamp;

/// Execute the digest command.
pub async fn execute_digest(vault: &Vault, formatter: &Formatter) -> Result<()> {
    let reporter = vault.reporter()?;
    let mut filer = vault.filer()?;
    let report = reporter.daily_digest(&mut filer, Stamp::now()).await?;

    println!("{}", formatter.format_report(&report)?);
    Ok(())
}

/// Execute the weekly-review command.
pub async fn execute_weekly_review(
    args: WeeklyReviewArgs,
    vault: &Vault,
    formatter: &Formatter,
) -> Result<()> {
    let config = review_config(&args, &vault.config().digest)?;
    let reporter = Reporter::new(vault.provider()?, config)?;
    let mut filer = vault.filer()?;
    let report = reporter.weekly_review(&mut filer, Stamp::now()).await?;

    println!("{}", formatter.format_report(&report)?);
    Ok(())
}

fn review_config(args: &WeeklyReviewArgs, base: &DigestConfig) -> Result<DigestConfig> {
    match args.days {
        Some(0) => Err(CliError::InvalidInput("--days must be at least 1".to_string())),
        Some(days) => Ok(base.clone().with_review_days(days)),
        None => Ok(base.clone()),
    }
}
