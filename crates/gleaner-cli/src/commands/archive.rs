//! Archive command implementation.

use crate::cli::ArchiveArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::vault::Vault;
use gleaner_filer::Stamp;
use gleaner_janitor::{Janitor, JanitorConfig};

/// Execute the archive command.
pub fn execute_archive(args: ArchiveArgs, vault: &Vault, formatter: &Formatter) -> Result<()> {
    let config = janitor_config(&args, &vault.config().janitor)?;
    let mut janitor = Janitor::new(config)?;
    let mut filer = vault.filer()?;
    let metrics = janitor.sweep(&mut filer, Stamp::now())?;

    println!("{}", formatter.format_archive(&metrics)?);
    Ok(())
}

/// Apply command-line overrides to the configured janitor settings
fn janitor_config(args: &ArchiveArgs, base: &JanitorConfig) -> Result<JanitorConfig> {
    let mut config = base.clone();
    if let Some(days) = args.days {
        if days == 0 {
            return Err(CliError::InvalidInput("--days must be at least 1".to_string()));
        }
        config.days_to_keep = days;
    }
    if args.dry_run {
        config.dry_run = true;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let args = ArchiveArgs {
            days: Some(30),
            dry_run: true,
        };
        let config = janitor_config(&args, &JanitorConfig::default()).unwrap();
        assert_eq!(config.days_to_keep, 30);
        assert!(config.dry_run);
    }

    #[test]
    fn test_config_kept_without_flags() {
        let args = ArchiveArgs {
            days: None,
            dry_run: false,
        };
        let base = JanitorConfig::default().with_days_to_keep(14).with_dry_run(true);
        assert_eq!(janitor_config(&args, &base).unwrap(), base);
    }

    #[test]
    fn test_zero_days_rejected() {
        let args = ArchiveArgs {
            days: Some(0),
            dry_run: false,
        };
        assert!(janitor_config(&args, &JanitorConfig::default()).is_err());
    }
}
