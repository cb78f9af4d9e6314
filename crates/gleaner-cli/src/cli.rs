//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gleaner - file journal captures into a structured vault.
#[derive(Debug, Parser)]
#[command(name = "gleaner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "GLEANER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Vault root directory
    #[arg(long, global = true, env = "GLEANER_VAULT")]
    pub vault: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (paths and hashes only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Capture, classify and file the new entries of a note
    Process(ProcessArgs),

    /// File the checked items of the review document
    Reconcile,

    /// Move old Inbox Log documents into the archive
    Archive(ArchiveArgs),

    /// Write the daily digest of projects, follow-ups and due tasks
    Digest,

    /// Write the weekly review of recent captures and open projects
    WeeklyReview(WeeklyReviewArgs),

    /// Preview the entries a run would capture, without classifying
    Extract(ExtractArgs),

    /// Print the fingerprint of a text
    Hash(HashArgs),

    /// Write the default category templates into the vault
    Init,
}

/// Arguments for the process command.
#[derive(Debug, Parser)]
pub struct ProcessArgs {
    /// Note path, relative to the vault root (e.g. Journal/2024-03-01.md)
    pub note: String,
}

/// Arguments for the archive command.
#[derive(Debug, Parser)]
pub struct ArchiveArgs {
    /// Keep logs created within this many days
    #[arg(short, long)]
    pub days: Option<u32>,

    /// Report what would move without moving anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the weekly-review command.
#[derive(Debug, Parser)]
pub struct WeeklyReviewArgs {
    /// Cover captures from this many days back
    #[arg(short, long)]
    pub days: Option<u32>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Note path, relative to the vault root
    pub note: String,

    /// Ignore the watermark and show every entry
    #[arg(short, long)]
    pub all: bool,
}

/// Arguments for the hash command.
#[derive(Debug, Parser)]
pub struct HashArgs {
    /// Entry text
    pub text: String,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_command() {
        let cli = Cli::parse_from(["gleaner", "process", "Journal/2024-03-01.md"]);
        match cli.command {
            Command::Process(args) => assert_eq!(args.note, "Journal/2024-03-01.md"),
            _ => panic!("Expected Process command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "gleaner",
            "reconcile",
            "--vault",
            "/notes",
            "--format",
            "json",
            "-vv",
            "--no-color",
        ]);
        assert!(matches!(cli.command, Command::Reconcile));
        assert_eq!(cli.vault, Some(PathBuf::from("/notes")));
        assert_eq!(cli.format, Some(CliFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
    }

    #[test]
    fn test_archive_args() {
        let cli = Cli::parse_from(["gleaner", "archive", "--days", "30", "--dry-run"]);
        match cli.command {
            Command::Archive(args) => {
                assert_eq!(args.days, Some(30));
                assert!(args.dry_run);
            }
            _ => panic!("Expected Archive command"),
        }
    }

    #[test]
    fn test_report_commands() {
        let cli = Cli::parse_from(["gleaner", "digest"]);
        assert!(matches!(cli.command, Command::Digest));

        let cli = Cli::parse_from(["gleaner", "weekly-review", "--days", "14"]);
        match cli.command {
            Command::WeeklyReview(args) => assert_eq!(args.days, Some(14)),
            _ => panic!("Expected WeeklyReview command"),
        }
    }

    #[test]
    fn test_missing_subcommand_rejected() {
        assert!(Cli::try_parse_from(["gleaner"]).is_err());
    }
}
