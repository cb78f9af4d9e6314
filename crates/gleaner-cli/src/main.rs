//! Gleaner CLI - file journal captures into a structured vault.

use clap::Parser;
use gleaner_cli::commands;
use gleaner_cli::{Cli, Command, Config, Formatter, Vault};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> gleaner_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let color_enabled = !cli.no_color && config.output.color;
    let formatter = Formatter::new(format, color_enabled);

    let vault_root = cli.vault;
    let open_vault = || Vault::open(config.vault_root(vault_root.as_deref())?, config.clone());

    match cli.command {
        Command::Process(args) => {
            commands::execute_process(args, &open_vault()?, &formatter).await?
        }
        Command::Reconcile => commands::execute_reconcile(&open_vault()?, &formatter).await?,
        Command::Archive(args) => commands::execute_archive(args, &open_vault()?, &formatter)?,
        Command::Digest => commands::execute_digest(&open_vault()?, &formatter).await?,
        Command::WeeklyReview(args) => {
            commands::execute_weekly_review(args, &open_vault()?, &formatter).await?
        }
        Command::Extract(args) => commands::execute_extract(args, &open_vault()?, &formatter)?,
        Command::Init => commands::execute_init(&open_vault()?, &formatter)?,
        Command::Hash(args) => commands::execute_hash(args, &formatter)?,
    }

    Ok(())
}

/// Default filter for a `-v` count
fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let default = log_level(verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
