//! Gleaner Digest
//!
//! Cross-record reports over the vault, summarized by the classification
//! service and written as notifications.
//!
//! # Overview
//!
//! - **Daily digest**: active projects, people with follow-ups and open admin
//!   items due today or earlier.
//! - **Weekly review**: the Inbox Log entries of the last `review_days` days
//!   plus every active, waiting or blocked project, with capture counts per
//!   destination.
//!
//! Both reports read records through metadata queries only, and both are
//! written even when the service fails.
//!
//! # Usage
//!
//! ```no_run
//! use gleaner_digest::{DigestConfig, Reporter};
//! use gleaner_filer::{RecordFiler, Stamp, VaultConfig};
//! use gleaner_llm::{ChatCompletionsProvider, Credential, LlmConfig};
//! use gleaner_store::FsStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut filer = RecordFiler::new(FsStore::new("/path/to/vault"), VaultConfig::default())?;
//! let provider = ChatCompletionsProvider::new(LlmConfig::default(), Credential::missing())?;
//! let reporter = Reporter::new(provider, DigestConfig::default())?;
//!
//! let report = reporter.daily_digest(&mut filer, Stamp::now()).await?;
//! println!("{}", report.path);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [digest]
//! review_days = 7
//! summary_timeout_secs = 180
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod gather;
mod prompt;
mod reporter;

pub use config::DigestConfig;
pub use error::DigestError;
pub use gather::{CaptureLine, DigestInput, DueTask, FollowUp, ProjectLine, ReviewInput};
pub use reporter::{Report, ReportKind, Reporter};
