//! Gleaner Janitor
//!
//! Maintenance for the Inbox Log: old log documents move into the archive
//! folder so day-to-day queries stay small.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Archival**: moving logs whose `created` date is older than the
//!   retention window into `Inbox-Log/Archive/`
//! - **Reporting**: writing an archive summary notification
//! - **Metrics**: counting scanned, archived and failed documents
//!
//! Archived logs keep counting for duplicate detection, because the hash
//! scan covers the whole Inbox Log tree.
//!
//! # Usage
//!
//! ```no_run
//! use gleaner_filer::{RecordFiler, Stamp, VaultConfig};
//! use gleaner_janitor::{Janitor, JanitorConfig};
//! use gleaner_store::FsStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FsStore::new("/path/to/vault");
//! let mut filer = RecordFiler::new(store, VaultConfig::default())?;
//! let mut janitor = Janitor::new(JanitorConfig::default().with_days_to_keep(30))?;
//!
//! let metrics = janitor.sweep(&mut filer, Stamp::now())?;
//! println!("{}", metrics.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [janitor]
//! days_to_keep = 90
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;

pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::{Janitor, NOTICE_KIND};
pub use metrics::JanitorMetrics;
