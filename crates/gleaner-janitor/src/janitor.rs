//! Inbox Log archival

use crate::{JanitorConfig, JanitorError, JanitorMetrics};
use chrono::NaiveDate;
use gleaner_domain::metadata::split_document;
use gleaner_domain::traits::DocumentStore;
use gleaner_filer::{RecordFiler, Stamp};
use tracing::{debug, info, warn};

/// Notification kind of the archive summary
pub const NOTICE_KIND: &str = "Archive";

/// Moves old Inbox Log documents into the archive folder
///
/// Archived logs stay inside the Inbox Log tree, so their hashes still
/// count as processed.
///
/// # Examples
///
/// ```
/// use gleaner_filer::{RecordFiler, Stamp, VaultConfig};
/// use gleaner_janitor::{Janitor, JanitorConfig};
/// use gleaner_store::MemoryStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut filer = RecordFiler::new(MemoryStore::new(), VaultConfig::default())?;
/// let mut janitor = Janitor::new(JanitorConfig::default())?;
///
/// let metrics = janitor.sweep(&mut filer, Stamp::now())?;
/// assert_eq!(metrics.total_archived(), 0);
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Result<Self, JanitorError> {
        config.validate().map_err(JanitorError::Config)?;
        Ok(Self { config })
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self {
            config: JanitorConfig::default(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Archive every log created before the cutoff
    ///
    /// Documents already in the archive are not scanned. A document that
    /// cannot be moved is recorded as failed and the sweep continues. A
    /// summary notification is written when anything moved; a dry run
    /// writes nothing.
    pub fn sweep<S: DocumentStore>(
        &mut self,
        filer: &mut RecordFiler<S>,
        now: Stamp,
    ) -> Result<JanitorMetrics, JanitorError> {
        let cutoff = self.config.cutoff(now.day());
        let log_folder = filer.config().inbox_log_folder.clone();
        let archive_folder = filer.config().archive_folder();
        let archive_prefix = format!("{}/", archive_folder);

        let mut metrics = JanitorMetrics {
            cutoff: Some(cutoff),
            dry_run: self.config.dry_run,
            ..JanitorMetrics::new()
        };

        let paths = filer
            .store()
            .list(&log_folder)
            .map_err(|e| JanitorError::Store(e.to_string()))?;

        for path in paths.iter().filter(|p| !p.starts_with(&archive_prefix)) {
            metrics.scanned += 1;
            let created = match filer.store().read(path) {
                Ok(text) => created_day(&text),
                Err(e) => {
                    warn!("Could not read {}: {}", path, e);
                    metrics.failed.push(path.clone());
                    continue;
                }
            };
            let Some(created) = created else {
                debug!("{} has no created date", path);
                metrics.undated += 1;
                continue;
            };
            if created >= cutoff {
                continue;
            }

            let name = path.rsplit('/').next().unwrap_or(path.as_str());
            let target = format!("{}{}", archive_prefix, name);
            if self.config.dry_run {
                info!("DRY RUN: Would archive {} to {}", path, target);
                metrics.archived.push(path.clone());
                continue;
            }
            if filer.store().exists(&target) {
                warn!("Failed to archive {}: {} already exists", path, target);
                metrics.failed.push(path.clone());
                continue;
            }
            match filer.store_mut().rename(path, &target) {
                Ok(()) => metrics.archived.push(path.clone()),
                Err(e) => {
                    warn!("Failed to archive {}: {}", path, e);
                    metrics.failed.push(path.clone());
                }
            }
        }

        if !self.config.dry_run && !metrics.archived.is_empty() {
            let body = summary_body(&metrics, &self.config, &archive_folder, &now);
            metrics.summary_path = Some(filer.write_notification(NOTICE_KIND, None, &body, &now)?);
        }

        info!(
            scanned = metrics.scanned,
            archived = metrics.total_archived(),
            failed = metrics.total_failed(),
            dry_run = self.config.dry_run,
            "Archive sweep complete"
        );
        Ok(metrics)
    }
}

fn created_day(text: &str) -> Option<NaiveDate> {
    let (meta, _) = split_document(text);
    let created = meta.get_str("created")?;
    NaiveDate::parse_from_str(created.get(..10)?, "%Y-%m-%d").ok()
}

fn summary_body(
    metrics: &JanitorMetrics,
    config: &JanitorConfig,
    archive_folder: &str,
    now: &Stamp,
) -> String {
    let cutoff = metrics.cutoff.map(|d| d.to_string()).unwrap_or_default();
    format!(
        "# Archive Summary\n\n\
         **Date:** {date}\n\
         **Archived:** {moved} logs\n\
         **Cutoff Date:** {cutoff}\n\n\
         Logs older than {days} days are now in [[{archive}/]]\n\n\
         ---\n\n\
         ## Statistics\n\n\
         - Total logs archived: {moved}\n\
         - Failed to archive: {failed}\n\
         - Archive location: `{archive}/`\n\
         - Archived logs still count as processed entries\n",
        date = now.second(),
        moved = metrics.total_archived(),
        cutoff = cutoff,
        days = config.days_to_keep,
        archive = archive_folder,
        failed = metrics.total_failed(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use gleaner_domain::Fingerprint;
    use gleaner_filer::{known_hashes, VaultConfig};
    use gleaner_store::MemoryStore;

    fn log(hash: &str, created: &str) -> String {
        format!(
            "---\ntype: inbox-log\nentry_hash: {}\noriginal_text: Some entry\nstatus: filed\ncreated: {}\n---\n",
            hash, created
        )
    }

    fn filer() -> RecordFiler<MemoryStore> {
        let store = MemoryStore::with_documents([
            ("Inbox-Log/Log-old.md", log("hold", "2024-01-15 08:00:00")),
            ("Inbox-Log/Log-edge.md", log("hedge", "2024-04-01 00:00:01")),
            ("Inbox-Log/Log-new.md", log("hnew", "2024-06-29 12:00:00")),
            ("Inbox-Log/Log-undated.md", "no header at all\n".to_string()),
            ("Inbox-Log/Archive/Log-ancient.md", log("hancient", "2023-01-01 00:00:00")),
        ]);
        RecordFiler::new(store, VaultConfig::default()).unwrap()
    }

    fn june_30() -> Stamp {
        Stamp::at(Local.with_ymd_and_hms(2024, 6, 30, 9, 0, 0).single().unwrap())
    }

    #[test]
    fn test_sweep_archives_old_logs() {
        let mut filer = filer();
        let mut janitor = Janitor::default_config();
        let metrics = janitor.sweep(&mut filer, june_30()).unwrap();

        assert_eq!(metrics.scanned, 4);
        assert_eq!(metrics.archived, vec!["Inbox-Log/Log-old.md".to_string()]);
        assert_eq!(metrics.undated, 1);
        assert_eq!(metrics.retained(), 2);

        let store = filer.store();
        assert!(!store.exists("Inbox-Log/Log-old.md"));
        assert!(store.exists("Inbox-Log/Archive/Log-old.md"));
        assert!(store.exists("Inbox-Log/Log-edge.md"));

        let summary = store.read(metrics.summary_path.as_deref().unwrap()).unwrap();
        assert!(summary.contains("**Archived:** 1 logs"));
        assert!(summary.contains("**Cutoff Date:** 2024-04-01"));
        assert!(summary.contains("notification_type: Archive"));
    }

    #[test]
    fn test_archived_logs_still_dedupe() {
        let mut filer = filer();
        Janitor::default_config().sweep(&mut filer, june_30()).unwrap();
        let known = known_hashes(filer.store(), "Inbox-Log");
        assert!(known.contains(&Fingerprint::from_string("hold")));
        assert!(known.contains(&Fingerprint::from_string("hancient")));
    }

    #[test]
    fn test_dry_run_moves_nothing() {
        let mut filer = filer();
        let config = JanitorConfig::default().with_dry_run(true);
        let metrics = Janitor::new(config).unwrap().sweep(&mut filer, june_30()).unwrap();

        assert_eq!(metrics.total_archived(), 1);
        assert_eq!(metrics.summary_path, None);
        assert!(filer.store().exists("Inbox-Log/Log-old.md"));
        assert!(filer.store().list("Notifications").unwrap().is_empty());
    }

    #[test]
    fn test_name_collision_fails_item() {
        let mut filer = filer();
        filer
            .store_mut()
            .create("Inbox-Log/Archive/Log-old.md", &log("hother", "2023-05-05 00:00:00"))
            .unwrap();
        let metrics = Janitor::default_config().sweep(&mut filer, june_30()).unwrap();

        assert_eq!(metrics.failed, vec!["Inbox-Log/Log-old.md".to_string()]);
        assert_eq!(metrics.summary_path, None);
        assert!(filer.store().exists("Inbox-Log/Log-old.md"));
    }

    #[test]
    fn test_nothing_to_archive() {
        let mut filer = filer();
        let config = JanitorConfig::default().with_days_to_keep(1000);
        let metrics = Janitor::new(config).unwrap().sweep(&mut filer, june_30()).unwrap();
        assert_eq!(metrics.total_archived(), 0);
        assert_eq!(metrics.summary_path, None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = JanitorConfig::default().with_days_to_keep(0);
        assert!(matches!(Janitor::new(config), Err(JanitorError::Config(_))));
    }
}
