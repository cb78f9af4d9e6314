//! Metrics collected during an archive sweep

use chrono::NaiveDate;

/// Counts and paths from one sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JanitorMetrics {
    /// Log documents examined, excluding the archive itself
    pub scanned: usize,

    /// Documents moved (or, in dry-run mode, that would have moved)
    pub archived: Vec<String>,

    /// Documents that could not be moved
    pub failed: Vec<String>,

    /// Documents without a readable `created` date
    pub undated: usize,

    /// First day kept by this sweep
    pub cutoff: Option<NaiveDate>,

    /// Whether the sweep ran in dry-run mode
    pub dry_run: bool,

    /// Archive summary notification, when one was written
    pub summary_path: Option<String>,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents archived
    pub fn total_archived(&self) -> usize {
        self.archived.len()
    }

    /// Number of documents that failed to move
    pub fn total_failed(&self) -> usize {
        self.failed.len()
    }

    /// Documents that stayed in place because they are recent enough
    pub fn retained(&self) -> usize {
        self.scanned
            .saturating_sub(self.archived.len() + self.failed.len() + self.undated)
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let verb = if self.dry_run { "Would archive" } else { "Archived" };
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!(
                "Cutoff date: {}",
                self.cutoff.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
            ),
            format!("Scanned: {}", self.scanned),
            format!("{}: {}", verb, self.total_archived()),
            format!("Retained: {}", self.retained()),
        ];
        if self.undated > 0 {
            lines.push(format!("Undated: {}", self.undated));
        }
        if !self.failed.is_empty() {
            lines.push(format!("Failed: {}", self.total_failed()));
            for path in &self.failed {
                lines.push(format!("  {}", path));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = JanitorMetrics::new();
        assert_eq!(metrics.total_archived(), 0);
        assert_eq!(metrics.total_failed(), 0);
        assert_eq!(metrics.retained(), 0);
    }

    #[test]
    fn test_retained() {
        let metrics = JanitorMetrics {
            scanned: 10,
            archived: vec!["a".into(), "b".into()],
            failed: vec!["c".into()],
            undated: 2,
            ..Default::default()
        };
        assert_eq!(metrics.retained(), 5);
    }

    #[test]
    fn test_summary() {
        let metrics = JanitorMetrics {
            scanned: 4,
            archived: vec!["Inbox-Log/Log-1.md".into()],
            failed: vec!["Inbox-Log/Log-2.md".into()],
            cutoff: NaiveDate::from_ymd_opt(2024, 4, 1),
            ..Default::default()
        };
        let summary = metrics.summary();
        assert!(summary.contains("Cutoff date: 2024-04-01"));
        assert!(summary.contains("Archived: 1"));
        assert!(summary.contains("Retained: 2"));
        assert!(summary.contains("  Inbox-Log/Log-2.md"));
    }

    #[test]
    fn test_dry_run_summary() {
        let metrics = JanitorMetrics {
            scanned: 1,
            archived: vec!["Inbox-Log/Log-1.md".into()],
            dry_run: true,
            ..Default::default()
        };
        assert!(metrics.summary().contains("Would archive: 1"));
    }
}
