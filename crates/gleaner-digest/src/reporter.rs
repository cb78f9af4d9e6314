//! Cross-record reports written as notifications

use crate::gather::{
    captures_since, people_with_follow_ups, projects_with_status, tasks_due, DigestInput,
    ReviewInput,
};
use crate::prompt::{digest_context, digest_prompt, review_context, review_prompt};
use crate::{DigestConfig, DigestError};
use chrono::Days;
use gleaner_domain::traits::{DocumentStore, LlmProvider};
use gleaner_domain::Metadata;
use gleaner_filer::{RecordFiler, Stamp};
use tracing::{info, warn};

/// Project statuses listed in the weekly review
const OPEN_PROJECT_STATUSES: [&str; 3] = ["active", "waiting", "blocked"];

/// Which report was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Morning overview of projects, follow-ups and due tasks
    DailyDigest,

    /// Look back over the week's captures and open projects
    WeeklyReview,
}

impl ReportKind {
    /// Notification kind, also the document name prefix
    pub fn notice_kind(&self) -> &'static str {
        match self {
            ReportKind::DailyDigest => "Daily-Digest",
            ReportKind::WeeklyReview => "Weekly-Review",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ReportKind::DailyDigest => "Daily Digest",
            ReportKind::WeeklyReview => "Weekly Review",
        }
    }
}

/// A written report
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Which report
    pub kind: ReportKind,

    /// Records and log entries the report was built from
    pub sources: usize,

    /// Whether the summary came from the service (false when nothing was
    /// gathered or the call failed)
    pub summarized: bool,

    /// Why summarization failed, if it did
    pub error: Option<String>,

    /// Notification document path
    pub path: String,

    /// Notification body
    pub body: String,
}

/// Builds the daily digest and the weekly review
///
/// Records are gathered through metadata queries, summarized by the
/// classification service, and written to the notifications folder. A failed
/// or timed-out summarization still writes the report, with the error in
/// place of the summary.
pub struct Reporter<L: LlmProvider> {
    provider: L,
    config: DigestConfig,
}

impl<L: LlmProvider> Reporter<L> {
    /// Create a reporter
    pub fn new(provider: L, config: DigestConfig) -> Result<Self, DigestError> {
        config.validate().map_err(DigestError::Config)?;
        Ok(Self { provider, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    /// Gather the daily digest inputs for `now`
    pub fn digest_input<S: DocumentStore>(&self, store: &S, now: &Stamp) -> DigestInput {
        DigestInput {
            projects: projects_with_status(store, &["active"], self.config.digest_projects),
            people: people_with_follow_ups(store, self.config.digest_people),
            tasks: tasks_due(store, now.day(), self.config.digest_tasks),
        }
    }

    /// Gather the weekly review inputs for `now`
    pub fn review_input<S: DocumentStore>(
        &self,
        store: &S,
        log_folder: &str,
        now: &Stamp,
    ) -> ReviewInput {
        let since = now
            .day()
            .checked_sub_days(Days::new(u64::from(self.config.review_days)))
            .unwrap_or(chrono::NaiveDate::MIN);
        ReviewInput {
            captures: captures_since(
                store,
                log_folder,
                since,
                self.config.review_captures,
                self.config.capture_chars,
            ),
            projects: projects_with_status(
                store,
                &OPEN_PROJECT_STATUSES,
                self.config.review_projects,
            ),
        }
    }

    /// Write the daily digest
    pub async fn daily_digest<S: DocumentStore>(
        &self,
        filer: &mut RecordFiler<S>,
        now: Stamp,
    ) -> Result<Report, DigestError> {
        let input = self.digest_input(filer.store(), &now);
        info!(
            projects = input.projects.len(),
            people = input.people.len(),
            tasks = input.tasks.len(),
            "Daily digest inputs gathered"
        );

        let prompt = (!input.is_empty())
            .then(|| digest_prompt(&digest_context(&input), &now.date()));
        self.write(filer, ReportKind::DailyDigest, input.len(), prompt, None, now)
            .await
    }

    /// Write the weekly review
    pub async fn weekly_review<S: DocumentStore>(
        &self,
        filer: &mut RecordFiler<S>,
        now: Stamp,
    ) -> Result<Report, DigestError> {
        let log_folder = filer.config().inbox_log_folder.clone();
        let input = self.review_input(filer.store(), &log_folder, &now);
        info!(
            captures = input.captures.len(),
            needs_review = input.needs_review(),
            projects = input.projects.len(),
            "Weekly review inputs gathered"
        );

        let sources = input.captures.len() + input.projects.len();
        let prompt = (sources > 0)
            .then(|| review_prompt(&review_context(&input), input.captures.len()));
        let mut extra = Metadata::new();
        extra.insert("captures", input.captures.len() as f64);
        extra.insert("review_days", f64::from(self.config.review_days));
        self.write(filer, ReportKind::WeeklyReview, sources, prompt, Some(extra), now)
            .await
    }

    async fn write<S: DocumentStore>(
        &self,
        filer: &mut RecordFiler<S>,
        kind: ReportKind,
        sources: usize,
        prompt: Option<String>,
        extra: Option<Metadata>,
        now: Stamp,
    ) -> Result<Report, DigestError> {
        let (summary, summarized, error) = match prompt {
            None => (format!("# {}\n\nNothing to report.\n", kind.title()), false, None),
            Some(prompt) => match self.summarize(&prompt).await {
                Ok(text) => (text, true, None),
                Err(message) => {
                    warn!(kind = kind.notice_kind(), "Summarization failed: {}", message);
                    let body = format!(
                        "# {} Error\n\nFailed to generate the {}: {}\n\nCheck the API key and try again.\n",
                        kind.title(),
                        kind.title().to_lowercase(),
                        message
                    );
                    (body, false, Some(message))
                }
            },
        };

        let body = format!(
            "{}\n\n---\n*Generated on {}*\n",
            summary.trim_end(),
            now.second()
        );
        let path = filer.write_notification(kind.notice_kind(), extra, &body, &now)?;
        info!(path = %path, summarized, "{} written", kind.title());
        Ok(Report {
            kind,
            sources,
            summarized,
            error,
            path,
            body,
        })
    }

    async fn summarize(&self, prompt: &str) -> Result<String, String> {
        match tokio::time::timeout(self.config.summary_timeout(), self.provider.generate(prompt))
            .await
        {
            Ok(Ok(text)) if !text.trim().is_empty() => Ok(text),
            Ok(Ok(_)) => Err("Service returned an empty summary".to_string()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "Timed out after {}s",
                self.config.summary_timeout_secs
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use gleaner_domain::metadata::split_document;
    use gleaner_filer::VaultConfig;
    use gleaner_llm::{LlmError, MockProvider};
    use gleaner_store::MemoryStore;
    use std::time::Duration;

    fn noon(y: i32, m: u32, d: u32) -> Stamp {
        Stamp::at(Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    fn filer() -> RecordFiler<MemoryStore> {
        let store = MemoryStore::with_documents([
            ("Projects/Leak.md", "---\nstatus: active\nnext_action: Call plumber\n---\n"),
            ("Projects/Shed.md", "---\nstatus: waiting\n---\n"),
            ("People/Mom.md", "---\nfollow_ups: Ask about boxes\n---\n"),
            ("Admin/Taxes.md", "---\nstatus: active\ndue_date: 2024-03-01\n---\n"),
            (
                "Inbox-Log/Log-a.md",
                "---\nentry_hash: h1\noriginal_text: Called Mom\nfiled_to: people\ndestination_name: Mom\nconfidence: 0.9\nstatus: filed\nsource_note: Journal/d\ncreated: 2024-03-01 09:00:00\n---\n",
            ),
            (
                "Inbox-Log/Log-b.md",
                "---\nentry_hash: h0\noriginal_text: Ancient\nfiled_to: ideas\nconfidence: 0.9\nstatus: filed\nsource_note: Journal/d\ncreated: 2024-01-01 09:00:00\n---\n",
            ),
        ]);
        RecordFiler::new(store, VaultConfig::default()).unwrap()
    }

    fn reporter(llm: &MockProvider) -> Reporter<MockProvider> {
        Reporter::new(llm.clone(), DigestConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_daily_digest_written() {
        let llm = MockProvider::new("**Good morning!**\n\n1. Call plumber");
        let mut filer = filer();

        let report = reporter(&llm)
            .daily_digest(&mut filer, noon(2024, 3, 2))
            .await
            .unwrap();
        assert_eq!(report.kind, ReportKind::DailyDigest);
        assert_eq!(report.sources, 3);
        assert!(report.summarized);
        assert!(report.path.starts_with("Notifications/Daily-Digest-2024-03-02-"));

        let prompt = llm.last_prompt().unwrap();
        assert!(prompt.contains("1. Leak"));
        assert!(!prompt.contains("Shed"));
        assert!(prompt.contains("Follow-up: Ask about boxes"));
        assert!(prompt.contains("Due: 2024-03-01"));

        let doc = filer.store().read(&report.path).unwrap();
        let (meta, body) = split_document(&doc);
        assert_eq!(meta.get_str("notification_type"), Some("Daily-Digest"));
        assert!(body.starts_with("**Good morning!**"));
    }

    #[tokio::test]
    async fn test_weekly_review_covers_window() {
        let llm = MockProvider::new("**Week in Review**");
        let mut filer = filer();

        let report = reporter(&llm)
            .weekly_review(&mut filer, noon(2024, 3, 5))
            .await
            .unwrap();
        // One capture in the window plus Leak and Shed
        assert_eq!(report.sources, 3);

        let prompt = llm.last_prompt().unwrap();
        assert!(prompt.contains("1. [people] Mom"));
        assert!(!prompt.contains("Ancient"));
        assert!(prompt.contains("Shed\n   Status: waiting"));
        assert!(prompt.contains("TOTAL CAPTURES THIS WEEK: 1"));

        let (meta, _) = split_document(&filer.store().read(&report.path).unwrap());
        assert_eq!(meta.get_f64("captures"), Some(1.0));
    }

    #[tokio::test]
    async fn test_service_failure_still_writes_report() {
        let llm = MockProvider::default();
        llm.push_error(LlmError::http(401, "Invalid API Key"));
        let mut filer = filer();

        let report = reporter(&llm)
            .daily_digest(&mut filer, noon(2024, 3, 2))
            .await
            .unwrap();
        assert!(!report.summarized);
        assert!(report.error.as_deref().unwrap().contains("Invalid API Key"));
        assert!(report.body.starts_with("# Daily Digest Error"));
        assert!(filer.store().exists(&report.path));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_service_times_out() {
        let llm = MockProvider::new("late").with_latency(Duration::from_secs(600));
        let mut filer = filer();

        let report = reporter(&llm)
            .weekly_review(&mut filer, noon(2024, 3, 5))
            .await
            .unwrap();
        assert!(report.error.as_deref().unwrap().starts_with("Timed out"));
    }

    #[tokio::test]
    async fn test_empty_vault_skips_service() {
        let llm = MockProvider::default();
        let mut filer = RecordFiler::new(MemoryStore::new(), VaultConfig::default()).unwrap();

        let report = reporter(&llm)
            .daily_digest(&mut filer, noon(2024, 3, 2))
            .await
            .unwrap();
        assert_eq!(report.sources, 0);
        assert!(!report.summarized);
        assert_eq!(llm.call_count(), 0);
        assert!(report.body.contains("Nothing to report."));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DigestConfig::default().with_review_days(0);
        assert!(matches!(
            Reporter::new(MockProvider::default(), config),
            Err(DigestError::Config(_))
        ));
    }
}
