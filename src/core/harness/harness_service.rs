use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use super::harness_models::{CheckOutcome, FailureReason, CheckError, Report};

/// A single named verification routine against a remote API.
///
/// Returning `Err` is equivalent to returning a failed outcome; the harness
/// converts it and carries on with the next check.
#[async_trait]
pub trait Check: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> Result<CheckOutcome, CheckError>;
}

/// Runs an ordered list of checks one after another and tallies the results.
pub struct Harness {
    title: String,
    separator_width: usize,
    checks: Vec<Arc<dyn Check>>,
    success_message: Option<String>,
    success_notes: Vec<String>,
    failure_hints: Vec<String>,
}

impl Harness {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            separator_width: 50,
            checks: Vec::new(),
            success_message: None,
            success_notes: Vec::new(),
            failure_hints: Vec::new(),
        }
    }

    pub fn with_separator_width(mut self, width: usize) -> Self {
        self.separator_width = width;
        self
    }

    pub fn with_check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Sentence following "All tests passed!" on a clean run.
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    /// Lines printed after the summary when every check passed.
    pub fn with_success_notes(mut self, notes: &[&str]) -> Self {
        self.success_notes = notes.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Lines printed after the summary when at least one check failed.
    pub fn with_failure_hints(mut self, hints: &[&str]) -> Self {
        self.failure_hints = hints.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub async fn run(&self) -> Report {
        let separator = "=".repeat(self.separator_width);
        println!("🚀 Starting {}...", self.title);
        println!("{}", separator);

        let mut report = Report::new(self.title.clone());

        for check in &self.checks {
            let name = check.name().to_string();
            println!("\n🔍 Testing {}...", name);

            let started = Instant::now();
            let outcome = Self::run_isolated(Arc::clone(check)).await;
            let elapsed = started.elapsed();

            match &outcome {
                CheckOutcome::Passed { detail } => {
                    tracing::debug!("{} passed in {:?}", name, elapsed);
                    println!("✅ {} - PASSED", name);
                    if !detail.is_empty() {
                        println!("   {}", detail);
                    }
                }
                CheckOutcome::Failed(reason) => {
                    tracing::warn!("{} failed in {:?}: {}", name, elapsed, reason);
                    println!("❌ {} - FAILED: {}", name, reason);
                }
            }

            report.record(name, outcome, elapsed);
        }

        println!("\n{}", separator);
        println!("{}", self.render_closing(&report));

        report
    }

    /// Summary line plus whichever notes apply to the outcome.
    pub fn render_closing(&self, report: &Report) -> String {
        let mut out = report.render_summary();

        if report.all_passed() {
            let message = self
                .success_message
                .clone()
                .unwrap_or_else(|| format!("{} completed successfully.", self.title));
            out.push_str(&format!("\n🎉 All tests passed! {}", message));
            Self::append_numbered(&mut out, "💡 Next Steps:", &self.success_notes);
        } else {
            out.push_str("\n⚠️ Some tests failed. Check the output above for details.");
            Self::append_numbered(&mut out, "🔧 Common Solutions:", &self.failure_hints);
        }

        out
    }

    fn append_numbered(out: &mut String, heading: &str, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        out.push_str(&format!("\n\n{}", heading));
        for (i, line) in lines.iter().enumerate() {
            out.push_str(&format!("\n   {}. {}", i + 1, line));
        }
    }

    // Each check runs in its own task so a panic surfaces as a JoinError
    // instead of tearing down the run. Tasks are awaited one at a time.
    async fn run_isolated(check: Arc<dyn Check>) -> CheckOutcome {
        let handle = tokio::spawn(async move { check.run().await });

        match handle.await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => CheckOutcome::Failed(err.into()),
            Err(join_err) if join_err.is_panic() => {
                let message = panic_message(join_err.into_panic());
                CheckOutcome::Failed(FailureReason::Panicked(message))
            }
            Err(join_err) => CheckOutcome::Failed(FailureReason::Panicked(join_err.to_string())),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedCheck {
        name: &'static str,
        outcome: CheckOutcome,
    }

    #[async_trait]
    impl Check for FixedCheck {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self) -> Result<CheckOutcome, CheckError> {
            Ok(self.outcome.clone())
        }
    }

    struct ErroringCheck;

    #[async_trait]
    impl Check for ErroringCheck {
        fn name(&self) -> &str {
            "erroring"
        }

        async fn run(&self) -> Result<CheckOutcome, CheckError> {
            Err(CheckError::Transport("connection refused".into()))
        }
    }

    struct PanickingCheck;

    #[async_trait]
    impl Check for PanickingCheck {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn run(&self) -> Result<CheckOutcome, CheckError> {
            panic!("index out of bounds");
        }
    }

    struct OrderedCheck {
        name: &'static str,
        position: usize,
        counter: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Check for OrderedCheck {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self) -> Result<CheckOutcome, CheckError> {
            let seen = self.counter.fetch_add(1, Ordering::SeqCst);
            if seen == self.position {
                Ok(CheckOutcome::passed("in order"))
            } else {
                Ok(CheckOutcome::content_mismatch(format!(
                    "ran at {} instead of {}",
                    seen, self.position
                )))
            }
        }
    }

    #[tokio::test]
    async fn zero_checks_report_success() {
        let harness = Harness::new("Empty Suite");
        let report = harness.run().await;
        assert!(harness
            .render_closing(&report)
            .contains("All tests passed! Empty Suite completed successfully."));
        assert_eq!(report.total_run, 0);
        assert_eq!(report.total_passed, 0);
        assert_eq!(report.exit_code(), 0);
    }

    #[tokio::test]
    async fn errors_are_recorded_as_failures() {
        let report = Harness::new("Errors")
            .with_check(FixedCheck {
                name: "ok",
                outcome: CheckOutcome::passed("fine"),
            })
            .with_check(ErroringCheck)
            .run()
            .await;

        assert_eq!(report.total_run, 2);
        assert_eq!(report.total_passed, 1);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(
            report.records[1].outcome,
            CheckOutcome::Failed(FailureReason::Transport("connection refused".into()))
        );
    }

    #[tokio::test]
    async fn panics_do_not_abort_the_run() {
        let report = Harness::new("Panics")
            .with_check(PanickingCheck)
            .with_check(FixedCheck {
                name: "after panic",
                outcome: CheckOutcome::passed("still ran"),
            })
            .run()
            .await;

        assert_eq!(report.total_run, 2);
        assert_eq!(report.total_passed, 1);
        match &report.records[0].outcome {
            CheckOutcome::Failed(FailureReason::Panicked(msg)) => {
                assert!(msg.contains("index out of bounds"))
            }
            other => panic!("expected panic failure, got {:?}", other),
        }
        assert!(report.records[1].outcome.is_passed());
    }

    #[tokio::test]
    async fn checks_run_in_declared_order() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut harness = Harness::new("Ordering");
        for (position, name) in ["first", "second", "third"].into_iter().enumerate() {
            harness = harness.with_check(OrderedCheck {
                name,
                position,
                counter: Arc::clone(&counter),
            });
        }

        assert_eq!(harness.check_names(), vec!["first", "second", "third"]);
        let report = harness.run().await;
        assert!(report.all_passed());
        assert_eq!(report.total_run, 3);
    }

    #[test]
    fn closing_lists_hints_only_on_failure() {
        let harness = Harness::new("Google Sheets API Testing")
            .with_success_message("Google Sheets API is properly configured.")
            .with_success_notes(&["The API key is working correctly"])
            .with_failure_hints(&["Enable Google Sheets API in Google Cloud Console"]);

        let mut report = Report::new("Google Sheets API Testing");
        report.record("a", CheckOutcome::passed("ok"), Default::default());
        let closing = harness.render_closing(&report);
        assert!(closing.contains("1/1 tests passed"));
        assert!(closing.contains("1. The API key is working correctly"));
        assert!(closing.contains("🎉 All tests passed! Google Sheets API is properly configured."));
        assert!(!closing.contains("Common Solutions"));

        report.record(
            "b",
            CheckOutcome::content_mismatch("empty"),
            Default::default(),
        );
        let closing = harness.render_closing(&report);
        assert!(closing.contains("1/2 tests passed"));
        assert!(closing.contains("1. Enable Google Sheets API"));
        assert!(!closing.contains("Next Steps"));
    }
}
