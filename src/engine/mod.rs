//! Test execution
//!
//! A [`TestEngine`] runs a list of test files, one suite per file, strictly in
//! order. Before each suite starts it calls the caller's pre-suite hook and
//! runs the suite with exactly the environment that hook returns, so the hook
//! completes before any test body of that suite executes.

mod command;
pub mod tap;

pub use command::CommandEngine;

use crate::error::Result;
use crate::project::EnvMap;
use crate::reporter::Reporter;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Called with a suite's file right before the suite runs.
/// Returns the environment the suite must observe.
pub type PreSuiteHook<'a> = dyn FnMut(&Path) -> Result<EnvMap> + 'a;

/// Runs registered test files and reports results
pub trait TestEngine {
    /// Queue a test file; files run in registration order
    fn add_file(&mut self, path: PathBuf);

    /// Replace the reporter results are sent to
    fn set_reporter(&mut self, reporter: Box<dyn Reporter>);

    /// Run every queued file as one run. The queue is emptied, so the next
    /// run only sees files added after this one.
    fn run(&mut self, pre_suite: &mut PreSuiteHook<'_>) -> Result<RunSummary>;
}

/// Suite identity as seen by reporters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteInfo {
    /// File stem of the suite file
    pub name: String,
    pub file: PathBuf,
}

impl SuiteInfo {
    pub fn for_file(file: &Path) -> Self {
        Self {
            name: crate::util::file_stem(file),
            file: file.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    Passed,
    Failed,
    Skipped,
}

/// One finished test
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    pub suite: String,
    pub name: String,
    pub outcome: TestOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TestResult {
    pub fn failed(suite: &str, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            suite: suite.to_string(),
            name: name.into(),
            outcome: TestOutcome::Failed,
            message: Some(message.into()),
        }
    }
}

/// Totals of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub suites: usize,
    pub tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn record(&mut self, result: &TestResult) {
        self.tests += 1;
        match result.outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed => self.failed += 1,
            TestOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Process exit status: the number of failures
    pub fn exit_code(&self) -> usize {
        self.failed
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(outcome: TestOutcome) -> TestResult {
        TestResult {
            suite: "s".into(),
            name: "t".into(),
            outcome,
            message: None,
        }
    }

    #[test]
    fn test_summary_counts_and_exit_code() {
        let mut summary = RunSummary::default();
        assert_eq!(summary.exit_code(), 0);
        assert!(summary.success());

        summary.record(&result(TestOutcome::Passed));
        summary.record(&result(TestOutcome::Failed));
        summary.record(&result(TestOutcome::Failed));
        summary.record(&result(TestOutcome::Skipped));

        assert_eq!(summary.tests, 4);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.exit_code(), 2);
        assert!(!summary.success());
    }

    #[test]
    fn test_suite_info_name_is_stem() {
        let info = SuiteInfo::for_file(Path::new("/p/test/create.js"));
        assert_eq!(info.name, "create");
    }
}
