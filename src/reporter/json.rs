//! Single JSON document written when the run finishes

use super::Reporter;
use crate::engine::{RunSummary, SuiteInfo, TestOutcome, TestResult};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

enum Sink {
    Writer(Box<dyn Write>),
    File(PathBuf),
}

pub struct JsonReporter {
    sink: Sink,
    pretty: bool,
    started_at: Option<DateTime<Utc>>,
    tests: Vec<TestResult>,
}

#[derive(Serialize)]
struct Stats {
    suites: usize,
    tests: usize,
    passes: usize,
    pending: usize,
    failures: usize,
    start: Option<String>,
    end: String,
}

#[derive(Serialize)]
struct Document<'a> {
    stats: Stats,
    tests: &'a [TestResult],
    failures: Vec<&'a TestResult>,
}

impl JsonReporter {
    pub fn new(out: Box<dyn Write>, pretty: bool) -> Self {
        Self::with_sink(Sink::Writer(out), pretty)
    }

    /// Write the document to `path` instead of a stream
    pub fn to_file(path: PathBuf, pretty: bool) -> Self {
        Self::with_sink(Sink::File(path), pretty)
    }

    fn with_sink(sink: Sink, pretty: bool) -> Self {
        Self {
            sink,
            pretty,
            started_at: None,
            tests: Vec::new(),
        }
    }
}

impl Reporter for JsonReporter {
    fn suite_started(&mut self, _suite: &SuiteInfo) -> Result<()> {
        self.started_at.get_or_insert_with(Utc::now);
        Ok(())
    }

    fn test_finished(&mut self, result: &TestResult) -> Result<()> {
        self.tests.push(result.clone());
        Ok(())
    }

    fn run_finished(&mut self, summary: &RunSummary) -> Result<()> {
        let doc = Document {
            stats: Stats {
                suites: summary.suites,
                tests: summary.tests,
                passes: summary.passed,
                pending: summary.skipped,
                failures: summary.failed,
                start: self.started_at.map(|t| t.to_rfc3339()),
                end: Utc::now().to_rfc3339(),
            },
            tests: &self.tests,
            failures: self
                .tests
                .iter()
                .filter(|t| t.outcome == TestOutcome::Failed)
                .collect(),
        };
        let mut rendered = if self.pretty {
            serde_json::to_string_pretty(&doc)?
        } else {
            serde_json::to_string(&doc)?
        };
        rendered.push('\n');

        match &mut self.sink {
            Sink::Writer(out) => {
                out.write_all(rendered.as_bytes())?;
                out.flush()?;
            }
            Sink::File(path) => {
                std::fs::write(&*path, rendered).map_err(|source| Error::Write {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!("wrote report to {}", path.display());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SuiteInfo;
    use std::path::Path;

    #[test]
    fn test_writes_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut reporter = JsonReporter::to_file(path.clone(), true);

        let suite = SuiteInfo::for_file(Path::new("test/create.js"));
        reporter.suite_started(&suite).unwrap();
        let failed = TestResult::failed("create", "it works", "boom");
        reporter.test_finished(&failed).unwrap();
        let summary = RunSummary {
            suites: 1,
            tests: 1,
            failed: 1,
            ..Default::default()
        };
        reporter.run_finished(&summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["stats"]["failures"], 1);
        assert_eq!(value["failures"][0]["name"], "it works");
        assert_eq!(value["tests"][0]["outcome"], "failed");
    }
}
