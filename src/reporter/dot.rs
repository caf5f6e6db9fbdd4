//! One character per test

use super::Reporter;
use crate::engine::{RunSummary, SuiteInfo, TestOutcome, TestResult};
use crate::error::Result;
use std::io::Write;

pub struct DotReporter {
    out: Box<dyn Write>,
}

impl DotReporter {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self { out }
    }
}

impl Reporter for DotReporter {
    fn suite_started(&mut self, _suite: &SuiteInfo) -> Result<()> {
        Ok(())
    }

    fn test_finished(&mut self, result: &TestResult) -> Result<()> {
        let mark = match result.outcome {
            TestOutcome::Passed => ".",
            TestOutcome::Failed => "F",
            TestOutcome::Skipped => ",",
        };
        write!(self.out, "{}", mark)?;
        self.out.flush()?;
        Ok(())
    }

    fn run_finished(&mut self, summary: &RunSummary) -> Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{} passing, {} failing, {} pending",
            summary.passed, summary.failed, summary.skipped
        )?;
        self.out.flush()?;
        Ok(())
    }
}
