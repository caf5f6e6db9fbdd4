//! Hierarchical human-readable output

use super::Reporter;
use crate::engine::{RunSummary, SuiteInfo, TestOutcome, TestResult};
use crate::error::Result;
use std::io::Write;

pub struct SpecReporter {
    out: Box<dyn Write>,
    failures: Vec<TestResult>,
}

impl SpecReporter {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self {
            out,
            failures: Vec::new(),
        }
    }
}

impl Reporter for SpecReporter {
    fn suite_started(&mut self, suite: &SuiteInfo) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "  {} ({})", suite.name, suite.file.display())?;
        Ok(())
    }

    fn test_finished(&mut self, result: &TestResult) -> Result<()> {
        match result.outcome {
            TestOutcome::Passed => writeln!(self.out, "    ✓ {}", result.name)?,
            TestOutcome::Skipped => writeln!(self.out, "    - {}", result.name)?,
            TestOutcome::Failed => {
                self.failures.push(result.clone());
                writeln!(self.out, "    {}) {}", self.failures.len(), result.name)?;
            }
        }
        Ok(())
    }

    fn run_finished(&mut self, summary: &RunSummary) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "  {} passing", summary.passed)?;
        if summary.skipped > 0 {
            writeln!(self.out, "  {} pending", summary.skipped)?;
        }
        if summary.failed > 0 {
            writeln!(self.out, "  {} failing", summary.failed)?;
        }

        for (i, failure) in self.failures.iter().enumerate() {
            writeln!(self.out)?;
            writeln!(self.out, "  {}) {} {}:", i + 1, failure.suite, failure.name)?;
            if let Some(message) = &failure.message {
                for line in message.lines() {
                    writeln!(self.out, "     {}", line)?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
