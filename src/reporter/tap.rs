//! TAP version 13 over the whole run

use super::Reporter;
use crate::engine::{RunSummary, SuiteInfo, TestOutcome, TestResult};
use crate::error::Result;
use std::io::Write;

pub struct TapReporter {
    out: Box<dyn Write>,
    started: bool,
    count: usize,
}

impl TapReporter {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self {
            out,
            started: false,
            count: 0,
        }
    }

    fn header(&mut self) -> Result<()> {
        if !self.started {
            writeln!(self.out, "TAP version 13")?;
            self.started = true;
        }
        Ok(())
    }
}

impl Reporter for TapReporter {
    fn suite_started(&mut self, suite: &SuiteInfo) -> Result<()> {
        self.header()?;
        writeln!(self.out, "# {}", suite.name)?;
        Ok(())
    }

    fn test_finished(&mut self, result: &TestResult) -> Result<()> {
        self.count += 1;
        let title = format!("{} {}", result.suite, result.name);
        match result.outcome {
            TestOutcome::Passed => writeln!(self.out, "ok {} {}", self.count, title)?,
            TestOutcome::Skipped => writeln!(self.out, "ok {} {} # SKIP -", self.count, title)?,
            TestOutcome::Failed => {
                writeln!(self.out, "not ok {} {}", self.count, title)?;
                if let Some(message) = &result.message {
                    for line in message.lines() {
                        writeln!(self.out, "  {}", line)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn run_finished(&mut self, summary: &RunSummary) -> Result<()> {
        self.header()?;
        writeln!(self.out, "1..{}", self.count)?;
        writeln!(self.out, "# tests {}", summary.tests)?;
        writeln!(self.out, "# pass {}", summary.passed)?;
        writeln!(self.out, "# fail {}", summary.failed)?;
        self.out.flush()?;
        Ok(())
    }
}
