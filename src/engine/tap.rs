//! Minimal TAP reader
//!
//! Understands flat TAP (mocha's `tap` reporter) and nested TAP as emitted by
//! `node --test`, where subtests are indented and their parent's test point
//! follows them. Only leaf test points are reported; a point whose previous
//! point was indented deeper is a parent and is dropped.

use crate::engine::{TestOutcome, TestResult};
use regex::Regex;
use std::sync::OnceLock;

fn test_point() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<indent>\s*)(?P<not>not )?ok\b(?:\s+\d+)?(?:\s*-)?\s*(?P<rest>.*)$")
            .expect("test point pattern is valid")
    })
}

/// Description with an optional trailing `# SKIP` / `# TODO` directive.
/// The `#` must start the text or follow whitespace, so `\# SKIP` and `#42`
/// stay part of the description.
fn description() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<desc>.*?)(?:(?:^|\s)#\s*(?P<directive>(?i:skip|todo))\b\s*(?P<reason>.*))?$")
            .expect("description pattern is valid")
    })
}

/// Parse TAP output of one suite into leaf test results
pub fn parse(suite: &str, output: &str) -> Vec<TestResult> {
    let mut results = Vec::new();
    let mut previous_indent: Option<usize> = None;
    let mut in_yaml: Option<usize> = None;

    for line in output.lines() {
        let indent = line.len() - line.trim_start().len();
        let trimmed = line.trim();

        if let Some(yaml_indent) = in_yaml {
            if trimmed == "..." && indent == yaml_indent {
                in_yaml = None;
            }
            continue;
        }
        if trimmed == "---" {
            in_yaml = Some(indent);
            continue;
        }

        if let Some(reason) = trimmed.strip_prefix("Bail out!") {
            results.push(TestResult::failed(suite, "bail out", reason.trim()));
            break;
        }

        let Some(caps) = test_point().captures(line) else {
            continue;
        };

        let is_parent = previous_indent.is_some_and(|prev| prev > indent);
        previous_indent = Some(indent);
        if is_parent {
            continue;
        }

        let rest = caps.name("rest").map_or("", |m| m.as_str());
        let Some(parts) = description().captures(rest) else {
            continue;
        };
        let skipped = parts.name("directive").is_some();
        let outcome = if skipped {
            TestOutcome::Skipped
        } else if caps.name("not").is_some() {
            TestOutcome::Failed
        } else {
            TestOutcome::Passed
        };
        let message = parts
            .name("reason")
            .map(|r| r.as_str().trim().to_string())
            .filter(|r| !r.is_empty());

        results.push(TestResult {
            suite: suite.to_string(),
            name: parts["desc"].trim().to_string(),
            outcome,
            message,
        });
    }

    results
}
