//! Result reporters
//!
//! A reporter is picked by name (`spec`, `dot`, `tap`, `json`) and tuned with a
//! flat option string such as `output=report.json,pretty`. Both are validated
//! once, when the [`ReporterConfig`] is parsed, so the engine only ever sees a
//! well-formed configuration.

mod dot;
mod json;
mod spec;
mod tap;

pub use dot::DotReporter;
pub use json::JsonReporter;
pub use spec::SpecReporter;
pub use tap::TapReporter;

use crate::engine::{RunSummary, SuiteInfo, TestResult};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

/// Receives run events in order
pub trait Reporter {
    fn suite_started(&mut self, suite: &SuiteInfo) -> Result<()>;

    fn test_finished(&mut self, result: &TestResult) -> Result<()>;

    fn suite_finished(&mut self, _suite: &SuiteInfo) -> Result<()> {
        Ok(())
    }

    fn run_finished(&mut self, summary: &RunSummary) -> Result<()>;
}

/// The `spec` reporter on stdout
pub fn default_reporter() -> Box<dyn Reporter> {
    Box::new(SpecReporter::new(Box::new(std::io::stdout())))
}

/// Value of one reporter option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Value(String),
    /// Bare key without `=`
    Flag,
}

/// Parsed `key[=value],...` options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReporterOptions(BTreeMap<String, OptionValue>);

impl ReporterOptions {
    /// Parse `key[=value]` tokens separated by commas.
    ///
    /// Empty tokens, empty keys and tokens with more than one `=` are rejected,
    /// so the empty string is an error too.
    pub fn parse(input: &str) -> Result<Self> {
        let mut options = BTreeMap::new();
        for token in input.split(',') {
            let parts: Vec<&str> = token.split('=').collect();
            let (key, value) = match parts.as_slice() {
                [key] => (*key, OptionValue::Flag),
                [key, value] => (*key, OptionValue::Value(value.to_string())),
                _ => return Err(Error::InvalidReporterOption(token.to_string())),
            };
            if key.is_empty() {
                return Err(Error::InvalidReporterOption(token.to_string()));
            }
            options.insert(key.to_string(), value);
        }
        Ok(Self(options))
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    /// String value of `key`; flags have none
    pub fn value(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(OptionValue::Value(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// True for a bare flag or a value of `true`/`1`
    pub fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(OptionValue::Flag) => true,
            Some(OptionValue::Value(v)) => matches!(v.as_str(), "true" | "1"),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for ReporterOptions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Built-in reporters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterKind {
    Spec,
    Dot,
    Tap,
    Json,
}

impl ReporterKind {
    pub fn name(self) -> &'static str {
        match self {
            ReporterKind::Spec => "spec",
            ReporterKind::Dot => "dot",
            ReporterKind::Tap => "tap",
            ReporterKind::Json => "json",
        }
    }
}

impl FromStr for ReporterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "spec" => Ok(ReporterKind::Spec),
            "dot" => Ok(ReporterKind::Dot),
            "tap" => Ok(ReporterKind::Tap),
            "json" => Ok(ReporterKind::Json),
            _ => Err(Error::UnknownReporter(s.to_string())),
        }
    }
}

impl fmt::Display for ReporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated reporter selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    pub kind: ReporterKind,
    pub options: ReporterOptions,
}

impl ReporterConfig {
    /// Validate a reporter name and its optional option string
    pub fn parse(name: &str, options: Option<&str>) -> Result<Self> {
        let kind: ReporterKind = name.parse()?;
        let options = match options {
            Some(raw) => ReporterOptions::parse(raw)?,
            None => ReporterOptions::default(),
        };
        Ok(Self { kind, options })
    }

    /// Build the reporter writing to stdout
    pub fn build(&self) -> Result<Box<dyn Reporter>> {
        self.build_with_writer(Box::new(std::io::stdout()))
    }

    /// Build the reporter writing to `out` (unless options redirect it)
    pub fn build_with_writer(&self, out: Box<dyn Write>) -> Result<Box<dyn Reporter>> {
        let reporter: Box<dyn Reporter> = match self.kind {
            ReporterKind::Spec => Box::new(SpecReporter::new(out)),
            ReporterKind::Dot => Box::new(DotReporter::new(out)),
            ReporterKind::Tap => Box::new(TapReporter::new(out)),
            ReporterKind::Json => {
                let pretty = self.options.flag("pretty");
                match self.options.value("output") {
                    Some(path) => Box::new(JsonReporter::to_file(PathBuf::from(path), pretty)),
                    None => Box::new(JsonReporter::new(out, pretty)),
                }
            }
        };
        Ok(reporter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_key_value_pairs() {
        let opts = ReporterOptions::parse("a=1,b=2").unwrap();
        assert_eq!(opts.len(), 2);
        assert_eq!(opts.value("a"), Some("1"));
        assert_eq!(opts.value("b"), Some("2"));
    }

    #[test]
    fn test_bare_key_is_flag() {
        let opts = ReporterOptions::parse("flag").unwrap();
        assert_eq!(opts.get("flag"), Some(&OptionValue::Flag));
        assert!(opts.flag("flag"));
        assert_eq!(opts.value("flag"), None);
    }

    #[test]
    fn test_empty_value_is_kept() {
        let opts = ReporterOptions::parse("a=").unwrap();
        assert_eq!(opts.value("a"), Some(""));
    }

    #[rstest]
    #[case("a=1=2")]
    #[case("")]
    #[case("a=1,,b=2")]
    #[case("a=1,")]
    #[case("=1")]
    fn test_malformed_options(#[case] input: &str) {
        assert!(matches!(
            ReporterOptions::parse(input),
            Err(Error::InvalidReporterOption(_))
        ));
    }

    #[test]
    fn test_error_names_offending_token() {
        let err = ReporterOptions::parse("ok=1,x=1=2").unwrap_err();
        assert_eq!(err.to_string(), "invalid reporter option 'x=1=2'");
    }

    #[test]
    fn test_reporter_config() {
        let config = ReporterConfig::parse("JSON", Some("output=out.json,pretty")).unwrap();
        assert_eq!(config.kind, ReporterKind::Json);
        assert!(config.options.flag("pretty"));

        assert!(matches!(
            ReporterConfig::parse("nyan", None),
            Err(Error::UnknownReporter(_))
        ));
        assert!(matches!(
            ReporterConfig::parse("dot", Some("a=1=2")),
            Err(Error::InvalidReporterOption(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_well_formed_options_parse(
            pairs in prop::collection::btree_map("[a-z][a-z0-9_-]{0,7}", "[A-Za-z0-9./]{0,8}", 1..6)
        ) {
            let raw = pairs
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(",");
            let opts = ReporterOptions::parse(&raw).unwrap();
            prop_assert_eq!(opts.len(), pairs.len());
            for (k, v) in &pairs {
                prop_assert_eq!(opts.value(k), Some(v.as_str()));
            }
        }

        #[test]
        fn prop_double_equals_always_rejected(key in "[a-z]{1,5}", a in "[a-z0-9]{0,4}", b in "[a-z0-9]{0,4}") {
            let token = format!("{}={}={}", key, a, b);
            prop_assert!(ReporterOptions::parse(&token).is_err());
        }
    }
}
