//! Testing configuration
//!
//! The `testing:` section of `slstest.yaml`. Every field has a default so an
//! empty (or missing) section behaves like the stock plugin: tests live in
//! `test/`, are plain `.js` files and run under `node --test`.

use crate::stage::StageConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Placeholder replaced with the suite path in [`TestingConfig::command`]
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Runtime pattern that matches every runtime in `hook_runtimes`
pub const ANY_RUNTIME: &str = "*";

/// Test generation and execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestingConfig {
    /// Folder holding generated tests, relative to the project root
    #[serde(default = "default_test_folder")]
    pub test_folder: PathBuf,

    /// Extension of generated test files (without the dot)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Override template filename looked up inside the test folder
    #[serde(default = "default_template_file")]
    pub template_file: String,

    /// Per-suite timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Command run once per suite; `{file}` is replaced by the suite path.
    /// The command must print TAP on stdout.
    #[serde(default = "default_command")]
    pub command: Vec<String>,

    /// Runtimes for which `function-created` scaffolds a test (`*` = any)
    #[serde(default = "default_hook_runtimes")]
    pub hook_runtimes: Vec<String>,
}

fn default_test_folder() -> PathBuf {
    PathBuf::from("test")
}

fn default_extension() -> String {
    "js".to_string()
}

fn default_template_file() -> String {
    "slstest-template.jinja".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_command() -> Vec<String> {
    vec![
        "node".to_string(),
        "--test".to_string(),
        "--test-reporter=tap".to_string(),
        FILE_PLACEHOLDER.to_string(),
    ]
}

fn default_hook_runtimes() -> Vec<String> {
    vec!["nodejs4.3".to_string()]
}

impl Default for TestingConfig {
    fn default() -> Self {
        Self {
            test_folder: default_test_folder(),
            extension: default_extension(),
            template_file: default_template_file(),
            timeout_ms: default_timeout_ms(),
            command: default_command(),
            hook_runtimes: default_hook_runtimes(),
        }
    }
}

impl TestingConfig {
    /// Per-suite timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Absolute test folder for a project rooted at `root`
    pub fn test_folder_in(&self, root: &Path) -> PathBuf {
        root.join(&self.test_folder)
    }
}

/// Stage/region used when the CLI does not name one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub stage: Option<String>,

    #[serde(default)]
    pub region: Option<String>,
}

impl DefaultsConfig {
    /// Fill in whatever the caller left unset
    pub fn apply(&self, stage: Option<String>, region: Option<String>) -> StageConfig {
        StageConfig {
            stage: stage.or_else(|| self.stage.clone()),
            region: region.or_else(|| self.region.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_uses_defaults() {
        let config: TestingConfig = serde_norway::from_str("{}").unwrap();
        assert_eq!(config, TestingConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.test_folder, PathBuf::from("test"));
        assert!(config.command.iter().any(|c| c == FILE_PLACEHOLDER));
    }

    #[test]
    fn test_partial_override() {
        let config: TestingConfig = serde_norway::from_str(
            r#"
extension: ts
hook_runtimes: ["*"]
"#,
        )
        .unwrap();
        assert_eq!(config.extension, "ts");
        assert_eq!(config.hook_runtimes, vec![ANY_RUNTIME.to_string()]);
        assert_eq!(config.timeout_ms, 5000);
    }

    #[test]
    fn test_defaults_fill_missing_stage() {
        let defaults = DefaultsConfig {
            stage: Some("dev".into()),
            region: Some("us-east-1".into()),
        };
        let stage = defaults.apply(Some("prod".into()), None);
        assert_eq!(stage.stage.as_deref(), Some("prod"));
        assert_eq!(stage.region.as_deref(), Some("us-east-1"));
    }
}
