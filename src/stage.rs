//! Deployment target whose variables get materialized into a run

use serde::Serialize;
use std::fmt;

/// `(stage, region)` pair; immutable for the duration of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageConfig {
    pub stage: Option<String>,
    pub region: Option<String>,
}

impl StageConfig {
    pub fn new(stage: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            stage: Some(stage.into()),
            region: Some(region.into()),
        }
    }
}

impl fmt::Display for StageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.stage.as_deref().unwrap_or("-"),
            self.region.as_deref().unwrap_or("-")
        )
    }
}
