//! Environment injection
//!
//! All suites of a run share one environment, so a function's variables are
//! written into an [`EnvContext`] right before the suite that tests it starts.
//! Writes are last-writer-wins: two functions that set the same variable to
//! different values see their own value only because injection is repeated
//! before every suite.

use crate::error::Result;
use crate::project::{EnvMap, Function, FunctionRegistry};
use crate::stage::StageConfig;

/// Shared key/value environment handed to each suite
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvContext {
    vars: EnvMap,
}

impl EnvContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the current process environment (PATH, HOME, ...).
    ///
    /// Entries whose key or value is not valid UTF-8 are left out.
    pub fn seeded_from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    tracing::debug!(key = ?key, "skipping non UTF-8 environment entry");
                    None
                }
            })
            .collect();
        Self { vars }
    }

    /// Write every entry, overwriting existing values
    pub fn apply(&mut self, mapping: &EnvMap) {
        for (key, value) in mapping {
            self.vars.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn snapshot(&self) -> EnvMap {
        self.vars.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Populate `function`'s environment for `stage` and apply it to `ctx`.
///
/// Returns the mapping that was applied.
pub fn inject(
    registry: &dyn FunctionRegistry,
    function: &Function,
    stage: &StageConfig,
    ctx: &mut EnvContext,
) -> Result<EnvMap> {
    let mapping = registry.populate_environment(function, stage)?;
    tracing::trace!(function = %function.name, vars = mapping.len(), "injecting environment");
    ctx.apply(&mapping);
    Ok(mapping)
}
