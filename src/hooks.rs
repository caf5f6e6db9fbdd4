//! Post-create hook
//!
//! When the host project creates a new function it can notify slstest, which
//! scaffolds the function's test if the runtime is one it handles.

use crate::config::{TestingConfig, ANY_RUNTIME};
use crate::error::Result;
use crate::project::FunctionRegistry;
use crate::testgen::create_test;
use crate::util;
use std::path::PathBuf;

/// Which runtimes get a scaffolded test on creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimePredicate {
    Any,
    OneOf(Vec<String>),
}

impl RuntimePredicate {
    pub fn from_config(config: &TestingConfig) -> Self {
        if config.hook_runtimes.iter().any(|r| r == ANY_RUNTIME) {
            RuntimePredicate::Any
        } else {
            RuntimePredicate::OneOf(config.hook_runtimes.clone())
        }
    }

    pub fn matches(&self, runtime: Option<&str>) -> bool {
        match self {
            RuntimePredicate::Any => true,
            RuntimePredicate::OneOf(allowed) => {
                runtime.is_some_and(|rt| allowed.iter().any(|a| a == rt))
            }
        }
    }
}

/// Notification that a function was created
#[derive(Debug, Clone)]
pub struct FunctionCreated {
    /// Path the function was created at, e.g. `users/create`
    pub path: String,
    pub runtime: Option<String>,
}

impl FunctionCreated {
    /// Function name: the last segment of the creation path
    pub fn function_name(&self) -> &str {
        util::basename(self.path.trim_end_matches('/'))
    }

    /// Registry name of the created function: the full path if registered
    /// under it, otherwise the last segment
    fn registry_name(&self, registry: &dyn FunctionRegistry) -> String {
        let full = self.path.trim_end_matches('/');
        if registry.get_function(full).is_some() {
            full.to_string()
        } else {
            self.function_name().to_string()
        }
    }
}

/// Scaffold a test for a newly created function.
///
/// Returns `Ok(None)` when the runtime does not match. The runtime is taken
/// from the event, falling back to the registry entry.
pub fn on_function_created(
    registry: &dyn FunctionRegistry,
    config: &TestingConfig,
    event: &FunctionCreated,
) -> Result<Option<PathBuf>> {
    let name = event.registry_name(registry);
    let runtime = event
        .runtime
        .clone()
        .or_else(|| registry.get_function(&name).and_then(|f| f.runtime));

    if !RuntimePredicate::from_config(config).matches(runtime.as_deref()) {
        tracing::debug!(function = %name, runtime = ?runtime, "runtime not handled, skipping");
        return Ok(None);
    }

    create_test(registry, config, &name, None).map(Some)
}
