//! Test-run orchestration
//!
//! ```text
//! names ──► resolve ──► test paths ──► inject env (all, up front)
//!                                          │
//!                    reporter (validated) ◄┘
//!                             │
//!                      engine.add_file
//!                             │
//!   engine.run ── before each suite: re-inject that function's env ──► summary
//! ```
//!
//! Suites share one [`EnvContext`]. Injecting up front catches population
//! errors before anything runs; injecting again before each suite makes every
//! suite observe its own function's values even when functions define the
//! same variable.

use crate::config::TestingConfig;
use crate::engine::{RunSummary, TestEngine};
use crate::env::{self, EnvContext};
use crate::error::{Error, Result};
use crate::project::{Function, FunctionRegistry};
use crate::reporter::{ReporterConfig, ReporterOptions};
use crate::resolve::resolve_functions;
use crate::stage::StageConfig;
use crate::testgen::test_file_path;
use crate::util;
use std::collections::HashMap;
use std::path::PathBuf;

/// Reporter name and raw option string as given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReporterSpec {
    pub name: Option<String>,
    pub options: Option<String>,
}

impl ReporterSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            options: None,
        }
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Validate into a reporter config; `None` means keep the engine default
    pub fn resolve(&self) -> Result<Option<ReporterConfig>> {
        match &self.name {
            Some(name) => ReporterConfig::parse(name, self.options.as_deref()).map(Some),
            None => {
                if let Some(raw) = &self.options {
                    ReporterOptions::parse(raw)?;
                }
                Ok(None)
            }
        }
    }
}

/// A function paired with its test file for the duration of a run
#[derive(Debug, Clone, PartialEq)]
pub struct TestTarget {
    pub function: Function,
    pub test_path: PathBuf,
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub targets: Vec<TestTarget>,
    pub summary: RunSummary,
}

impl RunOutcome {
    /// Number of failures; 0 on success
    pub fn exit_code(&self) -> usize {
        self.summary.exit_code()
    }
}

/// Drives one test run over a registry with a test engine
pub struct Orchestrator<'a, E: TestEngine> {
    registry: &'a dyn FunctionRegistry,
    config: &'a TestingConfig,
    engine: E,
    env: EnvContext,
}

impl<'a, E: TestEngine> Orchestrator<'a, E> {
    pub fn new(registry: &'a dyn FunctionRegistry, config: &'a TestingConfig, engine: E) -> Self {
        Self {
            registry,
            config,
            engine,
            env: EnvContext::new(),
        }
    }

    /// Start from an existing environment instead of an empty one
    pub fn with_env(mut self, env: EnvContext) -> Self {
        self.env = env;
        self
    }

    pub fn env(&self) -> &EnvContext {
        &self.env
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Test files for `functions`, without touching their content
    pub fn targets(&self, functions: Vec<Function>) -> Vec<TestTarget> {
        let folder = self.config.test_folder_in(self.registry.root_path());
        functions
            .into_iter()
            .map(|function| TestTarget {
                test_path: test_file_path(&folder, &function.name, &self.config.extension),
                function,
            })
            .collect()
    }

    /// Run the tests of `names` (every function when empty)
    pub fn run(
        &mut self,
        names: &[String],
        stage: &StageConfig,
        reporter: &ReporterSpec,
    ) -> Result<RunOutcome> {
        let functions = resolve_functions(self.registry, names);
        if functions.is_empty() {
            return Err(Error::NoTests);
        }

        let targets = self.targets(functions);
        // Suites are matched back to functions by file stem
        let by_stem: HashMap<String, &Function> = targets
            .iter()
            .map(|t| (util::file_stem(&t.test_path), &t.function))
            .collect();

        let Self {
            registry,
            engine,
            env: ctx,
            ..
        } = self;
        let registry: &dyn FunctionRegistry = *registry;

        for target in &targets {
            env::inject(registry, &target.function, stage, ctx)?;
        }
        // Validated before anything is queued so a rejected run leaves the
        // engine untouched
        let reporter = reporter.resolve()?;
        for target in &targets {
            engine.add_file(target.test_path.clone());
        }
        if let Some(config) = reporter {
            engine.set_reporter(config.build()?);
        }

        tracing::info!(suites = targets.len(), stage = %stage, "running tests");
        let summary = engine.run(&mut |file| {
            if let Some(function) = by_stem.get(&util::file_stem(file)) {
                env::inject(registry, function, stage, ctx)?;
            }
            Ok(ctx.snapshot())
        })?;

        tracing::debug!(?summary, "run finished");
        Ok(RunOutcome { targets, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_spec_without_name_still_validates_options() {
        assert!(ReporterSpec::default().resolve().unwrap().is_none());
        let bad = ReporterSpec {
            name: None,
            options: Some("a=1=2".into()),
        };
        assert!(matches!(bad.resolve(), Err(Error::InvalidReporterOption(_))));
    }

    #[test]
    fn test_reporter_spec_named() {
        let config = ReporterSpec::named("tap").resolve().unwrap().unwrap();
        assert_eq!(config.kind.name(), "tap");
        assert!(config.options.is_empty());
    }
}
