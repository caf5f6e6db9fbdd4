// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # slstest: tests for serverless functions
//!
//! Scaffolds one test file per function and runs them with each function's
//! environment variables in place.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use slstest::*;
//!
//! let registry = ManifestRegistry::discover(&std::env::current_dir()?)?;
//! let testing = registry.testing().clone();
//!
//! // Scaffold test/create.js for `users/create`
//! create_test(&registry, &testing, "users/create", None)?;
//!
//! // Run every function's tests against dev/us-east-1
//! let engine = CommandEngine::from_config(&testing, registry.root_path());
//! let mut orch = Orchestrator::new(&registry, &testing, engine)
//!     .with_env(EnvContext::seeded_from_process());
//! let outcome = orch.run(&[], &StageConfig::new("dev", "us-east-1"), &ReporterSpec::default())?;
//! std::process::exit(outcome.exit_code() as i32);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  slstest.yaml ──► ManifestRegistry (FunctionRegistry)        │
//! │                        │                                     │
//! │  create ──► resolve_template ──► TestFileGenerator ──► file  │
//! │                        │                                     │
//! │  run ──► resolve_functions ──► env::inject ──► TestEngine    │
//! │                                    ▲              │          │
//! │                                    └─ pre-suite ──┘          │
//! │                                                   ▼          │
//! │                                   Reporter ◄── RunSummary    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

// Project model
pub mod config;
pub mod error;
pub mod project;
pub mod stage;

// Scaffolding
pub mod templates;
pub mod testgen;
pub mod util;

// Running
pub mod engine;
pub mod env;
pub mod orchestrate;
pub mod reporter;
pub mod resolve;

// Host integration
pub mod hooks;

// Re-exports
pub use config::{DefaultsConfig, TestingConfig};
pub use engine::{CommandEngine, RunSummary, SuiteInfo, TestEngine, TestOutcome, TestResult};
pub use env::{inject, EnvContext};
pub use error::{Error, Result};
pub use hooks::{on_function_created, FunctionCreated, RuntimePredicate};
pub use orchestrate::{Orchestrator, ReporterSpec, RunOutcome, TestTarget};
pub use project::{
    find_root, EnvMap, Function, FunctionRegistry, ManifestRegistry, ProjectManifest,
    MANIFEST_FILE,
};
pub use reporter::{OptionValue, Reporter, ReporterConfig, ReporterKind, ReporterOptions};
pub use resolve::resolve_functions;
pub use stage::StageConfig;
pub use templates::{resolve_template, TemplateSource};
pub use testgen::{create_test, test_file_path, TestFileGenerator, TestFileRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
