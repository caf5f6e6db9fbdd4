//! Test-run orchestration against a recording engine

use pretty_assertions::assert_eq;
use slstest::engine::PreSuiteHook;
use slstest::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

struct FakeRegistry {
    root: PathBuf,
    functions: Vec<Function>,
}

impl FunctionRegistry for FakeRegistry {
    fn get_function(&self, name: &str) -> Option<Function> {
        self.functions.iter().find(|f| f.name == name).cloned()
    }

    fn all_functions(&self) -> Vec<Function> {
        self.functions.clone()
    }

    fn root_path(&self) -> &Path {
        &self.root
    }
}

/// Each suite "observes" X from the environment it is handed and fails
/// `failures_per_suite` tests.
#[derive(Default)]
struct RecordingEngine {
    queued: Vec<PathBuf>,
    /// Every file run so far, across runs
    files: Vec<PathBuf>,
    observed: Vec<(String, Option<String>)>,
    failures_per_suite: HashMap<String, usize>,
    reporter_set: bool,
    ran: bool,
}

impl TestEngine for RecordingEngine {
    fn add_file(&mut self, path: PathBuf) {
        self.queued.push(path);
    }

    fn set_reporter(&mut self, _reporter: Box<dyn Reporter>) {
        self.reporter_set = true;
    }

    fn run(&mut self, pre_suite: &mut PreSuiteHook<'_>) -> Result<RunSummary> {
        self.ran = true;
        let mut summary = RunSummary::default();
        for file in std::mem::take(&mut self.queued) {
            let env = pre_suite(&file)?;
            let suite = SuiteInfo::for_file(&file);
            self.files.push(file);
            self.observed
                .push((suite.name.clone(), env.get("X").cloned()));

            summary.suites += 1;
            let failures = self.failures_per_suite.get(&suite.name).copied().unwrap_or(0);
            summary.record(&TestResult {
                suite: suite.name.clone(),
                name: "passes".into(),
                outcome: TestOutcome::Passed,
                message: None,
            });
            for i in 0..failures {
                summary.record(&TestResult::failed(&suite.name, format!("fails {i}"), "nope"));
            }
        }
        Ok(summary)
    }
}

fn registry() -> FakeRegistry {
    FakeRegistry {
        root: PathBuf::from("/project"),
        functions: vec![
            Function::new("users/f1", "/project/users/f1")
                .with_env("X", "one")
                .with_env("ONLY_F1", "yes"),
            Function::new("f2", "/project/f2").with_env("X", "two"),
            Function::new("f3", "/project/f3"),
        ],
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn each_suite_observes_its_own_environment() {
    let reg = registry();
    let testing = TestingConfig::default();
    let mut orch = Orchestrator::new(&reg, &testing, RecordingEngine::default());

    let outcome = orch
        .run(&names(&["users/f1", "f2"]), &StageConfig::default(), &ReporterSpec::default())
        .unwrap();

    assert_eq!(
        orch.engine().observed,
        vec![
            ("f1".to_string(), Some("one".to_string())),
            ("f2".to_string(), Some("two".to_string())),
        ]
    );
    assert_eq!(outcome.exit_code(), 0);
    // Last writer wins once the run is over
    assert_eq!(orch.env().get("X"), Some("two"));
    assert_eq!(orch.env().get("ONLY_F1"), Some("yes"));
}

#[test]
fn reverse_order_still_isolates_values() {
    let reg = registry();
    let testing = TestingConfig::default();
    let mut orch = Orchestrator::new(&reg, &testing, RecordingEngine::default());

    orch.run(&names(&["f2", "users/f1"]), &StageConfig::default(), &ReporterSpec::default())
        .unwrap();

    assert_eq!(
        orch.engine().observed,
        vec![
            ("f2".to_string(), Some("two".to_string())),
            ("f1".to_string(), Some("one".to_string())),
        ]
    );
}

#[test]
fn function_without_variables_sees_previous_values() {
    let reg = registry();
    let testing = TestingConfig::default();
    let mut orch = Orchestrator::new(&reg, &testing, RecordingEngine::default());

    orch.run(&names(&["f2", "f3"]), &StageConfig::default(), &ReporterSpec::default())
        .unwrap();

    // Shared environment: f3 defines no X and inherits the last written value
    assert_eq!(orch.engine().observed[1], ("f3".to_string(), Some("two".to_string())));
}

#[test]
fn empty_selection_runs_everything_in_registry_order() {
    let reg = registry();
    let testing = TestingConfig::default();
    let mut orch = Orchestrator::new(&reg, &testing, RecordingEngine::default());

    let outcome = orch
        .run(&[], &StageConfig::default(), &ReporterSpec::default())
        .unwrap();

    let paths: Vec<_> = outcome.targets.iter().map(|t| t.test_path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("/project/test/f1.js"),
            PathBuf::from("/project/test/f2.js"),
            PathBuf::from("/project/test/f3.js"),
        ]
    );
    assert_eq!(orch.engine().files, paths);
}

#[test]
fn second_run_only_executes_its_own_suites() {
    let reg = registry();
    let testing = TestingConfig::default();
    let mut orch = Orchestrator::new(&reg, &testing, RecordingEngine::default());

    orch.run(&names(&["users/f1"]), &StageConfig::default(), &ReporterSpec::default())
        .unwrap();
    let outcome = orch
        .run(&names(&["f2"]), &StageConfig::default(), &ReporterSpec::default())
        .unwrap();

    assert_eq!(outcome.summary.suites, 1);
    assert_eq!(
        orch.engine().files,
        vec![
            PathBuf::from("/project/test/f1.js"),
            PathBuf::from("/project/test/f2.js"),
        ]
    );
}

#[test]
fn unknown_names_are_skipped() {
    let reg = registry();
    let testing = TestingConfig::default();
    let mut orch = Orchestrator::new(&reg, &testing, RecordingEngine::default());

    let outcome = orch
        .run(&names(&["ghost", "f2"]), &StageConfig::default(), &ReporterSpec::default())
        .unwrap();
    assert_eq!(outcome.targets.len(), 1);
    assert_eq!(outcome.targets[0].function.name, "f2");
}

#[test]
fn nothing_resolved_aborts_without_running() {
    let reg = registry();
    let testing = TestingConfig::default();
    let mut orch = Orchestrator::new(&reg, &testing, RecordingEngine::default());

    let err = orch
        .run(&names(&["ghost"]), &StageConfig::default(), &ReporterSpec::default())
        .unwrap_err();
    assert!(matches!(err, Error::NoTests));
    assert!(!orch.engine().ran);
    assert!(orch.engine().files.is_empty());
}

#[test]
fn malformed_reporter_options_abort_before_execution() {
    let reg = registry();
    let testing = TestingConfig::default();
    let mut orch = Orchestrator::new(&reg, &testing, RecordingEngine::default());

    let reporter = ReporterSpec::named("spec").with_options("a=1=2");
    let err = orch
        .run(&[], &StageConfig::default(), &reporter)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidReporterOption(_)));
    assert!(!orch.engine().ran);
    assert!(orch.engine().observed.is_empty());
    assert!(orch.engine().queued.is_empty());
}

#[test]
fn unknown_reporter_aborts_before_execution() {
    let reg = registry();
    let testing = TestingConfig::default();
    let mut orch = Orchestrator::new(&reg, &testing, RecordingEngine::default());

    let err = orch
        .run(&[], &StageConfig::default(), &ReporterSpec::named("nyan"))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownReporter(_)));
    assert!(!orch.engine().ran);
}

#[test]
fn named_reporter_is_configured() {
    let reg = registry();
    let testing = TestingConfig::default();
    let mut orch = Orchestrator::new(&reg, &testing, RecordingEngine::default());

    orch.run(&[], &StageConfig::default(), &ReporterSpec::named("dot"))
        .unwrap();
    assert!(orch.engine().reporter_set);
}

#[test]
fn exit_code_is_failure_count() {
    let reg = registry();
    let testing = TestingConfig::default();
    let engine = RecordingEngine {
        failures_per_suite: HashMap::from([("f1".to_string(), 2), ("f3".to_string(), 1)]),
        ..Default::default()
    };
    let mut orch = Orchestrator::new(&reg, &testing, engine);

    let outcome = orch
        .run(&[], &StageConfig::default(), &ReporterSpec::default())
        .unwrap();
    assert_eq!(outcome.summary.suites, 3);
    assert_eq!(outcome.summary.passed, 3);
    assert_eq!(outcome.exit_code(), 3);
}

#[test]
fn population_error_aborts_before_execution() {
    let yaml = r#"
name: shop
functions:
  - name: f1
    environment:
      TABLE: "${missing}"
"#;
    let reg = ManifestRegistry::new("/shop", ProjectManifest::from_yaml(yaml).unwrap());
    let testing = reg.testing().clone();
    let mut orch = Orchestrator::new(&reg, &testing, RecordingEngine::default());

    let err = orch
        .run(&[], &StageConfig::new("dev", "us-east-1"), &ReporterSpec::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvedVariable { .. }));
    assert!(!orch.engine().ran);
}
