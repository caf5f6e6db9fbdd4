//! Subprocess engine: one child process per suite, TAP on stdout

use super::{tap, PreSuiteHook, RunSummary, SuiteInfo, TestEngine, TestOutcome, TestResult};
use crate::config::{TestingConfig, FILE_PLACEHOLDER};
use crate::error::{Error, Result};
use crate::project::EnvMap;
use crate::reporter::{self, Reporter};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// How long pipes are drained after the suite is over
const DRAIN_GRACE: Duration = Duration::from_millis(100);

/// Runs each suite as `command` with `{file}` replaced by the suite path.
///
/// The child gets exactly the environment returned by the pre-suite hook; the
/// parent process environment is not inherited.
pub struct CommandEngine {
    command: Vec<String>,
    cwd: PathBuf,
    timeout: Duration,
    files: Vec<PathBuf>,
    reporter: Box<dyn Reporter>,
}

/// Raw result of one child process
struct SuiteOutput {
    stdout: String,
    stderr: String,
    status: Option<ExitStatus>,
}

impl CommandEngine {
    pub fn new(command: Vec<String>, cwd: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            command,
            cwd: cwd.into(),
            timeout,
            files: Vec::new(),
            reporter: reporter::default_reporter(),
        }
    }

    pub fn from_config(config: &TestingConfig, project_root: &Path) -> Self {
        Self::new(config.command.clone(), project_root, config.timeout())
    }

    fn build_command(&self, file: &Path, env: &EnvMap) -> Result<Command> {
        let file_arg = file.to_string_lossy();
        let mut args = self
            .command
            .iter()
            .map(|arg| arg.replace(FILE_PLACEHOLDER, &file_arg));
        let program = args
            .next()
            .ok_or_else(|| Error::Other("testing.command is empty".to_string()))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&self.cwd)
            .env_clear()
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        Ok(cmd)
    }

    fn execute(&self, file: &Path, env: &EnvMap) -> Result<SuiteOutput> {
        let mut cmd = self.build_command(file, env)?;
        let mut child = cmd.spawn().map_err(|e| {
            Error::Other(format!(
                "Failed to start test command '{}': {}",
                self.command.join(" "),
                e
            ))
        })?;

        // Drain both pipes in background threads so a chatty child cannot block
        let stdout_handle = child
            .stdout
            .take()
            .ok_or_else(|| Error::Other("child stdout not captured".to_string()))?;
        let stderr_handle = child
            .stderr
            .take()
            .ok_or_else(|| Error::Other("child stderr not captured".to_string()))?;
        let stdout_rx = drain(stdout_handle);
        let stderr_rx = drain(stderr_handle);

        let start = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break Some(status);
            }
            if start.elapsed() > self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                break None;
            }
            thread::sleep(POLL_INTERVAL);
        };

        // Processes spawned by the child may still hold the pipes open; stop
        // reading at the suite deadline instead of waiting for EOF
        let drain_deadline = Instant::now().max(start + self.timeout) + DRAIN_GRACE;
        let stdout = collect(&stdout_rx, drain_deadline);
        let stderr = collect(&stderr_rx, drain_deadline);
        Ok(SuiteOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            status,
        })
    }

    /// Run one suite and turn its output into results
    fn run_suite(&self, suite: &SuiteInfo, env: &EnvMap) -> Result<Vec<TestResult>> {
        if !suite.file.is_file() {
            return Ok(vec![TestResult::failed(
                &suite.name,
                "load test file",
                format!("test file {} not found", suite.file.display()),
            )]);
        }

        let output = self.execute(&suite.file, env)?;
        let mut results = tap::parse(&suite.name, &output.stdout);

        match output.status {
            None => {
                tracing::warn!(suite = %suite.name, "suite timed out");
                results.push(TestResult::failed(
                    &suite.name,
                    "suite timeout",
                    format!("timeout of {}ms exceeded", self.timeout.as_millis()),
                ));
            }
            Some(status) if !status.success() => {
                let any_failed = results.iter().any(|r| r.outcome == TestOutcome::Failed);
                if !any_failed {
                    let stderr = output.stderr.trim();
                    results.push(TestResult::failed(
                        &suite.name,
                        "suite exited",
                        if stderr.is_empty() {
                            format!("test command exited with {}", status)
                        } else {
                            stderr.to_string()
                        },
                    ));
                }
            }
            Some(_) => {}
        }
        Ok(results)
    }
}

/// Forward everything read from `pipe` in chunks until EOF
fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

/// Gather drained chunks until EOF or `deadline`
fn collect(rx: &Receiver<Vec<u8>>, deadline: Instant) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(chunk) => out.extend_from_slice(&chunk),
            Err(_) => break,
        }
    }
    out
}

impl TestEngine for CommandEngine {
    fn add_file(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    fn set_reporter(&mut self, reporter: Box<dyn Reporter>) {
        self.reporter = reporter;
    }

    fn run(&mut self, pre_suite: &mut PreSuiteHook<'_>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let files = std::mem::take(&mut self.files);

        for file in &files {
            let env = pre_suite(file)?;
            let suite = SuiteInfo::for_file(file);
            tracing::debug!(suite = %suite.name, vars = env.len(), "starting suite");

            self.reporter.suite_started(&suite)?;
            summary.suites += 1;
            for result in self.run_suite(&suite, &env)? {
                summary.record(&result);
                self.reporter.test_finished(&result)?;
            }
            self.reporter.suite_finished(&suite)?;
        }

        self.reporter.run_finished(&summary)?;
        Ok(summary)
    }
}
