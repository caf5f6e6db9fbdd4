//! Test-file scaffolding
//!
//! One test file per function at `<test_folder>/<basename>.<ext>`. Existing
//! files are never overwritten.

use crate::config::TestingConfig;
use crate::error::{Error, Result};
use crate::project::{Function, FunctionRegistry};
use crate::templates::{self, TemplateSource, TestContext};
use crate::util;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// A function and the test file that belongs to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFileRecord {
    pub function_name: String,
    pub path: PathBuf,
}

/// `<test_folder>/<basename(function_name)>.<extension>`
pub fn test_file_path(test_folder: &Path, function_name: &str, extension: &str) -> PathBuf {
    test_folder.join(format!("{}.{}", util::basename(function_name), extension))
}

/// Writes test files for a project
pub struct TestFileGenerator<'a> {
    project_root: &'a Path,
    project_name: &'a str,
    config: &'a TestingConfig,
}

impl<'a> TestFileGenerator<'a> {
    pub fn new(project_root: &'a Path, project_name: &'a str, config: &'a TestingConfig) -> Self {
        Self {
            project_root,
            project_name,
            config,
        }
    }

    pub fn test_folder(&self) -> PathBuf {
        self.config.test_folder_in(self.project_root)
    }

    pub fn record_for(&self, function_name: &str) -> TestFileRecord {
        TestFileRecord {
            function_name: function_name.to_string(),
            path: test_file_path(&self.test_folder(), function_name, &self.config.extension),
        }
    }

    /// Create the test folder if it is missing
    pub fn ensure_test_folder(&self) -> Result<PathBuf> {
        let folder = self.test_folder();
        std::fs::create_dir_all(&folder).map_err(|source| Error::Write {
            path: folder.clone(),
            source,
        })?;
        Ok(folder)
    }

    /// Render `template` for `function` and write it to its test path
    pub fn generate(&self, function: &Function, template: &TemplateSource) -> Result<PathBuf> {
        self.ensure_test_folder()?;

        let record = self.record_for(&function.name);
        let ctx = TestContext {
            function_name: function.name.clone(),
            function_path: util::relative_slash_path(self.project_root, &function.root_path),
            project_name: self.project_name.to_string(),
            generated_at: Utc::now().to_rfc3339(),
        };
        let content = templates::render(template, &ctx)?;

        // create_new makes the existence check and the creation one step
        let opened = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&record.path);
        let mut file = match opened {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::AlreadyExists(record.path));
            }
            Err(source) => {
                return Err(Error::Write {
                    path: record.path,
                    source,
                });
            }
        };
        file.write_all(content.as_bytes()).map_err(|source| Error::Write {
            path: record.path.clone(),
            source,
        })?;
        tracing::info!("created {}", record.path.display());
        Ok(record.path)
    }
}

/// Scaffold a test for a named function.
///
/// `template_file` names the override template inside the test folder; when
/// absent the configured `template_file` is used.
pub fn create_test(
    registry: &dyn FunctionRegistry,
    config: &TestingConfig,
    function_name: &str,
    template_file: Option<&str>,
) -> Result<PathBuf> {
    let function = registry
        .get_function(function_name)
        .ok_or_else(|| Error::FunctionNotFound(function_name.to_string()))?;

    let generator = TestFileGenerator::new(registry.root_path(), registry.project_name(), config);
    let template = templates::resolve_template(
        &generator.test_folder(),
        template_file.unwrap_or(&config.template_file),
    )?;
    generator.generate(&function, &template)
}
