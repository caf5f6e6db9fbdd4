//! Template resolution and rendering for generated tests
//!
//! Uses MiniJinja. The built-in template is embedded in the binary; a project
//! overrides it by placing a template file (default
//! `slstest-template.jinja`) inside its test folder. An override is used
//! verbatim in place of the built-in one.

pub mod filters;

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Built-in test template (compiled into binary)
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/test.js.jinja");

const DEFAULT_TEMPLATE_NAME: &str = "test.js.jinja";

/// Where the template source came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    BuiltIn,
    Override(PathBuf),
}

/// Template source text plus its origin
#[derive(Debug, Clone)]
pub struct TemplateSource {
    pub origin: TemplateOrigin,
    pub source: String,
}

impl TemplateSource {
    pub fn built_in() -> Self {
        Self {
            origin: TemplateOrigin::BuiltIn,
            source: DEFAULT_TEMPLATE.to_string(),
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self.origin, TemplateOrigin::Override(_))
    }
}

/// Variables bound when rendering a test file
#[derive(Debug, Clone, Serialize)]
pub struct TestContext {
    /// Bare function name as given (may include a namespace prefix)
    pub function_name: String,
    /// Function root relative to the project root, `/`-separated
    pub function_path: String,
    pub project_name: String,
    pub generated_at: String,
}

/// Template engine singleton holding the built-in template
static ENGINE: OnceLock<Environment<'static>> = OnceLock::new();

/// Filters registered, no auto-escaping: output is source code, not HTML
fn plain_environment() -> Environment<'static> {
    let mut env = Environment::new();
    filters::register_filters(&mut env);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env
}

fn init_engine() -> Environment<'static> {
    let mut env = plain_environment();
    env.add_template(DEFAULT_TEMPLATE_NAME, DEFAULT_TEMPLATE)
        .expect("Failed to load built-in test template");
    env
}

/// Get the global template engine
pub fn engine() -> &'static Environment<'static> {
    ENGINE.get_or_init(init_engine)
}

/// Pick the override template in `test_folder` if present, else the built-in one
pub fn resolve_template(test_folder: &Path, template_file: &str) -> Result<TemplateSource> {
    let override_path = test_folder.join(template_file);
    if !override_path.is_file() {
        return Ok(TemplateSource::built_in());
    }

    let source = std::fs::read_to_string(&override_path).map_err(Error::Io)?;
    tracing::debug!(path = %override_path.display(), "using override template");
    Ok(TemplateSource {
        origin: TemplateOrigin::Override(override_path),
        source,
    })
}

/// Render a template source with the given context
pub fn render(template: &TemplateSource, ctx: &TestContext) -> Result<String> {
    match template.origin {
        TemplateOrigin::BuiltIn => {
            let tmpl = engine().get_template(DEFAULT_TEMPLATE_NAME)?;
            Ok(tmpl.render(ctx)?)
        }
        TemplateOrigin::Override(_) => {
            // Overrides are rendered in a fresh environment sharing the filters
            let env = plain_environment();
            Ok(env.render_str(&template.source, ctx)?)
        }
    }
}
