//! Project registry
//!
//! The core only needs a narrow view of the host project: look a function up
//! by name, list every function in a stable order, and know where the project
//! lives. [`FunctionRegistry`] is that view. [`ManifestRegistry`] implements it
//! over an `slstest.yaml` manifest found by walking up from a start directory.

use crate::config::{DefaultsConfig, TestingConfig};
use crate::error::{Error, Result};
use crate::stage::StageConfig;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Manifest filename at the project root
pub const MANIFEST_FILE: &str = "slstest.yaml";

/// Environment variable name -> value
pub type EnvMap = BTreeMap<String, String>;

/// One deployable function
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Unique name, may carry a namespace prefix (`users/create`)
    pub name: String,
    /// Absolute function directory
    pub root_path: PathBuf,
    /// Runtime identifier, e.g. `nodejs4.3`
    pub runtime: Option<String>,
    /// Raw environment; values may reference `${variables}`
    pub environment: EnvMap,
}

impl Function {
    pub fn new(name: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root_path: root_path.into(),
            runtime: None,
            environment: EnvMap::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }
}

/// Read-only access to the functions of a project
pub trait FunctionRegistry {
    /// Look a function up by its full name
    fn get_function(&self, name: &str) -> Option<Function>;

    /// Every function, in registry order
    fn all_functions(&self) -> Vec<Function>;

    /// Project root directory
    fn root_path(&self) -> &Path;

    fn project_name(&self) -> &str {
        ""
    }

    /// Environment of `function` resolved against a stage/region.
    ///
    /// The default returns the raw environment unchanged.
    fn populate_environment(&self, function: &Function, _stage: &StageConfig) -> Result<EnvMap> {
        Ok(function.environment.clone())
    }
}

/// `slstest.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectManifest {
    /// Project name, available as `${project}`
    pub name: String,

    /// Project-wide variables
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Per-stage variables
    #[serde(default)]
    pub stages: BTreeMap<String, StageVariables>,

    /// Stage/region used when none is given on the command line
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Functions, in the order runs visit them
    #[serde(default)]
    pub functions: Vec<FunctionEntry>,

    /// Test generation and execution settings
    #[serde(default)]
    pub testing: TestingConfig,
}

/// Variables of one stage and its regions
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StageVariables {
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    #[serde(default)]
    pub regions: BTreeMap<String, RegionVariables>,
}

/// Variables of one region within a stage
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RegionVariables {
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

/// A function as written in the manifest
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FunctionEntry {
    pub name: String,

    /// Function directory relative to the project root (defaults to `name`)
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub runtime: Option<String>,

    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

impl ProjectManifest {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let manifest: ProjectManifest = serde_norway::from_str(content)
            .map_err(|e| Error::Manifest(format!("Failed to parse {}: {}", MANIFEST_FILE, e)))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load `slstest.yaml` from a directory
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let manifest_file = dir.join(MANIFEST_FILE);
        if !manifest_file.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&manifest_file).map_err(Error::Io)?;
        Self::from_yaml(&content).map(Some)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.functions {
            if entry.name.is_empty() {
                return Err(Error::Manifest("function with empty name".to_string()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(Error::Manifest(format!(
                    "duplicate function name '{}'",
                    entry.name
                )));
            }
        }
        if !self.testing.command.iter().any(|arg| arg.contains(crate::config::FILE_PLACEHOLDER)) {
            return Err(Error::Manifest(format!(
                "testing.command must contain {}",
                crate::config::FILE_PLACEHOLDER
            )));
        }
        Ok(())
    }

    /// Variable scopes for a stage/region, lowest precedence first
    fn scopes(&self, stage: &StageConfig) -> HashMap<String, String> {
        let mut vars: HashMap<String, String> = self
            .variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        vars.insert("project".to_string(), self.name.clone());
        if let Some(name) = &stage.stage {
            vars.insert("stage".to_string(), name.clone());
        }
        if let Some(region) = &stage.region {
            vars.insert("region".to_string(), region.clone());
        }

        let Some(stage_vars) = stage.stage.as_ref().and_then(|s| self.stages.get(s)) else {
            return vars;
        };
        vars.extend(stage_vars.variables.clone());

        if let Some(region_vars) = stage.region.as_ref().and_then(|r| stage_vars.regions.get(r)) {
            vars.extend(region_vars.variables.clone());
        }
        vars
    }
}

/// Find the project root (first ancestor containing `slstest.yaml`)
pub fn find_root(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current = start_dir.canonicalize().map_err(Error::Io)?;

    loop {
        if current.join(MANIFEST_FILE).is_file() {
            return Ok(Some(current));
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return Ok(None),
        }
    }
}

/// Registry backed by `slstest.yaml`
#[derive(Debug, Clone)]
pub struct ManifestRegistry {
    root: PathBuf,
    manifest: ProjectManifest,
}

impl ManifestRegistry {
    pub fn new(root: impl Into<PathBuf>, manifest: ProjectManifest) -> Self {
        Self {
            root: root.into(),
            manifest,
        }
    }

    /// Locate and load the manifest starting at `start_dir`
    pub fn discover(start_dir: &Path) -> Result<Self> {
        let root =
            find_root(start_dir)?.ok_or_else(|| Error::ManifestNotFound(start_dir.to_path_buf()))?;
        let manifest = ProjectManifest::load_from_dir(&root)?
            .ok_or_else(|| Error::ManifestNotFound(root.clone()))?;
        tracing::debug!(root = %root.display(), functions = manifest.functions.len(), "loaded manifest");
        Ok(Self::new(root, manifest))
    }

    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    pub fn testing(&self) -> &TestingConfig {
        &self.manifest.testing
    }

    fn to_function(&self, entry: &FunctionEntry) -> Function {
        let relative = entry
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&entry.name));
        Function {
            name: entry.name.clone(),
            root_path: self.root.join(relative),
            runtime: entry.runtime.clone(),
            environment: entry.environment.clone(),
        }
    }
}

impl FunctionRegistry for ManifestRegistry {
    fn get_function(&self, name: &str) -> Option<Function> {
        self.manifest
            .functions
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| self.to_function(entry))
    }

    fn all_functions(&self) -> Vec<Function> {
        self.manifest
            .functions
            .iter()
            .map(|entry| self.to_function(entry))
            .collect()
    }

    fn root_path(&self) -> &Path {
        &self.root
    }

    fn project_name(&self) -> &str {
        &self.manifest.name
    }

    fn populate_environment(&self, function: &Function, stage: &StageConfig) -> Result<EnvMap> {
        let scopes = self.manifest.scopes(stage);
        function
            .environment
            .iter()
            .map(|(key, raw)| -> Result<(String, String)> {
                let value = substitute(raw, &scopes).map_err(|variable| {
                    Error::UnresolvedVariable {
                        function: function.name.clone(),
                        variable,
                    }
                })?;
                Ok((key.clone(), value))
            })
            .collect()
    }
}

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{\s*([A-Za-z0-9_.\-]+)\s*\}").expect("variable pattern is valid")
    })
}

/// Replace every `${name}` in `raw`; returns the first unknown name on failure
fn substitute(raw: &str, scopes: &HashMap<String, String>) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut last = 0;
    for caps in variable_pattern().captures_iter(raw) {
        let whole = caps.get(0).expect("group 0 always present");
        let name = &caps[1];
        let value = scopes.get(name).ok_or_else(|| name.to_string())?;
        out.push_str(&raw[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&raw[last..]);
    Ok(out)
}
