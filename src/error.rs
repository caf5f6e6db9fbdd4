//! Error types for slstest

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// slstest errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Function {0} does not exist in your project")]
    FunctionNotFound(String),

    #[error("File {} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Creating file {} failed: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No tests to run.")]
    NoTests,

    #[error("invalid reporter option '{0}'")]
    InvalidReporterOption(String),

    #[error("Unknown reporter '{0}' (expected one of: spec, dot, tap, json)")]
    UnknownReporter(String),

    #[error("Function {function}: unresolved variable '${{{variable}}}'")]
    UnresolvedVariable { function: String, variable: String },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("No slstest.yaml found in {} or any parent directory", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<minijinja::Error> for Error {
    fn from(e: minijinja::Error) -> Self {
        Error::Template(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Error::NoTests.to_string(), "No tests to run.");
        assert_eq!(
            Error::InvalidReporterOption("a=1=2".into()).to_string(),
            "invalid reporter option 'a=1=2'"
        );
        assert_eq!(
            Error::UnresolvedVariable {
                function: "users".into(),
                variable: "table".into()
            }
            .to_string(),
            "Function users: unresolved variable '${table}'"
        );
    }
}
