//! `slstest schema`

use slstest::{ProjectManifest, Result};
use std::process::ExitCode;

pub fn cmd_schema() -> Result<ExitCode> {
    let schema = schemars::schema_for!(ProjectManifest);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(ExitCode::SUCCESS)
}
