//! `slstest create`

use clap::Args;
use slstest::{create_test, ManifestRegistry, Result};
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Function to create a test for
    pub function: String,

    /// Template file inside the test folder used instead of the built-in one
    #[arg(short = 'T', long)]
    pub template: Option<String>,
}

pub fn cmd_create(registry: &ManifestRegistry, args: CreateArgs) -> Result<ExitCode> {
    create_test(
        registry,
        registry.testing(),
        &args.function,
        args.template.as_deref(),
    )?;
    Ok(ExitCode::SUCCESS)
}
