//! `slstest function-created`

use clap::Args;
use slstest::{on_function_created, FunctionCreated, ManifestRegistry, Result};
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct HookArgs {
    /// Path the function was created at
    #[arg(long)]
    pub path: String,

    /// Runtime of the new function
    #[arg(long)]
    pub runtime: Option<String>,
}

pub fn cmd_function_created(registry: &ManifestRegistry, args: HookArgs) -> Result<ExitCode> {
    let event = FunctionCreated {
        path: args.path,
        runtime: args.runtime,
    };
    if on_function_created(registry, registry.testing(), &event)?.is_none() {
        tracing::info!("no test created for runtime {:?}", event.runtime);
    }
    Ok(ExitCode::SUCCESS)
}
