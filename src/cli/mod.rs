//! Command-line interface

mod create;
mod hook;
mod run;
mod schema;

use clap::{Parser, Subcommand};
use slstest::{ManifestRegistry, Result};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "slstest", version, about = "Scaffold and run tests for serverless functions")]
pub struct Cli {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a test file for a function
    Create(create::CreateArgs),
    /// Run tests for some or all functions
    Run(run::RunArgs),
    /// Scaffold a test after the host framework created a function
    FunctionCreated(hook::HookArgs),
    /// Print the JSON schema of slstest.yaml
    Schema,
}

pub fn dispatch(command: Command) -> Result<ExitCode> {
    match command {
        Command::Create(args) => create::cmd_create(&load_registry()?, args),
        Command::Run(args) => run::cmd_run(&load_registry()?, args),
        Command::FunctionCreated(args) => hook::cmd_function_created(&load_registry()?, args),
        Command::Schema => schema::cmd_schema(),
    }
}

fn load_registry() -> Result<ManifestRegistry> {
    let cwd = std::env::current_dir()?;
    ManifestRegistry::discover(&cwd)
}
