//! `slstest run`

use clap::Args;
use slstest::{
    CommandEngine, EnvContext, FunctionRegistry, ManifestRegistry, Orchestrator, ReporterSpec,
    Result,
};
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Functions to test; all functions when omitted
    pub functions: Vec<String>,

    /// Stage whose variables are injected
    #[arg(short, long)]
    pub stage: Option<String>,

    /// Region whose variables are injected
    #[arg(short, long)]
    pub region: Option<String>,

    /// Reporter: spec, dot, tap or json
    #[arg(short = 'R', long)]
    pub reporter: Option<String>,

    /// Reporter options as key=value,key2=value2
    #[arg(short = 'O', long = "reporter-options")]
    pub reporter_options: Option<String>,
}

pub fn cmd_run(registry: &ManifestRegistry, args: RunArgs) -> Result<ExitCode> {
    let testing = registry.testing();
    let stage = registry
        .manifest()
        .defaults
        .apply(args.stage, args.region);
    let reporter = ReporterSpec {
        name: args.reporter,
        options: args.reporter_options,
    };

    let engine = CommandEngine::from_config(testing, registry.root_path());
    let mut orchestrator =
        Orchestrator::new(registry, testing, engine).with_env(EnvContext::seeded_from_process());
    let outcome = orchestrator.run(&args.functions, &stage, &reporter)?;

    // Exit statuses above 255 are not representable
    let code = outcome.exit_code().min(u8::MAX as usize) as u8;
    Ok(ExitCode::from(code))
}
