//! slstest CLI
//!
//! Commands:
//!   create            - Scaffold a test file for a function
//!   run               - Run function tests with their environment
//!   function-created  - Post-create hook for the host framework
//!   schema            - Print the JSON schema of slstest.yaml

mod cli;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = cli::Cli::parse();
    init_tracing(args.verbose, args.quiet);

    match cli::dispatch(args.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SLSTEST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("slstest={level}")));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
