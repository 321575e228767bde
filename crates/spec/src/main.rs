//! spec - Create, lint and inspect podspec files

use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use spec::cli::{self, Cli};
use spec::SpecError;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = tokio::runtime::Runtime::new()
        .map_err(anyhow::Error::from)
        .and_then(|rt| rt.block_on(async { cli::run(cli).await }));

    if let Err(err) = result {
        eprintln!("{} {:#}", "[!]".red(), err);
        std::process::exit(exit_code(&err));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<SpecError>()
        .map(SpecError::exit_code)
        .unwrap_or(1)
}
