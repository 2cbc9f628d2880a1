//! CLI entry point for generating fence puzzle instances and benchmarking solvers

use std::process::ExitCode;

use clap::Parser;
use fencebench::io::cli::{Cli, run};

fn main() -> fencebench::Result<ExitCode> {
    let cli = Cli::parse();
    cli.init_tracing();
    run(cli)
}
