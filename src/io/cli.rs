//! Command-line interface for instance generation, validation and benchmarking

use crate::algorithm::generation::GeneratorConfig;
use crate::algorithm::validation::Validator;
use crate::io::configuration::{
    DEFAULT_INSTANCE_COUNT, DEFAULT_MAX_CONNECTORS, DEFAULT_MAX_EDGES,
    DEFAULT_MAX_REGENERATIONS, DEFAULT_MAX_SIZE, DEFAULT_MIN_CONNECTORS, DEFAULT_MIN_EDGES,
    DEFAULT_MIN_SIZE, DEFAULT_OUTPUT_ROOT, DEFAULT_REPORT_DIR, DEFAULT_RETRY_BUDGET,
    DEFAULT_SCATTER_DENSITY, DEFAULT_SEED,
};
use crate::io::error::{Result, WithPath};
use crate::io::harness::{BenchmarkConfig, BenchmarkRunner, verdict_label};
use crate::io::instance::{BatchConfig, GenerationMode, read_instance, write_batch};
use crate::io::progress::ProgressManager;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fencebench")]
#[command(
    author,
    version,
    about = "Generate fence puzzle instances and benchmark solvers against them"
)]
/// Command-line arguments for the benchmarking tool
pub struct Cli {
    /// Operation to perform
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output and informational logging
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available operations
#[derive(Subcommand)]
pub enum Command {
    /// Write a batch of random instance files
    Generate(GenerateArgs),
    /// Check one solution file against one instance file
    Validate(ValidateArgs),
    /// Run a solver over instance directories and write a JSON report
    Bench(BenchArgs),
}

/// Arguments of `generate`
#[derive(Args)]
pub struct GenerateArgs {
    /// Directory receiving `<index>.in` files
    #[arg(value_name = "OUT_DIR")]
    pub out_dir: PathBuf,

    /// Number of instances to write
    #[arg(short = 'n', long, default_value_t = DEFAULT_INSTANCE_COUNT)]
    pub count: usize,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Fixed number of rows (drawn per instance if omitted)
    #[arg(short, long)]
    pub rows: Option<usize>,

    /// Fixed number of columns (drawn per instance if omitted)
    #[arg(short, long)]
    pub cols: Option<usize>,

    /// Smallest drawn dimension
    #[arg(long, default_value_t = DEFAULT_MIN_SIZE)]
    pub min_size: usize,

    /// Largest drawn dimension
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    pub max_size: usize,

    /// Lower bound on candidate connectors
    #[arg(long, default_value_t = DEFAULT_MIN_CONNECTORS)]
    pub min_connectors: usize,

    /// Upper bound on candidate connectors
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTORS)]
    pub max_connectors: usize,

    /// Lower bound on the target edge count
    #[arg(long, default_value_t = DEFAULT_MIN_EDGES)]
    pub min_edges: usize,

    /// Upper bound on the target edge count
    #[arg(long, default_value_t = DEFAULT_MAX_EDGES)]
    pub max_edges: usize,

    /// Place connectors independently instead of embedding fences
    #[arg(long)]
    pub scatter: bool,

    /// Connector probability per cell in scatter mode
    #[arg(long, default_value_t = DEFAULT_SCATTER_DENSITY)]
    pub density: f64,
}

impl GenerateArgs {
    /// Generator bounds from the connector and edge arguments
    pub const fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            min_connectors: self.min_connectors,
            max_connectors: self.max_connectors,
            min_edges: self.min_edges,
            max_edges: self.max_edges,
            retry_budget: DEFAULT_RETRY_BUDGET,
            max_regenerations: DEFAULT_MAX_REGENERATIONS,
        }
    }

    /// Batch description for [`write_batch`]
    pub const fn batch_config(&self) -> BatchConfig {
        let mode = if self.scatter {
            GenerationMode::Scatter {
                density: self.density,
            }
        } else {
            GenerationMode::Embedded(self.generator_config())
        };
        BatchConfig {
            count: self.count,
            seed: self.seed,
            rows: self.rows,
            cols: self.cols,
            min_size: self.min_size,
            max_size: self.max_size,
            mode,
        }
    }
}

/// Arguments of `validate`
#[derive(Args)]
pub struct ValidateArgs {
    /// Instance file
    #[arg(value_name = "INSTANCE")]
    pub instance: PathBuf,

    /// Solver output file
    #[arg(value_name = "SOLUTION")]
    pub solution: PathBuf,
}

/// Arguments of `bench`
#[derive(Args)]
pub struct BenchArgs {
    /// Solver executable
    #[arg(value_name = "SOLVER")]
    pub solver: PathBuf,

    /// Directories of `*.in` instance files
    #[arg(value_name = "INPUT_DIR", required = true)]
    pub input_dirs: Vec<PathBuf>,

    /// Command building the solver before the run; failure aborts the benchmark
    #[arg(short, long)]
    pub build: Option<String>,

    /// Root directory for solver outputs
    #[arg(short, long, default_value = DEFAULT_OUTPUT_ROOT)]
    pub output_root: PathBuf,

    /// Directory receiving the JSON report
    #[arg(long, default_value = DEFAULT_REPORT_DIR)]
    pub report_dir: PathBuf,
}

impl BenchArgs {
    /// Benchmark description for [`BenchmarkRunner`]
    pub fn benchmark_config(&self) -> BenchmarkConfig {
        BenchmarkConfig {
            solver: self.solver.clone(),
            build: self.build.clone(),
            input_dirs: self.input_dirs.clone(),
            output_root: self.output_root.clone(),
            report_dir: self.report_dir.clone(),
        }
    }
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter when `RUST_LOG` is unset
    pub const fn default_log_level(&self) -> &'static str {
        if self.quiet { "warn" } else { "info" }
    }

    /// Install the stderr log subscriber
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_log_level()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Execute the parsed command
///
/// `validate` maps rejection to a failing exit code; the other commands exit
/// successfully once their output is written.
///
/// # Errors
///
/// Returns an error if an input cannot be read, generation fails, or the
/// benchmark cannot be run.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let show_progress = cli.should_show_progress();
    match cli.command {
        Command::Generate(args) => {
            let mut progress = show_progress.then(ProgressManager::new);
            let written = write_batch(&args.out_dir, &args.batch_config(), progress.as_mut())?;
            tracing::info!(
                count = written.len(),
                dir = %args.out_dir.display(),
                "instances generated"
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate(args) => Ok(if validate_files(&args)? {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }),
        Command::Bench(args) => {
            let mut runner = BenchmarkRunner::new(args.benchmark_config(), !show_progress);
            runner.run_and_report()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Validate a solution file against an instance file and print the verdict
///
/// Returns whether the solution was accepted.
///
/// # Errors
///
/// Returns an error if either file cannot be read or the instance is malformed.
// Allow print for the verdict, which is the command's output
#[allow(clippy::print_stdout)]
pub fn validate_files(args: &ValidateArgs) -> Result<bool> {
    let grid = read_instance(&args.instance)?;
    let output =
        std::fs::read_to_string(&args.solution).with_path(&args.solution, "read solution")?;

    let accepted = match Validator::new(&grid).check_output(&output) {
        Ok(()) => true,
        Err(rejection) => {
            tracing::info!(kind = ?rejection.kind(), reason = %rejection, "solution rejected");
            false
        }
    };

    println!("{}", verdict_label(accepted));
    Ok(accepted)
}
