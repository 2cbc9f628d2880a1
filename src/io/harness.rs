//! Drives an external solver over instance corpora and validates its output
//!
//! The solver reads an instance on standard input and writes its solution to
//! standard output. Each case's output is stored next to the other outputs of
//! its input directory, validated, and collected into a report record.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::algorithm::validation::Validator;
use crate::io::configuration::{BUILD_SHELL, OUTPUT_EXTENSION};
use crate::io::error::{FenceError, Result, WithPath, invalid_parameter};
use crate::io::instance::{list_instances, read_instance};
use crate::io::progress::ProgressManager;
use crate::io::report::{CaseRecord, accepted_count, write_report};

/// Locations and commands for one benchmark run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchmarkConfig {
    /// Solver executable
    pub solver: PathBuf,
    /// Optional build command run once before any case
    pub build: Option<String>,
    /// Directories holding `*.in` instance files
    pub input_dirs: Vec<PathBuf>,
    /// Outputs of `<dir>/<case>.in` go to `<output_root>/<dir name>/<case>.out`
    pub output_root: PathBuf,
    /// Directory receiving the JSON report
    pub report_dir: PathBuf,
}

/// Result of a single solver process
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverRun {
    /// Wall-clock time from spawn to exit
    pub elapsed: Duration,
    /// Exit status, `None` if terminated by a signal
    pub exit_code: Option<i32>,
    /// Captured standard error
    pub stderr: String,
}

/// Run a build command through `sh -c` and require it to succeed
///
/// # Errors
///
/// Returns `InvalidParameter` for an empty command, `SolverLaunch` if the
/// shell cannot be started and `SolverBuild` if the command exits unsuccessfully.
pub fn build_solver(command: &str) -> Result<()> {
    if command.trim().is_empty() {
        return Err(invalid_parameter("build", &command, &"command is empty"));
    }

    tracing::info!(command, "building solver");
    let output = Command::new(BUILD_SHELL)
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|source| FenceError::SolverLaunch {
            path: PathBuf::from(BUILD_SHELL),
            source,
        })?;

    if !output.status.success() {
        return Err(FenceError::SolverBuild {
            command: command.to_string(),
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

/// Run `solver` with `input` on stdin and stdout redirected into `output`
///
/// # Errors
///
/// Returns `FileSystem` if either file cannot be opened and `SolverLaunch`
/// if the process cannot be started. A nonzero exit is not an error.
pub fn run_solver(solver: &Path, input: &Path, output: &Path) -> Result<SolverRun> {
    let stdin = File::open(input).with_path(input, "open instance")?;
    let stdout = File::create(output).with_path(output, "create output")?;

    let start = Instant::now();
    let process = Command::new(solver)
        .stdin(Stdio::from(stdin))
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| FenceError::SolverLaunch {
            path: solver.to_path_buf(),
            source,
        })?;
    let elapsed = start.elapsed();

    Ok(SolverRun {
        elapsed,
        exit_code: process.status.code(),
        stderr: String::from_utf8_lossy(&process.stderr).into_owned(),
    })
}

/// Output path for an instance: same stem, `.out` extension, inside `output_dir`
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    output_dir.join(format!("{}.{OUTPUT_EXTENSION}", stem.to_string_lossy()))
}

/// Output directory for an input directory: its last component under `output_root`
pub fn output_dir_for(input_dir: &Path, output_root: &Path) -> PathBuf {
    input_dir
        .file_name()
        .map_or_else(|| output_root.to_path_buf(), |name| output_root.join(name))
}

/// Run the solver on one instance and validate what it printed
///
/// An unreadable or malformed instance is logged and recorded as incorrect
/// rather than aborting the benchmark. Output that is not valid UTF-8 is
/// decoded lossily and validated like any other output.
///
/// # Errors
///
/// Returns an error if the solver cannot be run or its output cannot be read.
pub fn evaluate_case(solver: &Path, input: &Path, output: &Path) -> Result<CaseRecord> {
    let run = solver_run_logged(solver, input, output)?;
    let bytes = fs::read(output).with_path(output, "read output")?;
    let raw_output = String::from_utf8_lossy(&bytes).into_owned();

    let correct = match read_instance(input) {
        Ok(grid) => Validator::new(&grid).accepts_output(&raw_output),
        Err(error) => {
            tracing::error!(input = %input.display(), %error, "instance rejected");
            false
        }
    };

    let case = input.file_name().unwrap_or_default().to_string_lossy();
    tracing::info!(
        case = %case,
        verdict = verdict_label(correct),
        elapsed = run.elapsed.as_secs_f64(),
        "case finished"
    );

    Ok(CaseRecord {
        input_file: input.display().to_string(),
        output_file: output.display().to_string(),
        output: raw_output,
        elapsed_time: run.elapsed.as_secs_f64(),
        correct,
        exit_code: run.exit_code,
    })
}

fn solver_run_logged(solver: &Path, input: &Path, output: &Path) -> Result<SolverRun> {
    let run = run_solver(solver, input, output)?;
    if run.exit_code != Some(0) {
        tracing::warn!(
            input = %input.display(),
            exit_code = ?run.exit_code,
            stderr = %run.stderr.trim(),
            "solver exited unsuccessfully"
        );
    }
    Ok(run)
}

/// Human-readable verdict
pub const fn verdict_label(correct: bool) -> &'static str {
    if correct { "Accepted" } else { "Wrong Answer" }
}

/// Orchestrates a full benchmark run with optional progress display
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
    progress_manager: Option<ProgressManager>,
}

impl BenchmarkRunner {
    /// Create a runner; progress is shown unless `quiet`
    pub fn new(config: BenchmarkConfig, quiet: bool) -> Self {
        let progress_manager = (!quiet).then(ProgressManager::new);
        Self {
            config,
            progress_manager,
        }
    }

    /// Build the solver if requested, then evaluate every case
    ///
    /// Returns the records in processing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails, a directory cannot be read or
    /// created, or the solver cannot be run.
    pub fn run(&mut self) -> Result<Vec<CaseRecord>> {
        if let Some(command) = &self.config.build {
            build_solver(command)?;
        }

        let cases = self.collect_cases()?;
        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(cases.len());
        }

        let mut records = Vec::with_capacity(cases.len());
        for (index, (input, output_dir)) in cases.iter().enumerate() {
            if let Some(ref mut pm) = self.progress_manager {
                pm.start_case(index, input);
            }

            let output = output_path_for(input, output_dir);
            let record = evaluate_case(&self.config.solver, input, &output)?;

            if let Some(ref mut pm) = self.progress_manager {
                pm.complete_case(
                    index,
                    verdict_label(record.correct),
                    Duration::from_secs_f64(record.elapsed_time),
                );
            }
            records.push(record);
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        tracing::info!(
            cases = records.len(),
            accepted = accepted_count(&records),
            "benchmark finished"
        );
        Ok(records)
    }

    /// Run the benchmark and write the report
    ///
    /// # Errors
    ///
    /// Returns any error from [`BenchmarkRunner::run`] or from writing the report.
    pub fn run_and_report(&mut self) -> Result<PathBuf> {
        let records = self.run()?;
        write_report(&self.config.report_dir, &records)
    }

    /// Every instance paired with the directory its output belongs in
    fn collect_cases(&self) -> Result<Vec<(PathBuf, PathBuf)>> {
        let mut cases = Vec::new();
        for input_dir in &self.config.input_dirs {
            let output_dir = output_dir_for(input_dir, &self.config.output_root);
            fs::create_dir_all(&output_dir).with_path(&output_dir, "create output directory")?;
            for input in list_instances(input_dir)? {
                cases.push((input, output_dir.clone()));
            }
        }
        Ok(cases)
    }
}
