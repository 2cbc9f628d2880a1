//! Benchmark report records and JSON export

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::io::configuration::REPORT_PREFIX;
use crate::io::error::{FenceError, Result, WithPath};

const REPORT_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");

/// Outcome of running the solver on one instance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Instance file fed to the solver
    pub input_file: String,
    /// File the solver's standard output was written to
    pub output_file: String,
    /// Raw solver output
    pub output: String,
    /// Wall-clock solver time in seconds
    pub elapsed_time: f64,
    /// Whether the validator accepted the output
    pub correct: bool,
    /// Solver exit status, `None` if it was terminated by a signal
    pub exit_code: Option<i32>,
}

/// Report file name for a run started at `moment`, e.g. `eval_20231114_221320.json`
///
/// # Errors
///
/// Returns `Timestamp` if `moment` cannot be formatted.
pub fn report_file_name(moment: OffsetDateTime) -> Result<String> {
    let stamp = moment
        .format(REPORT_STAMP)
        .map_err(|source| FenceError::Timestamp { source })?;
    Ok(format!("{REPORT_PREFIX}{stamp}.json"))
}

/// Number of accepted cases
pub fn accepted_count(records: &[CaseRecord]) -> usize {
    records.iter().filter(|record| record.correct).count()
}

/// Write `records` as a pretty-printed JSON array into `report_dir`
///
/// Returns the path of the created report.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or the
/// records cannot be serialized. The file is named after the local time,
/// or UTC when the local offset is unavailable.
pub fn write_report(report_dir: &Path, records: &[CaseRecord]) -> Result<PathBuf> {
    fs::create_dir_all(report_dir).with_path(report_dir, "create report directory")?;

    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let path = report_dir.join(report_file_name(now)?);

    let file = File::create(&path).with_path(&path, "create report")?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records).with_path(&path, "serialize report")?;
    writer.flush().with_path(&path, "flush report")?;

    tracing::info!(
        path = %path.display(),
        cases = records.len(),
        accepted = accepted_count(records),
        "benchmark report written"
    );
    Ok(path)
}

/// Read a report written by [`write_report`]
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid report.
pub fn read_report(path: &Path) -> Result<Vec<CaseRecord>> {
    let text = fs::read_to_string(path).with_path(path, "read report")?;
    serde_json::from_str(&text).with_path(path, "parse report")
}
