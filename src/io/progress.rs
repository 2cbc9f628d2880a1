//! Multi-case progress tracking with a rolling window of recent cases

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

/// Display state of a single case
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaseStatus {
    /// Case has been started
    Running,
    /// Case finished with the given verdict label
    Finished(String),
}

/// Coordinates progress display for a batch of cases
///
/// Shows one overall bar plus a line for each of the most recent cases, so
/// large batches do not flood the terminal.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    case_bars: Vec<ProgressBar>,
    /// Stores (`display name`, status) for rolling window display
    case_states: Vec<(String, CaseStatus)>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static CASE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("  {prefix:<24} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Cases: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            case_bars: Vec::new(),
            case_states: Vec::new(),
        }
    }

    /// Initialize the batch bar and the rolling case lines
    pub fn initialize(&mut self, case_count: usize) {
        let batch_bar = ProgressBar::new(case_count as u64);
        batch_bar.set_style(BATCH_STYLE.clone());
        self.batch_bar = Some(self.multi_progress.add(batch_bar));

        for _ in 0..case_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new(0);
            bar.set_style(CASE_STYLE.clone());
            self.case_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Register a case as running
    pub fn start_case(&mut self, index: usize, path: &Path) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.case_states.len() {
            self.case_states
                .resize(index + 1, (String::new(), CaseStatus::Running));
        }
        if let Some(state) = self.case_states.get_mut(index) {
            *state = (display_name, CaseStatus::Running);
        }
        self.update_bars();
    }

    /// Record the verdict of a case and advance the batch bar
    pub fn complete_case(&mut self, index: usize, verdict: &str, elapsed: Duration) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(state) = self.case_states.get_mut(index) {
            state.1 = CaseStatus::Finished(format!("{verdict} ({:.3}s)", elapsed.as_secs_f64()));
        }
        self.update_bars();
    }

    /// Status of a case, if it has been started
    pub fn case_status(&self, index: usize) -> Option<&CaseStatus> {
        self.case_states
            .get(index)
            .filter(|(name, _)| !name.is_empty())
            .map(|(_, status)| status)
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All cases processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Show the last N started cases
    fn update_bars(&self) {
        let active: Vec<&(String, CaseStatus)> = self
            .case_states
            .iter()
            .filter(|(name, _)| !name.is_empty())
            .collect();

        let start_idx = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start_idx..).unwrap_or(&[]);

        for (bar, (name, status)) in self.case_bars.iter().zip(visible) {
            bar.set_prefix(name.clone());
            bar.set_message(match status {
                CaseStatus::Running => "running".to_string(),
                CaseStatus::Finished(verdict) => verdict.clone(),
            });
        }

        for bar in self.case_bars.iter().skip(visible.len()) {
            bar.set_prefix(String::new());
            bar.set_message(String::new());
        }
    }
}
