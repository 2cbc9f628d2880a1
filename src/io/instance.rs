//! Instance files on disk and batch generation of instance corpora

use std::fs;
use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::algorithm::generation::{Generator, GeneratorConfig};
use crate::io::configuration::{INSTANCE_EXTENSION, MAX_GRID_DIMENSION};
use crate::io::error::{FenceError, Result, WithPath, invalid_parameter};
use crate::io::progress::ProgressManager;
use crate::spatial::grid::ConnectorGrid;

/// Read and parse an instance file
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read and `MalformedInstance`
/// if its contents are not a valid grid.
pub fn read_instance(path: &Path) -> Result<ConnectorGrid> {
    let text = fs::read_to_string(path).with_path(path, "read instance")?;
    ConnectorGrid::parse(&text).map_err(|error| match error {
        FenceError::MalformedInstance { reason } => FenceError::MalformedInstance {
            reason: format!("{}: {reason}", path.display()),
        },
        other => other,
    })
}

/// Write a grid in the canonical instance format
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be written.
pub fn write_instance(path: &Path, grid: &ConnectorGrid) -> Result<()> {
    fs::write(path, grid.serialize()).with_path(path, "write instance")
}

/// Instance files (`*.in`) directly inside `dir`, sorted by name
///
/// # Errors
///
/// Returns `FileSystem` if the directory cannot be listed.
pub fn list_instances(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_path(dir, "list instances")? {
        let path = entry.with_path(dir, "list instances")?.path();
        if path.is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(INSTANCE_EXTENSION)
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// How each instance of a batch is produced
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GenerationMode {
    /// Solvable-by-construction fence embedding
    Embedded(GeneratorConfig),
    /// Independent random connectors with the given density
    Scatter {
        /// Probability of a cell holding a connector
        density: f64,
    },
}

/// Parameters of a batch of generated instances
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatchConfig {
    /// Number of instances to write
    pub count: usize,
    /// Base seed; instance `i` uses `seed + i`
    pub seed: u64,
    /// Fixed row count, drawn from the size range when absent
    pub rows: Option<usize>,
    /// Fixed column count, drawn from the size range when absent
    pub cols: Option<usize>,
    /// Smallest drawn dimension
    pub min_size: usize,
    /// Largest drawn dimension
    pub max_size: usize,
    /// Instance generation mode
    pub mode: GenerationMode,
}

impl BatchConfig {
    /// Check the size range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty or out-of-range size range.
    pub fn validate(&self) -> Result<()> {
        if self.min_size == 0 || self.max_size > MAX_GRID_DIMENSION {
            return Err(invalid_parameter(
                "size",
                &format!("{}..={}", self.min_size, self.max_size),
                &format!("must lie within 1..={MAX_GRID_DIMENSION}"),
            ));
        }
        if self.min_size > self.max_size {
            return Err(invalid_parameter(
                "min_size",
                &self.min_size,
                &format!("exceeds max_size ({})", self.max_size),
            ));
        }
        Ok(())
    }
}

/// Generate `config.count` instances into `out_dir` as `0.in`, `1.in`, ...
///
/// Dimensions are drawn from one stream seeded with `config.seed`; every
/// instance then gets its own generator so the batch is reproducible.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an instance cannot be
/// generated, or a file cannot be written.
pub fn write_batch(
    out_dir: &Path,
    config: &BatchConfig,
    mut progress: Option<&mut ProgressManager>,
) -> Result<Vec<PathBuf>> {
    config.validate()?;
    fs::create_dir_all(out_dir).with_path(out_dir, "create instance directory")?;

    if let Some(pm) = progress.as_deref_mut() {
        pm.initialize(config.count);
    }

    let mut size_rng = StdRng::seed_from_u64(config.seed);
    let mut written = Vec::with_capacity(config.count);

    for index in 0..config.count {
        let rows = config
            .rows
            .unwrap_or_else(|| size_rng.random_range(config.min_size..=config.max_size));
        let cols = config
            .cols
            .unwrap_or_else(|| size_rng.random_range(config.min_size..=config.max_size));
        let path = out_dir.join(format!("{index}.{INSTANCE_EXTENSION}"));

        if let Some(pm) = progress.as_deref_mut() {
            pm.start_case(index, &path);
        }

        let seed = config.seed.wrapping_add(index as u64);
        let grid = match config.mode {
            GenerationMode::Embedded(generator_config) => {
                Generator::new(rows, cols, generator_config, seed)?.generate()?
            }
            GenerationMode::Scatter { density } => {
                Generator::new(rows, cols, GeneratorConfig::default(), seed)?.scatter(density)?
            }
        };
        write_instance(&path, &grid)?;
        tracing::debug!(
            path = %path.display(),
            rows,
            cols,
            connectors = grid.connector_count(),
            "instance written"
        );

        if let Some(pm) = progress.as_deref_mut() {
            pm.complete_case(index, "written", std::time::Duration::ZERO);
        }
        written.push(path);
    }

    if let Some(pm) = progress.as_deref() {
        pm.finish();
    }
    Ok(written)
}
