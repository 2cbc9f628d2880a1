//! Generation constants and runtime configuration defaults

// Puzzle rules
/// Largest degree a connector may declare (one fence per direction)
pub const MAX_DEGREE: u8 = 4;

/// Minimum number of connectors with positive degree in a generated instance
pub const MIN_LIVE_CONNECTORS: usize = 2;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

// Generator bounds
/// Default lower bound on candidate connectors
pub const DEFAULT_MIN_CONNECTORS: usize = 2;
/// Default upper bound on candidate connectors (further capped at half the cells)
pub const DEFAULT_MAX_CONNECTORS: usize = 16;
/// Default lower bound on the target edge count
pub const DEFAULT_MIN_EDGES: usize = 1;
/// Default upper bound on the target edge count
pub const DEFAULT_MAX_EDGES: usize = 24;

// Consecutive failed edge insertions tolerated before an attempt stops growing
/// Retry budget for random edge insertion
pub const DEFAULT_RETRY_BUDGET: usize = 200;

// Keeps degenerate grids from regenerating forever
/// Maximum number of full generation attempts
pub const DEFAULT_MAX_REGENERATIONS: usize = 64;

/// Probability of a cell becoming a connector in scatter mode
pub const DEFAULT_SCATTER_DENSITY: f64 = 0.25;

// Batch generation
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;
/// Default number of instances written by a batch
pub const DEFAULT_INSTANCE_COUNT: usize = 10;
/// Smallest randomly drawn grid dimension
pub const DEFAULT_MIN_SIZE: usize = 3;
/// Largest randomly drawn grid dimension
pub const DEFAULT_MAX_SIZE: usize = 8;

// File layout
/// Extension of instance files
pub const INSTANCE_EXTENSION: &str = "in";
/// Extension of solver output files
pub const OUTPUT_EXTENSION: &str = "out";
/// Literal printed by a solver that found no solution
pub const NO_SOLUTION: &str = "No Solution";
/// Prefix of benchmark report file names
pub const REPORT_PREFIX: &str = "eval_";
/// Shell that runs the solver build command
pub const BUILD_SHELL: &str = "sh";
/// Default root for solver outputs
pub const DEFAULT_OUTPUT_ROOT: &str = "data/output";
/// Default directory for benchmark reports
pub const DEFAULT_REPORT_DIR: &str = "log";

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
