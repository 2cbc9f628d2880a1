//! Instance generation and solution validation for connector-grid fence puzzles
//!
//! Each puzzle cell either is empty or holds a connector with a required
//! degree. A solution joins connectors pairwise with straight row/column fences
//! that never cross. The crate validates solver output against an instance,
//! generates random instances that are solvable by construction, and drives an
//! external solver over a corpus to produce a benchmark report.

#![forbid(unsafe_code)]

/// Instance generation, solution parsing and validation
pub mod algorithm;
/// Command line, benchmark harness, file formats and error handling
pub mod io;
/// Grid, direction and occupancy data structures
pub mod spatial;

pub use algorithm::generation::{Generator, GeneratorConfig};
pub use algorithm::solution::Solution;
pub use algorithm::validation::{Rejection, RejectionKind, Validator};
pub use io::error::{FenceError, Result};
pub use spatial::ConnectorGrid;
