//! Randomized instance generation by incremental planar embedding
//!
//! A random subset of cells is chosen as candidate connectors. Random pairs of
//! candidates are then joined by straight fences whenever the fence keeps the
//! layout valid: both endpoints below degree 4, aligned on a row or column
//! with at least one cell between them, no candidate and no fence of the
//! other orientation in between, and both direction slots still free. Each
//! candidate's final degree becomes its cell value, so the fences themselves
//! are a certificate that the emitted instance is solvable.

use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::index};

use crate::algorithm::slots::SlotSet;
use crate::algorithm::solution::{Solution, SolutionLine};
use crate::io::configuration::{
    DEFAULT_MAX_CONNECTORS, DEFAULT_MAX_EDGES, DEFAULT_MAX_REGENERATIONS,
    DEFAULT_MIN_CONNECTORS, DEFAULT_MIN_EDGES, DEFAULT_RETRY_BUDGET, MAX_DEGREE,
    MAX_GRID_DIMENSION, MIN_LIVE_CONNECTORS,
};
use crate::io::error::{FenceError, Result, invalid_parameter};
use crate::spatial::direction::{Direction, DirectionSet};
use crate::spatial::grid::{ConnectorGrid, Position};
use crate::spatial::occupancy::OccupancyGrid;

/// Bounds controlling the size of generated instances
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Lower bound on candidate connectors
    pub min_connectors: usize,
    /// Upper bound on candidate connectors, further capped at half the cells
    pub max_connectors: usize,
    /// Lower bound on the target edge count
    pub min_edges: usize,
    /// Upper bound on the target edge count
    pub max_edges: usize,
    /// Consecutive failed insertions tolerated before an attempt stops growing
    pub retry_budget: usize,
    /// Full attempts made before giving up on a grid
    pub max_regenerations: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_connectors: DEFAULT_MIN_CONNECTORS,
            max_connectors: DEFAULT_MAX_CONNECTORS,
            min_edges: DEFAULT_MIN_EDGES,
            max_edges: DEFAULT_MAX_EDGES,
            retry_budget: DEFAULT_RETRY_BUDGET,
            max_regenerations: DEFAULT_MAX_REGENERATIONS,
        }
    }
}

impl GeneratorConfig {
    /// Check that the bounds are usable
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for inverted ranges, a zero edge target,
    /// a zero retry budget or zero regenerations.
    pub fn validate(&self) -> Result<()> {
        if self.min_connectors > self.max_connectors {
            return Err(invalid_parameter(
                "min_connectors",
                &self.min_connectors,
                &format!("exceeds max_connectors ({})", self.max_connectors),
            ));
        }
        if self.max_connectors < MIN_LIVE_CONNECTORS {
            return Err(invalid_parameter(
                "max_connectors",
                &self.max_connectors,
                &format!("at least {MIN_LIVE_CONNECTORS} connectors are required"),
            ));
        }
        if self.min_edges > self.max_edges {
            return Err(invalid_parameter(
                "min_edges",
                &self.min_edges,
                &format!("exceeds max_edges ({})", self.max_edges),
            ));
        }
        if self.max_edges == 0 {
            return Err(invalid_parameter(
                "max_edges",
                &self.max_edges,
                &"at least one edge is required",
            ));
        }
        if self.retry_budget == 0 {
            return Err(invalid_parameter(
                "retry_budget",
                &self.retry_budget,
                &"must be positive",
            ));
        }
        if self.max_regenerations == 0 {
            return Err(invalid_parameter(
                "max_regenerations",
                &self.max_regenerations,
                &"must be positive",
            ));
        }
        Ok(())
    }
}

/// A fence accepted into the embedding
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    /// Candidate index the fence starts at
    pub from: usize,
    /// Candidate index the fence ends at
    pub to: usize,
    /// Direction from `from` towards `to`
    pub direction: Direction,
}

/// Reason a proposed fence was discarded
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgeRejection {
    /// Both endpoints are the same candidate
    SameCandidate,
    /// An endpoint index does not name a candidate
    UnknownCandidate,
    /// An endpoint already has the maximum degree
    Saturated,
    /// Endpoints share no row or column, or are adjacent
    NotAligned,
    /// Another candidate lies between the endpoints
    Blocked,
    /// A fence of the other orientation lies between the endpoints
    Crossing,
    /// An endpoint already uses the required direction
    SlotInUse,
}

/// Partial layout of fences between candidate connectors
#[derive(Clone, Debug)]
pub struct Embedding {
    dimensions: (usize, usize),
    candidates: Vec<Position>,
    candidate_cells: Array2<bool>,
    degrees: Vec<u8>,
    used: SlotSet,
    occupancy: OccupancyGrid,
    edges: Vec<Edge>,
}

impl Embedding {
    /// Start an empty layout over the given candidate cells
    ///
    /// Candidates outside the grid are kept but can never be joined.
    pub fn new(dimensions: (usize, usize), candidates: Vec<Position>) -> Self {
        let mut candidate_cells = Array2::from_elem(dimensions, false);
        for position in &candidates {
            if let Some(cell) = candidate_cells.get_mut([position.row, position.col]) {
                *cell = true;
            }
        }

        Self {
            dimensions,
            degrees: vec![0; candidates.len()],
            used: SlotSet::new(candidates.len()),
            occupancy: OccupancyGrid::new(dimensions.0, dimensions.1),
            candidate_cells,
            candidates,
            edges: Vec::new(),
        }
    }

    /// Try to join candidates `from` and `to` with a straight fence
    ///
    /// # Errors
    ///
    /// Returns the first [`EdgeRejection`] that rules the fence out; the
    /// layout is left untouched in that case.
    pub fn try_add_edge(
        &mut self,
        from: usize,
        to: usize,
    ) -> std::result::Result<Edge, EdgeRejection> {
        if from == to {
            return Err(EdgeRejection::SameCandidate);
        }
        let (Some(&start), Some(&end)) = (self.candidates.get(from), self.candidates.get(to))
        else {
            return Err(EdgeRejection::UnknownCandidate);
        };

        if self.degree(from) >= MAX_DEGREE || self.degree(to) >= MAX_DEGREE {
            return Err(EdgeRejection::Saturated);
        }

        let direction = direction_between(start, end).ok_or(EdgeRejection::NotAligned)?;
        let orientation = direction.orientation();
        let path = self.intermediate_cells(start, end, direction)?;

        if path.iter().any(|&cell| self.is_candidate(cell)) {
            return Err(EdgeRejection::Blocked);
        }
        if !path
            .iter()
            .all(|&cell| self.occupancy.permits(cell, orientation))
        {
            return Err(EdgeRejection::Crossing);
        }
        if self.used.contains(from, direction) || self.used.contains(to, direction.opposite()) {
            return Err(EdgeRejection::SlotInUse);
        }

        for cell in path {
            self.occupancy.claim(cell, orientation);
        }
        for index in [from, to] {
            if let Some(degree) = self.degrees.get_mut(index) {
                *degree += 1;
            }
        }
        self.used
            .insert_pair((from, direction), (to, direction.opposite()));

        let edge = Edge {
            from,
            to,
            direction,
        };
        self.edges.push(edge);
        Ok(edge)
    }

    fn intermediate_cells(
        &self,
        start: Position,
        end: Position,
        direction: Direction,
    ) -> std::result::Result<Vec<Position>, EdgeRejection> {
        let mut cells = Vec::new();
        let mut cursor = start
            .step(direction, self.dimensions)
            .ok_or(EdgeRejection::NotAligned)?;
        while cursor != end {
            cells.push(cursor);
            cursor = cursor
                .step(direction, self.dimensions)
                .ok_or(EdgeRejection::NotAligned)?;
        }
        Ok(cells)
    }

    fn is_candidate(&self, position: Position) -> bool {
        self.candidate_cells
            .get([position.row, position.col])
            .copied()
            .unwrap_or(false)
    }

    /// Accumulated degree of a candidate
    pub fn degree(&self, candidate: usize) -> u8 {
        self.degrees.get(candidate).copied().unwrap_or(0)
    }

    /// Fences accepted so far
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Occupancy of intermediate cells
    pub const fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    /// Number of candidates with at least one fence
    pub fn live_connectors(&self) -> usize {
        self.degrees.iter().filter(|&&degree| degree > 0).count()
    }

    /// Instance grid with each candidate's accumulated degree
    ///
    /// # Errors
    ///
    /// Returns `MalformedInstance` only if the dimensions are unusable.
    pub fn to_grid(&self) -> Result<ConnectorGrid> {
        let mut cells = Array2::zeros(self.dimensions);
        for (position, &degree) in self.candidates.iter().zip(&self.degrees) {
            if let Some(cell) = cells.get_mut([position.row, position.col]) {
                *cell = degree;
            }
        }
        ConnectorGrid::from_cells(cells)
    }

    /// Solution realised by the accepted fences, in row-major order
    pub fn certificate(&self) -> Solution {
        let mut lines: Vec<(Position, DirectionSet)> = self
            .candidates
            .iter()
            .enumerate()
            .filter(|&(index, _)| self.degree(index) > 0)
            .map(|(index, &position)| {
                let mut directions = DirectionSet::empty();
                for direction in Direction::ALL {
                    if self.used.contains(index, direction) {
                        directions.insert(direction);
                    }
                }
                (position, directions)
            })
            .collect();
        lines.sort_by_key(|&(position, _)| position);

        Solution::Placements(
            lines
                .into_iter()
                .map(|(position, directions)| SolutionLine::new(position, directions))
                .collect(),
        )
    }
}

/// Direction from `from` to `to` when they share a row or column with at
/// least one cell between them
pub fn direction_between(from: Position, to: Position) -> Option<Direction> {
    if from.row == to.row && from.col.abs_diff(to.col) >= 2 {
        Some(if to.col > from.col {
            Direction::Right
        } else {
            Direction::Left
        })
    } else if from.col == to.col && from.row.abs_diff(to.row) >= 2 {
        Some(if to.row > from.row {
            Direction::Down
        } else {
            Direction::Up
        })
    } else {
        None
    }
}

/// Seeded generator of puzzle instances
pub struct Generator {
    rows: usize,
    cols: usize,
    config: GeneratorConfig,
    rng: StdRng,
}

impl Generator {
    /// Create a generator for `rows × cols` grids
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the dimensions are zero or too large, if
    /// `config` is inconsistent, or if the grid is too small to hold two
    /// candidate connectors.
    pub fn new(rows: usize, cols: usize, config: GeneratorConfig, seed: u64) -> Result<Self> {
        for (parameter, value) in [("rows", rows), ("cols", cols)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must lie in 1..={MAX_GRID_DIMENSION}"),
                ));
            }
        }
        config.validate()?;

        let generator = Self {
            rows,
            cols,
            config,
            rng: StdRng::seed_from_u64(seed),
        };
        if generator.candidate_capacity() < MIN_LIVE_CONNECTORS {
            return Err(invalid_parameter(
                "grid",
                &format!("{rows}x{cols}"),
                &format!("too small to hold {MIN_LIVE_CONNECTORS} connectors"),
            ));
        }
        Ok(generator)
    }

    /// Largest candidate count allowed for this grid
    pub fn candidate_capacity(&self) -> usize {
        self.config.max_connectors.min(self.rows * self.cols / 2)
    }

    /// Generate an instance
    ///
    /// # Errors
    ///
    /// Returns `GenerationExhausted` if every attempt ends with fewer than two
    /// connectors.
    pub fn generate(&mut self) -> Result<ConnectorGrid> {
        let embedding = self.embed()?;
        embedding.to_grid()
    }

    /// Generate an instance together with the solution its fences realise
    ///
    /// # Errors
    ///
    /// Returns `GenerationExhausted` if every attempt ends with fewer than two
    /// connectors.
    pub fn generate_with_certificate(&mut self) -> Result<(ConnectorGrid, Solution)> {
        let embedding = self.embed()?;
        Ok((embedding.to_grid()?, embedding.certificate()))
    }

    /// Generate an unconstrained instance
    ///
    /// Every cell independently becomes a connector of random degree with
    /// probability `density`. At least one connector is always placed. The
    /// result may have no solution.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `density` lies outside `0.0..=1.0`.
    pub fn scatter(&mut self, density: f64) -> Result<ConnectorGrid> {
        if !(0.0..=1.0).contains(&density) {
            return Err(invalid_parameter(
                "density",
                &density,
                &"must lie in 0.0..=1.0",
            ));
        }

        let mut cells = Array2::<u8>::zeros((self.rows, self.cols));
        for cell in &mut cells {
            if self.rng.random::<f64>() < density {
                *cell = self.rng.random_range(1..=MAX_DEGREE);
            }
        }

        if cells.iter().all(|&cell| cell == 0) {
            let row = self.rng.random_range(0..self.rows);
            let col = self.rng.random_range(0..self.cols);
            if let Some(cell) = cells.get_mut([row, col]) {
                *cell = self.rng.random_range(1..=MAX_DEGREE);
            }
        }

        ConnectorGrid::from_cells(cells)
    }

    /// Run attempts until one leaves at least two live connectors
    fn embed(&mut self) -> Result<Embedding> {
        for attempt in 1..=self.config.max_regenerations {
            let embedding = self.attempt();
            if embedding.live_connectors() >= MIN_LIVE_CONNECTORS {
                tracing::debug!(
                    attempt,
                    rows = self.rows,
                    cols = self.cols,
                    connectors = embedding.live_connectors(),
                    edges = embedding.edges().len(),
                    "instance generated"
                );
                return Ok(embedding);
            }
            tracing::debug!(
                attempt,
                rows = self.rows,
                cols = self.cols,
                "too few connectors, regenerating"
            );
        }

        Err(FenceError::GenerationExhausted {
            attempts: self.config.max_regenerations,
            grid_dimensions: (self.rows, self.cols),
        })
    }

    /// One full attempt: pick candidates, then grow edges until the target
    /// is met or the retry budget runs out
    fn attempt(&mut self) -> Embedding {
        let capacity = self.candidate_capacity();
        let lower = self.config.min_connectors.clamp(MIN_LIVE_CONNECTORS, capacity);
        let candidate_count = self.rng.random_range(lower..=capacity);

        let candidates = index::sample(&mut self.rng, self.rows * self.cols, candidate_count)
            .into_iter()
            .map(|cell| Position::new(cell / self.cols, cell % self.cols))
            .collect();
        let mut embedding = Embedding::new((self.rows, self.cols), candidates);

        let target_edges = self
            .rng
            .random_range(self.config.min_edges..=self.config.max_edges);
        let mut failures = 0;
        while embedding.edges().len() < target_edges && failures < self.config.retry_budget {
            let from = self.rng.random_range(0..candidate_count);
            let to = self.rng.random_range(0..candidate_count);
            match embedding.try_add_edge(from, to) {
                Ok(_) => failures = 0,
                Err(_) => failures += 1,
            }
        }

        embedding
    }
}
