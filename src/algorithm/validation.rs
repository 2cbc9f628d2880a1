//! Solution validation against a puzzle instance
//!
//! Acceptance is a single boolean. Internally every rejection carries a
//! [`Rejection`] describing the first violation found, which is logged at
//! debug level and available through [`Validator::check`] for diagnostics.
//!
//! Geometric resolution walks connectors in row-major order. Each fence end
//! that is not yet paired is followed outward cell by cell until it leaves
//! the grid (dangling), crosses a fence of the other orientation, or reaches
//! the next connector, whose facing slot must be set and still free. Both
//! ends are then marked paired together, so a connector processed later never
//! walks a fence a second time.

use std::fmt;

use crate::algorithm::slots::SlotSet;
use crate::algorithm::solution::{Solution, SolutionLine, SolutionParseError};
use crate::spatial::direction::{Direction, DirectionSet};
use crate::spatial::grid::{Connector, ConnectorGrid, Position};
use crate::spatial::occupancy::OccupancyGrid;

/// Broad class of a rejection
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RejectionKind {
    /// The output does not follow the solution format
    MalformedSolution,
    /// The output is well-formed but describes an impossible fence layout
    GeometricViolation,
}

/// First violation that made a solution unacceptable
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Solver output could not be read as a solution
    Unparseable(SolutionParseError),
    /// Number of lines differs from the number of connectors
    CountMismatch {
        /// Connectors in the grid
        expected: usize,
        /// Lines in the solution
        found: usize,
    },
    /// A line names a cell that holds no connector
    UnknownConnector {
        /// One-based row as written
        row: i64,
        /// One-based column as written
        col: i64,
    },
    /// Two lines name the same connector
    DuplicateConnector {
        /// Connector named twice
        position: Position,
    },
    /// A direction flag is neither 0 nor 1
    InvalidFlag {
        /// Connector whose line holds the flag
        position: Position,
    },
    /// Flag sum differs from the declared degree
    DegreeMismatch {
        /// Connector concerned
        position: Position,
        /// Degree from the grid
        declared: u8,
        /// Sum of the line's flags
        found: i64,
    },
    /// A fence leaves the grid without reaching a connector
    Dangling {
        /// Connector the fence starts at
        position: Position,
        /// Direction of the fence
        direction: Direction,
    },
    /// Fences of differing orientation share a cell
    Crossing {
        /// Cell where the fences meet
        cell: Position,
        /// Direction of the fence being placed
        direction: Direction,
    },
    /// The connector reached does not have a fence facing back
    UnmatchedPartner {
        /// Connector the fence starts at
        position: Position,
        /// Direction of the fence
        direction: Direction,
        /// Connector reached
        partner: Position,
    },
    /// The facing slot of the connector reached is already paired
    DoublePairing {
        /// Connector the fence starts at
        position: Position,
        /// Direction of the fence
        direction: Direction,
        /// Connector reached
        partner: Position,
    },
    /// A fence end was never paired
    Unpaired {
        /// Connector owning the fence end
        position: Position,
        /// Direction of the fence end
        direction: Direction,
    },
}

impl Rejection {
    /// Classify the rejection
    pub const fn kind(&self) -> RejectionKind {
        match self {
            Self::Unparseable(_)
            | Self::CountMismatch { .. }
            | Self::UnknownConnector { .. }
            | Self::DuplicateConnector { .. }
            | Self::InvalidFlag { .. } => RejectionKind::MalformedSolution,
            Self::DegreeMismatch { .. }
            | Self::Dangling { .. }
            | Self::Crossing { .. }
            | Self::UnmatchedPartner { .. }
            | Self::DoublePairing { .. }
            | Self::Unpaired { .. } => RejectionKind::GeometricViolation,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparseable(error) => write!(f, "unreadable output: {error}"),
            Self::CountMismatch { expected, found } => {
                write!(f, "expected {expected} connector lines, found {found}")
            }
            Self::UnknownConnector { row, col } => {
                write!(f, "no connector at ({row}, {col})")
            }
            Self::DuplicateConnector { position } => {
                write!(f, "connector {position} listed more than once")
            }
            Self::InvalidFlag { position } => {
                write!(f, "connector {position} has a flag outside 0..=1")
            }
            Self::DegreeMismatch {
                position,
                declared,
                found,
            } => write!(
                f,
                "connector {position} declares degree {declared} but uses {found} directions"
            ),
            Self::Dangling {
                position,
                direction,
            } => write!(f, "fence {direction} from {position} leaves the grid"),
            Self::Crossing { cell, direction } => {
                write!(f, "fence heading {direction} crosses another fence at {cell}")
            }
            Self::UnmatchedPartner {
                position,
                direction,
                partner,
            } => write!(
                f,
                "fence {direction} from {position} reaches {partner}, which has no fence {}",
                direction.opposite()
            ),
            Self::DoublePairing {
                position,
                direction,
                partner,
            } => write!(
                f,
                "fence {direction} from {position} reaches {partner}, whose {} fence is already paired",
                direction.opposite()
            ),
            Self::Unpaired {
                position,
                direction,
            } => write!(f, "fence {direction} from {position} is never paired"),
        }
    }
}

impl From<SolutionParseError> for Rejection {
    fn from(error: SolutionParseError) -> Self {
        Self::Unparseable(error)
    }
}

/// Decides whether solutions are correct for one instance
#[derive(Clone, Copy, Debug)]
pub struct Validator<'a> {
    grid: &'a ConnectorGrid,
}

impl<'a> Validator<'a> {
    /// Create a validator for `grid`
    pub const fn new(grid: &'a ConnectorGrid) -> Self {
        Self { grid }
    }

    /// Whether `solution` is accepted
    pub fn accepts(&self, solution: &Solution) -> bool {
        self.check(solution).map_or_else(
            |rejection| {
                tracing::debug!(
                    kind = ?rejection.kind(),
                    reason = %rejection,
                    "solution rejected"
                );
                false
            },
            |()| true,
        )
    }

    /// Whether raw solver output is accepted
    ///
    /// Unparseable output is rejected like any other invalid solution.
    pub fn accepts_output(&self, output: &str) -> bool {
        match output.parse::<Solution>() {
            Ok(solution) => self.accepts(&solution),
            Err(error) => {
                tracing::debug!(reason = %error, "solver output unreadable");
                false
            }
        }
    }

    /// Validate raw solver output, reporting the first violation
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] that makes the output unacceptable.
    pub fn check_output(&self, output: &str) -> Result<(), Rejection> {
        let solution = output.parse::<Solution>()?;
        self.check(&solution)
    }

    /// Validate a solution, reporting the first violation
    ///
    /// The sentinel `No Solution` is accepted without further checks.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] that makes the solution unacceptable.
    pub fn check(&self, solution: &Solution) -> Result<(), Rejection> {
        let lines = match solution {
            Solution::NoSolution => return Ok(()),
            Solution::Placements(lines) => lines,
        };

        if lines.len() != self.grid.connector_count() {
            return Err(Rejection::CountMismatch {
                expected: self.grid.connector_count(),
                found: lines.len(),
            });
        }

        let assignments = self.assign(lines)?;
        let mut pass = ResolutionPass::new(self.grid, &assignments);
        pass.resolve()?;
        pass.ensure_complete()
    }

    /// Match lines to connectors and check flags against declared degrees
    fn assign(&self, lines: &[SolutionLine]) -> Result<Vec<DirectionSet>, Rejection> {
        let mut assignments: Vec<Option<DirectionSet>> = vec![None; self.grid.connector_count()];

        for line in lines {
            let unknown = Rejection::UnknownConnector {
                row: line.row,
                col: line.col,
            };
            let position = line
                .position()
                .filter(|&position| self.grid.contains(position))
                .ok_or_else(|| unknown.clone())?;
            let index = self.grid.connector_index(position).ok_or(unknown)?;
            let slot = assignments
                .get_mut(index)
                .ok_or(Rejection::UnknownConnector {
                    row: line.row,
                    col: line.col,
                })?;

            if slot.is_some() {
                return Err(Rejection::DuplicateConnector { position });
            }

            let directions = line
                .directions()
                .ok_or(Rejection::InvalidFlag { position })?;

            let declared = self.grid.degree_at(position);
            if line.flag_sum() != i64::from(declared) {
                return Err(Rejection::DegreeMismatch {
                    position,
                    declared,
                    found: line.flag_sum(),
                });
            }

            *slot = Some(directions);
        }

        // Equal counts and no duplicates leave every connector assigned
        Ok(assignments
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect())
    }
}

/// State owned by a single geometric resolution pass
struct ResolutionPass<'a> {
    grid: &'a ConnectorGrid,
    assignments: &'a [DirectionSet],
    occupancy: OccupancyGrid,
    paired: SlotSet,
}

impl<'a> ResolutionPass<'a> {
    fn new(grid: &'a ConnectorGrid, assignments: &'a [DirectionSet]) -> Self {
        Self {
            grid,
            assignments,
            occupancy: OccupancyGrid::new(grid.rows(), grid.cols()),
            paired: SlotSet::new(grid.connector_count()),
        }
    }

    fn directions_of(&self, index: usize) -> DirectionSet {
        self.assignments.get(index).copied().unwrap_or_default()
    }

    fn resolve(&mut self) -> Result<(), Rejection> {
        for connector in self.grid.connectors() {
            let Some(index) = self.grid.connector_index(connector.position) else {
                continue;
            };
            for direction in self.directions_of(index).iter() {
                if !self.paired.contains(index, direction) {
                    self.walk(index, connector, direction)?;
                }
            }
        }
        Ok(())
    }

    /// Follow one fence from `connector` until it is paired or rejected
    fn walk(
        &mut self,
        index: usize,
        connector: Connector,
        direction: Direction,
    ) -> Result<(), Rejection> {
        let dimensions = self.grid.dimensions();
        let orientation = direction.orientation();
        let facing = direction.opposite();
        let mut cursor = connector.position;

        loop {
            let next = cursor.step(direction, dimensions).ok_or(Rejection::Dangling {
                position: connector.position,
                direction,
            })?;

            if let Some(partner) = self.grid.connector_index(next) {
                if !self.directions_of(partner).contains(facing) {
                    return Err(Rejection::UnmatchedPartner {
                        position: connector.position,
                        direction,
                        partner: next,
                    });
                }
                if self.paired.contains(partner, facing) {
                    return Err(Rejection::DoublePairing {
                        position: connector.position,
                        direction,
                        partner: next,
                    });
                }
                self.paired
                    .insert_pair((index, direction), (partner, facing));
                return Ok(());
            }

            if !self.occupancy.claim(next, orientation) {
                return Err(Rejection::Crossing {
                    cell: next,
                    direction,
                });
            }
            cursor = next;
        }
    }

    fn ensure_complete(&self) -> Result<(), Rejection> {
        for connector in self.grid.connectors() {
            let Some(index) = self.grid.connector_index(connector.position) else {
                continue;
            };
            if let Some(direction) = self
                .directions_of(index)
                .iter()
                .find(|&direction| !self.paired.contains(index, direction))
            {
                return Err(Rejection::Unpaired {
                    position: connector.position,
                    direction,
                });
            }
        }
        Ok(())
    }
}
