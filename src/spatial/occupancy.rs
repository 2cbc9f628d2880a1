//! Transient per-cell fence orientation record used to detect crossings

use ndarray::Array2;

use crate::spatial::direction::Orientation;
use crate::spatial::grid::Position;

/// Orientation of the fences occupying each intermediate cell
///
/// Owned by a single validation or generation pass. Fences of the same
/// orientation may share a cell; fences of differing orientation may not.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    fences: Array2<Option<Orientation>>,
}

impl OccupancyGrid {
    /// Create an empty occupancy grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            fences: Array2::from_elem((rows, cols), None),
        }
    }

    /// Orientation recorded at `position`, if any
    pub fn orientation_at(&self, position: Position) -> Option<Orientation> {
        self.fences
            .get([position.row, position.col])
            .copied()
            .flatten()
    }

    /// Whether a fence with `orientation` may pass through `position`
    pub fn permits(&self, position: Position, orientation: Orientation) -> bool {
        self.orientation_at(position)
            .is_none_or(|existing| existing == orientation)
    }

    /// Record a fence through `position`
    ///
    /// Returns `false` without modifying the grid if a fence of the other
    /// orientation already occupies the cell.
    pub fn claim(&mut self, position: Position, orientation: Orientation) -> bool {
        let Some(cell) = self.fences.get_mut([position.row, position.col]) else {
            return false;
        };
        match *cell {
            None => {
                *cell = Some(orientation);
                true
            }
            Some(existing) => existing == orientation,
        }
    }

    /// Number of cells carrying a fence
    pub fn occupied_count(&self) -> usize {
        self.fences.iter().filter(|cell| cell.is_some()).count()
    }
}
