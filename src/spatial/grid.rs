//! Puzzle instance grid with connector lookup and canonical text form
//!
//! A grid is an `n × m` matrix of required connector degrees where 0 marks an
//! empty cell. Connectors are identified by position; a dense row-major table
//! maps each position to its connector index so walks can resolve the cell
//! they land on without searching.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;

use crate::io::configuration::{MAX_DEGREE, MAX_GRID_DIMENSION};
use crate::io::error::{Result, malformed_instance};
use crate::spatial::direction::Direction;

/// Zero-based cell coordinates
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Row index, 0 at the top
    pub row: usize,
    /// Column index, 0 at the left
    pub col: usize,
}

impl Position {
    /// Create a position from zero-based coordinates
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Convert one-based external coordinates, rejecting zero and negatives
    pub fn from_one_based(row: i64, col: i64) -> Option<Self> {
        let row = usize::try_from(row).ok()?.checked_sub(1)?;
        let col = usize::try_from(col).ok()?.checked_sub(1)?;
        Some(Self { row, col })
    }

    /// One-based coordinates as written in instance and solution files
    pub const fn one_based(self) -> (usize, usize) {
        (self.row + 1, self.col + 1)
    }

    /// Neighbouring position in `direction`, if it stays inside `dimensions`
    pub fn step(self, direction: Direction, dimensions: (usize, usize)) -> Option<Self> {
        let (row_delta, col_delta) = direction.delta();
        let row = self.row.checked_add_signed(row_delta)?;
        let col = self.col.checked_add_signed(col_delta)?;
        (row < dimensions.0 && col < dimensions.1).then_some(Self { row, col })
    }

    const fn index(self) -> [usize; 2] {
        [self.row, self.col]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, col) = self.one_based();
        write!(f, "({row}, {col})")
    }
}

/// A connector cell and its required degree
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Connector {
    /// Cell holding the connector
    pub position: Position,
    /// Number of fence ends that must attach here
    pub degree: u8,
}

/// Immutable puzzle instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectorGrid {
    cells: Array2<u8>,
    /// Connector index per cell, in row-major creation order
    connector_indices: Array2<Option<usize>>,
    connector_count: usize,
}

impl ConnectorGrid {
    /// Build a grid from row-major cell values
    ///
    /// # Errors
    ///
    /// Returns `MalformedInstance` if a dimension is zero or too large, if the
    /// row count or any row length disagrees with `rows × cols`, or if a value
    /// lies outside `0..=4`.
    pub fn load(rows: usize, cols: usize, cell_values: Vec<Vec<u8>>) -> Result<Self> {
        check_dimensions(rows, cols)?;

        if cell_values.len() != rows {
            return Err(malformed_instance(&format!(
                "expected {rows} rows, found {}",
                cell_values.len()
            )));
        }

        let mut flat = Vec::with_capacity(rows * cols);
        for (row_index, row) in cell_values.into_iter().enumerate() {
            if row.len() != cols {
                return Err(malformed_instance(&format!(
                    "row {} has {} values, expected {cols}",
                    row_index + 1,
                    row.len()
                )));
            }
            flat.extend(row);
        }

        let cells = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|error| malformed_instance(&error))?;
        Self::from_cells(cells)
    }

    /// Build a grid from an existing degree matrix
    ///
    /// # Errors
    ///
    /// Returns `MalformedInstance` if a dimension is zero or too large, or a
    /// value lies outside `0..=4`.
    pub fn from_cells(cells: Array2<u8>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        check_dimensions(rows, cols)?;

        let mut connector_indices = Array2::from_elem((rows, cols), None);
        let mut connector_count = 0;
        for ((row, col), &value) in cells.indexed_iter() {
            if value > MAX_DEGREE {
                return Err(malformed_instance(&format!(
                    "cell {} holds {value}, expected 0..={MAX_DEGREE}",
                    Position::new(row, col)
                )));
            }
            if value > 0 {
                if let Some(slot) = connector_indices.get_mut([row, col]) {
                    *slot = Some(connector_count);
                }
                connector_count += 1;
            }
        }

        Ok(Self {
            cells,
            connector_indices,
            connector_count,
        })
    }

    /// Parse the canonical text form
    ///
    /// # Errors
    ///
    /// Returns `MalformedInstance` if the header or any row is missing,
    /// non-numeric, the wrong length, or out of range.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        let header = lines
            .next()
            .ok_or_else(|| malformed_instance(&"missing `rows cols` header"))?;
        let dimensions = parse_numbers::<usize>(header)?;
        let &[rows, cols] = dimensions.as_slice() else {
            return Err(malformed_instance(&format!(
                "header '{header}' must hold exactly two integers"
            )));
        };
        check_dimensions(rows, cols)?;

        let mut cell_values = Vec::with_capacity(rows);
        for line in lines {
            cell_values.push(parse_numbers::<u8>(line)?);
        }

        Self::load(rows, cols, cell_values)
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Grid dimensions (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Whether `position` lies inside the grid
    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows() && position.col < self.cols()
    }

    /// Declared degree at `position`, 0 for empty or outside cells
    pub fn degree_at(&self, position: Position) -> u8 {
        self.cells.get(position.index()).copied().unwrap_or(0)
    }

    /// Connector index at `position`, following row-major order
    pub fn connector_index(&self, position: Position) -> Option<usize> {
        self.connector_indices.get(position.index()).copied().flatten()
    }

    /// Connector descriptor at `position`
    pub fn connector_at(&self, position: Position) -> Option<Connector> {
        let degree = self.degree_at(position);
        (degree > 0).then_some(Connector { position, degree })
    }

    /// Number of connectors in the grid
    pub const fn connector_count(&self) -> usize {
        self.connector_count
    }

    /// Connectors in row-major order
    ///
    /// The iterator borrows the grid and can be requested any number of times.
    pub fn connectors(&self) -> impl Iterator<Item = Connector> + '_ {
        self.cells
            .indexed_iter()
            .filter(|&(_, &degree)| degree > 0)
            .map(|((row, col), &degree)| Connector {
                position: Position::new(row, col),
                degree,
            })
    }

    /// Canonical text form, identical to the instance file format
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConnectorGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.rows(), self.cols())?;
        for row in self.cells.rows() {
            let mut values = row.iter();
            if let Some(first) = values.next() {
                write!(f, "{first}")?;
            }
            for value in values {
                write!(f, " {value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for ConnectorGrid {
    type Err = crate::io::error::FenceError;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

fn check_dimensions(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(malformed_instance(&format!(
            "grid {rows}x{cols} has no cells"
        )));
    }
    if rows > MAX_GRID_DIMENSION || cols > MAX_GRID_DIMENSION {
        return Err(malformed_instance(&format!(
            "grid {rows}x{cols} exceeds the {MAX_GRID_DIMENSION} cell limit per side"
        )));
    }
    Ok(())
}

fn parse_numbers<T>(line: &str) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    line.split_whitespace()
        .map(|token| {
            token
                .parse::<T>()
                .map_err(|error| malformed_instance(&format!("'{token}': {error}")))
        })
        .collect()
}
