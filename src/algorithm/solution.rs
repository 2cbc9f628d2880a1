//! Candidate solutions as produced by an external solver
//!
//! The text form is either the single line `No Solution` or one
//! `row col up down left right` line per connector. Parsing only checks the
//! shape of each line; whether the values make sense for a given grid is the
//! validator's concern.

use std::fmt;
use std::str::FromStr;

use crate::io::configuration::NO_SOLUTION;
use crate::spatial::direction::{Direction, DirectionSet};
use crate::spatial::grid::Position;

/// Number of whitespace-separated fields on a placement line
pub const FIELDS_PER_LINE: usize = 6;

/// One `row col up down left right` line, kept exactly as written
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SolutionLine {
    /// One-based row
    pub row: i64,
    /// One-based column
    pub col: i64,
    /// `up down left right` flags, expected to be 0 or 1
    pub flags: [i64; 4],
}

impl SolutionLine {
    /// Line describing a connector at `position` using `directions`
    pub fn new(position: Position, directions: DirectionSet) -> Self {
        let (row, col) = position.one_based();
        Self {
            row: i64::try_from(row).unwrap_or(i64::MAX),
            col: i64::try_from(col).unwrap_or(i64::MAX),
            flags: directions.flags().map(i64::from),
        }
    }

    /// Zero-based position named by the line, if it can denote a cell at all
    pub fn position(&self) -> Option<Position> {
        Position::from_one_based(self.row, self.col)
    }

    /// Flag value for `direction`
    pub fn flag(&self, direction: Direction) -> i64 {
        self.flags.get(direction.index()).copied().unwrap_or(0)
    }

    /// Sum of the four flags
    pub fn flag_sum(&self) -> i64 {
        self.flags.iter().sum()
    }

    /// Directions whose flag is exactly 1, if every flag is 0 or 1
    pub fn directions(&self) -> Option<DirectionSet> {
        if self.flags.iter().any(|&flag| flag != 0 && flag != 1) {
            return None;
        }
        Some(DirectionSet::from_flags(self.flags.map(|flag| flag == 1)))
    }
}

impl fmt::Display for SolutionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [up, down, left, right] = self.flags;
        write!(f, "{} {} {up} {down} {left} {right}", self.row, self.col)
    }
}

/// A solver's answer for one instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Solution {
    /// The solver reported that no solution exists
    NoSolution,
    /// One line per connector, in the order written
    Placements(Vec<SolutionLine>),
}

impl Solution {
    /// Number of placement lines, 0 for the sentinel
    pub fn line_count(&self) -> usize {
        match self {
            Self::NoSolution => 0,
            Self::Placements(lines) => lines.len(),
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSolution => writeln!(f, "{NO_SOLUTION}"),
            Self::Placements(lines) => {
                for line in lines {
                    writeln!(f, "{line}")?;
                }
                Ok(())
            }
        }
    }
}

/// Shape violation found while reading solver output
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolutionParseError {
    /// Output contained no non-blank line
    Empty,
    /// The sentinel was followed by further lines
    TrailingAfterSentinel,
    /// A line did not hold exactly six fields
    FieldCount {
        /// One-based line number among non-blank lines
        line: usize,
        /// Fields found
        found: usize,
    },
    /// A field was not an integer
    NotAnInteger {
        /// One-based line number among non-blank lines
        line: usize,
        /// Offending token
        token: String,
    },
}

impl fmt::Display for SolutionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "solver output is empty"),
            Self::TrailingAfterSentinel => {
                write!(f, "'{NO_SOLUTION}' must be the only line")
            }
            Self::FieldCount { line, found } => {
                write!(
                    f,
                    "line {line} has {found} fields, expected {FIELDS_PER_LINE}"
                )
            }
            Self::NotAnInteger { line, token } => {
                write!(f, "line {line}: '{token}' is not an integer")
            }
        }
    }
}

impl std::error::Error for SolutionParseError {}

impl FromStr for Solution {
    type Err = SolutionParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        match lines.as_slice() {
            [] => return Err(SolutionParseError::Empty),
            [only] if *only == NO_SOLUTION => return Ok(Self::NoSolution),
            [first, ..] if *first == NO_SOLUTION => {
                return Err(SolutionParseError::TrailingAfterSentinel);
            }
            _ => {}
        }

        lines
            .iter()
            .enumerate()
            .map(|(index, line)| parse_line(index + 1, line))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Placements)
    }
}

fn parse_line(line_number: usize, line: &str) -> Result<SolutionLine, SolutionParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != FIELDS_PER_LINE {
        return Err(SolutionParseError::FieldCount {
            line: line_number,
            found: tokens.len(),
        });
    }

    let mut values = [0_i64; FIELDS_PER_LINE];
    for (value, token) in values.iter_mut().zip(&tokens) {
        *value = token
            .parse()
            .map_err(|_error: std::num::ParseIntError| SolutionParseError::NotAnInteger {
                line: line_number,
                token: (*token).to_string(),
            })?;
    }

    let [row, col, up, down, left, right] = values;
    Ok(SolutionLine {
        row,
        col,
        flags: [up, down, left, right],
    })
}
