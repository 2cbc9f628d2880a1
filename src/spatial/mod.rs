//! Spatial data structures for the puzzle grid
//!
//! This module contains spatial-related functionality including:
//! - Directions, orientations and direction slots
//! - The immutable instance grid and connector lookup
//! - Occupancy tracking for fence crossings

/// Fence directions and per-connector direction sets
pub mod direction;
/// Instance grid, positions and connectors
pub mod grid;
/// Per-pass fence orientation record
pub mod occupancy;

pub use direction::{Direction, DirectionSet, Orientation};
pub use grid::{Connector, ConnectorGrid, Position};
pub use occupancy::OccupancyGrid;
