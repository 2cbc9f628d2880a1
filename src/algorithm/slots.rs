use bitvec::prelude::*;
use std::fmt;

use crate::spatial::direction::Direction;

/// Fixed-size bitset over (connector, direction) slots
///
/// Each connector owns four consecutive bits in slot order. The validator
/// uses it to mark paired fence ends, the generator to mark used directions.
#[derive(Clone, Debug)]
pub struct SlotSet {
    bits: BitVec,
    connectors: usize,
}

impl SlotSet {
    /// Create a set with no slots marked
    pub fn new(connectors: usize) -> Self {
        Self {
            bits: bitvec![0; connectors * Direction::ALL.len()],
            connectors,
        }
    }

    const fn slot(connector: usize, direction: Direction) -> usize {
        connector * Direction::ALL.len() + direction.index()
    }

    /// Mark a slot
    ///
    /// Slots of unknown connectors are ignored.
    pub fn insert(&mut self, connector: usize, direction: Direction) {
        if connector < self.connectors {
            self.bits.set(Self::slot(connector, direction), true);
        }
    }

    /// Test a slot
    pub fn contains(&self, connector: usize, direction: Direction) -> bool {
        self.bits
            .get(Self::slot(connector, direction))
            .as_deref()
            .copied()
            .unwrap_or(false)
    }

    /// Mark both ends of a fence in one step
    pub fn insert_pair(&mut self, first: (usize, Direction), second: (usize, Direction)) {
        self.insert(first.0, first.1);
        self.insert(second.0, second.1);
    }

    /// Number of marked slots
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Number of connectors covered
    pub const fn connectors(&self) -> usize {
        self.connectors
    }

    /// Marked slots as (connector, direction) pairs in slot order
    pub fn to_vec(&self) -> Vec<(usize, Direction)> {
        self.bits
            .iter_ones()
            .filter_map(|bit| {
                Direction::from_index(bit % Direction::ALL.len())
                    .map(|direction| (bit / Direction::ALL.len(), direction))
            })
            .collect()
    }
}

impl fmt::Display for SlotSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotSet({} slots: {:?})", self.count(), self.to_vec())
    }
}
