//! # Frontier Index
//!
//! For each cardinal direction, maps a tangential coordinate to the room that is
//! currently furthest in that direction on that row or column. Growth asks the
//! index "who is outermost here" instead of sliding a new room in from the edge.

use crate::{Direction, Position, RoomId};
use std::collections::BTreeMap;

/// Outermost room on one row or column, with its axial coordinate cached so the
/// index never has to consult the room arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    room: RoomId,
    axial: i32,
}

/// Per-direction index of the most extreme room at each tangential coordinate.
#[derive(Debug, Clone, Default)]
pub struct FrontierIndex {
    north: BTreeMap<i32, FrontierEntry>,
    east: BTreeMap<i32, FrontierEntry>,
    south: BTreeMap<i32, FrontierEntry>,
    west: BTreeMap<i32, FrontierEntry>,
}

impl FrontierIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    fn side(&self, direction: Direction) -> &BTreeMap<i32, FrontierEntry> {
        match direction {
            Direction::North => &self.north,
            Direction::East => &self.east,
            Direction::South => &self.south,
            Direction::West => &self.west,
        }
    }

    fn side_mut(&mut self, direction: Direction) -> &mut BTreeMap<i32, FrontierEntry> {
        match direction {
            Direction::North => &mut self.north,
            Direction::East => &mut self.east,
            Direction::South => &mut self.south,
            Direction::West => &mut self.west,
        }
    }

    /// Records a room at `pos`, taking over every direction where it is now outermost.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridkeys::{Direction, FrontierIndex, Position};
    ///
    /// let mut frontier = FrontierIndex::new();
    /// frontier.register(0, Position::new(0, 0));
    /// frontier.register(1, Position::new(0, -1));
    ///
    /// assert_eq!(frontier.lookup(Direction::North, 0), Some(1));
    /// assert_eq!(frontier.lookup(Direction::South, 0), Some(0));
    /// ```
    pub fn register(&mut self, room: RoomId, pos: Position) {
        for direction in Direction::ALL {
            let axial = direction.axial(pos);
            let entry = FrontierEntry { room, axial };
            self.side_mut(direction)
                .entry(direction.tangent(pos))
                .and_modify(|current| {
                    if direction.is_further(axial, current.axial) {
                        *current = entry;
                    }
                })
                .or_insert(entry);
        }
    }

    /// Outermost room in `direction` at the given tangential coordinate.
    pub fn lookup(&self, direction: Direction, tangent: i32) -> Option<RoomId> {
        self.side(direction).get(&tangent).map(|entry| entry.room)
    }

    /// Number of rows or columns with a registered room for `direction`.
    #[cfg(test)]
    pub fn len(&self, direction: Direction) -> usize {
        self.side(direction).len()
    }
}
