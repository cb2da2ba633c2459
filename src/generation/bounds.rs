//! # Bounds Tracking
//!
//! Minimal enclosing rectangle of every placed room.

use crate::{Direction, Position};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Inclusive edges of the occupied area of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: i32,
    pub east: i32,
    pub south: i32,
    pub west: i32,
}

impl Bounds {
    /// Bounds enclosing the single cell `seed`.
    pub fn new(seed: Position) -> Self {
        Self {
            north: seed.y,
            east: seed.x,
            south: seed.y,
            west: seed.x,
        }
    }

    /// Grows the bounds to include `pos`.
    pub fn stretch(&mut self, pos: Position) {
        self.north = self.north.min(pos.y);
        self.east = self.east.max(pos.x);
        self.south = self.south.max(pos.y);
        self.west = self.west.min(pos.x);
    }

    pub fn width(&self) -> usize {
        (self.east - self.west + 1) as usize
    }

    pub fn height(&self) -> usize {
        (self.south - self.north + 1) as usize
    }

    /// Top-left corner; subtracting it normalizes positions to start at (0, 0).
    pub fn origin(&self) -> Position {
        Position::new(self.west, self.north)
    }

    #[cfg(test)]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.west && pos.x <= self.east && pos.y >= self.north && pos.y <= self.south
    }

    /// Span of tangential coordinates for growth in `direction`.
    ///
    /// Growing north or south samples a column (x), east or west a row (y).
    /// Both edges are included, so the east column and south row can be sampled
    /// too; older generators drew from `west..east` and never grew from the far edge.
    pub fn tangent_span(&self, direction: Direction) -> RangeInclusive<i32> {
        match direction {
            Direction::North | Direction::South => self.west..=self.east,
            Direction::East | Direction::West => self.north..=self.south,
        }
    }
}
