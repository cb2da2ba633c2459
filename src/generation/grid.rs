//! # Grid Rasterization
//!
//! Turns normalized room coordinates into a row-major grid of room ids.

use crate::{RoomId, RoomNode};

/// Row-major grid of room ids, `grid[y][x]`.
pub type RoomGrid = Vec<Vec<Option<RoomId>>>;

/// Rasterizes the tree rooted at room 0 into a `height` × `width` grid.
///
/// Rooms are visited depth-first from the root; positions outside the grid are
/// skipped. Positions must already be normalized to start at (0, 0).
pub fn rasterize(rooms: &[RoomNode], width: usize, height: usize) -> RoomGrid {
    let mut grid = vec![vec![None; width]; height];
    if rooms.is_empty() {
        return grid;
    }

    let mut stack = vec![0];
    while let Some(id) = stack.pop() {
        let Some(room) = rooms.get(id) else {
            continue;
        };
        let (Ok(x), Ok(y)) = (
            usize::try_from(room.position.x),
            usize::try_from(room.position.y),
        ) else {
            continue;
        };
        if let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = Some(id);
        }
        stack.extend(room.children.iter().rev());
    }

    grid
}
