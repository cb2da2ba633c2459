//! # Room Classification
//!
//! Tags every room with a shape template chosen from which of its four door slots
//! are populated. The 16 slot combinations map through a fixed table.

use crate::{RoomId, RoomNode};
use serde::{Deserialize, Serialize};

/// Shape template of a room, named after the sides that have doors.
///
/// Serializes to the short template code used by room tile sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomShape {
    #[serde(rename = "D1")]
    DeadEndNorth,
    #[serde(rename = "D2")]
    DeadEndEast,
    #[serde(rename = "D3")]
    DeadEndSouth,
    #[serde(rename = "D4")]
    DeadEndWest,
    #[serde(rename = "C1")]
    CorridorVertical,
    #[serde(rename = "C2")]
    CorridorHorizontal,
    #[serde(rename = "B1")]
    BendNorthEast,
    #[serde(rename = "B2")]
    BendEastSouth,
    #[serde(rename = "B3")]
    BendSouthWest,
    #[serde(rename = "B4")]
    BendWestNorth,
    /// Open everywhere but south
    #[serde(rename = "E1")]
    JunctionNoSouth,
    #[serde(rename = "E2")]
    JunctionNoWest,
    #[serde(rename = "E3")]
    JunctionNoNorth,
    #[serde(rename = "E4")]
    JunctionNoEast,
    #[serde(rename = "A1")]
    Crossroads,
    /// No doors at all; only possible for a lone room
    #[serde(rename = "F1")]
    Isolated,
}

/// Shape per door-slot mask (N=1, E=2, S=4, W=8).
const SHAPE_TABLE: [RoomShape; 16] = [
    RoomShape::Isolated,           // ----
    RoomShape::DeadEndNorth,       // N---
    RoomShape::DeadEndEast,        // -E--
    RoomShape::BendNorthEast,      // NE--
    RoomShape::DeadEndSouth,       // --S-
    RoomShape::CorridorVertical,   // N-S-
    RoomShape::BendEastSouth,      // -ES-
    RoomShape::JunctionNoWest,     // NES-
    RoomShape::DeadEndWest,        // ---W
    RoomShape::BendWestNorth,      // N--W
    RoomShape::CorridorHorizontal, // -E-W
    RoomShape::JunctionNoSouth,    // NE-W
    RoomShape::BendSouthWest,      // --SW
    RoomShape::JunctionNoEast,     // N-SW
    RoomShape::JunctionNoNorth,    // -ESW
    RoomShape::Crossroads,         // NESW
];

impl RoomShape {
    /// Looks up the shape for a door-slot mask. Bits above the low four are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridkeys::{Direction, RoomShape};
    ///
    /// let mask = Direction::North.bit() | Direction::South.bit();
    /// assert_eq!(RoomShape::from_mask(mask), RoomShape::CorridorVertical);
    /// ```
    pub fn from_mask(mask: u8) -> Self {
        SHAPE_TABLE[usize::from(mask & 0b1111)]
    }

    /// Number of doors a room of this shape has.
    pub fn door_count(self) -> usize {
        match self {
            RoomShape::Isolated => 0,
            RoomShape::DeadEndNorth
            | RoomShape::DeadEndEast
            | RoomShape::DeadEndSouth
            | RoomShape::DeadEndWest => 1,
            RoomShape::CorridorVertical
            | RoomShape::CorridorHorizontal
            | RoomShape::BendNorthEast
            | RoomShape::BendEastSouth
            | RoomShape::BendSouthWest
            | RoomShape::BendWestNorth => 2,
            RoomShape::JunctionNoSouth
            | RoomShape::JunctionNoWest
            | RoomShape::JunctionNoNorth
            | RoomShape::JunctionNoEast => 3,
            RoomShape::Crossroads => 4,
        }
    }

    pub fn is_dead_end(self) -> bool {
        self.door_count() == 1
    }

    /// Short template code, e.g. `"D1"`.
    pub fn code(self) -> &'static str {
        match self {
            RoomShape::DeadEndNorth => "D1",
            RoomShape::DeadEndEast => "D2",
            RoomShape::DeadEndSouth => "D3",
            RoomShape::DeadEndWest => "D4",
            RoomShape::CorridorVertical => "C1",
            RoomShape::CorridorHorizontal => "C2",
            RoomShape::BendNorthEast => "B1",
            RoomShape::BendEastSouth => "B2",
            RoomShape::BendSouthWest => "B3",
            RoomShape::BendWestNorth => "B4",
            RoomShape::JunctionNoSouth => "E1",
            RoomShape::JunctionNoWest => "E2",
            RoomShape::JunctionNoNorth => "E3",
            RoomShape::JunctionNoEast => "E4",
            RoomShape::Crossroads => "A1",
            RoomShape::Isolated => "F1",
        }
    }
}

/// Writes each room's shape tag and returns the dead-end room ids in id order.
pub fn classify_rooms(rooms: &mut [RoomNode]) -> Vec<RoomId> {
    let mut deadends = Vec::new();
    for room in rooms.iter_mut() {
        room.shape = RoomShape::from_mask(room.doors.mask());
        if room.shape.is_dead_end() {
            deadends.push(room.id);
        }
    }
    deadends
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, Position, RoomGraph};

    #[test]
    fn test_table_matches_popcount() {
        for mask in 0u8..16 {
            let shape = RoomShape::from_mask(mask);
            assert_eq!(shape.door_count(), mask.count_ones() as usize, "mask {mask:04b}");
        }
    }

    #[test]
    fn test_table_is_injective() {
        let mut seen = std::collections::HashSet::new();
        for mask in 0u8..16 {
            assert!(seen.insert(RoomShape::from_mask(mask)));
        }
    }

    #[test]
    fn test_dead_end_codes() {
        assert_eq!(RoomShape::from_mask(Direction::North.bit()).code(), "D1");
        assert_eq!(RoomShape::from_mask(Direction::East.bit()).code(), "D2");
        assert_eq!(RoomShape::from_mask(Direction::South.bit()).code(), "D3");
        assert_eq!(RoomShape::from_mask(Direction::West.bit()).code(), "D4");
    }

    #[test]
    fn test_junction_codes_name_missing_side() {
        let all = 0b1111u8;
        assert_eq!(RoomShape::from_mask(all & !Direction::South.bit()).code(), "E1");
        assert_eq!(RoomShape::from_mask(all & !Direction::West.bit()).code(), "E2");
        assert_eq!(RoomShape::from_mask(all & !Direction::North.bit()).code(), "E3");
        assert_eq!(RoomShape::from_mask(all & !Direction::East.bit()).code(), "E4");
        assert_eq!(RoomShape::from_mask(all).code(), "A1");
    }

    #[test]
    fn test_serialized_form_is_code() {
        for mask in 0u8..16 {
            let shape = RoomShape::from_mask(mask);
            let json = serde_json::to_string(&shape).unwrap();
            assert_eq!(json, format!("\"{}\"", shape.code()));
        }
    }

    #[test]
    fn test_classify_rooms_collects_deadends() {
        // Plus shape: center with four arms
        let mut graph = RoomGraph::new();
        let center = graph.add_room(Position::new(0, 0));
        for direction in Direction::ALL {
            let arm = graph.add_room(Position::new(0, 0).step(direction));
            graph.connect(center, arm).unwrap();
        }
        let (mut rooms, _, _) = graph.into_parts();

        let deadends = classify_rooms(&mut rooms);
        assert_eq!(rooms[0].shape, RoomShape::Crossroads);
        assert_eq!(deadends, vec![1, 2, 3, 4]);
        // The north arm's only door faces south
        assert_eq!(rooms[1].shape, RoomShape::DeadEndSouth);
        assert_eq!(rooms[4].shape, RoomShape::DeadEndEast);
    }
}
