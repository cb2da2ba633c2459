//! # Dungeon
//!
//! The finished, read-only result of generation. Tree bookkeeping (parents,
//! children, descendant counts) stays inside the generator; the tree can still be
//! rebuilt from `Door::rooms`, which is always `[parent, child]`.

use crate::{
    Door, DoorId, DoorSlots, GridKeysResult, Key, KeyId, Position, RoomGrid, RoomId, RoomNode,
    RoomShape,
};
use serde::{Deserialize, Serialize};

/// Width and height of the normalized map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

/// Where the player starts and finishes, and the rooms with a single door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminals {
    pub entrance: RoomId,
    pub exit: RoomId,
    pub deadends: Vec<RoomId>,
}

/// A room as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub x: i32,
    pub y: i32,
    pub doors: DoorSlots,
    /// Key lying in this room
    pub key: Option<KeyId>,
    /// Hops from the entrance
    pub distance: u32,
    pub entrance: bool,
    pub exit: bool,
    pub shape: RoomShape,
}

impl Room {
    /// Grid position of the room.
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl From<RoomNode> for Room {
    fn from(node: RoomNode) -> Self {
        Self {
            id: node.id,
            x: node.position.x,
            y: node.position.y,
            doors: node.doors,
            key: node.key,
            distance: node.distance,
            entrance: node.entrance,
            exit: node.exit,
            shape: node.shape,
        }
    }
}

/// A generated dungeon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    pub size: Size,
    pub terminals: Terminals,
    pub rooms: Vec<Room>,
    pub doors: Vec<Door>,
    pub keys: Vec<Key>,
    /// `grid[y][x]`, `height` rows of `width` cells
    pub grid: RoomGrid,
}

impl Dungeon {
    /// Room by id.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// Door by id.
    pub fn door(&self, id: DoorId) -> Option<&Door> {
        self.doors.get(id)
    }

    /// Room occupying `pos`, if any.
    pub fn room_at(&self, pos: Position) -> Option<&Room> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        let id = (*self.grid.get(y)?.get(x)?)?;
        self.rooms.get(id)
    }

    /// Parent of every room, rebuilt from the door list. The entrance has none.
    pub fn parents(&self) -> Vec<Option<RoomId>> {
        let mut parents = vec![None; self.rooms.len()];
        for door in &self.doors {
            let [parent, child] = door.rooms;
            if let Some(slot) = parents.get_mut(child) {
                *slot = Some(parent);
            }
        }
        parents
    }

    /// Rooms behind `door`: the child side and all of its descendants.
    pub fn gated_rooms(&self, door: DoorId) -> Vec<RoomId> {
        let Some(door) = self.doors.get(door) else {
            return Vec::new();
        };
        let mut children = vec![Vec::new(); self.rooms.len()];
        for d in &self.doors {
            let [parent, child] = d.rooms;
            if let Some(list) = children.get_mut(parent) {
                list.push(child);
            }
        }

        let mut gated = Vec::new();
        let mut stack = vec![door.rooms[1]];
        while let Some(id) = stack.pop() {
            gated.push(id);
            if let Some(list) = children.get(id) {
                stack.extend(list.iter().copied());
            }
        }
        gated.sort_unstable();
        gated
    }

    /// Serializes to JSON.
    pub fn to_json(&self, pretty: bool) -> GridKeysResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
