//! # Solvability
//!
//! Plays a dungeon from the entrance, picking up every reachable key and opening
//! the doors they unlock, and checks the structural invariants a finished dungeon
//! must satisfy.

use crate::{
    Direction, Dungeon, GenerationConfig, GridKeysError, GridKeysResult, KeyId, RoomId, RoomShape,
};
use std::collections::{HashSet, VecDeque};

/// Outcome of playing a dungeon from its entrance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveReport {
    /// Keys in the order they were picked up
    pub key_order: Vec<KeyId>,
    pub rooms_reached: usize,
    pub exit_reached: bool,
}

impl SolveReport {
    /// True when every room was reached, the exit included.
    pub fn is_complete(&self, dungeon: &Dungeon) -> bool {
        self.exit_reached && self.rooms_reached == dungeon.rooms.len()
    }
}

/// Flood-fills from the entrance through open doors, collecting keys until no new
/// key can be reached.
pub fn solve(dungeon: &Dungeon) -> SolveReport {
    let room_count = dungeon.rooms.len();
    let mut neighbours: Vec<Vec<(RoomId, Option<KeyId>)>> = vec![Vec::new(); room_count];
    for door in &dungeon.doors {
        let [a, b] = door.rooms;
        if a < room_count && b < room_count {
            neighbours[a].push((b, door.key));
            neighbours[b].push((a, door.key));
        }
    }

    let mut held = HashSet::new();
    let mut key_order = Vec::new();
    let mut reached = vec![false; room_count];

    loop {
        let keys_before = key_order.len();
        reached.iter_mut().for_each(|r| *r = false);

        let mut queue = VecDeque::new();
        if dungeon.terminals.entrance < room_count {
            reached[dungeon.terminals.entrance] = true;
            queue.push_back(dungeon.terminals.entrance);
        }

        while let Some(id) = queue.pop_front() {
            if let Some(key) = dungeon.rooms[id].key {
                if held.insert(key) {
                    key_order.push(key);
                }
            }
            for &(next, lock) in &neighbours[id] {
                if reached[next] {
                    continue;
                }
                if lock.is_some_and(|key| !held.contains(&key)) {
                    continue;
                }
                reached[next] = true;
                queue.push_back(next);
            }
        }

        if key_order.len() == keys_before {
            break;
        }
    }

    SolveReport {
        key_order,
        rooms_reached: reached.iter().filter(|&&r| r).count(),
        exit_reached: reached.get(dungeon.terminals.exit).copied().unwrap_or(false),
    }
}

fn fail<T>(message: String) -> GridKeysResult<T> {
    Err(GridKeysError::GenerationFailed(message))
}

/// Checks every structural invariant of a finished dungeon and that it can be
/// completed from the entrance.
pub fn verify_dungeon(dungeon: &Dungeon, config: &GenerationConfig) -> GridKeysResult<()> {
    let config = config.clamped();
    let rooms = &dungeon.rooms;

    if rooms.len() != config.room_count {
        return fail(format!(
            "Expected {} rooms, found {}",
            config.room_count,
            rooms.len()
        ));
    }
    if dungeon.doors.len() + 1 != rooms.len() {
        return fail(format!(
            "Expected {} doors, found {}",
            rooms.len() - 1,
            dungeon.doors.len()
        ));
    }
    if dungeon.keys.len() > config.key_count {
        return fail(format!(
            "Expected at most {} keys, found {}",
            config.key_count,
            dungeon.keys.len()
        ));
    }

    for (index, room) in rooms.iter().enumerate() {
        if room.id != index {
            return fail(format!("Room at index {} has id {}", index, room.id));
        }
        if room.entrance != (room.id == dungeon.terminals.entrance) {
            return fail(format!("Room {} has a wrong entrance flag", room.id));
        }
        if room.exit != (room.id == dungeon.terminals.exit) {
            return fail(format!("Room {} has a wrong exit flag", room.id));
        }
    }
    if dungeon.terminals.entrance != 0 || rooms[0].distance != 0 {
        return fail("Entrance must be room 0 at distance 0".to_string());
    }

    // Tree shape: door i joins room i + 1 to an earlier parent
    for (index, door) in dungeon.doors.iter().enumerate() {
        let [parent, child] = door.rooms;
        if door.id != index || child != door.id + 1 || parent >= child {
            return fail(format!("Door {} joins rooms {} and {}", door.id, parent, child));
        }
        let (p, c) = (&rooms[parent], &rooms[child]);
        if c.distance != p.distance + 1 {
            return fail(format!(
                "Room {} has distance {} but its parent {} has {}",
                child, c.distance, parent, p.distance
            ));
        }
        let Some(direction) = Direction::between(p.position(), c.position()) else {
            return fail(format!("Door {} joins non-adjacent rooms", door.id));
        };
        if p.doors.get(direction) != Some(door.id)
            || c.doors.get(direction.opposite()) != Some(door.id)
        {
            return fail(format!("Door {} is missing from a room's slots", door.id));
        }
        if door.exit != (p.exit || c.exit) {
            return fail(format!("Door {} has a wrong exit flag", door.id));
        }
    }
    for room in rooms {
        if room.doors.iter().any(|(_, door)| door >= dungeon.doors.len()) {
            return fail(format!("Room {} references a missing door", room.id));
        }
    }

    // Grid round trip
    if dungeon.grid.len() != dungeon.size.height
        || dungeon.grid.iter().any(|row| row.len() != dungeon.size.width)
    {
        return fail("Grid does not match the dungeon size".to_string());
    }
    let occupied = dungeon.grid.iter().flatten().filter(|cell| cell.is_some()).count();
    if occupied != rooms.len() {
        return fail(format!(
            "Grid holds {} rooms, expected {}",
            occupied,
            rooms.len()
        ));
    }
    for room in rooms {
        if dungeon.room_at(room.position()).map(|r| r.id) != Some(room.id) {
            return fail(format!("Room {} is not on the grid at its position", room.id));
        }
    }

    // Classification
    let mut deadends = Vec::new();
    for room in rooms {
        if room.shape != RoomShape::from_mask(room.doors.mask()) {
            return fail(format!("Room {} has the wrong shape", room.id));
        }
        if room.shape.is_dead_end() {
            deadends.push(room.id);
        }
    }
    if deadends != dungeon.terminals.deadends {
        return fail("Dead-end list does not match room shapes".to_string());
    }

    // Keys
    for (index, key) in dungeon.keys.iter().enumerate() {
        let door_key = dungeon.door(key.door).and_then(|d| d.key);
        let room_key = dungeon.room(key.room).and_then(|r| r.key);
        if key.id != index || door_key != Some(key.id) || room_key != Some(key.id) {
            return fail(format!("Key {} is not linked to its door and room", key.id));
        }
        if dungeon.gated_rooms(key.door).contains(&key.room) {
            return fail(format!("Key {} is locked behind its own door", key.id));
        }
    }

    let report = solve(dungeon);
    if !report.is_complete(dungeon) {
        return fail(format!(
            "Dungeon is not completable: reached {} of {} rooms",
            report.rooms_reached,
            rooms.len()
        ));
    }

    Ok(())
}
