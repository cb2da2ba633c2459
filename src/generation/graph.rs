//! # Room Graph
//!
//! Arena of rooms, doors and keys. Rooms reference their parent and children by
//! index, so the tree never owns itself and needs no reference counting.
//!
//! Rooms and their connecting doors are always created back to back during growth,
//! which is why the door joining a non-root room to its parent has id `room - 1`.

use crate::{Direction, DoorId, GridKeysError, GridKeysResult, KeyId, Position, RoomId, RoomShape};
use serde::{Deserialize, Serialize};

/// Door ids on each side of a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSlots {
    pub north: Option<DoorId>,
    pub east: Option<DoorId>,
    pub south: Option<DoorId>,
    pub west: Option<DoorId>,
}

impl DoorSlots {
    /// Door on the `direction` side, if any.
    pub fn get(&self, direction: Direction) -> Option<DoorId> {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Puts `door` on the `direction` side.
    pub fn set(&mut self, direction: Direction, door: DoorId) {
        let slot = match direction {
            Direction::North => &mut self.north,
            Direction::East => &mut self.east,
            Direction::South => &mut self.south,
            Direction::West => &mut self.west,
        };
        *slot = Some(door);
    }

    /// Populated slots as a bitmask using [`Direction::bit`].
    pub fn mask(&self) -> u8 {
        self.iter().fold(0, |mask, (direction, _)| mask | direction.bit())
    }

    /// Number of populated slots.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Populated slots in N, E, S, W order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, DoorId)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.get(direction).map(|door| (direction, door)))
    }
}

/// Axis a door is crossed along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Rooms differ in y
    Vertical,
    /// Rooms differ in x
    Horizontal,
}

impl From<Direction> for Orientation {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::North | Direction::South => Orientation::Vertical,
            Direction::East | Direction::West => Orientation::Horizontal,
        }
    }
}

/// An edge between two adjacent rooms, optionally locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub id: DoorId,
    /// Key that unlocks this door
    pub key: Option<KeyId>,
    pub orientation: Orientation,
    /// Door leads into the exit room
    pub exit: bool,
    /// `[parent, child]`
    pub rooms: [RoomId; 2],
}

/// A key lying in `room` that opens `door`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub id: KeyId,
    pub room: RoomId,
    pub door: DoorId,
}

/// A room together with its tree bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomNode {
    pub id: RoomId,
    pub position: Position,
    pub doors: DoorSlots,
    /// Hops from the entrance, fixed when the room is connected
    pub distance: u32,
    pub parent: Option<RoomId>,
    pub children: Vec<RoomId>,
    /// Total number of descendants still counted toward lock thresholds
    pub descendants: usize,
    pub key: Option<KeyId>,
    pub entrance: bool,
    pub exit: bool,
    pub shape: RoomShape,
}

impl RoomNode {
    fn new(id: RoomId, position: Position) -> Self {
        Self {
            id,
            position,
            doors: DoorSlots::default(),
            distance: 0,
            parent: None,
            children: Vec::new(),
            descendants: 0,
            key: None,
            entrance: id == 0,
            exit: false,
            shape: RoomShape::Isolated,
        }
    }

    /// Size of the subtree rooted here, this room included.
    pub fn subtree_size(&self) -> usize {
        self.descendants + 1
    }
}

/// Arena holding every room, door and key of one dungeon.
#[derive(Debug, Clone, Default)]
pub struct RoomGraph {
    rooms: Vec<RoomNode>,
    doors: Vec<Door>,
    keys: Vec<Key>,
}

impl RoomGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rooms in creation order.
    pub fn rooms(&self) -> &[RoomNode] {
        &self.rooms
    }

    /// Doors in creation order.
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Keys in placement order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Looks up a room, failing with [`GridKeysError::InvalidRoom`].
    pub fn room(&self, id: RoomId) -> GridKeysResult<&RoomNode> {
        self.rooms.get(id).ok_or(GridKeysError::InvalidRoom(id))
    }

    /// Mutable room lookup.
    pub fn room_mut(&mut self, id: RoomId) -> GridKeysResult<&mut RoomNode> {
        self.rooms.get_mut(id).ok_or(GridKeysError::InvalidRoom(id))
    }

    /// Looks up a door, failing with [`GridKeysError::InvalidDoor`].
    pub fn door(&self, id: DoorId) -> GridKeysResult<&Door> {
        self.doors.get(id).ok_or(GridKeysError::InvalidDoor(id))
    }

    /// Appends an unconnected room at `position` and returns its id.
    pub fn add_room(&mut self, position: Position) -> RoomId {
        let id = self.rooms.len();
        self.rooms.push(RoomNode::new(id, position));
        id
    }

    /// Joins `child` to `parent` with a new door.
    ///
    /// Sets both rooms' facing door slots, the child's parent and distance, and adds
    /// the child to every ancestor's descendant count.
    ///
    /// # Errors
    ///
    /// Returns [`GridKeysError::InvalidAdjacency`] if the rooms do not share an edge.
    pub fn connect(&mut self, parent: RoomId, child: RoomId) -> GridKeysResult<DoorId> {
        let parent_pos = self.room(parent)?.position;
        let child_pos = self.room(child)?.position;
        let direction = Direction::between(parent_pos, child_pos).ok_or(
            GridKeysError::InvalidAdjacency {
                from: parent,
                to: child,
            },
        )?;

        let door = self.doors.len();
        let parent_distance = {
            let node = &mut self.rooms[parent];
            node.doors.set(direction, door);
            node.children.push(child);
            node.distance
        };
        {
            let node = &mut self.rooms[child];
            node.doors.set(direction.opposite(), door);
            node.parent = Some(parent);
            node.distance = parent_distance + 1;
        }

        let lineage: Vec<RoomId> = std::iter::once(parent).chain(self.ancestors(parent)).collect();
        for id in lineage {
            self.rooms[id].descendants += 1;
        }

        self.doors.push(Door {
            id: door,
            key: None,
            orientation: direction.into(),
            exit: false,
            rooms: [parent, child],
        });

        Ok(door)
    }

    /// Iterates the strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: RoomId) -> impl Iterator<Item = RoomId> + '_ {
        std::iter::successors(self.rooms.get(id).and_then(|r| r.parent), move |&current| {
            self.rooms[current].parent
        })
    }

    /// Every room in the subtree rooted at `id`, depth-first pre-order.
    pub fn subtree(&self, id: RoomId) -> Vec<RoomId> {
        let mut visited = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.rooms.get(current) else {
                continue;
            };
            visited.push(current);
            stack.extend(node.children.iter().rev());
        }
        visited
    }

    /// Door between `id` and its parent. Always `id - 1`.
    pub fn parent_door(&self, id: RoomId) -> Option<DoorId> {
        self.rooms.get(id)?.parent?;
        id.checked_sub(1)
    }

    /// Removes the subtree rooted at `boundary` from its ancestors' descendant counts.
    ///
    /// Returns the number of rooms detached.
    pub fn detach_subtree(&mut self, boundary: RoomId) -> GridKeysResult<usize> {
        let size = self.room(boundary)?.subtree_size();
        let lineage: Vec<RoomId> = self.ancestors(boundary).collect();
        for id in lineage {
            let node = &mut self.rooms[id];
            node.descendants = node.descendants.saturating_sub(size);
        }
        Ok(size)
    }

    /// Flags `id` as the exit, along with every door leading into it.
    pub fn set_exit(&mut self, id: RoomId) -> GridKeysResult<()> {
        let node = self.room_mut(id)?;
        node.exit = true;
        let slots = node.doors;
        for (_, door) in slots.iter() {
            if let Some(door) = self.doors.get_mut(door) {
                door.exit = true;
            }
        }
        Ok(())
    }

    /// Locks `door` and places its key in `room`.
    pub fn lock(&mut self, door: DoorId, room: RoomId) -> GridKeysResult<KeyId> {
        self.door(door)?;
        self.room(room)?;

        let key = self.keys.len();
        self.keys.push(Key { id: key, room, door });
        self.doors[door].key = Some(key);
        self.rooms[room].key = Some(key);
        Ok(key)
    }

    /// Shifts every room so that `origin` becomes (0, 0).
    pub fn normalize(&mut self, origin: Position) {
        for room in &mut self.rooms {
            room.position = room.position - origin;
        }
    }

    /// Hands out the finished parts.
    pub fn into_parts(self) -> (Vec<RoomNode>, Vec<Door>, Vec<Key>) {
        (self.rooms, self.doors, self.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 at the origin, 1 north of it, 2 east of 1, 3 west of 0.
    fn small_graph() -> RoomGraph {
        let mut graph = RoomGraph::new();
        let r0 = graph.add_room(Position::new(0, 0));
        let r1 = graph.add_room(Position::new(0, -1));
        graph.connect(r0, r1).unwrap();
        let r2 = graph.add_room(Position::new(1, -1));
        graph.connect(r1, r2).unwrap();
        let r3 = graph.add_room(Position::new(-1, 0));
        graph.connect(r0, r3).unwrap();
        graph
    }

    #[test]
    fn test_connect_sets_slots_and_orientation() {
        let graph = small_graph();
        let rooms = graph.rooms();

        assert_eq!(rooms[0].doors.north, Some(0));
        assert_eq!(rooms[1].doors.south, Some(0));
        assert_eq!(rooms[1].doors.east, Some(1));
        assert_eq!(rooms[2].doors.west, Some(1));
        assert_eq!(rooms[0].doors.west, Some(2));
        assert_eq!(rooms[3].doors.east, Some(2));

        assert_eq!(graph.doors()[0].orientation, Orientation::Vertical);
        assert_eq!(graph.doors()[1].orientation, Orientation::Horizontal);
        assert_eq!(graph.doors()[2].rooms, [0, 3]);
    }

    #[test]
    fn test_connect_sets_tree_fields() {
        let graph = small_graph();
        let rooms = graph.rooms();

        assert!(rooms[0].entrance);
        assert_eq!(rooms[0].parent, None);
        assert_eq!(rooms[0].distance, 0);
        assert_eq!(rooms[0].children, vec![1, 3]);
        assert_eq!(rooms[0].descendants, 3);

        assert_eq!(rooms[2].parent, Some(1));
        assert_eq!(rooms[2].distance, 2);
        assert_eq!(rooms[1].descendants, 1);
        assert_eq!(rooms[3].distance, 1);
    }

    #[test]
    fn test_connect_rejects_non_adjacent() {
        let mut graph = RoomGraph::new();
        let a = graph.add_room(Position::new(0, 0));
        let b = graph.add_room(Position::new(2, 0));
        let c = graph.add_room(Position::new(1, 1));

        assert!(matches!(
            graph.connect(a, b),
            Err(GridKeysError::InvalidAdjacency { from: 0, to: 1 })
        ));
        assert!(graph.connect(a, c).is_err()); // Diagonal
        assert!(matches!(graph.connect(a, 9), Err(GridKeysError::InvalidRoom(9))));
        assert!(graph.doors().is_empty());
    }

    #[test]
    fn test_parent_door_is_previous_id() {
        let graph = small_graph();
        assert_eq!(graph.parent_door(0), None);
        for room in 1..4 {
            let door = graph.parent_door(room).unwrap();
            assert_eq!(door, room - 1);
            assert_eq!(graph.doors()[door].rooms[1], room);
        }
    }

    #[test]
    fn test_ancestors_and_subtree() {
        let graph = small_graph();
        assert_eq!(graph.ancestors(2).collect::<Vec<_>>(), vec![1, 0]);
        assert_eq!(graph.ancestors(0).count(), 0);
        assert_eq!(graph.subtree(0), vec![0, 1, 2, 3]);
        assert_eq!(graph.subtree(1), vec![1, 2]);
        assert_eq!(graph.subtree(3), vec![3]);
    }

    #[test]
    fn test_detach_subtree_updates_ancestors() {
        let mut graph = small_graph();
        let detached = graph.detach_subtree(1).unwrap();
        assert_eq!(detached, 2);
        assert_eq!(graph.rooms()[0].descendants, 1);
        // The boundary keeps its own count
        assert_eq!(graph.rooms()[1].descendants, 1);
    }

    #[test]
    fn test_set_exit_marks_doors() {
        let mut graph = small_graph();
        graph.set_exit(1).unwrap();
        assert!(graph.rooms()[1].exit);
        assert!(graph.doors()[0].exit);
        assert!(graph.doors()[1].exit);
        assert!(!graph.doors()[2].exit);
        assert!(graph.set_exit(42).is_err());
    }

    #[test]
    fn test_lock_places_key() {
        let mut graph = small_graph();
        let key = graph.lock(1, 3).unwrap();
        assert_eq!(key, 0);
        assert_eq!(graph.doors()[1].key, Some(0));
        assert_eq!(graph.rooms()[3].key, Some(0));
        assert_eq!(graph.keys()[0], Key { id: 0, room: 3, door: 1 });

        assert!(matches!(graph.lock(7, 3), Err(GridKeysError::InvalidDoor(7))));
    }

    #[test]
    fn test_normalize_shifts_positions() {
        let mut graph = small_graph();
        graph.normalize(Position::new(-1, -1));
        assert_eq!(graph.rooms()[0].position, Position::new(1, 1));
        assert_eq!(graph.rooms()[3].position, Position::new(0, 1));
    }

    #[test]
    fn test_door_slots_mask() {
        let graph = small_graph();
        let r1 = &graph.rooms()[1];
        assert_eq!(r1.doors.count(), 2);
        assert_eq!(r1.doors.mask(), Direction::South.bit() | Direction::East.bit());
        assert_eq!(DoorSlots::default().mask(), 0);
    }
}
