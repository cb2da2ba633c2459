//! # Grid Keys Generator
//!
//! Grows a tree of rooms on an integer grid, then overlays a nested chain of locked
//! doors and keys that can always be completed.
//!
//! Generation runs in three strictly ordered phases:
//! 1. Growth: each new room is attached one step beyond the outermost room of a
//!    random row or column, found through the [`FrontierIndex`]
//! 2. Locking: the deepest room becomes the exit; each lock then gates a subtree of
//!    roughly `rooms / (keys + 1)` rooms and puts its key in the deepest room still
//!    outside every gate
//! 3. Post-processing: coordinates are normalized, rasterized and classified

use crate::{
    classify_rooms, rasterize, utils, verify_dungeon, Bounds, Direction, Dungeon, FrontierIndex,
    GenerationConfig, Generator, GridKeysError, GridKeysResult, LockPool, Position, Room,
    RoomGraph, RoomId, Size, Terminals,
};
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::Rng;

/// Lock-and-key dungeon generator working on a unit room grid.
#[derive(Debug, Clone)]
pub struct GridKeysGenerator {
    /// Grid coordinate of the entrance before normalization
    pub seed_position: Position,
    /// Whether to verify every generated dungeon before returning it
    pub ensure_solvable: bool,
}

/// Working state of one generation run. Rebuilt from scratch on every call.
#[derive(Debug)]
struct Layout {
    graph: RoomGraph,
    bounds: Bounds,
    frontier: FrontierIndex,
    pool: LockPool,
}

impl Layout {
    /// A layout holding only the entrance at `seed`.
    fn new(seed: Position) -> Self {
        let mut graph = RoomGraph::new();
        let root = graph.add_room(seed);
        let mut frontier = FrontierIndex::new();
        frontier.register(root, seed);

        Self {
            graph,
            bounds: Bounds::new(seed),
            frontier,
            pool: LockPool::new(),
        }
    }

    /// Adds a room one step from `parent` in `direction` and connects it.
    fn add_room(&mut self, parent: RoomId, direction: Direction) -> GridKeysResult<RoomId> {
        let position = self.graph.room(parent)?.position.step(direction);
        let id = self.graph.add_room(position);
        self.bounds.stretch(position);
        self.frontier.register(id, position);

        self.graph.connect(parent, id)?;
        let distance = self.graph.room(id)?.distance;
        self.pool.register(id, distance);

        trace!(
            "Room {} at ({}, {}) attached {:?} of room {}, distance {}",
            id,
            position.x,
            position.y,
            direction,
            parent,
            distance
        );
        Ok(id)
    }
}

impl GridKeysGenerator {
    /// Creates a generator with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridkeys::{GenerationConfig, GridKeysGenerator};
    ///
    /// let generator = GridKeysGenerator::new();
    /// let dungeon = generator.generate_seeded(&GenerationConfig::new(10, 2)).unwrap();
    /// assert_eq!(dungeon.rooms.len(), 10);
    /// assert_eq!(dungeon.doors.len(), 9);
    /// ```
    pub fn new() -> Self {
        Self {
            seed_position: crate::config::GRID_SEED,
            ensure_solvable: true,
        }
    }

    /// Creates a generator that grows from the origin.
    pub fn for_testing() -> Self {
        Self {
            seed_position: Position::origin(),
            ensure_solvable: true,
        }
    }

    /// Generates with an RNG seeded from `config.seed`.
    pub fn generate_seeded(&self, config: &GenerationConfig) -> GridKeysResult<Dungeon> {
        let mut rng = utils::create_rng(config);
        self.generate(config, &mut rng)
    }

    /// Grows the layout until it holds `config.room_count` rooms.
    fn grow(
        &self,
        layout: &mut Layout,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> GridKeysResult<()> {
        for _ in 1..config.room_count {
            let (parent, direction) = self.choose_parent(layout, config.max_frontier_retries, rng)?;
            layout.add_room(parent, direction)?;
        }
        Ok(())
    }

    /// Picks a random direction and row or column and returns its outermost room.
    ///
    /// Resamples on a frontier miss, failing after `retries` attempts.
    fn choose_parent(
        &self,
        layout: &Layout,
        retries: u32,
        rng: &mut StdRng,
    ) -> GridKeysResult<(RoomId, Direction)> {
        for attempt in 0..retries {
            let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
            let tangent = rng.gen_range(layout.bounds.tangent_span(direction));
            if let Some(parent) = layout.frontier.lookup(direction, tangent) {
                return Ok((parent, direction));
            }
            trace!(
                "Frontier miss {:?} at {} (attempt {})",
                direction,
                tangent,
                attempt + 1
            );
        }
        Err(GridKeysError::FrontierExhausted { attempts: retries })
    }

    /// Places the exit and up to `config.key_count` locks. Returns the exit room.
    fn place_locks(&self, layout: &mut Layout, config: &GenerationConfig) -> GridKeysResult<RoomId> {
        let room_total = layout.graph.rooms().len();

        let exit = layout.pool.pop_deepest().ok_or_else(|| {
            GridKeysError::GenerationFailed("No room available for the exit".to_string())
        })?;
        layout.graph.set_exit(exit)?;

        let mut protect = exit;
        for placed in 0..config.key_count {
            let boundary = find_lock_boundary(&layout.graph, protect, room_total, config.key_count)?;
            gate_subtree(layout, boundary)?;

            let Some(key_room) = layout.pool.pop_deepest() else {
                warn!(
                    "Lock pool exhausted after {} of {} keys, dungeon stays completable",
                    placed, config.key_count
                );
                break;
            };

            let door = layout
                .graph
                .parent_door(boundary)
                .ok_or(GridKeysError::InvalidRoom(boundary))?;
            let key = layout.graph.lock(door, key_room)?;
            trace!(
                "Key {} in room {} locks door {} into room {}",
                key,
                key_room,
                door,
                boundary
            );

            protect = key_room;
        }

        Ok(exit)
    }

    /// Normalizes, rasterizes and classifies the finished layout.
    fn finish(&self, layout: Layout, exit: RoomId) -> Dungeon {
        let Layout { mut graph, bounds, .. } = layout;
        graph.normalize(bounds.origin());

        let (width, height) = (bounds.width(), bounds.height());
        let grid = rasterize(graph.rooms(), width, height);
        let (mut rooms, doors, keys) = graph.into_parts();
        let deadends = classify_rooms(&mut rooms);

        Dungeon {
            size: Size { width, height },
            terminals: Terminals {
                entrance: 0,
                exit,
                deadends,
            },
            rooms: rooms.into_iter().map(Room::from).collect(),
            doors,
            keys,
            grid,
        }
    }
}

/// Ascends from `start` to the highest ancestor whose subtree still fits the lock
/// threshold of `room_total / (key_count + 1)` rooms.
///
/// Never returns the entrance: the climb stops at a child of the root.
fn find_lock_boundary(
    graph: &RoomGraph,
    start: RoomId,
    room_total: usize,
    key_count: usize,
) -> GridKeysResult<RoomId> {
    let fits = |size: usize| size * (key_count + 1) <= room_total;

    let mut boundary = start;
    while let Some(parent) = graph.room(boundary)?.parent {
        let parent_node = graph.room(parent)?;
        if parent_node.parent.is_none() || !fits(parent_node.subtree_size()) {
            break;
        }
        boundary = parent;
    }
    Ok(boundary)
}

/// Takes the subtree rooted at `boundary` out of the lock pool and out of its
/// ancestors' descendant counts.
fn gate_subtree(layout: &mut Layout, boundary: RoomId) -> GridKeysResult<()> {
    for id in layout.graph.subtree(boundary) {
        let distance = layout.graph.room(id)?.distance;
        layout.pool.remove(id, distance);
    }
    layout.graph.detach_subtree(boundary)?;
    Ok(())
}

impl Generator<Dungeon> for GridKeysGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> GridKeysResult<Dungeon> {
        let config = config.clamped();

        let mut layout = Layout::new(self.seed_position);
        self.grow(&mut layout, &config, rng)?;
        let exit = self.place_locks(&mut layout, &config)?;
        let dungeon = self.finish(layout, exit);

        debug!(
            "Generated {}x{} dungeon: {} rooms, {} doors, {} keys, exit {}",
            dungeon.size.width,
            dungeon.size.height,
            dungeon.rooms.len(),
            dungeon.doors.len(),
            dungeon.keys.len(),
            exit
        );

        if self.ensure_solvable {
            self.validate(&dungeon, &config)?;
        }

        Ok(dungeon)
    }

    fn validate(&self, dungeon: &Dungeon, config: &GenerationConfig) -> GridKeysResult<()> {
        verify_dungeon(dungeon, config)
    }

    fn generator_type(&self) -> &'static str {
        "GridKeysGenerator"
    }
}

impl Default for GridKeysGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config, solve};
    use rand::SeedableRng;

    /// Straight corridor of `len` rooms running east from the origin.
    fn corridor(len: usize) -> Layout {
        let mut layout = Layout::new(Position::origin());
        for parent in 0..len - 1 {
            layout.add_room(parent, Direction::East).unwrap();
        }
        layout
    }

    #[test]
    fn test_generator_creation() {
        let generator = GridKeysGenerator::new();
        assert_eq!(generator.seed_position, config::GRID_SEED);
        assert!(generator.ensure_solvable);
        assert_eq!(generator.generator_type(), "GridKeysGenerator");
    }

    #[test]
    fn test_layout_add_room_updates_indices() {
        let mut layout = Layout::new(Position::origin());
        let north = layout.add_room(0, Direction::North).unwrap();
        let east = layout.add_room(north, Direction::East).unwrap();

        assert_eq!(layout.bounds.north, -1);
        assert_eq!(layout.bounds.east, 1);
        assert_eq!(layout.frontier.lookup(Direction::North, 0), Some(north));
        assert_eq!(layout.frontier.lookup(Direction::East, -1), Some(east));
        assert_eq!(layout.pool.len(), 2);
        assert_eq!(layout.pool.max_distance(), 2);
        assert_eq!(layout.graph.rooms()[0].descendants, 2);
    }

    #[test]
    fn test_boundary_stays_single_room_under_tight_threshold() {
        let layout = corridor(5);
        // 5 rooms, 2 keys: a gate may hold at most 5 / 3 rooms
        assert_eq!(find_lock_boundary(&layout.graph, 4, 5, 2).unwrap(), 4);
    }

    #[test]
    fn test_boundary_climbs_to_highest_fitting_ancestor() {
        let layout = corridor(7);
        // 7 rooms, 1 key: subtrees of up to 3 rooms fit, so 4-5-6 is gated
        assert_eq!(find_lock_boundary(&layout.graph, 6, 7, 1).unwrap(), 4);
    }

    #[test]
    fn test_boundary_never_reaches_entrance() {
        let layout = corridor(5);
        assert_eq!(find_lock_boundary(&layout.graph, 4, 5, 0).unwrap(), 1);
    }

    #[test]
    fn test_place_locks_on_corridor() {
        let generator = GridKeysGenerator::for_testing();
        let mut layout = corridor(5);
        let config = GenerationConfig::new(5, 2);

        let exit = generator.place_locks(&mut layout, &config).unwrap();
        assert_eq!(exit, 4);

        let keys = layout.graph.keys();
        assert_eq!(keys.len(), 2);
        assert_eq!((keys[0].room, keys[0].door), (3, 3));
        assert_eq!((keys[1].room, keys[1].door), (2, 2));
        assert!(layout.graph.doors()[3].exit);
    }

    #[test]
    fn test_place_locks_gates_whole_subtree() {
        let generator = GridKeysGenerator::for_testing();
        let mut layout = corridor(7);
        let config = GenerationConfig::new(7, 1);

        let exit = generator.place_locks(&mut layout, &config).unwrap();
        assert_eq!(exit, 6);

        let keys = layout.graph.keys();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].door, 3);
        assert_eq!(keys[0].room, 3);
        // Rooms 4..=6 were taken out of the root's count
        assert_eq!(layout.graph.rooms()[0].descendants, 3);
        assert!(layout.pool.len() < 6);
    }

    #[test]
    fn test_place_locks_stops_when_pool_runs_dry() {
        let generator = GridKeysGenerator::for_testing();
        let mut layout = corridor(3);
        let mut config = GenerationConfig::new(3, 1);
        config.key_count = 5; // Past the clamp, more locks than rooms can hold

        let exit = generator.place_locks(&mut layout, &config).unwrap();
        assert_eq!(exit, 2);

        let keys = layout.graph.keys().to_vec();
        assert_eq!(keys.len(), 1);
        assert_eq!((keys[0].room, keys[0].door), (1, 1));

        let dungeon = generator.finish(layout, exit);
        let report = solve(&dungeon);
        assert!(report.is_complete(&dungeon));
        assert_eq!(report.key_order, vec![0]);
    }

    #[test]
    fn test_frontier_miss_exhausts_retries() {
        let generator = GridKeysGenerator::for_testing();
        let mut layout = Layout::new(Position::origin());
        // Only row 0 and column 0 are occupied inside a huge span
        layout.bounds.stretch(Position::new(1_000_000, 1_000_000));
        let mut rng = StdRng::seed_from_u64(7);

        let result = generator.choose_parent(&layout, 3, &mut rng);
        assert!(matches!(
            result,
            Err(GridKeysError::FrontierExhausted { attempts: 3 })
        ));
    }

    #[test]
    fn test_generation_two_rooms() {
        let generator = GridKeysGenerator::for_testing();
        let dungeon = generator
            .generate_seeded(&GenerationConfig::new(2, 0).with_seed(1))
            .unwrap();

        assert_eq!(dungeon.rooms.len(), 2);
        assert_eq!(dungeon.doors.len(), 1);
        assert!(dungeon.keys.is_empty());
        assert_eq!(dungeon.terminals.entrance, 0);
        assert_eq!(dungeon.terminals.exit, 1);
        assert_eq!(dungeon.terminals.deadends, vec![0, 1]);
        assert_eq!(dungeon.size.width * dungeon.size.height, 2);
    }

    #[test]
    fn test_generation_is_reproducible() {
        let generator = GridKeysGenerator::new();
        let config = GenerationConfig::new(40, 4).with_seed(9001);
        let a = generator.generate_seeded(&config).unwrap();
        let b = generator.generate_seeded(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_position_does_not_change_output() {
        let config = GenerationConfig::new(30, 3).with_seed(77);
        let a = GridKeysGenerator::new().generate_seeded(&config).unwrap();
        let b = GridKeysGenerator::for_testing().generate_seeded(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_clamps_hand_edited_config() {
        let generator = GridKeysGenerator::for_testing();
        let mut config = GenerationConfig::for_testing(3);
        config.room_count = 4;
        config.key_count = 50;

        let dungeon = generator.generate_seeded(&config).unwrap();
        assert_eq!(dungeon.rooms.len(), 4);
        assert_eq!(dungeon.keys.len(), 2);
    }

    #[test]
    fn test_validate_generated_dungeon() {
        let generator = GridKeysGenerator::for_testing();
        let config = GenerationConfig::for_testing(12345);
        let dungeon = generator.generate_seeded(&config).unwrap();
        assert!(generator.validate(&dungeon, &config).is_ok());

        let mut broken = dungeon.clone();
        broken.rooms[0].entrance = false;
        assert!(generator.validate(&broken, &config).is_err());
    }
}
