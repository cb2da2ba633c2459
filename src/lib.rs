//! # GridKeys
//!
//! Procedural dungeon layouts made of rooms, doors and a lock-and-key chain that is
//! always completable.
//!
//! ## Architecture Overview
//!
//! Generation is a single ordered pass over a handful of small components:
//!
//! - **Growth**: rooms are appended one grid step beyond the most extreme room in a
//!   random direction, using a frontier index instead of rescanning the map
//! - **Locking**: the finished room tree is walked with a distance-bucketed pool to
//!   place one exit and a strictly nested chain of locked doors and keys
//! - **Post-processing**: coordinates are normalized, rasterized into an id grid and
//!   each room is tagged with a shape template derived from its doors
//!
//! The result is a plain [`Dungeon`] value that serializes to JSON.

pub mod dungeon;
pub mod generation;
pub mod geometry;

pub use dungeon::*;
pub use generation::*;
pub use geometry::*;

/// Index of a room in creation order. The entrance is always room 0.
pub type RoomId = usize;

/// Index of a door in creation order.
pub type DoorId = usize;

/// Index of a key in placement order.
pub type KeyId = usize;

/// Core error type for dungeon generation.
#[derive(thiserror::Error, Debug)]
pub enum GridKeysError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A door was requested between rooms that do not share an edge
    #[error("Rooms {from} and {to} are not adjacent")]
    InvalidAdjacency { from: RoomId, to: RoomId },

    /// Growth could not find a parent room within the retry ceiling
    #[error("No frontier room found after {attempts} attempts")]
    FrontierExhausted { attempts: u32 },

    /// Room id does not exist
    #[error("Invalid room {0}")]
    InvalidRoom(RoomId),

    /// Door id does not exist
    #[error("Invalid door {0}")]
    InvalidDoor(DoorId),

    /// Generated content failed validation
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the GridKeys codebase.
pub type GridKeysResult<T> = Result<T, GridKeysError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation constants.
pub mod config {
    use crate::Position;

    /// Coordinate of the entrance room before normalization
    pub const GRID_SEED: Position = Position { x: 100, y: 100 };

    /// Default number of rooms per dungeon
    pub const DEFAULT_ROOM_COUNT: usize = 100;

    /// Default number of locked doors per dungeon
    pub const DEFAULT_KEY_COUNT: usize = 5;

    /// Minimum room count (entrance and exit)
    pub const MIN_ROOM_COUNT: usize = 2;

    /// How many times growth resamples a direction when the frontier has no room
    pub const DEFAULT_FRONTIER_RETRIES: u32 = 64;
}
