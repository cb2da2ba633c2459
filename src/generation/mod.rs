//! # Generation Module
//!
//! Procedural generation of grid-keys dungeons.
//!
//! This module provides the components the generator is assembled from: bounds and
//! frontier tracking for growth, the room/door/key graph, the distance-bucketed lock
//! pool, and the read-only post-processing passes (rasterizer, classifier, solver).

pub mod bounds;
pub mod classify;
pub mod frontier;
pub mod graph;
pub mod grid;
pub mod grid_keys;
pub mod lock_pool;
pub mod solve;

pub use bounds::*;
pub use classify::*;
pub use frontier::*;
pub use graph::*;
pub use grid::*;
pub use grid_keys::*;
pub use lock_pool::*;
pub use solve::*;

use crate::{config, GridKeysResult};
use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for dungeon generation.
///
/// Out-of-range counts are never an error: they are clamped to the nearest valid
/// value and reported as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Total number of rooms, entrance and exit included
    pub room_count: usize,
    /// Number of locked doors (and keys)
    pub key_count: usize,
    /// Attempts growth makes to find a parent before giving up on a room
    pub max_frontier_retries: u32,
}

impl GenerationConfig {
    /// Creates a configuration for `room_count` rooms and `key_count` locks.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridkeys::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(5, 10);
    /// assert_eq!(config.room_count, 5);
    /// assert_eq!(config.key_count, 3);
    /// ```
    pub fn new(room_count: usize, key_count: usize) -> Self {
        Self {
            seed: 42,
            room_count,
            key_count,
            max_frontier_retries: config::DEFAULT_FRONTIER_RETRIES,
        }
        .clamped()
    }

    /// Replaces the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Creates a configuration for testing with small, quick dungeons.
    pub fn for_testing(seed: u64) -> Self {
        Self::new(12, 3).with_seed(seed)
    }

    /// Returns a copy with every field inside its valid range.
    pub fn clamped(&self) -> Self {
        let mut fixed = self.clone();

        if fixed.room_count < config::MIN_ROOM_COUNT {
            warn!(
                "Room count {} needs to be at least {} (entrance and exit), using {}",
                fixed.room_count,
                config::MIN_ROOM_COUNT,
                config::MIN_ROOM_COUNT
            );
            fixed.room_count = config::MIN_ROOM_COUNT;
        }

        let max_keys = fixed.room_count - config::MIN_ROOM_COUNT;
        if fixed.key_count > max_keys {
            warn!(
                "Key count {} exceeds room count {} minus entrance and exit, using {}",
                fixed.key_count, fixed.room_count, max_keys
            );
            fixed.key_count = max_keys;
        }

        if fixed.max_frontier_retries == 0 {
            warn!("Frontier retry ceiling must be at least 1");
            fixed.max_frontier_retries = 1;
        }

        fixed
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(config::DEFAULT_ROOM_COUNT, config::DEFAULT_KEY_COUNT)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> GridKeysResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> GridKeysResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}
