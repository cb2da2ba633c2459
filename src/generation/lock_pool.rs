//! # Lock Pool
//!
//! Rooms still eligible to become a lock boundary or hold a key, bucketed by their
//! distance from the entrance. Works like a bucket priority queue keyed on distance
//! with a pointer to the deepest bucket.

use crate::RoomId;
use std::collections::{BTreeMap, BTreeSet};

/// Distance-bucketed set of eligible rooms.
#[derive(Debug, Clone, Default)]
pub struct LockPool {
    buckets: BTreeMap<u32, BTreeSet<RoomId>>,
    max_distance: u32,
    len: usize,
}

impl LockPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `room` to the bucket for `distance`.
    pub fn register(&mut self, room: RoomId, distance: u32) {
        if self.buckets.entry(distance).or_default().insert(room) {
            self.len += 1;
        }
        self.max_distance = self.max_distance.max(distance);
    }

    /// Removes `room` from the bucket for `distance`. Returns false if it was not there.
    pub fn remove(&mut self, room: RoomId, distance: u32) -> bool {
        let removed = self
            .buckets
            .get_mut(&distance)
            .is_some_and(|bucket| bucket.remove(&room));
        if removed {
            self.len -= 1;
        }
        removed
    }

    #[cfg(test)]
    pub fn contains(&self, room: RoomId, distance: u32) -> bool {
        self.buckets
            .get(&distance)
            .is_some_and(|bucket| bucket.contains(&room))
    }

    /// Removes and returns a room from the deepest non-empty bucket.
    ///
    /// Within a bucket the lowest room id is taken. Empty buckets above the new
    /// maximum are skipped by lowering the pointer.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridkeys::LockPool;
    ///
    /// let mut pool = LockPool::new();
    /// pool.register(1, 1);
    /// pool.register(2, 2);
    /// pool.register(3, 2);
    ///
    /// assert_eq!(pool.pop_deepest(), Some(2));
    /// assert_eq!(pool.pop_deepest(), Some(3));
    /// assert_eq!(pool.pop_deepest(), Some(1));
    /// assert_eq!(pool.pop_deepest(), None);
    /// ```
    pub fn pop_deepest(&mut self) -> Option<RoomId> {
        loop {
            if let Some(room) = self
                .buckets
                .get_mut(&self.max_distance)
                .and_then(|bucket| bucket.pop_first())
            {
                self.len -= 1;
                return Some(room);
            }
            if self.max_distance == 0 {
                return None;
            }
            self.max_distance -= 1;
        }
    }

    /// Current deepest-bucket pointer. Buckets above it are empty.
    pub fn max_distance(&self) -> u32 {
        self.max_distance
    }

    /// Number of eligible rooms across all buckets.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
