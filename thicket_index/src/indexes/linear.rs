// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat index with linear scans. Small and simple; the reference oracle.

use core::fmt::Debug;

use crate::index::{QueryKind, SpatialId, SpatialIndex};
use crate::slab::Slab;
use crate::types::{Bounds2D, Scalar};

struct Entry<T, H> {
    handle: H,
    bounds: Bounds2D<T>,
}

/// Unordered flat index; every query scans all live entries.
///
/// Insert, modify, and remove are O(1); queries are O(n). There is no tree
/// structure to maintain, which makes this implementation trivially correct;
/// the test harness uses it as the ground truth for the tree kinds.
pub struct LinearIndex<T: Scalar, H: Copy + Debug> {
    entries: Slab<Entry<T, H>>,
}

impl<T: Scalar, H: Copy + Debug> LinearIndex<T, H> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            entries: Slab::new(),
        }
    }

    /// Store `bounds` under a fresh id, carrying `handle` for the caller.
    pub fn insert(&mut self, handle: H, bounds: Bounds2D<T>) -> SpatialId {
        SpatialId::new(self.entries.allocate(Entry { handle, bounds }))
    }

    /// Replace the bounds of a live entry in place.
    pub fn modify(&mut self, id: SpatialId, bounds: Bounds2D<T>) {
        self.entries[id.slot()].bounds = bounds;
    }

    /// Remove a live entry.
    pub fn remove(&mut self, id: SpatialId) {
        self.entries.dispose(id.slot());
    }

    /// Visit every entry matching `kind` against `bounds`; returns the count.
    pub fn query<F: FnMut(H)>(
        &self,
        bounds: Bounds2D<T>,
        kind: QueryKind,
        mut visit: F,
    ) -> usize {
        let mut found = 0;
        for (_, entry) in self.entries.iter() {
            if kind.matches(&bounds, &entry.bounds) {
                visit(entry.handle);
                found += 1;
            }
        }
        found
    }

    /// The handle stored under a live id.
    pub fn get(&self, id: SpatialId) -> H {
        self.entries[id.slot()].handle
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.allocated()
    }

    /// True if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Scalar, H: Copy + Debug> Default for LinearIndex<T, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, H: Copy + Debug> Debug for LinearIndex<T, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LinearIndex")
            .field("alive", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, H: Copy + Debug> SpatialIndex<T, H> for LinearIndex<T, H> {
    fn insert(&mut self, handle: H, bounds: Bounds2D<T>) -> SpatialId {
        Self::insert(self, handle, bounds)
    }

    fn modify(&mut self, id: SpatialId, bounds: Bounds2D<T>) {
        Self::modify(self, id, bounds);
    }

    fn remove(&mut self, id: SpatialId) {
        Self::remove(self, id);
    }

    fn query(&self, bounds: Bounds2D<T>, kind: QueryKind, visit: &mut dyn FnMut(H)) -> usize {
        Self::query(self, bounds, kind, visit)
    }

    fn get(&self, id: SpatialId) -> H {
        Self::get(self, id)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn insert_query_kinds() {
        let mut idx: LinearIndex<i64, u32> = LinearIndex::new();
        idx.insert(1, Bounds2D::new(0, 0, 10, 10));
        idx.insert(2, Bounds2D::new(5, 5, 15, 15));

        let mut hits: Vec<u32> = Vec::new();
        let n = idx.query(Bounds2D::new(0, 0, 12, 12), QueryKind::Contain, |h| {
            hits.push(h);
        });
        assert_eq!(n, 1);
        assert_eq!(hits, [1]);

        let n = idx.query(Bounds2D::new(9, 9, 12, 12), QueryKind::Intersect, |h| {
            hits.push(h);
        });
        assert_eq!(n, 2);
    }

    #[test]
    fn modify_and_remove() {
        let mut idx: LinearIndex<f64, u8> = LinearIndex::new();
        let a = idx.insert(1, Bounds2D::new(0.0, 0.0, 1.0, 1.0));
        let b = idx.insert(2, Bounds2D::new(2.0, 2.0, 3.0, 3.0));
        idx.modify(a, Bounds2D::new(10.0, 10.0, 11.0, 11.0));
        assert_eq!(
            idx.query(Bounds2D::new(0.0, 0.0, 5.0, 5.0), QueryKind::Intersect, |_| {}),
            1
        );
        idx.remove(b);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.get(a), 1);
    }

    #[test]
    fn slots_are_reused_after_remove() {
        let mut idx: LinearIndex<i64, u32> = LinearIndex::new();
        let a = idx.insert(1, Bounds2D::new(0, 0, 1, 1));
        idx.remove(a);
        let b = idx.insert(2, Bounds2D::new(0, 0, 1, 1));
        // Same physical slot, fresh entry.
        assert_eq!(a, b);
        assert_eq!(idx.get(b), 2);
        assert_eq!(idx.len(), 1);
    }
}
