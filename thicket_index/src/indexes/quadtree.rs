// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-bounds quadtree with lazy subdivision.
//!
//! The world bounds are set at construction and never grow. Leaves split into
//! four quadrants only when they overflow; an entry that fits no quadrant is
//! kept at the deepest node that spans it, so placement always succeeds for
//! in-bounds entries. Removal collapses empty quadrant quartets back into
//! their parent.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::index::{QueryKind, SpatialId, SpatialIndex};
use crate::slab::{NIL, Slab};
use crate::types::{Bounds2D, Scalar};

/// Entries a node may hold before it subdivides.
const NODE_CAPACITY: usize = 16;

struct Entry<T, H> {
    handle: H,
    bounds: Bounds2D<T>,
    node: u32,
}

struct Node<T> {
    bounds: Bounds2D<T>,
    parent: u32,
    /// Quadrant nodes, `NIL` while this node is a leaf.
    children: [u32; 4],
    /// Entries stored directly at this node. For a branch these are the
    /// overflow entries that fit in no quadrant.
    entries: Vec<u32>,
}

impl<T> Node<T> {
    fn leaf(bounds: Bounds2D<T>, parent: u32) -> Self {
        Self {
            bounds,
            parent,
            children: [NIL; 4],
            entries: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children[0] == NIL
    }
}

/// Quadtree over fixed world bounds.
///
/// Every stored entry must lie within the bounds passed to [`Quadtree::new`];
/// inserting outside them is a contract violation caught by a debug
/// assertion. Release builds keep the structure consistent by storing such an
/// entry at the root, but queries are not guaranteed to reach it.
pub struct Quadtree<T: Scalar, H: Copy + Debug> {
    bounds: Bounds2D<T>,
    nodes: Slab<Node<T>>,
    entries: Slab<Entry<T, H>>,
    root: u32,
}

impl<T: Scalar, H: Copy + Debug> Quadtree<T, H> {
    /// Create an empty quadtree spanning `bounds`.
    pub fn new(bounds: Bounds2D<T>) -> Self {
        let mut nodes = Slab::new();
        let root = nodes.allocate(Node::leaf(bounds, NIL));
        Self {
            bounds,
            nodes,
            entries: Slab::new(),
            root,
        }
    }

    /// The world bounds supplied at construction.
    pub fn bounds(&self) -> Bounds2D<T> {
        self.bounds
    }

    /// Store `bounds` under a fresh id, carrying `handle` for the caller.
    ///
    /// `bounds` must lie within [`Quadtree::bounds`].
    pub fn insert(&mut self, handle: H, bounds: Bounds2D<T>) -> SpatialId {
        let entry = self.entries.allocate(Entry {
            handle,
            bounds,
            node: NIL,
        });
        self.place(entry);
        SpatialId::new(entry)
    }

    /// Replace the bounds of a live entry, re-placing it from the root.
    pub fn modify(&mut self, id: SpatialId, bounds: Bounds2D<T>) {
        let entry = id.slot();
        let node_idx = self.detach(entry);
        self.entries[entry].bounds = bounds;
        if self.nodes[node_idx].entries.is_empty() {
            self.sanitize(node_idx);
        }
        self.place(entry);
    }

    /// Remove a live entry.
    pub fn remove(&mut self, id: SpatialId) {
        let entry = id.slot();
        let node_idx = self.detach(entry);
        self.entries.dispose(entry);
        if self.nodes[node_idx].entries.is_empty() {
            self.sanitize(node_idx);
        }
    }

    /// Visit every entry matching `kind` against `bounds`; returns the count.
    pub fn query<F: FnMut(H)>(
        &self,
        bounds: Bounds2D<T>,
        kind: QueryKind,
        mut visit: F,
    ) -> usize {
        self.query_node(self.root, &bounds, kind, &mut visit)
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

    /// Drop every entry and collapse back to a single empty leaf.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.nodes.clear();
        self.root = self.nodes.allocate(Node::leaf(self.bounds, NIL));
    }

    fn place(&mut self, entry: u32) {
        debug_assert!(
            self.bounds.contains(&self.entries[entry].bounds),
            "entry bounds must lie within the tree bounds"
        );
        if !self.try_insert(self.root, entry) {
            self.store_at(self.root, entry);
        }
    }

    /// Recursive placement. Fails only when this node's bounds do not span
    /// the entry; the caller then tries a sibling or keeps the entry itself.
    fn try_insert(&mut self, node_idx: u32, entry: u32) -> bool {
        let entry_bounds = self.entries[entry].bounds;
        if !self.nodes[node_idx].bounds.contains(&entry_bounds) {
            return false;
        }
        if self.nodes[node_idx].is_leaf() {
            if self.nodes[node_idx].entries.len() < NODE_CAPACITY {
                self.store_at(node_idx, entry);
                return true;
            }
            self.subdivide(node_idx);
            // Redistribution may have opened room at this node.
            if self.nodes[node_idx].entries.len() < NODE_CAPACITY {
                self.store_at(node_idx, entry);
                return true;
            }
        }
        let children = self.nodes[node_idx].children;
        for child in children {
            if self.try_insert(child, entry) {
                return true;
            }
        }
        // No quadrant spans the bounds; keep the entry here.
        self.store_at(node_idx, entry);
        self.sanitize(node_idx);
        true
    }

    fn store_at(&mut self, node_idx: u32, entry: u32) {
        self.nodes[node_idx].entries.push(entry);
        self.entries[entry].node = node_idx;
    }

    fn detach(&mut self, entry: u32) -> u32 {
        let node_idx = self.entries[entry].node;
        let node = &mut self.nodes[node_idx];
        let pos = node
            .entries
            .iter()
            .position(|&e| e == entry)
            .expect("entry is registered with its node");
        node.entries.swap_remove(pos);
        node_idx
    }

    /// Split a leaf into four quadrants (upper-left, upper-right, lower-right,
    /// lower-left) and re-home every entry that fits entirely inside one.
    fn subdivide(&mut self, node_idx: u32) {
        let b = self.nodes[node_idx].bounds;
        let cx = T::mid(b.min_x, b.max_x);
        let cy = T::mid(b.min_y, b.max_y);
        let quadrants = [
            Bounds2D::new(b.min_x, b.min_y, cx, cy),
            Bounds2D::new(cx, b.min_y, b.max_x, cy),
            Bounds2D::new(cx, cy, b.max_x, b.max_y),
            Bounds2D::new(b.min_x, cy, cx, b.max_y),
        ];
        let mut children = [NIL; 4];
        for (slot, quadrant) in children.iter_mut().zip(quadrants) {
            *slot = self.nodes.allocate(Node::leaf(quadrant, node_idx));
        }
        self.nodes[node_idx].children = children;

        let moved = core::mem::take(&mut self.nodes[node_idx].entries);
        let mut staying = Vec::new();
        for entry in moved {
            let entry_bounds = self.entries[entry].bounds;
            let child = children
                .iter()
                .copied()
                .find(|&c| self.nodes[c].bounds.contains(&entry_bounds));
            match child {
                Some(child) => {
                    self.nodes[child].entries.push(entry);
                    self.entries[entry].node = child;
                }
                None => staying.push(entry),
            }
        }
        self.nodes[node_idx].entries = staying;
    }

    /// Climb from `start`, turning any branch whose four quadrants are all
    /// empty leaves back into a leaf. Stops at the first node that still
    /// holds entries or a live subtree, or at the root.
    fn sanitize(&mut self, start: u32) {
        let mut node_idx = start;
        loop {
            if !self.nodes[node_idx].is_leaf() {
                let children = self.nodes[node_idx].children;
                let all_vacant = children.iter().all(|&c| {
                    let child = &self.nodes[c];
                    child.is_leaf() && child.entries.is_empty()
                });
                if all_vacant {
                    for child in children {
                        self.nodes.dispose(child);
                    }
                    self.nodes[node_idx].children = [NIL; 4];
                }
            }
            let node = &self.nodes[node_idx];
            if node_idx == self.root || !node.is_leaf() || !node.entries.is_empty() {
                break;
            }
            node_idx = node.parent;
        }
    }

    fn query_node<F: FnMut(H)>(
        &self,
        node_idx: u32,
        bounds: &Bounds2D<T>,
        kind: QueryKind,
        visit: &mut F,
    ) -> usize {
        let node = &self.nodes[node_idx];
        if !node.bounds.intersects(bounds) {
            return 0;
        }
        let mut found = 0;
        for &entry in &node.entries {
            let entry = &self.entries[entry];
            if kind.matches(bounds, &entry.bounds) {
                visit(entry.handle);
                found += 1;
            }
        }
        if !node.is_leaf() {
            for &child in &node.children {
                found += self.query_node(child, bounds, kind, visit);
            }
        }
        found
    }
}

impl<T: Scalar, H: Copy + Debug> Debug for Quadtree<T, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Quadtree")
            .field("bounds", &self.bounds)
            .field("nodes", &self.nodes.allocated())
            .field("alive", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, H: Copy + Debug> SpatialIndex<T, H> for Quadtree<T, H> {
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
