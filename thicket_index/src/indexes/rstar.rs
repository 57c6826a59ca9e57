// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Revised R*-tree.
//!
//! Placement follows the revised variant: a covering-member shortcut, then an
//! overlap-enlargement search over the members ranked by half-perimeter
//! growth. Overflowing nodes split along the axis with the least total
//! margin, at the index scoring best under an asymmetry-aware weighting of
//! overlap. Underfull nodes are detached whole on removal and their entries
//! reinserted from scratch; there is no insertion-time forced reinsertion.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;
use smallvec::SmallVec;

use crate::index::{QueryKind, SpatialId, SpatialIndex};
use crate::slab::{NIL, Slab};
use crate::types::{
    Bounds2D, Scalar, extent_length, intersection_extent_length, intersection_volume, lt, volume,
};

/// Fewest members a non-root node may hold.
const MIN_FANOUT: usize = 4;
/// Most members a node may hold; one more forces a split.
const MAX_FANOUT: usize = 16;
/// Spread parameter of the split-index weighting function.
const SPLIT_WEIGHT_SPREAD: f64 = 0.5;

#[cfg(feature = "std")]
#[inline]
fn exp(x: f64) -> f64 {
    x.exp()
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
#[inline]
fn exp(x: f64) -> f64 {
    libm::exp(x)
}

type Members<T> = SmallVec<[Member<T>; MAX_FANOUT + 1]>;

/// One slot of a node: an entry for leaves, a child node for branches. The
/// bounds are cached here so placement and split scans stay in one buffer;
/// they are kept in sync whenever the referenced entry or child changes.
#[derive(Copy, Clone)]
struct Member<T> {
    bounds: Bounds2D<T>,
    index: u32,
}

struct Node<T> {
    bounds: Bounds2D<T>,
    parent: u32,
    leaf: bool,
    members: Members<T>,
}

struct Entry<T, H> {
    handle: H,
    bounds: Bounds2D<T>,
    node: u32,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum SortOrder {
    /// Ascending by (min, max) coordinate along the axis.
    Lower,
    /// Descending by (max, min) coordinate along the axis.
    Upper,
}

#[inline]
fn axis_min<T: Copy>(b: &Bounds2D<T>, axis: usize) -> T {
    if axis == 0 { b.min_x } else { b.min_y }
}

#[inline]
fn axis_max<T: Copy>(b: &Bounds2D<T>, axis: usize) -> T {
    if axis == 0 { b.max_x } else { b.max_y }
}

#[inline]
fn axis_center<T: Scalar>(b: &Bounds2D<T>, axis: usize) -> T {
    T::mid(axis_min(b, axis), axis_max(b, axis))
}

fn sort_members<T: Scalar>(members: &mut [Member<T>], axis: usize, order: SortOrder) {
    members.sort_by(|a, b| {
        let ord = match order {
            SortOrder::Lower => {
                let ka = (axis_min(&a.bounds, axis), axis_max(&a.bounds, axis));
                let kb = (axis_min(&b.bounds, axis), axis_max(&b.bounds, axis));
                ka.partial_cmp(&kb)
            }
            SortOrder::Upper => {
                let ka = (axis_max(&a.bounds, axis), axis_min(&a.bounds, axis));
                let kb = (axis_max(&b.bounds, axis), axis_min(&b.bounds, axis));
                kb.partial_cmp(&ka)
            }
        };
        ord.unwrap_or(Ordering::Equal)
    });
}

/// Running unions of `members[..=i]`, for O(1) split-candidate evaluation.
fn prefix_unions<T: Scalar>(members: &[Member<T>]) -> Vec<Bounds2D<T>> {
    let mut out: Vec<Bounds2D<T>> = Vec::with_capacity(members.len());
    for m in members {
        let b = match out.last() {
            Some(prev) => prev.union(&m.bounds),
            None => m.bounds,
        };
        out.push(b);
    }
    out
}

/// Running unions of `members[i..]`.
fn suffix_unions<T: Scalar>(members: &[Member<T>]) -> Vec<Bounds2D<T>> {
    let mut out: Vec<Bounds2D<T>> = Vec::with_capacity(members.len());
    for m in members.iter().rev() {
        let b = match out.last() {
            Some(prev) => prev.union(&m.bounds),
            None => m.bounds,
        };
        out.push(b);
    }
    out.reverse();
    out
}

fn members_union<T: Scalar>(members: &[Member<T>]) -> Bounds2D<T> {
    let mut it = members.iter();
    let first = it.next().expect("live nodes hold at least one member");
    it.fold(first.bounds, |acc, m| acc.union(&m.bounds))
}

/// Gaussian-shaped preference over split indices, normalized to stay
/// positive across the legal range. `asym` shifts the preferred split away
/// from the center toward the side the node leans to within its parent.
fn split_weight(k: usize, count: usize, asym: f64) -> f64 {
    let m = MIN_FANOUT as f64;
    let span = count as f64;
    let mu = (1.0 - 2.0 * m / span) * asym;
    let sigma = SPLIT_WEIGHT_SPREAD * (1.0 + mu.abs());
    let xi = 2.0 * (k as f64) / span - 1.0;
    let y1 = exp(-1.0 / (SPLIT_WEIGHT_SPREAD * SPLIT_WEIGHT_SPREAD));
    let ys = 1.0 / (1.0 - y1);
    let z = (xi - mu) / sigma;
    ys * (exp(-z * z) - y1)
}

/// R*-tree over arbitrary coordinates.
///
/// No world bounds are required up front. Nodes hold between 4 and 16
/// members (the root excepted); `modify` always re-places the entry through a
/// fresh subtree choice.
pub struct RStarTree<T: Scalar, H: Copy + Debug> {
    nodes: Slab<Node<T>>,
    entries: Slab<Entry<T, H>>,
    root: u32,
}

impl<T: Scalar, H: Copy + Debug> RStarTree<T, H> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            entries: Slab::new(),
            root: NIL,
        }
    }

    /// Store `bounds` under a fresh id, carrying `handle` for the caller.
    pub fn insert(&mut self, handle: H, bounds: Bounds2D<T>) -> SpatialId {
        let entry = self.entries.allocate(Entry {
            handle,
            bounds,
            node: NIL,
        });
        self.insert_entry(entry);
        SpatialId::new(entry)
    }

    /// Replace the bounds of a live entry and re-place it from the root.
    pub fn modify(&mut self, id: SpatialId, bounds: Bounds2D<T>) {
        let entry = id.slot();
        let leaf = self.entries[entry].node;
        Self::remove_member(&mut self.nodes[leaf].members, entry);
        self.entries[entry].bounds = bounds;
        self.entries[entry].node = NIL;
        self.condense(leaf);
        self.insert_entry(entry);
    }

    /// Remove a live entry.
    pub fn remove(&mut self, id: SpatialId) {
        let entry = id.slot();
        let leaf = self.entries[entry].node;
        Self::remove_member(&mut self.nodes[leaf].members, entry);
        self.entries.dispose(entry);
        self.condense(leaf);
    }

    /// Visit every entry matching `kind` against `bounds`; returns the count.
    pub fn query<F: FnMut(H)>(
        &self,
        bounds: Bounds2D<T>,
        kind: QueryKind,
        mut visit: F,
    ) -> usize {
        if self.root == NIL {
            return 0;
        }
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

    /// Drop every entry and node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.entries.clear();
        self.root = NIL;
    }

    fn insert_entry(&mut self, entry: u32) {
        let bounds = self.entries[entry].bounds;
        if self.root == NIL {
            self.root = self.nodes.allocate(Node {
                bounds,
                parent: NIL,
                leaf: true,
                members: SmallVec::new(),
            });
        }
        let leaf = self.choose_subtree(&bounds);
        self.entries[entry].node = leaf;
        self.nodes[leaf].members.push(Member {
            bounds,
            index: entry,
        });
        if self.nodes[leaf].members.len() > MAX_FANOUT {
            self.split(leaf);
        } else {
            self.refresh_upward(leaf);
        }
    }

    fn choose_subtree(&self, bounds: &Bounds2D<T>) -> u32 {
        let mut node = self.root;
        while !self.nodes[node].leaf {
            let pick = Self::choose_member(&self.nodes[node].members, bounds);
            node = self.nodes[node].members[pick].index;
        }
        node
    }

    /// Pick the member of a branch that should absorb `bounds`.
    fn choose_member(members: &Members<T>, bounds: &Bounds2D<T>) -> usize {
        debug_assert!(!members.is_empty(), "branch nodes always hold members");
        if let Some(best) = Self::covering_member(members, bounds) {
            return best;
        }

        // Rank members by the half-perimeter growth needed to absorb the
        // bounds.
        let mut order: Vec<usize> = (0..members.len()).collect();
        order.sort_by(|&a, &b| {
            let da = Self::extent_enlargement(&members[a].bounds, bounds);
            let db = Self::extent_enlargement(&members[b].bounds, bounds);
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        });

        // p: the last candidate whose overlap with the front-runner would
        // grow if the front-runner absorbed the bounds. Unaffected tails are
        // never worth evaluating.
        let first_extended = members[order[0]].bounds.union(bounds);
        let mut p = 0_usize;
        for (i, &cand) in order.iter().enumerate().skip(1) {
            let delta = intersection_extent_length(&first_extended, &members[cand].bounds)
                - intersection_extent_length(&members[order[0]].bounds, &members[cand].bounds);
            if lt(T::acc_zero(), delta) {
                p = i;
            }
        }
        if p == 0 {
            return order[0];
        }

        // Overlap enlargement across the first p + 1 candidates. Degenerate
        // (zero-volume) extensions fall back to half-perimeter overlap.
        let candidates = &order[..=p];
        let use_volume = candidates
            .iter()
            .all(|&cand| lt(T::acc_zero(), volume(&members[cand].bounds.union(bounds))));

        let mut visited = vec![false; candidates.len()];
        let mut sums: Vec<Option<T::Acc>> = vec![None; candidates.len()];
        if let Some(winner) = Self::check_overlap(
            members, bounds, candidates, use_volume, 0, &mut visited, &mut sums,
        ) {
            return candidates[winner];
        }

        // No candidate is overlap-free; take the least total overlap growth.
        let mut best = 0_usize;
        let mut best_sum: Option<T::Acc> = None;
        for (i, sum) in sums.iter().enumerate() {
            if let Some(sum) = sum {
                if best_sum.map(|b| lt(*sum, b)).unwrap_or(true) {
                    best_sum = Some(*sum);
                    best = i;
                }
            }
        }
        candidates[best]
    }

    fn covering_member(members: &Members<T>, bounds: &Bounds2D<T>) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, m) in members.iter().enumerate() {
            if !m.bounds.contains(bounds) {
                continue;
            }
            let better = match best {
                None => true,
                Some(b) => {
                    let vi = volume(&m.bounds);
                    let vb = volume(&members[b].bounds);
                    if lt(vi, vb) {
                        true
                    } else if lt(vb, vi) {
                        false
                    } else {
                        lt(
                            extent_length(&m.bounds),
                            extent_length(&members[b].bounds),
                        )
                    }
                }
            };
            if better {
                best = Some(i);
            }
        }
        best
    }

    fn extent_enlargement(member: &Bounds2D<T>, bounds: &Bounds2D<T>) -> T::Acc {
        extent_length(&member.union(bounds)) - extent_length(member)
    }

    /// Depth-first overlap evaluation over `candidates` (member positions in
    /// enlargement order). Returns the first candidate whose extension
    /// induces no overlap growth at all; otherwise records the accumulated
    /// growth of every candidate reached.
    fn check_overlap(
        members: &Members<T>,
        bounds: &Bounds2D<T>,
        candidates: &[usize],
        use_volume: bool,
        t: usize,
        visited: &mut [bool],
        sums: &mut [Option<T::Acc>],
    ) -> Option<usize> {
        visited[t] = true;
        let original = members[candidates[t]].bounds;
        let extended = original.union(bounds);
        let mut sum = T::acc_zero();
        for j in 0..candidates.len() {
            if j == t {
                continue;
            }
            let other = &members[candidates[j]].bounds;
            let delta = if use_volume {
                intersection_volume(&extended, other) - intersection_volume(&original, other)
            } else {
                intersection_extent_length(&extended, other)
                    - intersection_extent_length(&original, other)
            };
            sum = sum + delta;
            if lt(T::acc_zero(), delta) && !visited[j] {
                if let Some(winner) = Self::check_overlap(
                    members, bounds, candidates, use_volume, j, visited, sums,
                ) {
                    return Some(winner);
                }
            }
        }
        sums[t] = Some(sum);
        if lt(T::acc_zero(), sum) { None } else { Some(t) }
    }

    /// Split the overflowing node and propagate overflow upward, growing a
    /// new root if the split reaches it.
    fn split(&mut self, start: u32) {
        let mut node_idx = start;
        loop {
            let sibling = self.split_node(node_idx);
            let parent = self.nodes[node_idx].parent;
            if parent == NIL {
                let left_bounds = self.nodes[node_idx].bounds;
                let right_bounds = self.nodes[sibling].bounds;
                let mut members = Members::new();
                members.push(Member {
                    bounds: left_bounds,
                    index: node_idx,
                });
                members.push(Member {
                    bounds: right_bounds,
                    index: sibling,
                });
                let root = self.nodes.allocate(Node {
                    bounds: left_bounds.union(&right_bounds),
                    parent: NIL,
                    leaf: false,
                    members,
                });
                self.nodes[node_idx].parent = root;
                self.nodes[sibling].parent = root;
                self.root = root;
                return;
            }

            let node_bounds = self.nodes[node_idx].bounds;
            let sibling_bounds = self.nodes[sibling].bounds;
            self.nodes[sibling].parent = parent;
            {
                let parent_node = &mut self.nodes[parent];
                let member = parent_node
                    .members
                    .iter_mut()
                    .find(|m| m.index == node_idx)
                    .expect("child is registered with its parent");
                member.bounds = node_bounds;
                parent_node.members.push(Member {
                    bounds: sibling_bounds,
                    index: sibling,
                });
            }
            if self.nodes[parent].members.len() > MAX_FANOUT {
                node_idx = parent;
            } else {
                self.refresh_upward(parent);
                return;
            }
        }
    }

    /// Divide an overflowing node's members into two nodes. The node keeps
    /// the left group; the returned sibling takes the right group.
    fn split_node(&mut self, node_idx: u32) -> u32 {
        let mut scratch = core::mem::take(&mut self.nodes[node_idx].members);
        let count = scratch.len();
        debug_assert!(count == MAX_FANOUT + 1, "splits happen exactly on overflow");
        let full = members_union(&scratch);

        // Axis choice: least total margin over both sort orders.
        let mut split_axis = 0_usize;
        let mut best_margin: Option<T::Acc> = None;
        for axis in 0..2 {
            let mut margin: Option<T::Acc> = None;
            for sort_order in [SortOrder::Lower, SortOrder::Upper] {
                sort_members(&mut scratch, axis, sort_order);
                let prefix = prefix_unions(&scratch);
                let suffix = suffix_unions(&scratch);
                for k in MIN_FANOUT..=(count - MIN_FANOUT) {
                    let m = extent_length(&prefix[k - 1]) + extent_length(&suffix[k]);
                    margin = Some(match margin {
                        Some(acc) => acc + m,
                        None => m,
                    });
                }
            }
            let margin = margin.expect("overflowing nodes admit split candidates");
            if best_margin.map(|b| lt(margin, b)).unwrap_or(true) {
                best_margin = Some(margin);
                split_axis = axis;
            }
        }

        // Index choice on the winning axis: weighted overlap goodness. A
        // candidate without overlap scores by its margin gain instead and
        // always beats every overlapping candidate.
        let asym = self.split_asymmetry(node_idx, &full, split_axis);
        let max_margin = {
            let e = T::acc_to_f64(extent_length(&full));
            e + e
        };
        let mut best: Option<(f64, SortOrder, usize)> = None;
        for sort_order in [SortOrder::Lower, SortOrder::Upper] {
            sort_members(&mut scratch, split_axis, sort_order);
            let prefix = prefix_unions(&scratch);
            let suffix = suffix_unions(&scratch);
            let use_volume = lt(T::acc_zero(), volume(&prefix[MIN_FANOUT - 1]))
                && lt(T::acc_zero(), volume(&suffix[count - MIN_FANOUT]));
            for k in MIN_FANOUT..=(count - MIN_FANOUT) {
                let left = &prefix[k - 1];
                let right = &suffix[k];
                let overlap = if use_volume {
                    intersection_volume(left, right)
                } else {
                    intersection_extent_length(left, right)
                };
                let weight = split_weight(k, count, asym);
                let goodness = if lt(T::acc_zero(), overlap) {
                    T::acc_to_f64(overlap) / weight
                } else {
                    let margin = T::acc_to_f64(extent_length(left) + extent_length(right));
                    (margin - max_margin) * weight
                };
                if best.map(|(b, _, _)| goodness < b).unwrap_or(true) {
                    best = Some((goodness, sort_order, k));
                }
            }
        }
        let (_, sort_order, k) = best.expect("overflowing nodes admit split candidates");

        sort_members(&mut scratch, split_axis, sort_order);
        let right: Members<T> = scratch.drain(k..).collect();
        let left = scratch;

        let leaf = self.nodes[node_idx].leaf;
        let left_bounds = members_union(&left);
        let right_bounds = members_union(&right);
        self.nodes[node_idx].members = left;
        self.nodes[node_idx].bounds = left_bounds;
        let sibling = self.nodes.allocate(Node {
            bounds: right_bounds,
            parent: NIL,
            leaf,
            members: right,
        });

        // Re-home the right half.
        let moved: Vec<u32> = self.nodes[sibling].members.iter().map(|m| m.index).collect();
        if leaf {
            for index in moved {
                self.entries[index].node = sibling;
            }
        } else {
            for index in moved {
                self.nodes[index].parent = sibling;
            }
        }
        sibling
    }

    /// Normalized offset of the splitting node's center from its parent's
    /// center along `axis`, in [-1, 1]. Zero for the root.
    fn split_asymmetry(&self, node_idx: u32, full: &Bounds2D<T>, axis: usize) -> f64 {
        let parent = self.nodes[node_idx].parent;
        if parent == NIL {
            return 0.0;
        }
        let parent_bounds = self.nodes[parent].bounds;
        let extent = T::acc_to_f64(T::widen(T::max_zero(T::sub(
            axis_max(&parent_bounds, axis),
            axis_min(&parent_bounds, axis),
        ))));
        if extent <= 0.0 {
            return 0.0;
        }
        let center = T::acc_to_f64(T::widen(axis_center(full, axis)));
        let parent_center = T::acc_to_f64(T::widen(axis_center(&parent_bounds, axis)));
        (2.0 * (center - parent_center) / extent).clamp(-1.0, 1.0)
    }

    /// Recompute bounds from members at `start` and every ancestor, keeping
    /// the cached member records on the path in sync.
    fn refresh_upward(&mut self, start: u32) {
        let mut node_idx = start;
        loop {
            let bounds = members_union(&self.nodes[node_idx].members);
            self.nodes[node_idx].bounds = bounds;
            let parent = self.nodes[node_idx].parent;
            if parent == NIL {
                break;
            }
            let member = self.nodes[parent]
                .members
                .iter_mut()
                .find(|m| m.index == node_idx)
                .expect("child is registered with its parent");
            member.bounds = bounds;
            node_idx = parent;
        }
    }

    fn remove_member(members: &mut Members<T>, index: u32) {
        let pos = members
            .iter()
            .position(|m| m.index == index)
            .expect("member is registered with its node");
        members.remove(pos);
    }

    /// Walk upward from `start`. Underfull nodes are detached whole and
    /// their descendant entries queued; the queue is reinserted from scratch
    /// once the walk completes.
    fn condense(&mut self, start: u32) {
        let mut eliminated: Vec<u32> = Vec::new();
        let mut node_idx = start;
        loop {
            let parent = self.nodes[node_idx].parent;
            if parent == NIL {
                // The root is exempt from the minimum; drop it once empty.
                if self.nodes[node_idx].members.is_empty() {
                    self.nodes.dispose(node_idx);
                    self.root = NIL;
                } else {
                    let bounds = members_union(&self.nodes[node_idx].members);
                    self.nodes[node_idx].bounds = bounds;
                }
                break;
            }
            if self.nodes[node_idx].members.len() < MIN_FANOUT {
                Self::remove_member(&mut self.nodes[parent].members, node_idx);
                self.collect_entries(node_idx, &mut eliminated);
            } else {
                let bounds = members_union(&self.nodes[node_idx].members);
                self.nodes[node_idx].bounds = bounds;
                let member = self.nodes[parent]
                    .members
                    .iter_mut()
                    .find(|m| m.index == node_idx)
                    .expect("child is registered with its parent");
                member.bounds = bounds;
            }
            node_idx = parent;
        }
        for entry in eliminated {
            self.insert_entry(entry);
        }
    }

    /// Dispose a detached subtree, queueing every entry it held.
    fn collect_entries(&mut self, node_idx: u32, out: &mut Vec<u32>) {
        let members = core::mem::take(&mut self.nodes[node_idx].members);
        let leaf = self.nodes[node_idx].leaf;
        self.nodes.dispose(node_idx);
        for m in members {
            if leaf {
                out.push(m.index);
            } else {
                self.collect_entries(m.index, out);
            }
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
        if node.leaf {
            for m in &node.members {
                if kind.matches(bounds, &m.bounds) {
                    visit(self.entries[m.index].handle);
                    found += 1;
                }
            }
        } else {
            for m in &node.members {
                if m.bounds.intersects(bounds) {
                    found += self.query_node(m.index, bounds, kind, visit);
                }
            }
        }
        found
    }
}

impl<T: Scalar, H: Copy + Debug> Default for RStarTree<T, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, H: Copy + Debug> Debug for RStarTree<T, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RStarTree")
            .field("nodes", &self.nodes.allocated())
            .field("alive", &self.len())
            .field("has_root", &(self.root != NIL))
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, H: Copy + Debug> SpatialIndex<T, H> for RStarTree<T, H> {
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
impl<T: Scalar, H: Copy + Debug> RStarTree<T, H> {
    /// Assert every structural invariant. Test-only; not part of the
    /// contract.
    fn validate(&self) {
        if self.root == NIL {
            assert_eq!(self.nodes.allocated(), 0, "empty tree holds no nodes");
            return;
        }
        assert_eq!(self.nodes[self.root].parent, NIL, "root has no parent");
        self.validate_node(self.root);
    }

    fn validate_node(&self, node_idx: u32) {
        let node = &self.nodes[node_idx];
        if node_idx != self.root {
            assert!(node.members.len() >= MIN_FANOUT, "non-root node underfull");
        }
        assert!(node.members.len() <= MAX_FANOUT, "node overfull");
        let mut expected: Option<Bounds2D<T>> = None;
        for m in &node.members {
            if node.leaf {
                assert_eq!(self.entries[m.index].node, node_idx, "entry backreference");
                assert_eq!(self.entries[m.index].bounds, m.bounds, "entry bounds cache");
            } else {
                assert_eq!(self.nodes[m.index].parent, node_idx, "child backreference");
                assert_eq!(self.nodes[m.index].bounds, m.bounds, "child bounds cache");
                self.validate_node(m.index);
            }
            expected = Some(match expected {
                Some(b) => b.union(&m.bounds),
                None => m.bounds,
            });
        }
        let expected = expected.expect("live nodes hold at least one member");
        assert_eq!(node.bounds, expected, "node bounds equal the union of members");
    }
}
