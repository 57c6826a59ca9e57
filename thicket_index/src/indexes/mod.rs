// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The four index implementations, drop-in interchangeable behind
//! [`SpatialIndex`](crate::SpatialIndex).
//!
//! - `linear`: flat slot array with linear scans. Asymptotically the worst
//!   and trivially correct; the ground truth the tree kinds are tested
//!   against.
//! - `quadtree`: fixed-bounds recursive quad subdivision with lazy splitting.
//!   Entries that fit no quadrant stay at the ancestor that spans them.
//! - `dynamic_tree`: incrementally balanced binary AABB tree in the style of
//!   Box2D's `b2DynamicTree`; half-perimeter cost descent and AVL-style
//!   rotations.
//! - `rstar`: revised R*-tree with overlap-minimizing subtree choice and
//!   margin/overlap-driven splits; reinsertion happens only on underflow.
//!
//! Cost heuristics note
//! --------------------
//! The tree kinds rank placement and split candidates by half-perimeter
//! ("extent length") and area ("volume") of candidate boxes, computed in the
//! scalar's widened accumulator type (`f32`→`f64`, `i64`→`i128`) so that
//! orderings survive large coordinates. Only orderings matter; no heuristic
//! depends on the absolute magnitude of a cost.

pub mod dynamic_tree;
pub mod linear;
pub mod quadtree;
pub mod rstar;
