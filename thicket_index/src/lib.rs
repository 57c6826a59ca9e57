// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Index: interchangeable 2D spatial indexes.
//!
//! Four implementations of one contract. Each stores axis-aligned bounds
//! with an opaque handle, updates or removes them by id, and answers
//! contain/intersect range queries through a visitor callback:
//!
//! - [`LinearIndex`]: flat array, O(n) scans. Trivially correct; the oracle
//!   the tree kinds are tested against.
//! - [`Quadtree`]: fixed world bounds, lazy quad subdivision.
//! - [`DynamicTree`]: incrementally balanced binary AABB tree.
//! - [`RStarTree`]: revised R*-tree with overlap-minimizing placement.
//!
//! The crate is generic over the coordinate scalar (`f32`, `f64`, `i64`) and
//! does not depend on any geometry crate. Cost metrics run in widened
//! accumulator types (f32→f64, i64→i128) so heuristic orderings survive
//! large coordinates. Handles are caller-owned and never dereferenced.
//!
//! # Example
//!
//! ```rust
//! use thicket_index::{Bounds2D, QueryKind, RStarTree};
//!
//! let mut tree: RStarTree<f64, u32> = RStarTree::new();
//! let id = tree.insert(1, Bounds2D::new(0.0, 0.0, 10.0, 10.0));
//! tree.insert(2, Bounds2D::new(5.0, 5.0, 15.0, 15.0));
//!
//! let mut hits = Vec::new();
//! let found = tree.query(
//!     Bounds2D::new(0.0, 0.0, 20.0, 20.0),
//!     QueryKind::Contain,
//!     |handle| hits.push(handle),
//! );
//! assert_eq!(found, 2);
//!
//! tree.modify(id, Bounds2D::new(40.0, 40.0, 50.0, 50.0));
//! tree.remove(id);
//! assert_eq!(tree.len(), 1);
//! ```
//!
//! # Choosing a kind
//!
//! - `LinearIndex`: smallest code and constant factors; right when entry
//!   counts stay tiny or queries are rare.
//! - `Quadtree`: needs the world bounds up front; cheap and predictable when
//!   entries are well distributed inside fixed bounds.
//! - `DynamicTree`: no bounds required, O(1) id-to-leaf lookup, very cheap
//!   updates; a good default for moving entries.
//! - `RStarTree`: the most query-efficient packing under irregular
//!   distributions; updates cost a full re-placement.
//!
//! # Contracts
//!
//! Stale ids, out-of-bounds quadtree insertions, and callback-driven
//! mutation of the index being queried are contract violations guarded by
//! debug assertions, not recoverable errors. Queries with empty or inverted
//! rectangles return a count of 0 without invoking the callback.
//!
//! # Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates. Debug builds
//! may assert.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("thicket_index requires either the `std` or `libm` feature");

pub mod index;
pub mod indexes;
pub mod slab;
pub mod types;

pub use index::{QueryKind, SpatialId, SpatialIndex};
pub use indexes::dynamic_tree::DynamicTree;
pub use indexes::linear::LinearIndex;
pub use indexes::quadtree::Quadtree;
pub use indexes::rstar::RStarTree;
pub use slab::{NIL, Slab};
pub use types::{Bounds2D, Scalar};
