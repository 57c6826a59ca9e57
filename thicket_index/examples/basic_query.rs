// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage: insert, query both kinds, modify, and remove.

use thicket_index::{Bounds2D, DynamicTree, QueryKind};

fn main() {
    let mut tree: DynamicTree<f64, u32> = DynamicTree::new();
    let a = tree.insert(1, Bounds2D::new(0.0, 0.0, 10.0, 10.0));
    let _b = tree.insert(2, Bounds2D::new(5.0, 5.0, 15.0, 15.0));

    let mut contained = Vec::new();
    let found = tree.query(
        Bounds2D::new(0.0, 0.0, 12.0, 12.0),
        QueryKind::Contain,
        |h| contained.push(h),
    );
    println!("contained by (0,0)-(12,12): {contained:?} ({found} found)");

    let mut touched = Vec::new();
    tree.query(
        Bounds2D::new(9.0, 9.0, 11.0, 11.0),
        QueryKind::Intersect,
        |h| touched.push(h),
    );
    println!("intersecting (9,9)-(11,11): {touched:?}");

    // Move the first box away and drop it.
    tree.modify(a, Bounds2D::new(40.0, 40.0, 50.0, 50.0));
    tree.remove(a);
    println!("{} entries left", tree.len());
}
