// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run one workload through every index kind via the shared trait.

use thicket_index::{
    Bounds2D, DynamicTree, LinearIndex, QueryKind, Quadtree, RStarTree, SpatialIndex,
};

const WORLD: Bounds2D<f64> = Bounds2D::new(0.0, 0.0, 1000.0, 1000.0);

fn drive(name: &str, index: &mut dyn SpatialIndex<f64, u32>) {
    let mut ids = Vec::new();
    for i in 0..1000_u32 {
        let x = f64::from(i % 40) * 25.0;
        let y = f64::from(i / 40) * 25.0;
        ids.push(index.insert(i, Bounds2D::new(x, y, x + 20.0, y + 20.0)));
    }

    // Shift one band of boxes, then drop another.
    for (i, id) in ids.iter().enumerate() {
        if i % 7 == 0 {
            let x = (i % 40) as f64 * 25.0;
            let y = (i / 40) as f64 * 25.0;
            index.modify(*id, Bounds2D::new(x + 2.0, y + 2.0, x + 22.0, y + 22.0));
        }
    }
    for (i, id) in ids.iter().enumerate() {
        if i % 11 == 0 {
            index.remove(*id);
        }
    }

    let contained = index.query(WORLD, QueryKind::Contain, &mut |_| {});
    let touching = index.query(
        Bounds2D::new(300.0, 300.0, 500.0, 500.0),
        QueryKind::Intersect,
        &mut |_| {},
    );
    println!("{name:>12}: {contained} alive, {touching} near the center");
}

fn main() {
    let mut linear = LinearIndex::<f64, u32>::new();
    let mut quadtree = Quadtree::<f64, u32>::new(WORLD);
    let mut dynamic = DynamicTree::<f64, u32>::new();
    let mut rstar = RStarTree::<f64, u32>::new();

    drive("linear", &mut linear);
    drive("quadtree", &mut quadtree);
    drive("dynamic", &mut dynamic);
    drive("r*-tree", &mut rstar);
}
