// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use thicket_index::{Bounds2D, DynamicTree, LinearIndex, QueryKind, Quadtree, RStarTree};

const WORLD: Bounds2D<f64> = Bounds2D::new(0.0, 0.0, 2048.0, 2048.0);

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Bounds2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Bounds2D::<f64>::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, span: f64, side: f64) -> Vec<Bounds2D<f64>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_f64() * (span - side);
        let y0 = rng.next_f64() * (span - side);
        out.push(Bounds2D::<f64>::from_xywh(x0, y0, side, side));
    }
    out
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Bounds2D<f64>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 1800.0, rng.next_f64() * 1800.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Bounds2D::<f64>::from_xywh(
                (cx + dx).clamp(0.0, 2000.0),
                (cy + dy).clamp(0.0, 2000.0),
                12.0,
                12.0,
            ));
        }
    }
    out
}

const QUERY: Bounds2D<f64> = Bounds2D::new(200.0, 200.0, 600.0, 600.0);

fn bench_linear(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear");
    for &n in &[16usize, 32, 64] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("insert_query_n{}", n), |b| {
            b.iter_batched(
                LinearIndex::<f64, u32>::new,
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = idx.insert(i as u32, r);
                    }
                    let hits = idx.query(QUERY, QueryKind::Intersect, |_| {});
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_quadtree(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("insert_query_n{}", n), |b| {
            b.iter_batched(
                || Quadtree::<f64, u32>::new(WORLD),
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = idx.insert(i as u32, r);
                    }
                    let hits = idx.query(QUERY, QueryKind::Intersect, |_| {});
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    let rects = gen_random_rects(4096, 2000.0, 12.0);
    group.bench_function("insert_query_random", |b| {
        b.iter_batched(
            || Quadtree::<f64, u32>::new(WORLD),
            |mut idx| {
                for (i, r) in rects.iter().copied().enumerate() {
                    let _ = idx.insert(i as u32, r);
                }
                let hits = idx.query(QUERY, QueryKind::Intersect, |_| {});
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_dynamic_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_tree");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("insert_query_n{}", n), |b| {
            b.iter_batched(
                DynamicTree::<f64, u32>::new,
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = idx.insert(i as u32, r);
                    }
                    let hits = idx.query(QUERY, QueryKind::Intersect, |_| {});
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_rstar(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("insert_query_n{}", n), |b| {
            b.iter_batched(
                RStarTree::<f64, u32>::new,
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = idx.insert(i as u32, r);
                    }
                    let hits = idx.query(QUERY, QueryKind::Intersect, |_| {});
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_update_heavy_dynamic(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_tree_update_heavy");
    let rects = gen_grid_rects(64, 10.0);
    group.bench_function("modify_all", |b| {
        b.iter_batched(
            || {
                let mut idx = DynamicTree::<f64, u32>::new();
                let mut ids = Vec::new();
                for (i, r) in rects.iter().copied().enumerate() {
                    ids.push(idx.insert(i as u32, r));
                }
                (idx, ids)
            },
            |(mut idx, ids)| {
                for (j, id) in ids.into_iter().enumerate() {
                    let dx = (j % 5) as f64 - 2.0;
                    let dy = ((j * 7) % 5) as f64 - 2.0;
                    let x = (j % 64) as f64 * 10.0 + dx;
                    let y = (j / 64) as f64 * 10.0 + dy;
                    idx.modify(id, Bounds2D::<f64>::from_xywh(x.max(0.0), y.max(0.0), 10.0, 10.0));
                }
                black_box(idx.len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_query_heavy_rstar(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_query_heavy");
    let rects = gen_grid_rects(128, 8.0);
    group.bench_function("build_then_many_queries", |b| {
        b.iter_batched(
            || {
                let mut idx = RStarTree::<f64, u32>::new();
                for (i, r) in rects.iter().copied().enumerate() {
                    let _ = idx.insert(i as u32, r);
                }
                idx
            },
            |idx| {
                let mut total = 0usize;
                for q in 0..256 {
                    let x = (q % 64) as f64 * 8.0;
                    let y = (q / 64) as f64 * 8.0;
                    total += idx.query(
                        Bounds2D::<f64>::from_xywh(x, y, 64.0, 64.0),
                        QueryKind::Intersect,
                        |_| {},
                    );
                }
                black_box(total);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_rstar_clustered(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_clustered");
    let rects = gen_clustered_rects(16, 256, 128.0);
    group.bench_function("insert_query", |b| {
        b.iter_batched(
            RStarTree::<f64, u32>::new,
            |mut idx| {
                for (i, r) in rects.iter().copied().enumerate() {
                    let _ = idx.insert(i as u32, r);
                }
                let hits = idx.query(
                    Bounds2D::<f64>::from_xywh(800.0, 800.0, 400.0, 400.0),
                    QueryKind::Intersect,
                    |_| {},
                );
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_linear,
    bench_quadtree,
    bench_dynamic_tree,
    bench_rstar,
    bench_update_heavy_dynamic,
    bench_query_heavy_rstar,
    bench_rstar_clustered,
);
criterion_main!(benches);
