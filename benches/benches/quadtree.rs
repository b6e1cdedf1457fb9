// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use understory_quadtree::{Circle, QuadTree, Rect, Shape};

const WORLD: Rect = Rect::new(0.0, 0.0, 2000.0, 2000.0);

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

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Rect::new(x0, y0, cell, cell));
        }
    }
    out
}

fn gen_clustered_points(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((
            rng.next_f64() * WORLD.width * 0.8 + WORLD.width * 0.1,
            rng.next_f64() * WORLD.height * 0.8 + WORLD.height * 0.1,
        ));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push((cx + dx, cy + dy));
        }
    }
    out
}

fn gen_query_shapes(count: usize) -> Vec<Shape> {
    let mut rng = Rng::new(0x81FD_BEE7_94F0_AF1A);
    (0..count)
        .map(|i| {
            let x = rng.next_f64() * WORLD.width;
            let y = rng.next_f64() * WORLD.height;
            let extent = 20.0 + rng.next_f64() * 200.0;
            if i % 2 == 0 {
                Shape::Rect(Rect::new(x, y, extent, extent))
            } else {
                Shape::Circle(Circle::new(x, y, extent * 0.5))
            }
        })
        .collect()
}

fn build(rects: &[Rect], capacity: usize) -> QuadTree<u32> {
    let mut tree = QuadTree::new(WORLD, capacity).unwrap();
    for (i, r) in rects.iter().copied().enumerate() {
        tree.insert(i as u32, r).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_grid");
    for &n in &[16usize, 32, 64] {
        let rects = gen_grid_rects(n, WORLD.width / n as f64 * 0.9);
        group.throughput(Throughput::Elements(rects.len() as u64));
        for &capacity in &[4usize, 16] {
            group.bench_with_input(
                BenchmarkId::new(format!("cap{capacity}"), n),
                &rects,
                |b, rects| b.iter(|| black_box(build(rects, capacity))),
            );
        }
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let points = gen_clustered_points(32, 128, 150.0);
    let rects: Vec<_> = points
        .iter()
        .map(|&(x, y)| Rect::new(x, y, 4.0, 4.0))
        .collect();
    let shapes = gen_query_shapes(64);

    let mut group = c.benchmark_group("query_clustered");
    group.throughput(Throughput::Elements(shapes.len() as u64));
    for &capacity in &[4usize, 16] {
        let tree = build(&rects, capacity);
        group.bench_function(BenchmarkId::new("query", capacity), |b| {
            b.iter(|| {
                let mut total = 0usize;
                for shape in &shapes {
                    total += tree.query(shape).len();
                }
                black_box(total)
            });
        });
        group.bench_function(BenchmarkId::new("visit_query", capacity), |b| {
            b.iter(|| {
                let mut total = 0usize;
                for shape in &shapes {
                    tree.visit_query(shape, |_| total += 1);
                }
                black_box(total)
            });
        });
    }
    group.finish();
}

fn bench_remove_all(c: &mut Criterion) {
    let rects = gen_grid_rects(32, WORLD.width / 32.0 * 0.9);
    let mut group = c.benchmark_group("remove_all_grid");
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("cap4", |b| {
        b.iter_batched(
            || {
                let mut tree = QuadTree::new(WORLD, 4).unwrap();
                let ids: Vec<_> = rects
                    .iter()
                    .copied()
                    .enumerate()
                    .map(|(i, r)| tree.insert(i as u32, r).unwrap())
                    .collect();
                (tree, ids)
            },
            |(mut tree, ids)| {
                for id in ids {
                    black_box(tree.remove(id));
                }
                tree
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_query, bench_remove_all);
criterion_main!(benches);
