// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circle query over scattered points.
//!
//! Seeds random points, highlights the ones inside a query circle, then removes
//! them and shows how the emptied quadrants fold back. Writes an SVG of the
//! final state to stdout.
//!
//! Run:
//! - `cargo run -p understory_quadtree_demos --example circle_query -- [points] [seed] > out.svg`

use tracing::info;
use understory_quadtree::{Circle, Point, QuadTree, Rect};
use understory_quadtree_demos::{Rng, SvgCanvas, arg_or, init_logging};

const MAP_BOUNDS: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

fn main() {
    init_logging();
    let count: usize = arg_or(1, 100);
    let seed: u64 = arg_or(2, 0x5EED);

    let mut tree = QuadTree::new(MAP_BOUNDS, 4).expect("valid map bounds");
    let mut rng = Rng::new(seed);
    for _ in 0..count {
        let p = Point::new(
            rng.next_f64(MAP_BOUNDS.width).floor(),
            rng.next_f64(MAP_BOUNDS.height).floor(),
        );
        tree.insert_point(p, p).expect("points are inside the map");
    }
    info!(
        elements = tree.len(),
        quadrants = tree.quadrant_count(),
        depth = tree.depth(),
        "seeded"
    );

    let query = Circle::new(200.0, 200.0, 100.0);
    let found = tree.query(&query);
    info!(hits = found.len(), "queried circle");

    let mut canvas = SvgCanvas::new(MAP_BOUNDS);
    canvas.draw_circle(&query, "green");
    for id in &found {
        let p = *tree.get(*id).expect("query returns live ids").payload();
        canvas.draw_circle(&Circle::new(p.x, p.y, 3.0), "green");
    }

    for id in found {
        tree.remove(id);
    }
    info!(
        elements = tree.len(),
        quadrants = tree.quadrant_count(),
        "removed hits"
    );

    tree.draw(|rect| canvas.draw_rect(rect, "white"));
    for (_, element) in tree.iter() {
        let p = element.payload();
        canvas.draw_circle(&Circle::new(p.x, p.y, 3.0), "white");
    }
    print!("{}", canvas.finish());
}
