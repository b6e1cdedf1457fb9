// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle query over sized elements.
//!
//! Places 10x10 boxes, some of which straddle quadrant split lines, and
//! highlights the ones overlapping a fixed query rectangle. Prints the quadrant
//! layout to stderr and an SVG to stdout.
//!
//! Run:
//! - `cargo run -p understory_quadtree_demos --example rect_bounds -- [boxes] [seed] > out.svg`

use tracing::info;
use understory_quadtree::{QuadTree, Rect};
use understory_quadtree_demos::{Rng, SvgCanvas, arg_or, init_logging};

const MAP_BOUNDS: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

fn main() {
    init_logging();
    let count: usize = arg_or(1, 60);
    let seed: u64 = arg_or(2, 0xB0C5);

    let mut tree = QuadTree::new(MAP_BOUNDS, 4).expect("valid map bounds");
    let mut rng = Rng::new(seed);
    for i in 0..count {
        let bound = Rect::new(
            rng.next_f64(MAP_BOUNDS.width - 10.0),
            rng.next_f64(MAP_BOUNDS.height - 10.0),
            10.0,
            10.0,
        );
        if let Err(e) = tree.insert(i, bound) {
            info!(%e, "skipped box");
        }
    }

    for q in tree.quadrants() {
        let indent = "  ".repeat(q.level as usize);
        eprintln!(
            "{indent}{:?} {:?} leaf={} held={}",
            q.corner, q.bounds, q.is_leaf, q.len
        );
    }

    let query = Rect::new(200.0, 200.0, 200.0, 200.0);
    let mut canvas = SvgCanvas::new(MAP_BOUNDS);
    tree.draw(|rect| canvas.draw_rect(rect, "white"));
    for (_, element) in tree.iter() {
        canvas.draw_rect(element.bound(), "white");
    }
    canvas.draw_rect(&query, "green");
    let mut hits = 0;
    tree.visit_query(&query, |id| {
        if let Some(element) = tree.get(id) {
            canvas.draw_rect(element.bound(), "green");
            hits += 1;
        }
    });
    info!(hits, shared = tree.iter().filter(|(_, e)| e.owner_count() > 1).count(), "queried rect");
    print!("{}", canvas.finish());
}
