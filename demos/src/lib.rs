// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the quadtree demos.
//!
//! The demos are headless: instead of a window they build an SVG document of
//! quadrant boundaries, stored elements, and query results, and print it.

use kurbo::Shape as _;
use understory_quadtree::{Circle, Rect};

/// Minimal SVG canvas that draws outlines of rectangles and circles.
#[derive(Debug)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    body: String,
}

impl SvgCanvas {
    /// Create an empty canvas sized to `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            width: bounds.width,
            height: bounds.height,
            body: String::new(),
        }
    }

    /// Outline a rectangle.
    pub fn draw_rect(&mut self, rect: &Rect, color: &str) {
        self.push_path(kurbo::Rect::from(*rect).to_path(0.1), color);
    }

    /// Outline a circle.
    pub fn draw_circle(&mut self, circle: &Circle, color: &str) {
        self.push_path(kurbo::Circle::from(*circle).to_path(0.1), color);
    }

    fn push_path(&mut self, path: kurbo::BezPath, color: &str) {
        self.body.push_str(&format!(
            "  <path d=\"{}\" fill=\"none\" stroke=\"{color}\"/>\n",
            path.to_svg()
        ));
    }

    /// Wrap the drawn shapes in an SVG document on a black background.
    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n  <rect width=\"100%\" height=\"100%\" fill=\"black\"/>\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body,
        )
    }
}

/// Install a `tracing` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read positional argument `index` as a `T`, falling back to `default`.
pub fn arg_or<T: std::str::FromStr>(index: usize, default: T) -> T {
    std::env::args()
        .nth(index)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Small deterministic xorshift generator standing in for user clicks.
#[derive(Clone, Debug)]
pub struct Rng(u64);

impl Rng {
    /// Create a generator; a zero seed is bumped to one.
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    /// Next raw value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform in `[0, max)`.
    pub fn next_f64(&mut self, max: f64) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1_u64 << 53) as f64) * max
    }
}
