// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_quadtree --heading-base-level=0

//! Understory Quadtree: a capacity-split region quadtree for 2D range queries.
//!
//! The tree stores payloads together with an axis-aligned bound and answers
//! "which elements overlap this shape?" by recursive quadrant subdivision.
//!
//! - Leaves hold up to `capacity` elements. The next insertion reaching a full leaf
//!   splits it into four equal children.
//! - Splitting is lazy: elements already held by a leaf stay with it after it
//!   becomes internal. Queries and removals still find them there.
//! - An element whose bound crosses split lines is held by every leaf it touches.
//!   Each element records its holders, so removal touches only those quadrants.
//! - After removals, subtrees that no longer hold anything fold back into leaves.
//!
//! ## API overview
//!
//! - [`QuadTree`]: the container.
//! - [`ElementId`]: generational handle returned by insertion and used for removal.
//! - [`Element`]: read access to a stored payload and its bound.
//! - [`Rect`], [`Circle`], [`Point`]: geometry. [`Shape`] is the closed set of
//!   built-in query shapes; [`Boundary`] is the predicate trait queries are generic over.
//! - [`QuadrantInfo`] / [`Corner`]: what [`QuadTree::quadrants`] yields when walking the tree.
//!
//! Key operations:
//! - [`QuadTree::insert`] / [`QuadTree::insert_point`] / [`QuadTree::insert_xy`] → [`ElementId`]
//! - [`QuadTree::remove`] → payload
//! - [`QuadTree::query`] and [`QuadTree::visit_query`]
//! - [`QuadTree::draw`] and [`QuadTree::quadrants`] for visualizing quadrant boundaries
//! - [`QuadTree::clear`]
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_quadtree::{QuadTree, Rect, Shape};
//!
//! let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 800.0, 600.0), 4).unwrap();
//! let ids: Vec<_> = [(10.0, 10.0), (20.0, 20.0), (30.0, 30.0), (40.0, 40.0), (50.0, 50.0)]
//!     .into_iter()
//!     .map(|(x, y)| tree.insert_xy((x, y), x, y).unwrap())
//!     .collect();
//!
//! // The fifth point split the root.
//! assert!(!tree.is_leaf());
//! assert_eq!(tree.query(&Shape::Rect(tree.bounds())).len(), 5);
//!
//! for id in ids {
//!     tree.remove(id);
//! }
//! assert!(tree.is_leaf());
//! ```
//!
//! ## Coordinates and preconditions
//!
//! `x` grows to the right and `y` grows downward. Rectangles are closed: touching
//! edges count as intersecting, while [`Boundary::contains`] for rectangles is strict.
//! Geometry passed to [`QuadTree::new`] and [`QuadTree::insert`] is validated; query
//! shapes are assumed finite.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`trace` for insert/query, `debug` for
//! subdivision and collapse, `warn` for inconsistent bookkeeping found during
//! removal). It never installs a subscriber.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod element;
mod error;
mod geometry;
mod tree;

pub use element::{Element, ElementId};
pub use error::{BuildError, InsertError, InsertErrorKind};
pub use geometry::{Boundary, Circle, GeometryError, Point, Rect, Shape};
pub use tree::{Corner, DEFAULT_MAX_DEPTH, QuadTree, QuadrantInfo, Quadrants};
