// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by tree construction and insertion.

use core::fmt;

use crate::geometry::GeometryError;

/// Error returned by [`QuadTree::new`](crate::QuadTree::new).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuildError {
    /// Capacity must be at least one element per quadrant.
    ZeroCapacity,
    /// The root bounds are not usable geometry.
    InvalidBounds(GeometryError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => f.write_str("quadtree capacity must be at least 1"),
            Self::InvalidBounds(e) => write!(f, "invalid quadtree bounds: {e}"),
        }
    }
}

impl core::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::ZeroCapacity => None,
            Self::InvalidBounds(e) => Some(e),
        }
    }
}

/// Why an insertion was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InsertErrorKind {
    /// The bound does not touch the tree's bounds.
    OutOfBounds,
    /// The bound is not usable geometry.
    InvalidBound(GeometryError),
}

/// Error returned by [`QuadTree::insert`](crate::QuadTree::insert).
///
/// The tree is left untouched and the rejected payload is handed back.
#[derive(Clone, PartialEq, Eq)]
pub struct InsertError<T> {
    /// What went wrong.
    pub kind: InsertErrorKind,
    /// The payload that was not inserted.
    pub payload: T,
}

impl<T> InsertError<T> {
    /// Recover the rejected payload.
    pub fn into_payload(self) -> T {
        self.payload
    }
}

// Payloads are often not `Debug`; leave them out.
impl<T> fmt::Debug for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            InsertErrorKind::OutOfBounds => f.write_str("bound lies outside the quadtree"),
            InsertErrorKind::InvalidBound(e) => write!(f, "invalid element bound: {e}"),
        }
    }
}

impl<T> core::error::Error for InsertError<T> {}
