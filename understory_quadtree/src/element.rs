// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stored elements and their handles.

use smallvec::SmallVec;

use crate::geometry::Rect;

/// Handle to an element stored in a [`QuadTree`](crate::QuadTree).
///
/// This is a small, copyable handle made of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ElementId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ElementId`.
///
/// Stale ids never alias a different live element because the generation must match.
/// Query results identify elements by handle, so an element held by several
/// quadrants is still reported once.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Index of a quadrant in the tree's quadrant arena.
pub(crate) type QuadrantIdx = u32;

/// Most elements are held by one to four quadrants.
pub(crate) type OwnerList = SmallVec<[QuadrantIdx; 4]>;

/// A payload together with its bound and the quadrants currently holding it.
#[derive(Clone, Debug)]
pub struct Element<T> {
    payload: T,
    bound: Rect,
    owners: OwnerList,
}

impl<T> Element<T> {
    pub(crate) fn new(payload: T, bound: Rect) -> Self {
        Self {
            payload,
            bound,
            owners: OwnerList::new(),
        }
    }

    /// The caller's payload.
    #[inline]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Mutable access to the caller's payload.
    ///
    /// The bound is fixed at insertion; remove and re-insert to move an element.
    #[inline]
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    /// The bound supplied at insertion.
    #[inline]
    pub fn bound(&self) -> &Rect {
        &self.bound
    }

    /// Number of quadrants currently holding this element.
    #[inline]
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    #[cfg(test)]
    pub(crate) fn owners(&self) -> &[QuadrantIdx] {
        &self.owners
    }

    pub(crate) fn add_owner(&mut self, quadrant: QuadrantIdx) {
        self.owners.push(quadrant);
    }

    pub(crate) fn into_parts(self) -> (T, OwnerList) {
        (self.payload, self.owners)
    }
}

/// A slot in the element arena.
#[derive(Clone, Debug)]
pub(crate) struct ElementSlot<T> {
    pub(crate) generation: u32,
    pub(crate) element: Option<Element<T>>,
}
