// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The quadtree container.

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashSet;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::element::{Element, ElementId, ElementSlot, QuadrantIdx};
use crate::error::{BuildError, InsertError, InsertErrorKind};
use crate::geometry::{Boundary, Point, Rect};

const ROOT: QuadrantIdx = 0;

/// Default limit on how many times the root may be split along one lineage.
///
/// See [`QuadTree::with_max_depth`].
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Position of a child quadrant within its parent.
///
/// Coordinates grow right and down, so `TopLeft` is the child at the parent's
/// origin. Children are always stored and traversed in declaration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    /// `(x, y)`.
    TopLeft,
    /// `(x + w/2, y)`.
    TopRight,
    /// `(x, y + h/2)`.
    BottomLeft,
    /// `(x + w/2, y + h/2)`.
    BottomRight,
}

impl Corner {
    /// All corners in child order.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];
}

/// Snapshot of one quadrant, yielded by [`QuadTree::quadrants`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadrantInfo {
    /// Region covered by the quadrant.
    pub bounds: Rect,
    /// Depth below the root; the root is level `0`.
    pub level: u32,
    /// Position within the parent, or `None` for the root.
    pub corner: Option<Corner>,
    /// Whether the quadrant has no children.
    pub is_leaf: bool,
    /// Number of elements held directly by this quadrant (not its descendants).
    pub len: usize,
}

#[derive(Clone, Debug)]
struct Quadrant {
    bounds: Rect,
    level: u32,
    parent: Option<QuadrantIdx>,
    children: Option<[QuadrantIdx; 4]>,
    elements: SmallVec<[ElementId; 4]>,
}

impl Quadrant {
    fn new(bounds: Rect, level: u32, parent: Option<QuadrantIdx>) -> Self {
        Self {
            bounds,
            level,
            parent,
            children: None,
            elements: SmallVec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn is_empty_leaf(&self) -> bool {
        self.is_leaf() && self.elements.is_empty()
    }
}

/// A region quadtree over axis-aligned element bounds.
///
/// Each quadrant is either a leaf holding up to `capacity` elements, or an
/// internal quadrant with exactly four children. When a leaf is full, the next
/// insertion that reaches it splits it into four equal children. Elements it
/// already holds stay where they are; only later insertions descend into the
/// children.
///
/// An element whose bound crosses a split line is held by every child it touches.
/// Each element remembers its holders, so [`QuadTree::remove`] visits only those
/// quadrants. After a removal, quadrants whose whole subtree has become empty
/// fold back into leaves, walking up toward the root.
///
/// Quadrants at [`max_depth`](QuadTree::max_depth) never split; they keep accepting
/// elements past `capacity`. This bounds the tree when many elements share one
/// spot.
///
/// Quadrants and elements live in arenas owned by the tree. Parent links and
/// element owner lists are plain arena indices.
///
/// ## Example
///
/// ```rust
/// use understory_quadtree::{Circle, QuadTree, Rect};
///
/// let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 800.0, 600.0), 4).unwrap();
/// let a = tree.insert_xy("a", 10.0, 10.0).unwrap();
/// let b = tree.insert("b", Rect::new(390.0, 290.0, 20.0, 20.0)).unwrap();
///
/// let hits = tree.query(&Circle::new(0.0, 0.0, 50.0));
/// assert!(hits.contains(&a));
/// assert!(!hits.contains(&b));
///
/// assert_eq!(tree.remove(a), Some("a"));
/// assert_eq!(tree.len(), 1);
/// ```
#[derive(Clone)]
pub struct QuadTree<T> {
    quadrants: Vec<Option<Quadrant>>,
    free_quadrants: Vec<QuadrantIdx>,
    elements: Vec<ElementSlot<T>>,
    free_elements: Vec<u32>,
    live_quadrants: usize,
    capacity: usize,
    max_depth: u32,
    len: usize,
}

impl<T> fmt::Debug for QuadTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadTree")
            .field("bounds", &self.bounds())
            .field("capacity", &self.capacity)
            .field("max_depth", &self.max_depth)
            .field("len", &self.len)
            .field("quadrants", &self.quadrant_count())
            .finish_non_exhaustive()
    }
}

impl<T> QuadTree<T> {
    /// Create an empty tree covering `bounds`.
    ///
    /// `capacity` is the number of elements a leaf holds before the next
    /// insertion reaching it splits it. It must be at least `1`. The split depth
    /// is limited to [`DEFAULT_MAX_DEPTH`].
    pub fn new(bounds: Rect, capacity: usize) -> Result<Self, BuildError> {
        if capacity == 0 {
            return Err(BuildError::ZeroCapacity);
        }
        bounds.validate().map_err(BuildError::InvalidBounds)?;
        Ok(Self {
            quadrants: alloc::vec![Some(Quadrant::new(bounds, 0, None))],
            free_quadrants: Vec::new(),
            elements: Vec::new(),
            free_elements: Vec::new(),
            live_quadrants: 1,
            capacity,
            max_depth: DEFAULT_MAX_DEPTH,
            len: 0,
        })
    }

    /// Limit splitting to quadrants above level `max_depth`.
    ///
    /// Leaves at that level hold any number of elements. `0` keeps the root a leaf.
    /// Only affects later insertions; existing quadrants are left as they are.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Region covered by the root quadrant.
    pub fn bounds(&self) -> Rect {
        self.quadrant(ROOT).bounds
    }

    /// Per-leaf split threshold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Deepest level at which quadrants may still be created.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Returns `true` if the tree holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the root has never split or has collapsed back.
    pub fn is_leaf(&self) -> bool {
        self.quadrant(ROOT).is_leaf()
    }

    /// Number of live quadrants, including the root.
    pub fn quadrant_count(&self) -> usize {
        self.live_quadrants
    }

    /// Level of the deepest live quadrant. A tree that never split has depth `0`.
    ///
    /// Scans the quadrant arena.
    pub fn depth(&self) -> u32 {
        self.quadrants
            .iter()
            .flatten()
            .map(|q| q.level)
            .max()
            .unwrap_or(0)
    }

    /// Insert `payload` with the given bound.
    ///
    /// The element is accepted when `bound` touches the tree's bounds. It is then
    /// held by every leaf it touches, splitting full leaves on the way down.
    ///
    /// On error nothing is modified and the payload is returned inside the error.
    pub fn insert(&mut self, payload: T, bound: Rect) -> Result<ElementId, InsertError<T>> {
        if let Err(e) = bound.validate() {
            return Err(InsertError {
                kind: InsertErrorKind::InvalidBound(e),
                payload,
            });
        }
        if !self.bounds().intersects(&bound) {
            trace!(?bound, "insert rejected: outside tree bounds");
            return Err(InsertError {
                kind: InsertErrorKind::OutOfBounds,
                payload,
            });
        }

        let id = self.alloc_element_id();
        let mut element = Element::new(payload, bound);
        let mut stack: SmallVec<[QuadrantIdx; 16]> = SmallVec::new();
        stack.push(ROOT);
        while let Some(idx) = stack.pop() {
            if !self.quadrant(idx).bounds.intersects(&bound) {
                continue;
            }
            {
                let q = self.quadrant(idx);
                if q.is_leaf() && q.level < self.max_depth && q.elements.len() >= self.capacity {
                    self.subdivide(idx);
                }
            }
            let q = self.quadrant_mut(idx);
            if let Some(children) = q.children {
                // Reverse so children are visited in corner order.
                stack.extend(children.into_iter().rev());
            } else {
                q.elements.push(id);
                element.add_owner(idx);
                trace!(quadrant = idx, depth = q.level, "element stored");
            }
        }

        debug_assert!(
            element.owner_count() > 0,
            "an element touching the root must land in at least one leaf"
        );
        self.elements[id.idx()].element = Some(element);
        self.len += 1;
        Ok(id)
    }

    /// Insert `payload` at a point, using a unit-sized bound whose top-left corner is the point.
    pub fn insert_point(&mut self, payload: T, point: Point) -> Result<ElementId, InsertError<T>> {
        self.insert(payload, Rect::from_point(point))
    }

    /// Insert `payload` at `(x, y)`, using a unit-sized bound.
    pub fn insert_xy(&mut self, payload: T, x: f64, y: f64) -> Result<ElementId, InsertError<T>> {
        self.insert_point(payload, Point::new(x, y))
    }

    /// Remove an element and return its payload.
    ///
    /// The element is erased from each quadrant that holds it, and each of those
    /// quadrants then tries to fold empty subdivisions back toward the root.
    ///
    /// Returns `None` if `id` is stale or was never issued by this tree, or if none
    /// of the element's recorded holders actually held it.
    pub fn remove(&mut self, id: ElementId) -> Option<T> {
        let slot = self.elements.get_mut(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        let element = slot.element.take()?;
        self.free_elements.push(id.0);
        self.len -= 1;

        let (payload, owners) = element.into_parts();
        let mut erased = 0_usize;
        for owner in owners {
            let Some(q) = self
                .quadrants
                .get_mut(owner as usize)
                .and_then(Option::as_mut)
            else {
                warn!(quadrant = owner, ?id, "remove: recorded holder no longer exists");
                continue;
            };
            let Some(pos) = q.elements.iter().position(|e| *e == id) else {
                warn!(quadrant = owner, ?id, "remove: recorded holder does not hold element");
                continue;
            };
            q.elements.remove(pos);
            erased += 1;
            self.discard_empty_buckets(owner);
        }

        if erased == 0 {
            warn!(?id, "remove: element was not held by any quadrant");
            return None;
        }
        Some(payload)
    }

    /// Returns `true` if `id` refers to a live element.
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Look up a live element.
    pub fn get(&self, id: ElementId) -> Option<&Element<T>> {
        let slot = self.elements.get(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.element.as_ref()
    }

    /// Look up a live element mutably.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element<T>> {
        let slot = self.elements.get_mut(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.element.as_mut()
    }

    /// Iterate over all live elements in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element<T>)> + '_ {
        self.elements.iter().enumerate().filter_map(|(i, slot)| {
            slot.element
                .as_ref()
                .map(|e| (ElementId::new(slot_index(i), slot.generation), e))
        })
    }

    /// Collect every element whose bound overlaps `shape`.
    ///
    /// Each element appears once, even when several quadrants hold it.
    /// `shape` is assumed to be finite.
    pub fn query<B: Boundary + ?Sized>(&self, shape: &B) -> HashSet<ElementId> {
        self.walk_query(shape, |_| {})
    }

    /// Visit every element whose bound overlaps `shape`, once per element.
    ///
    /// Quadrants the shape misses are skipped along with their subtrees. When the
    /// shape contains a quadrant, the elements held directly by that quadrant are
    /// accepted without testing their bounds.
    pub fn visit_query<B, F>(&self, shape: &B, f: F)
    where
        B: Boundary + ?Sized,
        F: FnMut(ElementId),
    {
        self.walk_query(shape, f);
    }

    /// Shared traversal for queries. Returns the set of matches, each passed to `f` once.
    fn walk_query<B, F>(&self, shape: &B, mut f: F) -> HashSet<ElementId>
    where
        B: Boundary + ?Sized,
        F: FnMut(ElementId),
    {
        let mut seen: HashSet<ElementId> = HashSet::new();
        let mut stack: SmallVec<[QuadrantIdx; 16]> = SmallVec::new();
        stack.push(ROOT);
        while let Some(idx) = stack.pop() {
            let q = self.quadrant(idx);
            if !shape.intersects(&q.bounds) {
                continue;
            }
            let covered = shape.contains(&q.bounds);
            for &id in &q.elements {
                if seen.contains(&id) {
                    continue;
                }
                let hit = covered
                    || self
                        .get(id)
                        .is_some_and(|e| shape.intersects(e.bound()));
                if hit {
                    seen.insert(id);
                    f(id);
                }
            }
            if let Some(children) = q.children {
                stack.extend(children.into_iter().rev());
            }
        }
        trace!(hits = seen.len(), "query finished");
        seen
    }

    /// Call `f` with the bounds of every quadrant, root first, children in [`Corner`] order.
    pub fn draw<F: FnMut(&Rect)>(&self, mut f: F) {
        for info in self.quadrants() {
            f(&info.bounds);
        }
    }

    /// Lazily walk all quadrants in pre-order, root first, children in [`Corner`] order.
    pub fn quadrants(&self) -> Quadrants<'_, T> {
        let mut stack = SmallVec::new();
        stack.push((ROOT, None));
        Quadrants { tree: self, stack }
    }

    /// Remove every element and fold the root back into an empty leaf.
    ///
    /// Outstanding [`ElementId`]s become stale.
    pub fn clear(&mut self) {
        self.clear_quadrant(ROOT);
        for (i, slot) in self.elements.iter_mut().enumerate() {
            if slot.element.take().is_some() {
                self.free_elements.push(slot_index(i));
            }
        }
        self.len = 0;
        debug!("quadtree cleared");
    }

    fn quadrant(&self, idx: QuadrantIdx) -> &Quadrant {
        self.quadrants[idx as usize]
            .as_ref()
            .expect("quadrant index refers to a live quadrant")
    }

    fn quadrant_mut(&mut self, idx: QuadrantIdx) -> &mut Quadrant {
        self.quadrants[idx as usize]
            .as_mut()
            .expect("quadrant index refers to a live quadrant")
    }

    fn alloc_element_id(&mut self) -> ElementId {
        if let Some(idx) = self.free_elements.pop() {
            let slot = &mut self.elements[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            ElementId::new(idx, slot.generation)
        } else {
            let idx = slot_index(self.elements.len());
            self.elements.push(ElementSlot {
                generation: 1,
                element: None,
            });
            ElementId::new(idx, 1)
        }
    }

    fn alloc_quadrant(&mut self, quadrant: Quadrant) -> QuadrantIdx {
        self.live_quadrants += 1;
        if let Some(idx) = self.free_quadrants.pop() {
            self.quadrants[idx as usize] = Some(quadrant);
            idx
        } else {
            let idx = slot_index(self.quadrants.len());
            self.quadrants.push(Some(quadrant));
            idx
        }
    }

    /// Split a leaf into four children. Elements it already holds stay put.
    fn subdivide(&mut self, idx: QuadrantIdx) {
        let (bounds, level) = {
            let q = self.quadrant(idx);
            debug_assert!(q.is_leaf(), "only leaves are subdivided");
            (q.bounds, q.level)
        };
        let [tl, tr, bl, br] = bounds.quarters();
        let children = [
            self.alloc_quadrant(Quadrant::new(tl, level + 1, Some(idx))),
            self.alloc_quadrant(Quadrant::new(tr, level + 1, Some(idx))),
            self.alloc_quadrant(Quadrant::new(bl, level + 1, Some(idx))),
            self.alloc_quadrant(Quadrant::new(br, level + 1, Some(idx))),
        ];
        self.quadrant_mut(idx).children = Some(children);
        debug!(quadrant = idx, depth = level, "quadrant subdivided");
    }

    /// Fold `start` and its ancestors back into leaves while their subtrees are empty.
    fn discard_empty_buckets(&mut self, start: QuadrantIdx) {
        let mut current = Some(start);
        while let Some(idx) = current {
            let q = self.quadrant(idx);
            if !q.elements.is_empty() {
                return;
            }
            if let Some(children) = q.children {
                if !children.iter().all(|&c| self.quadrant(c).is_empty_leaf()) {
                    return;
                }
                debug!(quadrant = idx, depth = q.level, "collapsing empty quadrant");
            }
            current = q.parent;
            self.clear_quadrant(idx);
        }
    }

    /// Empty a quadrant's element list and release its whole subtree.
    fn clear_quadrant(&mut self, idx: QuadrantIdx) {
        let q = self.quadrant_mut(idx);
        q.elements.clear();
        if let Some(children) = q.children.take() {
            for child in children {
                self.clear_quadrant(child);
                self.quadrants[child as usize] = None;
                self.free_quadrants.push(child);
                self.live_quadrants -= 1;
            }
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "arena sizes are bounded by the u32 indices stored in handles"
)]
fn slot_index(i: usize) -> u32 {
    i as u32
}

/// Pre-order iterator over a tree's quadrants. See [`QuadTree::quadrants`].
pub struct Quadrants<'a, T> {
    tree: &'a QuadTree<T>,
    stack: SmallVec<[(QuadrantIdx, Option<Corner>); 16]>,
}

impl<T> fmt::Debug for Quadrants<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quadrants")
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<T> Iterator for Quadrants<'_, T> {
    type Item = QuadrantInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, corner) = self.stack.pop()?;
        let q = self.tree.quadrant(idx);
        if let Some(children) = q.children {
            for (child, corner) in children.into_iter().zip(Corner::ALL).rev() {
                self.stack.push((child, Some(corner)));
            }
        }
        Some(QuadrantInfo {
            bounds: q.bounds,
            level: q.level,
            corner,
            is_leaf: q.is_leaf(),
            len: q.elements.len(),
        })
    }
}
