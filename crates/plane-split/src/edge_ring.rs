//! Directed-edge ring: a polygon boundary stored as a cyclic doubly-linked
//! list of edges inside a keyed arena.
//!
//! Each [`Edge`] stores only its source point; the destination is the source
//! of the next edge. Handles ([`EdgeId`]) are never reused, so a handle taken
//! before an insertion or splice stays valid afterwards. After bridging, one
//! ring may hold several disjoint cycles.

use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

use nalgebra::Point3;

use crate::{PlaneSide, SplitError};

/// Stable handle of an edge inside an [`EdgeRing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(u32);

impl EdgeId {
    /// Returns the raw handle value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// A directed edge: its source point, the side of that point relative to
/// the last cutting plane, and links to its neighbours on the cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Point3<f64>,
    side: PlaneSide,
    next: EdgeId,
    prev: EdgeId,
}

impl Edge {
    fn new(source: Point3<f64>, next: EdgeId, prev: EdgeId) -> Self {
        Self {
            source,
            side: PlaneSide::Nowhere,
            next,
            prev,
        }
    }

    /// Returns the source point of the edge.
    #[inline]
    pub fn source(&self) -> Point3<f64> {
        self.source
    }

    /// Returns where the source point lies relative to the last cutting plane.
    #[inline]
    pub fn side(&self) -> PlaneSide {
        self.side
    }

    /// Returns the handle of the following edge.
    #[inline]
    pub fn next(&self) -> EdgeId {
        self.next
    }

    /// Returns the handle of the preceding edge.
    #[inline]
    pub fn prev(&self) -> EdgeId {
        self.prev
    }
}

/// Arena of directed edges forming one or more closed cycles.
///
/// Indexing with a handle that does not belong to the ring panics, like
/// indexing a slice out of bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRing {
    edges: BTreeMap<EdgeId, Edge>,
    anchor: EdgeId,
    next_id: u32,
}

impl Index<EdgeId> for EdgeRing {
    type Output = Edge;

    fn index(&self, id: EdgeId) -> &Edge {
        &self.edges[&id]
    }
}

impl IndexMut<EdgeId> for EdgeRing {
    fn index_mut(&mut self, id: EdgeId) -> &mut Edge {
        self.edges
            .get_mut(&id)
            .unwrap_or_else(|| panic!("edge {id:?} is not part of this ring"))
    }
}

impl EdgeRing {
    /// Builds a single cycle with one edge per point, in input order.
    ///
    /// The points form an unclosed ring: the last point links back to the first.
    pub fn from_points(points: &[Point3<f64>]) -> Result<Self, SplitError> {
        if points.len() < 3 {
            return Err(SplitError::TooFewPoints {
                count: points.len(),
            });
        }

        let n = points.len() as u32;
        let edges = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let i = i as u32;
                let next = EdgeId((i + 1) % n);
                let prev = EdgeId((i + n - 1) % n);
                (EdgeId(i), Edge::new(*p, next, prev))
            })
            .collect();

        Ok(Self {
            edges,
            anchor: EdgeId(0),
            next_id: n,
        })
    }

    /// Adopts an existing edge collection, keeping its handles.
    ///
    /// `anchor` becomes the default starting edge; if it is not part of the
    /// collection the lowest handle is used instead.
    pub fn from_edges(edges: BTreeMap<EdgeId, Edge>, anchor: EdgeId) -> Result<Self, SplitError> {
        if edges.len() < 3 {
            return Err(SplitError::TooFewEdges { count: edges.len() });
        }

        let anchor = if edges.contains_key(&anchor) {
            anchor
        } else {
            *edges.keys().next().ok_or(SplitError::TooFewEdges { count: 0 })?
        };
        let next_id = edges.keys().next_back().map_or(0, |id| id.0 + 1);

        Ok(Self {
            edges,
            anchor,
            next_id,
        })
    }

    /// Returns the number of edges stored, across all cycles.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the ring stores no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the default starting edge.
    #[inline]
    pub fn anchor(&self) -> EdgeId {
        self.anchor
    }

    /// Returns true if `id` names an edge stored in this ring.
    #[inline]
    pub fn contains(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Returns the edge for `id`, if it is stored here.
    #[inline]
    pub fn get(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Iterates over all stored edges in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().map(|(id, e)| (*id, e))
    }

    #[inline]
    pub fn next(&self, id: EdgeId) -> EdgeId {
        self[id].next
    }

    #[inline]
    pub fn prev(&self, id: EdgeId) -> EdgeId {
        self[id].prev
    }

    #[inline]
    pub fn source_point(&self, id: EdgeId) -> Point3<f64> {
        self[id].source
    }

    #[inline]
    pub fn dest_point(&self, id: EdgeId) -> Point3<f64> {
        self[self.next(id)].source
    }

    #[inline]
    pub fn source_side(&self, id: EdgeId) -> PlaneSide {
        self[id].side
    }

    #[inline]
    pub fn dest_side(&self, id: EdgeId) -> PlaneSide {
        self[self.next(id)].side
    }

    /// Combined side of both endpoints; `AboveBelow` marks a crossing edge.
    #[inline]
    pub fn edge_side(&self, id: EdgeId) -> PlaneSide {
        self.source_side(id) | self.dest_side(id)
    }

    #[inline]
    pub fn set_side(&mut self, id: EdgeId, side: PlaneSide) {
        self[id].side = side;
    }

    /// Inserts a new edge carrying `point` right after `after` and returns it.
    pub fn append_after(&mut self, point: Point3<f64>, after: EdgeId) -> EdgeId {
        let id = self.fresh_id();
        let next = self.next(after);

        self.edges.insert(id, Edge::new(point, next, after));
        self[after].next = id;
        self[next].prev = id;
        id
    }

    /// Splits `edge` in two by inserting `point` as its new destination.
    /// Returns the second half, which starts at `point`.
    pub fn split_edge(&mut self, edge: EdgeId, point: Point3<f64>) -> EdgeId {
        self.append_after(point, edge)
    }

    /// Links `last` back to `first`, closing the chain between them into a cycle.
    ///
    /// Whatever previously followed `last` and preceded `first` is cut off;
    /// this is how a bridge carves one cycle into two.
    pub fn close_cycle(&mut self, first: EdgeId, last: EdgeId) {
        self[first].prev = last;
        self[last].next = first;
    }

    /// Drops an edge record from storage without relinking its neighbours.
    ///
    /// Only call this for edges already unlinked from every cycle.
    pub fn remove(&mut self, id: EdgeId) -> Option<Edge> {
        let removed = self.edges.remove(&id);
        if removed.is_some() && self.anchor == id {
            if let Some(first) = self.edges.keys().next() {
                self.anchor = *first;
            }
        }
        removed
    }

    /// Iterates over the handles of the cycle through `start`, beginning there.
    pub fn cycle(&self, start: EdgeId) -> Cycle<'_> {
        Cycle {
            ring: self,
            start,
            current: self.contains(start).then_some(start),
            remaining: self.len(),
        }
    }

    /// Copies the edges of the cycle through `start` into a new collection,
    /// keeping their handles and links.
    pub fn extract_cycle(&self, start: EdgeId) -> BTreeMap<EdgeId, Edge> {
        self.cycle(start).map(|id| (id, self[id].clone())).collect()
    }

    /// Returns the source points of the cycle through `start`, in order.
    pub fn points(&self, start: EdgeId) -> Vec<Point3<f64>> {
        self.cycle(start).map(|id| self[id].source).collect()
    }

    fn fresh_id(&mut self) -> EdgeId {
        let id = EdgeId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Iterator over one cycle of an [`EdgeRing`], created by [`EdgeRing::cycle`].
///
/// Stops after returning to the start, or after visiting as many edges as
/// the ring stores if the links are broken.
#[derive(Debug, Clone)]
pub struct Cycle<'a> {
    ring: &'a EdgeRing,
    start: EdgeId,
    current: Option<EdgeId>,
    remaining: usize,
}

impl Iterator for Cycle<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        let id = self.current?;
        if self.remaining == 0 {
            self.current = None;
            return None;
        }
        self.remaining -= 1;

        let next = self.ring.get(id).map(|e| e.next);
        self.current = next.filter(|n| *n != self.start && self.ring.contains(*n));
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn assert_links(ring: &EdgeRing) {
        for (id, edge) in ring.iter() {
            assert_eq!(ring.prev(edge.next()), id, "prev(next({id:?})) broken");
            assert_eq!(ring.next(edge.prev()), id, "next(prev({id:?})) broken");
        }
    }

    #[test]
    fn from_points_builds_closed_cycle() {
        let ring = EdgeRing::from_points(&square()).unwrap();
        assert_eq!(ring.len(), 4);
        assert_links(&ring);

        for (id, _) in ring.iter() {
            let mut e = id;
            for _ in 0..ring.len() {
                e = ring.next(e);
            }
            assert_eq!(e, id);
            assert_eq!(ring.cycle(id).count(), 4);
        }
        assert_eq!(ring.points(ring.anchor()), square());
    }

    #[test]
    fn from_points_rejects_two_points() {
        let err = EdgeRing::from_points(&square()[..2]).unwrap_err();
        assert_eq!(err, SplitError::TooFewPoints { count: 2 });
    }

    #[test]
    fn triangle_is_accepted() {
        let ring = EdgeRing::from_points(&square()[..3]).unwrap();
        assert_eq!(ring.len(), 3);
        assert_links(&ring);
    }

    #[test]
    fn dest_reads_next_source() {
        let ring = EdgeRing::from_points(&square()).unwrap();
        let a = ring.anchor();
        assert_eq!(ring.source_point(a), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(ring.dest_point(a), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(ring.dest_point(ring.prev(a)), ring.source_point(a));
    }

    #[test]
    fn split_keeps_handles_valid() {
        let mut ring = EdgeRing::from_points(&square()).unwrap();
        let first = ring.anchor();
        let second = ring.next(first);

        let mid = ring.split_edge(first, Point3::new(0.5, 0.0, 0.0));
        assert_eq!(ring.len(), 5);
        assert_links(&ring);
        assert_eq!(ring.next(first), mid);
        assert_eq!(ring.next(mid), second);
        assert_eq!(ring.source_point(second), Point3::new(1.0, 0.0, 0.0));
        assert!(ring.contains(mid));
        assert_ne!(mid, first);
        assert_ne!(mid, second);
    }

    #[test]
    fn handles_are_never_reused() {
        let mut ring = EdgeRing::from_points(&square()).unwrap();
        let a = ring.anchor();
        let inserted = ring.append_after(Point3::new(0.5, 0.0, 0.0), a);

        let before = ring.prev(inserted);
        let after = ring.next(inserted);
        ring.close_cycle(after, before);
        ring.remove(inserted);

        let again = ring.append_after(Point3::new(0.25, 0.0, 0.0), a);
        assert_ne!(again, inserted);
        assert_links(&ring);
    }

    #[test]
    fn edge_side_combines_endpoints() {
        let mut ring = EdgeRing::from_points(&square()).unwrap();
        let a = ring.anchor();
        let b = ring.next(a);
        ring.set_side(a, PlaneSide::Above);
        ring.set_side(b, PlaneSide::Below);
        assert_eq!(ring.dest_side(a), PlaneSide::Below);
        assert_eq!(ring.edge_side(a), PlaneSide::AboveBelow);
    }

    #[test]
    fn close_cycle_carves_two_cycles() {
        let points: Vec<_> = (0..6)
            .map(|i| Point3::new(i as f64, (i % 2) as f64, 0.0))
            .collect();
        let mut ring = EdgeRing::from_points(&points).unwrap();
        let ids: Vec<_> = ring.cycle(ring.anchor()).collect();

        // 0 1 2 | 3 4 5
        ring.close_cycle(ids[0], ids[2]);
        ring.close_cycle(ids[3], ids[5]);

        assert_links(&ring);
        assert_eq!(ring.cycle(ids[0]).collect::<Vec<_>>(), ids[..3].to_vec());
        assert_eq!(ring.cycle(ids[3]).collect::<Vec<_>>(), ids[3..].to_vec());
    }

    #[test]
    fn extract_cycle_copies_one_cycle() {
        let mut ring = EdgeRing::from_points(&square()).unwrap();
        let ids: Vec<_> = ring.cycle(ring.anchor()).collect();
        let extra = ring.append_after(Point3::new(0.5, 0.5, 0.0), ids[3]);

        let edges = ring.extract_cycle(ids[1]);
        assert_eq!(edges.len(), 5);
        assert!(edges.contains_key(&extra));

        let copy = EdgeRing::from_edges(edges, ids[1]).unwrap();
        assert_eq!(copy.anchor(), ids[1]);
        assert_links(&copy);

        // Fresh handles in the copy must not collide with the adopted ones.
        let mut copy = copy;
        let fresh = copy.append_after(Point3::new(0.2, 0.0, 0.0), ids[0]);
        assert!(fresh > extra);
    }

    #[test]
    fn from_edges_rejects_short_collections() {
        let ring = EdgeRing::from_points(&square()).unwrap();
        let mut edges = ring.extract_cycle(ring.anchor());
        let keep: Vec<_> = edges.keys().copied().take(2).collect();
        edges.retain(|id, _| keep.contains(id));
        assert_eq!(
            EdgeRing::from_edges(edges, ring.anchor()),
            Err(SplitError::TooFewEdges { count: 2 })
        );
    }

    #[test]
    fn from_edges_falls_back_to_lowest_handle() {
        let ring = EdgeRing::from_points(&square()).unwrap();
        let edges = ring.extract_cycle(ring.anchor());
        let copy = EdgeRing::from_edges(edges, EdgeId(99)).unwrap();
        assert_eq!(copy.anchor(), EdgeId(0));
    }

    #[test]
    fn cycle_on_foreign_handle_is_empty() {
        let ring = EdgeRing::from_points(&square()).unwrap();
        assert_eq!(ring.cycle(EdgeId(42)).count(), 0);
    }
}
