//! Classification of a polygon against a cutting plane, edge splitting,
//! bridging and the complex (concave) cut.
//!
//! A complex cut works in three steps:
//!
//! 1. Every boundary vertex on the cutting plane, original or created by
//!    splitting a crossing edge, is collected and sorted along the cut line.
//! 2. Walking that order, vertices where the boundary enters the lower side
//!    are paired with the next vertex where it returns to the upper side.
//!    Each pair is joined by a bridge: two new opposite edges that carve the
//!    ring into two cycles.
//! 3. Each resulting cycle is copied out as a new polygon and filed as above
//!    or below depending on where its boundary heads after leaving the plane.

use std::cmp::Ordering;

use log::{debug, trace, warn};
use nalgebra::{Point3, Vector3};

use crate::edge_ring::{EdgeId, EdgeRing};
use crate::{Plane, PlaneSide, Polygon, SplitError};

/// Result of [`Polygon::classify_points`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonClassification {
    /// OR of the sides of every original vertex.
    pub side: PlaneSide,
    /// Edges whose source lies on the cutting plane, in boundary order.
    pub on_plane_edges: Vec<EdgeId>,
}

/// Position along the cut line, measured from the first on-plane vertex.
///
/// Lives for a single complex cut. Vertices added by bridges are measured
/// the same way as the original ones.
struct CutOrder {
    origin: Point3<f64>,
    direction: Vector3<f64>,
}

impl CutOrder {
    fn position(&self, point: Point3<f64>) -> f64 {
        self.direction.dot(&(point - self.origin))
    }

    /// True if `a`'s source comes strictly before `b`'s along the cut line.
    fn before(&self, ring: &EdgeRing, a: EdgeId, b: EdgeId) -> bool {
        self.position(ring.source_point(a)) < self.position(ring.source_point(b))
    }
}

impl Polygon {
    /// Assigns every vertex a side of `cut` and splits every edge that
    /// crosses it.
    ///
    /// Each crossing edge is split exactly once; the inserted vertex is
    /// marked [`PlaneSide::On`]. Every on-plane vertex appears exactly once
    /// in the returned edge list.
    pub fn classify_points(&mut self, cut: &Plane) -> Result<PolygonClassification, SplitError> {
        let first = self.ring.anchor();
        let first_side = cut.classify(self.ring.source_point(first));
        self.ring.set_side(first, first_side);

        let mut side = first_side;
        let mut on_plane_edges = Vec::new();
        let mut d = first;
        loop {
            let next = self.ring.next(d);
            let next_side = cut.classify(self.ring.source_point(next));
            self.ring.set_side(next, next_side);
            side |= next_side;

            if self.ring.edge_side(d) == PlaneSide::AboveBelow {
                d = self.split_edge(cut, d)?;
                self.ring.set_side(d, PlaneSide::On);
                on_plane_edges.push(d);
            } else if self.ring.source_side(d) == PlaneSide::On {
                on_plane_edges.push(d);
            }

            d = self.ring.next(d);
            if d == first {
                break;
            }
        }

        debug_assert!(
            on_plane_edges
                .iter()
                .all(|&e| self.ring.source_side(e) == PlaneSide::On)
        );
        debug!(
            "classified polygon as {:?} with {} on-plane edge(s)",
            side,
            on_plane_edges.len()
        );
        Ok(PolygonClassification {
            side,
            on_plane_edges,
        })
    }

    /// Splits an edge whose endpoints lie strictly on opposite sides of
    /// `cut`, returning the new edge that starts at the crossing point.
    pub fn split_edge(&mut self, cut: &Plane, edge: EdgeId) -> Result<EdgeId, SplitError> {
        let src = self.ring.source_point(edge);
        let dst = self.ring.dest_point(edge);
        if cut.signed_distance(src) * cut.signed_distance(dst) >= 0.0 {
            return Err(SplitError::NotCrossing);
        }

        let point = cut.intersect(src, dst).ok_or(SplitError::NotCrossing)?;
        trace!("splitting edge {:?} at {}", edge, point);
        Ok(self.ring.split_edge(edge, point))
    }

    /// Joins two on-plane vertices with a pair of opposite edges, carving the
    /// cycle holding them into two cycles.
    ///
    /// `below` must be where the boundary enters the lower side, `above`
    /// where it returns. The cycle through `below` keeps the lower part.
    /// Returns the new edge that now precedes `below`, which starts at
    /// `above`'s vertex.
    pub fn add_bridge(&mut self, below: EdgeId, above: EdgeId) -> Result<EdgeId, SplitError> {
        if below == above
            || self.ring.source_side(below) != PlaneSide::On
            || self.ring.source_side(above) != PlaneSide::On
        {
            return Err(SplitError::CannotBridge);
        }

        let below_prev = self.ring.prev(below);
        let above_prev = self.ring.prev(above);

        let on_above = self
            .ring
            .append_after(self.ring.source_point(below), below_prev);
        let on_below = self
            .ring
            .append_after(self.ring.source_point(above), above_prev);
        self.ring.close_cycle(above, on_above);
        self.ring.close_cycle(below, on_below);

        self.ring.set_side(on_above, PlaneSide::On);
        self.ring.set_side(on_below, PlaneSide::On);
        trace!("bridged {:?} -> {:?}", below, above);

        self.maximize(self.ring.prev(on_above));
        self.maximize(on_below);
        Ok(on_below)
    }

    /// Merges `edge` with its successors while they run along the cutting
    /// plane, dropping the vertices between them.
    fn maximize(&mut self, edge: EdgeId) {
        loop {
            let middle = self.ring.next(edge);
            let after = self.ring.next(middle);
            if middle == edge
                || after == edge
                || self.ring.source_side(edge) != PlaneSide::On
                || self.ring.source_side(middle) != PlaneSide::On
                || self.ring.source_side(after) != PlaneSide::On
            {
                break;
            }
            self.ring.close_cycle(after, edge);
            self.ring.remove(middle);
        }
    }

    /// Cuts a polygon whose boundary crosses `cut`, returning the
    /// `(above, below)` fragments.
    ///
    /// `on_plane_edges` is the list produced by [`Polygon::classify_points`]
    /// for the same plane. The ring is rewired in place, so the polygon is
    /// only useful as a source of the returned fragments afterwards.
    pub fn complex_cut(
        &mut self,
        cut: &Plane,
        mut on_plane_edges: Vec<EdgeId>,
    ) -> Result<(Vec<Polygon>, Vec<Polygon>), SplitError> {
        if on_plane_edges.len() < 2 {
            return Err(SplitError::NotSimple {
                on_plane_edges: on_plane_edges.len(),
            });
        }

        let cut_dir = cut.normal().cross(&self.support_plane.normal());
        let order = self.sort_along(&mut on_plane_edges, cut_dir);

        let mut cursor = 0;
        let mut reuse = None;
        let mut bridges = 0;
        loop {
            let src = match reuse.take() {
                Some(edge) => edge,
                None => match self.source_edge(&on_plane_edges, &mut cursor, &order) {
                    Some(edge) => edge,
                    None => break,
                },
            };
            let dst = self
                .destination_edge(&on_plane_edges, &mut cursor, &order)
                .ok_or(SplitError::MissingDestination)?;

            let bridge = self.add_bridge(src, dst)?;
            bridges += 1;

            // The boundary may touch the plane again right next to the bridge.
            if self.ring.source_side(self.ring.prev(bridge)) == PlaneSide::Above {
                reuse = Some(bridge);
            } else if self.ring.contains(dst) && self.ring.dest_side(dst) == PlaneSide::Below {
                reuse = Some(dst);
            }
        }

        let mut above: Vec<Polygon> = Vec::new();
        let mut below: Vec<Polygon> = Vec::new();
        for &edge in &on_plane_edges {
            if !self.ring.contains(edge) || self.ring.source_side(edge) != PlaneSide::On {
                continue;
            }
            if above.iter().chain(&below).any(|p| p.contains_edge(edge)) {
                continue;
            }
            let bucket = match self.ring.dest_side(edge) {
                PlaneSide::Above => &mut above,
                PlaneSide::Below => &mut below,
                _ => continue,
            };
            let ring = EdgeRing::from_edges(self.ring.extract_cycle(edge), edge)?;
            bucket.push(Polygon::from_ring(ring)?);
        }
        check_fragments(&above, &below)?;

        debug!(
            "complex cut: {} bridge(s), {} above, {} below",
            bridges,
            above.len(),
            below.len()
        );
        Ok((above, below))
    }

    /// Sorts on-plane edges along `cut_dir`, measured from the first one.
    /// Ties put above-sided edges last.
    fn sort_along(&self, edges: &mut [EdgeId], cut_dir: Vector3<f64>) -> CutOrder {
        let order = CutOrder {
            origin: self.ring.source_point(edges[0]),
            direction: cut_dir,
        };

        edges.sort_by(|a, b| {
            let ta = order.position(self.ring.source_point(*a));
            let tb = order.position(self.ring.source_point(*b));
            ta.partial_cmp(&tb).unwrap_or(Ordering::Equal).then_with(|| {
                let a_above = self.ring.source_side(*a) == PlaneSide::Above;
                let b_above = self.ring.source_side(*b) == PlaneSide::Above;
                a_above.cmp(&b_above)
            })
        });
        order
    }

    /// Finds the next on-plane edge, from `cursor` on, where the boundary
    /// passes from the upper to the lower side. Advances `cursor` past it.
    fn source_edge(&self, edges: &[EdgeId], cursor: &mut usize, order: &CutOrder) -> Option<EdgeId> {
        self.scan(edges, cursor, |ring, e| {
            let prev = ring.prev(e);
            let next = ring.next(e);
            match (ring.source_side(prev), ring.source_side(next)) {
                (PlaneSide::Above, PlaneSide::Below) => true,
                (PlaneSide::Above, PlaneSide::On) => order.before(ring, next, e),
                (PlaneSide::On, PlaneSide::Below) => order.before(ring, prev, e),
                _ => false,
            }
        })
    }

    /// Finds the next on-plane edge, from `cursor` on, that closes a cut
    /// opened by a source edge. Advances `cursor` past it.
    fn destination_edge(
        &self,
        edges: &[EdgeId],
        cursor: &mut usize,
        order: &CutOrder,
    ) -> Option<EdgeId> {
        self.scan(edges, cursor, |ring, e| {
            let prev = ring.prev(e);
            let next = ring.next(e);
            match (ring.source_side(prev), ring.source_side(next)) {
                (PlaneSide::Below, PlaneSide::Above)
                | (PlaneSide::Below, PlaneSide::Below)
                | (PlaneSide::Above, PlaneSide::Above) => true,
                (PlaneSide::Below, PlaneSide::On) => order.before(ring, e, next),
                (PlaneSide::On, PlaneSide::Above) => order.before(ring, e, prev),
                _ => false,
            }
        })
    }

    fn scan<F>(&self, edges: &[EdgeId], cursor: &mut usize, matches: F) -> Option<EdgeId>
    where
        F: Fn(&EdgeRing, EdgeId) -> bool,
    {
        while *cursor < edges.len() {
            let e = edges[*cursor];
            *cursor += 1;
            // Edges merged away by an earlier bridge are gone from the ring.
            if self.ring.contains(e) && matches(&self.ring, e) {
                return Some(e);
            }
        }
        None
    }

    /// OR of the sides recorded on the boundary by the last classification.
    fn recorded_side(&self) -> PlaneSide {
        self.ring
            .cycle(self.first_edge())
            .fold(PlaneSide::Nowhere, |side, e| side | self.ring.source_side(e))
    }
}

/// Rejects a cut whose fragments reach across the plane into the other bucket.
fn check_fragments(above: &[Polygon], below: &[Polygon]) -> Result<(), SplitError> {
    let misplaced = above
        .iter()
        .any(|p| p.recorded_side().contains(PlaneSide::Below))
        || below
            .iter()
            .any(|p| p.recorded_side().contains(PlaneSide::Above));
    if misplaced {
        warn!("complex cut produced a fragment on both sides of the plane");
        return Err(SplitError::FragmentCrossesPlane);
    }
    Ok(())
}
