//! Planar polygon stored as a directed-edge ring with a fitted support plane.

use nalgebra::{Point3, Vector3};

use crate::edge_ring::{EdgeId, EdgeRing};
use crate::{Plane, SplitError};

/// Relative threshold below which two consecutive edges count as collinear.
const COLLINEAR_TOLERANCE: f64 = 1e-12;

/// A simple planar polygon in 3D space, possibly concave.
///
/// The boundary is an [`EdgeRing`] holding one closed cycle; the support
/// plane is fitted to its vertices, so its normal follows the winding
/// (counter-clockwise when viewed from the front).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub(crate) ring: EdgeRing,
    pub(crate) support_plane: Plane,
}

impl Polygon {
    /// Creates a polygon from an unclosed ring of vertices.
    ///
    /// Fails if fewer than 3 vertices are given or if they do not span a plane.
    pub fn new(vertices: Vec<Point3<f64>>) -> Result<Self, SplitError> {
        let ring = EdgeRing::from_points(&vertices)?;
        let support_plane = Plane::fit(&vertices)?;
        Ok(Self {
            ring,
            support_plane,
        })
    }

    /// Creates a polygon from an edge ring, refitting the support plane to
    /// the cycle through the ring's anchor.
    pub fn from_ring(ring: EdgeRing) -> Result<Self, SplitError> {
        if ring.len() < 3 {
            return Err(SplitError::TooFewEdges { count: ring.len() });
        }
        let support_plane = Plane::fit(&ring.points(ring.anchor()))?;
        Ok(Self {
            ring,
            support_plane,
        })
    }

    /// Returns the fitted support plane.
    #[inline]
    pub fn plane(&self) -> &Plane {
        &self.support_plane
    }

    /// Returns the unit normal of the support plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.support_plane.normal()
    }

    /// Returns the underlying edge ring.
    #[inline]
    pub fn ring(&self) -> &EdgeRing {
        &self.ring
    }

    /// Returns the edge the boundary walk starts from.
    #[inline]
    pub fn first_edge(&self) -> EdgeId {
        self.ring.anchor()
    }

    /// Returns true if the edge handle is stored in this polygon's ring.
    #[inline]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.ring.contains(edge)
    }

    /// Returns the number of vertices on the boundary.
    pub fn len(&self) -> usize {
        self.ring.cycle(self.first_edge()).count()
    }

    /// Returns true if the polygon has no vertices (always false for valid polygons).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the vertices as an unclosed ring, starting at the first edge.
    pub fn vertices(&self) -> Vec<Point3<f64>> {
        self.ring.points(self.first_edge())
    }

    /// Returns the vertices of the cycle through `edge`, starting there.
    pub fn vertices_from(&self, edge: EdgeId) -> Vec<Point3<f64>> {
        self.ring.points(edge)
    }

    /// Computes the centroid (average of the vertices).
    pub fn centroid(&self) -> Point3<f64> {
        let vertices = self.vertices();
        let sum: Vector3<f64> = vertices.iter().map(|p| p.coords).sum();
        Point3::from(sum / vertices.len().max(1) as f64)
    }

    /// Checks whether every corner turns the same way around the normal.
    ///
    /// Straight corners (collinear consecutive edges) are ignored.
    pub fn is_convex(&self) -> bool {
        let normal = self.normal();
        let mut turn = None;

        for e in self.ring.cycle(self.first_edge()) {
            let next = self.ring.next(e);
            let v1 = self.ring.dest_point(e) - self.ring.source_point(e);
            let v2 = self.ring.dest_point(next) - self.ring.source_point(next);

            let s = normal.dot(&v1.cross(&v2));
            if s.abs() <= COLLINEAR_TOLERANCE * v1.norm() * v2.norm() {
                continue;
            }
            let left = s > 0.0;
            match turn {
                Some(t) if t != left => return false,
                _ => turn = Some(left),
            }
        }

        true
    }
}
