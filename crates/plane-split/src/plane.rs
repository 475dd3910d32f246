//! Plane representation with an adaptive classification tolerance.

use nalgebra::{Point3, Vector3};

use crate::{PlaneSide, SplitError};

/// Suggested tolerance for cutting planes built from measured data.
///
/// Cutting planes start with a tolerance of zero; opt in with
/// [`Plane::with_epsilon`].
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// A plane in 3D space, represented as `normal · point + offset = 0`.
///
/// Points with `|signed_distance| <= eps` are classified as on the plane.
/// A fitted plane widens `eps` until every point it was fitted to lies on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vector3<f64>,
    offset: f64,
    eps: f64,
}

impl Plane {
    /// Creates a plane from a normal vector and offset, with zero tolerance.
    /// The normal is normalized and the offset scaled by the same factor.
    pub fn new(normal: Vector3<f64>, offset: f64) -> Result<Self, SplitError> {
        if !normal.iter().all(|c| c.is_finite()) || !offset.is_finite() {
            return Err(SplitError::InvalidCoordinate);
        }
        let norm = normal.norm();
        if norm <= f64::EPSILON {
            return Err(SplitError::DegenerateNormal);
        }
        Ok(Self {
            normal: normal / norm,
            offset: offset / norm,
            eps: 0.0,
        })
    }

    /// Fits a plane to a closed point ring using Newell's method.
    ///
    /// The normal is the normalized sum of `p[i] × p[i+1]` around the ring,
    /// so it follows the ring's winding. The plane passes through the centroid
    /// and its tolerance covers every input point.
    pub fn fit(points: &[Point3<f64>]) -> Result<Self, SplitError> {
        if points.len() < 3 {
            return Err(SplitError::TooFewPoints {
                count: points.len(),
            });
        }
        if !points.iter().all(|p| p.coords.iter().all(|c| c.is_finite())) {
            return Err(SplitError::InvalidCoordinate);
        }

        let mut sum = Vector3::zeros();
        let mut normal = Vector3::zeros();
        for (i, p) in points.iter().enumerate() {
            let q = &points[(i + 1) % points.len()];
            sum += p.coords;
            normal += p.coords.cross(&q.coords);
        }

        let norm = normal.norm();
        if norm <= f64::EPSILON {
            return Err(SplitError::DegenerateNormal);
        }
        let normal = normal / norm;
        let centroid = sum / points.len() as f64;

        let mut plane = Self {
            normal,
            offset: -normal.dot(&centroid),
            eps: 0.0,
        };
        for p in points {
            plane.widen_tolerance(*p);
        }
        Ok(plane)
    }

    /// Returns a copy of this plane with the given tolerance.
    /// Negative values are clamped to zero.
    pub fn with_epsilon(mut self, eps: f64) -> Self {
        self.eps = eps.max(0.0);
        self
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Returns the plane constant `d` in `normal · p + d = 0`.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Returns the classification tolerance.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.eps
    }

    /// Grows the tolerance so that `point` classifies as on the plane.
    pub fn widen_tolerance(&mut self, point: Point3<f64>) {
        let dist = self.signed_distance(point).abs();
        if dist > self.eps {
            self.eps = dist;
        }
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is above (same side as normal)
    /// - Negative: point is below
    #[inline]
    pub fn signed_distance(&self, point: Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) + self.offset
    }

    /// Classifies which side of the plane a point lies on.
    pub fn classify(&self, point: Point3<f64>) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist < -self.eps {
            PlaneSide::Below
        } else if dist > self.eps {
            PlaneSide::Above
        } else {
            PlaneSide::On
        }
    }

    /// Computes where the segment `p`–`q` meets the plane.
    ///
    /// Returns `None` if the segment is parallel to the plane or the
    /// crossing point lies outside the segment.
    pub fn intersect(&self, p: Point3<f64>, q: Point3<f64>) -> Option<Point3<f64>> {
        let direction = q - p;
        let denom = self.normal.dot(&direction);

        if denom == 0.0 {
            return None;
        }

        let t = -self.signed_distance(p) / denom;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        Some(p + direction * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[[f64; 3]]) -> Vec<Point3<f64>> {
        coords.iter().map(|c| Point3::new(c[0], c[1], c[2])).collect()
    }

    #[test]
    fn new_normalizes_normal_and_offset() {
        let plane = Plane::new(Vector3::new(0.0, 2.0, 0.0), -2.0).unwrap();
        assert_eq!(plane.normal(), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(plane.offset(), -1.0);
        assert_eq!(plane.epsilon(), 0.0);
        assert_eq!(plane.classify(Point3::new(5.0, 1.0, -3.0)), PlaneSide::On);
    }

    #[test]
    fn new_rejects_zero_normal() {
        assert_eq!(
            Plane::new(Vector3::zeros(), 1.0),
            Err(SplitError::DegenerateNormal)
        );
    }

    #[test]
    fn fit_follows_winding() {
        let ccw = pts(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
        let plane = Plane::fit(&ccw).unwrap();
        assert!((plane.normal() - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
        assert!(plane.offset().abs() < 1e-12);

        let cw: Vec<_> = ccw.into_iter().rev().collect();
        let plane = Plane::fit(&cw).unwrap();
        assert!((plane.normal() - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn fit_offset_passes_through_centroid() {
        let ring = pts(&[[0.0, 0.0, 3.0], [2.0, 0.0, 3.0], [2.0, 2.0, 3.0], [0.0, 2.0, 3.0]]);
        let plane = Plane::fit(&ring).unwrap();
        assert!((plane.offset() + 3.0).abs() < 1e-12);
        assert!(plane.signed_distance(Point3::new(1.0, 1.0, 3.0)).abs() < 1e-12);
    }

    #[test]
    fn fit_rejects_too_few_points() {
        let ring = pts(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert_eq!(Plane::fit(&ring), Err(SplitError::TooFewPoints { count: 2 }));
    }

    #[test]
    fn fit_rejects_collinear_points() {
        let ring = pts(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]]);
        assert_eq!(Plane::fit(&ring), Err(SplitError::DegenerateNormal));
    }

    #[test]
    fn fit_rejects_non_finite_points() {
        let ring = pts(&[[0.0, 0.0, 0.0], [1.0, f64::NAN, 0.0], [1.0, 1.0, 0.0]]);
        assert_eq!(Plane::fit(&ring), Err(SplitError::InvalidCoordinate));
    }

    #[test]
    fn fitted_points_classify_on() {
        // Slightly warped, tilted ring: the tolerance must absorb the warp.
        let ring = pts(&[
            [0.1, 0.3, 0.7],
            [2.9, 0.2, 1.3],
            [3.1, 2.7, 2.05],
            [0.2, 3.3, 1.4],
            [-0.4, 1.7, 0.9],
        ]);
        let plane = Plane::fit(&ring).unwrap();
        assert!(plane.epsilon() > 0.0);
        for p in &ring {
            assert_eq!(plane.classify(*p), PlaneSide::On, "point {p} not on fitted plane");
        }
    }

    #[test]
    fn classify_respects_epsilon() {
        let plane = Plane::new(Vector3::new(0.0, 0.0, 1.0), 0.0)
            .unwrap()
            .with_epsilon(0.1);
        assert_eq!(plane.classify(Point3::new(0.0, 0.0, 0.05)), PlaneSide::On);
        assert_eq!(plane.classify(Point3::new(0.0, 0.0, -0.05)), PlaneSide::On);
        assert_eq!(plane.classify(Point3::new(0.0, 0.0, 0.2)), PlaneSide::Above);
        assert_eq!(plane.classify(Point3::new(0.0, 0.0, -0.2)), PlaneSide::Below);
    }

    #[test]
    fn with_epsilon_clamps_negative() {
        let plane = Plane::new(Vector3::new(1.0, 0.0, 0.0), 0.0)
            .unwrap()
            .with_epsilon(-1.0);
        assert_eq!(plane.epsilon(), 0.0);
    }

    #[test]
    fn intersect_crossing_segment() {
        let plane = Plane::new(Vector3::new(0.0, 1.0, 0.0), -1.0).unwrap();
        let hit = plane
            .intersect(Point3::new(2.0, 0.0, 0.0), Point3::new(2.0, 2.0, 0.0))
            .unwrap();
        assert_eq!(hit, Point3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn intersect_parallel_segment_is_none() {
        let plane = Plane::new(Vector3::new(0.0, 1.0, 0.0), 0.0).unwrap();
        let p = Point3::new(0.0, 3.0, 0.0);
        let q = Point3::new(4.0, 3.0, 1.0);
        assert_eq!(plane.classify(p), PlaneSide::Above);
        assert_eq!(plane.classify(q), PlaneSide::Above);
        assert_eq!(plane.intersect(p, q), None);
    }

    #[test]
    fn intersect_segment_wholly_above_is_none() {
        let plane = Plane::new(Vector3::new(0.0, 1.0, 0.0), 0.0).unwrap();
        let p = Point3::new(0.0, 3.0, 0.0);
        let q = Point3::new(0.0, 5.0, 0.0);
        assert_eq!(plane.intersect(p, q), None);
    }
}
