//! Splitting polygons by a plane into above, on and below fragments.

use log::{debug, warn};

use crate::{Plane, PlaneSide, Polygon, SplitError};

/// Fragments produced by splitting one polygon, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitResult {
    /// Fragments on the positive side of the cutting plane.
    pub above: Vec<Polygon>,
    /// Polygons lying in the cutting plane (see [`split_polygon`]).
    pub on: Vec<Polygon>,
    /// Fragments on the negative side of the cutting plane.
    pub below: Vec<Polygon>,
}

impl SplitResult {
    /// Returns the total number of fragments across all three buckets.
    pub fn len(&self) -> usize {
        self.above.len() + self.on.len() + self.below.len()
    }

    /// Returns true if no fragment was produced.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every fragment: above first, then on, then below.
    pub fn iter(&self) -> impl Iterator<Item = &Polygon> {
        self.above.iter().chain(self.on.iter()).chain(self.below.iter())
    }
}

/// Trait for geometry that can be split by a plane.
pub trait Splittable {
    /// Splits the geometry by a plane.
    ///
    /// # Return values by classification
    ///
    /// - **Above** or touching from above: `above = [self]`
    /// - **Coplanar** or touching from below: `on = [self]`
    /// - **Below**: `below = [self]`
    /// - **Crossing**: one or more fragments in `above` and in `below`
    fn split(self, plane: &Plane) -> Result<SplitResult, SplitError>;
}

impl Splittable for Polygon {
    fn split(self, plane: &Plane) -> Result<SplitResult, SplitError> {
        split_polygon(self, plane)
    }
}

impl Splittable for &Polygon {
    fn split(self, plane: &Plane) -> Result<SplitResult, SplitError> {
        split_polygon(self.clone(), plane)
    }
}

/// Splits `polygon` by `cut`.
///
/// A polygon that only touches the plane goes whole into one bucket: touching
/// from above files it under `above`, touching from below files it under `on`,
/// like a polygon lying in the plane. A polygon crossing the plane is cut into
/// as many fragments as its concavity requires.
///
/// The polygon is consumed; on error no fragments are returned.
pub fn split_polygon(mut polygon: Polygon, cut: &Plane) -> Result<SplitResult, SplitError> {
    let mut result = SplitResult::default();
    let classification = polygon.classify_points(cut)?;

    match classification.side {
        PlaneSide::OnAbove | PlaneSide::Above => result.above.push(polygon),
        PlaneSide::On | PlaneSide::OnBelow => result.on.push(polygon),
        PlaneSide::Below => result.below.push(polygon),
        PlaneSide::Nowhere | PlaneSide::AboveBelow | PlaneSide::Cross => {
            let on_plane_edges = classification.on_plane_edges;
            if on_plane_edges.len() < 2 {
                warn!(
                    "rejecting split: crossing polygon has {} on-plane edge(s)",
                    on_plane_edges.len()
                );
                return Err(SplitError::NotSimple {
                    on_plane_edges: on_plane_edges.len(),
                });
            }
            let (above, below) = polygon.complex_cut(cut, on_plane_edges)?;
            result.above = above;
            result.below = below;
        }
    }

    debug!(
        "split into {} above, {} on, {} below",
        result.above.len(),
        result.on.len(),
        result.below.len()
    );
    Ok(result)
}
