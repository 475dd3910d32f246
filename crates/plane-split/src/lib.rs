//! Splitting planar 3D polygons by a plane, including concave polygons whose
//! cut yields several disjoint fragments.
//!
//! # Example
//!
//! ```
//! use nalgebra::Vector3;
//! use plane_split::{split_polygon, Plane, Polygon};
//!
//! let u_shape = Polygon::new(plane_split::shapes::comb(2))?;
//! let cut = Plane::new(Vector3::new(0.0, 1.0, 0.0), -1.5)?;
//!
//! let result = split_polygon(u_shape, &cut)?;
//! assert_eq!(result.above.len(), 2);
//! assert_eq!(result.below.len(), 1);
//! assert!(result.on.is_empty());
//! # Ok::<(), plane_split::SplitError>(())
//! ```
//!
//! # Architecture
//!
//! - [`Plane`]: plane equation with an adaptive tolerance, fitted with Newell's method
//! - [`PlaneSide`]: bit-flag side classification
//! - [`EdgeRing`]: polygon boundary as a cyclic directed-edge arena
//! - [`Polygon`]: edge ring plus support plane; classification, bridging, complex cut
//! - [`split_polygon`] / [`Splittable`]: the top-level split

mod cut;
pub mod edge_ring;
mod error;
mod plane;
mod polygon;
pub mod shapes;
mod side;
mod split;

pub use cut::PolygonClassification;
pub use edge_ring::{Edge, EdgeId, EdgeRing};
pub use error::SplitError;
pub use plane::{Plane, DEFAULT_EPSILON};
pub use polygon::Polygon;
pub use side::PlaneSide;
pub use split::{split_polygon, SplitResult, Splittable};
