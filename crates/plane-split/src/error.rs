//! Error type shared by polygon construction and plane splitting.

use thiserror::Error;

/// Everything that can go wrong while building or splitting a polygon.
///
/// A split that returns an error leaves the consumed polygon's ring in an
/// unspecified state; no partial fragments are ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    /// A ring or plane fit was given fewer than three points.
    #[error("a polygon needs at least 3 vertices, got {count}")]
    TooFewPoints { count: usize },

    /// An edge collection adopted as a ring holds fewer than three edges.
    #[error("a polygon needs at least 3 edges, got {count}")]
    TooFewEdges { count: usize },

    /// The fitted or supplied plane normal has zero length.
    #[error("plane normal is degenerate (zero length)")]
    DegenerateNormal,

    /// A point carries a NaN or infinite coordinate.
    #[error("point has a NaN or infinite coordinate")]
    InvalidCoordinate,

    /// The polygon crosses the plane but touches it in fewer than two places.
    #[error("polygon is not simple: crossing cut with {on_plane_edges} on-plane edge(s)")]
    NotSimple { on_plane_edges: usize },

    /// Two bridge endpoints were identical or not both on the cutting plane.
    #[error("cannot bridge edges that are identical or not on the cutting plane")]
    CannotBridge,

    /// An edge was asked to split although its endpoints do not straddle the plane.
    #[error("edge does not cross the cutting plane")]
    NotCrossing,

    /// The pairing scan found a bridge source without a matching destination.
    #[error("no destination edge found to close the cut")]
    MissingDestination,

    /// A complex cut produced a fragment with vertices on both sides of the plane.
    #[error("cut fragment has vertices on both sides of the cutting plane")]
    FragmentCrossesPlane,
}
