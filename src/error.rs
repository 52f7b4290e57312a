//! Error types for planning input validation.

use thiserror::Error;

/// Errors raised when the planning inputs are rejected before any refinement
/// takes place.
///
/// Note that a planner that runs but fails to find a clear path does *not*
/// produce one of these errors; it reports a
/// [`Stuck`](crate::refine::PlanOutcome::Stuck) outcome carrying the partial
/// path instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Start and end coincide (within tolerance).
    #[error("degenerate input: start and end points coincide")]
    DegenerateEndpoints,

    /// An obstacle polygon has fewer than three vertices.
    #[error("obstacle has too few vertices ({count}, need at least 3)")]
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },

    /// Two consecutive obstacle vertices coincide.
    #[error("obstacle has coincident consecutive vertices at index {index}")]
    DuplicateVertex {
        /// Index of the first of the coincident pair.
        index: usize,
    },

    /// The start or end point lies inside an obstacle, so no clear path can
    /// terminate there.
    #[error("path endpoint lies inside obstacle {obstacle}")]
    EndpointInsideObstacle {
        /// Index of the offending obstacle in the set.
        obstacle: usize,
    },

    /// A path handed to [`refine`](crate::refine::MidpointPlanner::refine)
    /// has fewer than two vertices.
    #[error("path has too few vertices ({count}, need at least 2)")]
    PathTooShort {
        /// Number of vertices supplied.
        count: usize,
    },
}
