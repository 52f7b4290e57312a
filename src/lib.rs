//! detour2d - Collision-free paths by iterative midpoint refinement
//!
//! Plans a path between two points through a plane of polygonal obstacles
//! without a grid or graph search: start from the straight segment, find
//! where it passes through an obstacle, push the midpoint of the obstructed
//! span sideways until both halves are clear, insert that detour vertex,
//! and repeat until every segment is clear. Work scales with the obstructed
//! region, not with the size of the free space.
//!
//! ```
//! use detour2d::{MidpointPlanner, ObstacleSet, PlanOutcome, Point2};
//!
//! let obstacles = ObstacleSet::from_vertex_loops(vec![vec![
//!     Point2::new(4.0, 4.0),
//!     Point2::new(6.0, 4.0),
//!     Point2::new(6.0, 6.0),
//!     Point2::new(4.0, 6.0),
//! ]])
//! .unwrap();
//!
//! let planner = MidpointPlanner::with_defaults();
//! let outcome = planner
//!     .plan(Point2::new(0.0, 5.0), Point2::new(10.0, 5.0), &obstacles)
//!     .unwrap();
//!
//! let PlanOutcome::Converged { path } = outcome else { unreachable!() };
//! assert_eq!(path.len(), 3);
//! ```

/// Default tolerance for coincidence, parallelism, and containment checks
/// when no explicit epsilon is supplied. [`PlanConfig::default`] and
/// [`Obstacle::new`] both use it.
pub const DEFAULT_EPSILON: f64 = 1e-9;

pub mod error;
pub mod intersect;
pub mod obstacle;
pub mod primitives;
pub mod refine;

pub use error::PlanError;
pub use intersect::{segment_crossing, SegmentCrossing};
pub use obstacle::{Obstacle, ObstacleSet, Obstruction};
pub use primitives::{Point2, Segment2, Vec2};
pub use refine::{MidpointPlanner, PlanConfig, PlanOutcome, Snapshot, StuckReason};
