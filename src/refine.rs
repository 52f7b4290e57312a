//! The iterative midpoint-refinement planner.
//!
//! Starting from the straight segment between start and end, the planner
//! scans the path for the first segment that passes through an obstacle,
//! pushes the midpoint of the obstructed span sideways until both halves
//! are clear, inserts that detour vertex, and re-scans. The loop terminates
//! when every segment is clear (converged), when no detour can be found
//! within the search radius (unresolvable), or when the insertion cap is
//! exceeded (likely oscillation).
//!
//! The work done is proportional to the obstructed region — there is no
//! grid, no discretization of free space, and no global search.

use crate::error::PlanError;
use crate::obstacle::{ObstacleSet, Obstruction};
use crate::primitives::{Point2, Segment2, Vec2};
use num_traits::Float;

/// Tuning parameters for a planning pass.
///
/// The defaults mirror a scene measured in units of roughly 1–10: a lateral
/// step of 0.2 and a search radius of 4 give twenty candidate offsets per
/// side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanConfig<F> {
    /// Maximum number of detour vertices inserted before the pass is
    /// declared stuck. Bounds runtime against oscillating configurations.
    pub max_insertions: usize,
    /// How far a detour candidate may be pushed from the obstructed span's
    /// midpoint, along either normal.
    pub max_search_radius: F,
    /// Increment between successive detour candidates along a normal.
    pub step_size: F,
    /// Tolerance for parallelism, endpoint contact, and boundary
    /// containment tests.
    pub epsilon: F,
}

impl<F: Float> Default for PlanConfig<F> {
    fn default() -> Self {
        Self {
            max_insertions: 256,
            max_search_radius: F::from(4.0).unwrap(),
            step_size: F::from(0.2).unwrap(),
            epsilon: F::from(crate::DEFAULT_EPSILON).unwrap(),
        }
    }
}

/// Why a planning pass got stuck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StuckReason {
    /// No clear detour point exists within the search radius on either side
    /// of the obstructed pair. A hard geometric dead end at this radius;
    /// retrying with a larger `max_search_radius` may succeed.
    Unresolvable {
        /// Index of the first vertex of the obstructed pair.
        pair: usize,
        /// Index of the obstructing obstacle in the set.
        obstacle: usize,
    },
    /// The insertion cap was exceeded before convergence. Unlike
    /// `Unresolvable` this usually indicates oscillation between obstacles
    /// rather than a dead end.
    IterationLimit {
        /// Insertions performed before giving up.
        insertions: usize,
    },
}

/// Outcome of a planning pass.
///
/// `Stuck` is an ordinary outcome, not an error: the partial path is
/// meaningful for diagnostics and the caller may retry with a different
/// [`PlanConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome<F> {
    /// Every consecutive pair of the path is clear of every obstacle.
    Converged {
        /// The collision-free path, `[start, .., end]`.
        path: Vec<Point2<F>>,
    },
    /// Refinement could not complete.
    Stuck {
        /// Path state at the point of failure; endpoints are still intact.
        partial: Vec<Point2<F>>,
        /// What went wrong.
        reason: StuckReason,
    },
}

impl<F> PlanOutcome<F> {
    /// The path regardless of outcome — converged result or partial state.
    pub fn path(&self) -> &[Point2<F>] {
        match self {
            PlanOutcome::Converged { path } => path,
            PlanOutcome::Stuck { partial, .. } => partial,
        }
    }

    /// Returns `true` for a converged outcome.
    pub fn is_converged(&self) -> bool {
        matches!(self, PlanOutcome::Converged { .. })
    }
}

/// A per-insertion snapshot emitted to an observer, sufficient for a
/// presentation layer to animate the refinement frame by frame.
#[derive(Debug)]
pub struct Snapshot<'a, F> {
    /// The path after the insertion.
    pub path: &'a [Point2<F>],
    /// The vertex just inserted.
    pub inserted: Point2<F>,
    /// Index of the obstacle the insertion routed around.
    pub obstacle: usize,
}

/// The midpoint-refinement planner.
///
/// Holds only configuration; one `plan` call runs one full pass and owns its
/// path exclusively for the duration, while the obstacle set is shared
/// read-only.
#[derive(Debug, Clone)]
pub struct MidpointPlanner<F> {
    config: PlanConfig<F>,
}

impl<F: Float + std::fmt::Debug> MidpointPlanner<F> {
    /// Creates a planner with the given configuration.
    pub fn new(config: PlanConfig<F>) -> Self {
        Self { config }
    }

    /// Creates a planner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlanConfig::default())
    }

    /// The active configuration.
    pub fn config(&self) -> &PlanConfig<F> {
        &self.config
    }

    /// Plans a collision-free path from `start` to `end`.
    ///
    /// Input validation failures (coincident endpoints, an endpoint inside
    /// an obstacle) are errors; a pass that runs but cannot complete returns
    /// `Ok` with a [`PlanOutcome::Stuck`].
    pub fn plan(
        &self,
        start: Point2<F>,
        end: Point2<F>,
        obstacles: &ObstacleSet<F>,
    ) -> Result<PlanOutcome<F>, PlanError> {
        self.plan_with_observer(start, end, obstacles, |_| {})
    }

    /// Like [`plan`](Self::plan), but invokes `observer` after every vertex
    /// insertion. This is the entire interface an animation or plotting
    /// layer needs.
    pub fn plan_with_observer<O>(
        &self,
        start: Point2<F>,
        end: Point2<F>,
        obstacles: &ObstacleSet<F>,
        observer: O,
    ) -> Result<PlanOutcome<F>, PlanError>
    where
        O: FnMut(&Snapshot<'_, F>),
    {
        let eps = self.config.epsilon;
        if start.approx_eq(end, eps) {
            return Err(PlanError::DegenerateEndpoints);
        }

        self.refine_with_observer(vec![start, end], obstacles, observer)
    }

    /// Resumes refinement of an existing path.
    ///
    /// Running this on an already-clear path reports `Converged` after a
    /// single scan with zero insertions, so re-planning a converged result
    /// is idempotent. Useful for re-validating a path after external
    /// changes.
    pub fn refine(
        &self,
        path: Vec<Point2<F>>,
        obstacles: &ObstacleSet<F>,
    ) -> Result<PlanOutcome<F>, PlanError> {
        self.refine_with_observer(path, obstacles, |_| {})
    }

    /// [`refine`](Self::refine) with a per-insertion observer.
    pub fn refine_with_observer<O>(
        &self,
        mut path: Vec<Point2<F>>,
        obstacles: &ObstacleSet<F>,
        mut observer: O,
    ) -> Result<PlanOutcome<F>, PlanError>
    where
        O: FnMut(&Snapshot<'_, F>),
    {
        let eps = self.config.epsilon;

        if path.len() < 2 {
            return Err(PlanError::PathTooShort { count: path.len() });
        }
        for endpoint in [path[0], path[path.len() - 1]] {
            if let Some(obstacle) = obstacles.containing(endpoint, eps) {
                return Err(PlanError::EndpointInsideObstacle { obstacle });
            }
        }

        let mut insertions = 0usize;

        loop {
            // Scanning: first obstructed pair in path order wins.
            let Some((pair, obstruction)) = self.scan(&path, obstacles) else {
                tracing::debug!(vertices = path.len(), insertions, "path converged");
                return Ok(PlanOutcome::Converged { path });
            };

            if insertions >= self.config.max_insertions {
                tracing::warn!(
                    insertions,
                    pair,
                    obstacle = obstruction.obstacle,
                    "insertion cap exceeded before convergence"
                );
                return Ok(PlanOutcome::Stuck {
                    partial: path,
                    reason: StuckReason::IterationLimit { insertions },
                });
            }

            // Refining: push the obstructed span's midpoint sideways.
            let a = path[pair];
            let b = path[pair + 1];
            let Some(detour) = self.detour_vertex(a, b, &obstruction, obstacles) else {
                tracing::warn!(
                    pair,
                    obstacle = obstruction.obstacle,
                    radius = ?self.config.max_search_radius,
                    "no clear detour within search radius"
                );
                return Ok(PlanOutcome::Stuck {
                    partial: path,
                    reason: StuckReason::Unresolvable {
                        pair,
                        obstacle: obstruction.obstacle,
                    },
                });
            };

            path.insert(pair + 1, detour);
            insertions += 1;
            tracing::trace!(?detour, pair, obstacle = obstruction.obstacle, "inserted detour vertex");
            observer(&Snapshot {
                path: &path,
                inserted: detour,
                obstacle: obstruction.obstacle,
            });
        }
    }

    /// Walks consecutive path pairs in order and returns the first
    /// obstructed one, with its obstruction.
    fn scan(
        &self,
        path: &[Point2<F>],
        obstacles: &ObstacleSet<F>,
    ) -> Option<(usize, Obstruction<F>)> {
        let eps = self.config.epsilon;
        for pair in 0..path.len() - 1 {
            let segment = Segment2::new(path[pair], path[pair + 1]);
            if let Some(obstruction) = obstacles.first_obstruction(segment, eps) {
                return Some((pair, obstruction));
            }
        }
        None
    }

    /// Finds the detour vertex for an obstructed pair `(a, b)`.
    ///
    /// The candidate origin is the midpoint of the chord between the
    /// outermost boundary crossings (entry and exit). For concave obstacles
    /// this deliberately treats the whole span between the outermost
    /// crossings as obstructed, ignoring intermediate re-entries. With
    /// fewer than two crossings (segment engulfed, or a single grazing
    /// crossing) `a` and `b` themselves stand in for entry and exit.
    ///
    /// From that origin the planner marches outward along both unit normals
    /// of `(a, b)` and keeps the side whose detour `|a-m| + |m-b|` is
    /// shorter. An exact tie goes to the counter-clockwise normal.
    fn detour_vertex(
        &self,
        a: Point2<F>,
        b: Point2<F>,
        obstruction: &Obstruction<F>,
        obstacles: &ObstacleSet<F>,
    ) -> Option<Point2<F>> {
        let (entry, exit) = match obstruction.crossings.as_slice() {
            [first, .., last] => (first.0, last.0),
            _ => (a, b),
        };
        let origin = entry.midpoint(exit);

        let normal = (b - a).normalize()?.perpendicular();

        let mut best: Option<(Point2<F>, F)> = None;
        for side in [normal, -normal] {
            let Some(candidate) = self.march(origin, side, a, b, obstacles) else {
                continue;
            };
            let detour_len = a.distance(candidate) + candidate.distance(b);
            match best {
                // Strict improvement only, so the CCW side wins ties.
                Some((_, len)) if detour_len + self.config.epsilon >= len => {}
                _ => best = Some((candidate, detour_len)),
            }
        }

        best.map(|(candidate, _)| candidate)
    }

    /// Marches from `origin` along `direction` in `step_size` increments up
    /// to `max_search_radius`, returning the first offset point that lies
    /// outside every obstacle and from which both sub-segments to `a` and
    /// `b` are clear of the full obstacle set.
    ///
    /// The containment check on the candidate itself matters when the origin
    /// starts inside an obstacle (the engulfed fallback): sub-segments
    /// ending at such a point can graze the boundary without a proper
    /// crossing, so clearance alone would accept it.
    fn march(
        &self,
        origin: Point2<F>,
        direction: Vec2<F>,
        a: Point2<F>,
        b: Point2<F>,
        obstacles: &ObstacleSet<F>,
    ) -> Option<Point2<F>> {
        let eps = self.config.epsilon;
        let mut offset = F::zero();

        while offset <= self.config.max_search_radius {
            let candidate = origin + direction * offset;
            let clear = obstacles.containing(candidate, eps).is_none()
                && obstacles.is_segment_clear(Segment2::new(a, candidate), eps)
                && obstacles.is_segment_clear(Segment2::new(candidate, b), eps);
            // The candidate must also be a genuinely new vertex.
            if clear && !candidate.approx_eq(a, eps) && !candidate.approx_eq(b, eps) {
                return Some(candidate);
            }
            offset = offset + self.config.step_size;
        }

        None
    }
}
