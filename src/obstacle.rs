//! Obstacle polygons and the read-only obstacle set the planner queries.

use crate::error::PlanError;
use crate::intersect::{segment_crossing, SegmentCrossing};
use crate::primitives::{Point2, Segment2};
use num_traits::Float;
use std::cmp::Ordering;

/// A closed polygonal obstacle.
///
/// Vertices are stored in order; the polygon is implicitly closed (the last
/// vertex connects back to the first). Winding order does not matter for any
/// query here. Obstacles are immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle<F> {
    vertices: Vec<Point2<F>>,
    min: Point2<F>,
    max: Point2<F>,
}

impl<F: Float> Obstacle<F> {
    /// Creates an obstacle from a vertex loop, using
    /// [`DEFAULT_EPSILON`](crate::DEFAULT_EPSILON) for the coincident-vertex
    /// check.
    ///
    /// Fails if the loop has fewer than three vertices or any two
    /// consecutive vertices coincide (including the closing last/first
    /// pair).
    pub fn new(vertices: Vec<Point2<F>>) -> Result<Self, PlanError> {
        Self::with_tolerance(vertices, F::from(crate::DEFAULT_EPSILON).unwrap())
    }

    /// Creates an obstacle from a vertex loop with an explicit tolerance for
    /// the coincident-consecutive-vertex check.
    pub fn with_tolerance(vertices: Vec<Point2<F>>, eps: F) -> Result<Self, PlanError> {
        if vertices.len() < 3 {
            return Err(PlanError::TooFewVertices {
                count: vertices.len(),
            });
        }

        let n = vertices.len();
        for i in 0..n {
            let j = (i + 1) % n;
            if vertices[i].approx_eq(vertices[j], eps) {
                return Err(PlanError::DuplicateVertex { index: i });
            }
        }

        let mut min = vertices[0];
        let mut max = vertices[0];
        for v in &vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }

        Ok(Self { vertices, min, max })
    }

    /// The vertex loop.
    #[inline]
    pub fn vertices(&self) -> &[Point2<F>] {
        &self.vertices
    }

    /// The axis-aligned bounding box as `(min, max)` corners.
    #[inline]
    pub fn bounding_box(&self) -> (Point2<F>, Point2<F>) {
        (self.min, self.max)
    }

    /// Iterates the edges of the polygon, wrapping from the last vertex back
    /// to the first.
    pub fn edges(&self) -> impl Iterator<Item = Segment2<F>> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment2::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Tests whether a point lies inside the obstacle.
    ///
    /// Ray-casting parity test. Points within `eps` of the boundary count as
    /// inside; the conservative convention is applied consistently by every
    /// caller in this crate.
    pub fn contains(&self, point: Point2<F>, eps: F) -> bool {
        if point.x < self.min.x - eps
            || point.x > self.max.x + eps
            || point.y < self.min.y - eps
            || point.y > self.max.y + eps
        {
            return false;
        }

        // Boundary counts as inside.
        let eps_sq = eps * eps;
        for edge in self.edges() {
            if edge.distance_squared_to_point(point) <= eps_sq {
                return true;
            }
        }

        // Parity of crossings of a ray cast in +x.
        let mut inside = false;
        let n = self.vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if ((vi.y > point.y) != (vj.y > point.y))
                && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }

    /// Collects every proper crossing between `segment` and the obstacle
    /// boundary, sorted by ascending parameter along the segment.
    ///
    /// Grazing contact (`Touching`) contributes nothing. Any count is
    /// possible for concave obstacles.
    pub fn crossings(&self, segment: Segment2<F>, eps: F) -> Vec<(Point2<F>, F)> {
        if !self.bounds_overlap(segment, eps) {
            return Vec::new();
        }

        let mut hits: Vec<(Point2<F>, F)> = Vec::new();
        for edge in self.edges() {
            if let SegmentCrossing::Crossing { point, t1, .. } =
                segment_crossing(segment, edge, eps)
            {
                hits.push((point, t1));
            }
        }

        hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        hits
    }

    /// Tests whether `segment` properly crosses the obstacle boundary at
    /// all. Early-exit form of [`crossings`](Self::crossings).
    pub fn crosses(&self, segment: Segment2<F>, eps: F) -> bool {
        if !self.bounds_overlap(segment, eps) {
            return false;
        }

        self.edges()
            .any(|edge| segment_crossing(segment, edge, eps).is_crossing())
    }

    /// Cheap AABB rejection for segment queries.
    fn bounds_overlap(&self, segment: Segment2<F>, eps: F) -> bool {
        let sx_min = segment.start.x.min(segment.end.x) - eps;
        let sx_max = segment.start.x.max(segment.end.x) + eps;
        let sy_min = segment.start.y.min(segment.end.y) - eps;
        let sy_max = segment.start.y.max(segment.end.y) + eps;

        sx_min <= self.max.x && sx_max >= self.min.x && sy_min <= self.max.y && sy_max >= self.min.y
    }
}

/// Interior sample points of a segment, used to catch segments that pass
/// through an obstacle without producing a proper boundary crossing: fully
/// engulfed segments, and segments transversing a polygon exactly through
/// its vertices (corner contact classifies as `Touching`, not `Crossing`).
fn interior_samples<F: Float>(segment: Segment2<F>) -> [Point2<F>; 3] {
    let quarter = F::from(0.25).unwrap();
    let half = F::from(0.5).unwrap();
    [
        segment.point_at(quarter),
        segment.point_at(half),
        segment.point_at(half + quarter),
    ]
}

/// An obstruction found during a scan: which obstacle blocks a path segment,
/// and where the segment crosses its boundary.
///
/// An empty crossing list means the segment produced no proper boundary
/// crossings but an interior sample of it lies inside the obstacle (the
/// engulfed or vertex-transversal case).
#[derive(Debug, Clone, PartialEq)]
pub struct Obstruction<F> {
    /// Index of the obstacle in the set.
    pub obstacle: usize,
    /// Boundary crossings sorted by ascending parameter along the segment.
    pub crossings: Vec<(Point2<F>, F)>,
}

/// An immutable collection of obstacles, shared read-only by the planner for
/// the duration of one planning pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleSet<F> {
    obstacles: Vec<Obstacle<F>>,
}

impl<F: Float> ObstacleSet<F> {
    /// Creates a set from already-validated obstacles.
    #[inline]
    pub fn new(obstacles: Vec<Obstacle<F>>) -> Self {
        Self { obstacles }
    }

    /// Creates a set directly from vertex loops, validating each one.
    pub fn from_vertex_loops(loops: Vec<Vec<Point2<F>>>) -> Result<Self, PlanError> {
        let obstacles = loops
            .into_iter()
            .map(Obstacle::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(obstacles))
    }

    /// Number of obstacles in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Returns `true` if the set holds no obstacles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Iterates the obstacles in set order.
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle<F>> {
        self.obstacles.iter()
    }

    /// Returns the obstacle at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Obstacle<F>> {
        self.obstacles.get(index)
    }

    /// Index of the first obstacle whose interior contains `point`, if any.
    pub fn containing(&self, point: Point2<F>, eps: F) -> Option<usize> {
        self.obstacles.iter().position(|o| o.contains(point, eps))
    }

    /// Tests whether a segment is clear of every obstacle.
    ///
    /// Clear means: no proper boundary crossing with any obstacle, and no
    /// interior sample of the segment (quarter, half, three-quarter points)
    /// inside any obstacle. The samples catch segments that cross no edge
    /// properly yet still pass through an interior: fully engulfed segments,
    /// and segments entering and leaving exactly through polygon vertices.
    pub fn is_segment_clear(&self, segment: Segment2<F>, eps: F) -> bool {
        let samples = interior_samples(segment);
        for obstacle in &self.obstacles {
            if obstacle.crosses(segment, eps)
                || samples.iter().any(|&p| obstacle.contains(p, eps))
            {
                return false;
            }
        }
        true
    }

    /// Finds the first obstacle (in set order) obstructing `segment`, with
    /// its crossing list. An obstacle with no proper crossing can still
    /// obstruct when an interior sample of the segment lies inside it; the
    /// crossing list is then empty.
    pub fn first_obstruction(&self, segment: Segment2<F>, eps: F) -> Option<Obstruction<F>> {
        let samples = interior_samples(segment);
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            let crossings = obstacle.crossings(segment, eps);
            if !crossings.is_empty() || samples.iter().any(|&p| obstacle.contains(p, eps)) {
                return Some(Obstruction {
                    obstacle: index,
                    crossings,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPS: f64 = 1e-9;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Obstacle<f64> {
        Obstacle::new(vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_rejects_too_few_vertices() {
        let err = Obstacle::new(vec![Point2::new(0.0_f64, 0.0), Point2::new(1.0, 0.0)]);
        assert_eq!(err, Err(PlanError::TooFewVertices { count: 2 }));
    }

    #[test]
    fn test_new_rejects_duplicate_vertices() {
        let err = Obstacle::new(vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        assert_eq!(err, Err(PlanError::DuplicateVertex { index: 1 }));

        // Closing pair counts too
        let err = Obstacle::new(vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 0.0),
        ]);
        assert_eq!(err, Err(PlanError::DuplicateVertex { index: 2 }));
    }

    #[test]
    fn test_duplicate_tolerance() {
        let loop_with_near_duplicate = vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0 + 1e-12, 0.0),
            Point2::new(0.0, 1.0),
        ];

        // Within the crate default tolerance: duplicate
        let err = Obstacle::new(loop_with_near_duplicate.clone());
        assert_eq!(err, Err(PlanError::DuplicateVertex { index: 1 }));

        // A tighter explicit tolerance accepts the loop
        let ok = Obstacle::with_tolerance(loop_with_near_duplicate, f64::EPSILON);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_contains_inside_outside() {
        let obs = square(0.0, 0.0, 2.0, 2.0);
        assert!(obs.contains(Point2::new(1.0, 1.0), EPS));
        assert!(!obs.contains(Point2::new(3.0, 1.0), EPS));
        assert!(!obs.contains(Point2::new(-0.5, 1.0), EPS));
    }

    #[test]
    fn test_contains_boundary_is_inside() {
        let obs = square(0.0, 0.0, 2.0, 2.0);
        assert!(obs.contains(Point2::new(2.0, 1.0), EPS));
        assert!(obs.contains(Point2::new(0.0, 0.0), EPS));
        assert!(obs.contains(Point2::new(1.0, 2.0), EPS));
    }

    #[test]
    fn test_contains_concave() {
        // L-shape: notch at the top right
        let obs = Obstacle::new(vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ])
        .unwrap();

        assert!(obs.contains(Point2::new(0.5, 1.5), EPS));
        assert!(obs.contains(Point2::new(1.5, 0.5), EPS));
        // Inside the notch, outside the polygon
        assert!(!obs.contains(Point2::new(1.5, 1.5), EPS));
    }

    #[test]
    fn test_crossings_through_square() {
        let obs = square(4.0, 4.0, 6.0, 6.0);
        let seg: Segment2<f64> = Segment2::from_coords(0.0, 5.0, 10.0, 5.0);

        let hits = obs.crossings(seg, EPS);
        assert_eq!(hits.len(), 2);
        // Sorted by t: entry at x=4 before exit at x=6
        assert_relative_eq!(hits[0].0.x, 4.0, epsilon = 1e-10);
        assert_relative_eq!(hits[1].0.x, 6.0, epsilon = 1e-10);
        assert!(hits[0].1 < hits[1].1);
    }

    #[test]
    fn test_crossings_miss() {
        let obs = square(4.0, 4.0, 6.0, 6.0);
        let seg: Segment2<f64> = Segment2::from_coords(0.0, 0.0, 10.0, 0.0);
        assert!(obs.crossings(seg, EPS).is_empty());
        assert!(!obs.crosses(seg, EPS));
    }

    #[test]
    fn test_crossings_concave_multiple() {
        // Zigzag strip whose two prongs dip below the x axis
        let obs = Obstacle::new(vec![
            Point2::new(2.0_f64, 2.0),
            Point2::new(3.0, -1.0),
            Point2::new(4.0, 1.0),
            Point2::new(5.0, -1.0),
            Point2::new(6.0, 2.0),
            Point2::new(6.0, 3.0),
            Point2::new(2.0, 3.0),
        ])
        .unwrap();

        let seg: Segment2<f64> = Segment2::from_coords(0.0, 0.0, 10.0, 0.0);
        let hits = obs.crossings(seg, EPS);
        assert_eq!(hits.len(), 4);
        for pair in hits.windows(2) {
            assert!(pair[0].1 < pair[1].1);
        }
        assert_relative_eq!(hits[0].0.x, 2.0 + 2.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(hits[3].0.x, 5.0 + 1.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_segment_clear_engulfed_midpoint_guard() {
        let set = ObstacleSet::new(vec![square(0.0, 0.0, 10.0, 10.0)]);

        // Entirely inside: zero crossings, midpoint inside
        let inside: Segment2<f64> = Segment2::from_coords(2.0, 2.0, 8.0, 8.0);
        assert!(!set.is_segment_clear(inside, EPS));

        // Entirely outside
        let outside: Segment2<f64> = Segment2::from_coords(12.0, 0.0, 12.0, 10.0);
        assert!(set.is_segment_clear(outside, EPS));
    }

    #[test]
    fn test_segment_clear_vertex_transversal() {
        // The diagonal enters and leaves the square exactly through its
        // corners (4,4) and (6,6): corner contact is grazing, so there is no
        // proper crossing, but the interior samples land inside.
        let set = ObstacleSet::new(vec![square(4.0, 4.0, 6.0, 6.0)]);
        let diagonal: Segment2<f64> = Segment2::from_coords(0.0, 0.0, 10.0, 10.0);

        assert!(!set.is_segment_clear(diagonal, EPS));
        let ob = set.first_obstruction(diagonal, EPS).unwrap();
        assert_eq!(ob.obstacle, 0);
        assert!(ob.crossings.is_empty());
    }

    #[test]
    fn test_first_obstruction_set_order() {
        let set = ObstacleSet::new(vec![
            square(6.0, 4.0, 7.0, 6.0),
            square(2.0, 4.0, 3.0, 6.0),
        ]);
        let seg: Segment2<f64> = Segment2::from_coords(0.0, 5.0, 10.0, 5.0);

        // Both obstacles cross the segment; set order decides
        let ob = set.first_obstruction(seg, EPS).unwrap();
        assert_eq!(ob.obstacle, 0);
        assert_eq!(ob.crossings.len(), 2);
    }

    #[test]
    fn test_first_obstruction_engulfed() {
        let set = ObstacleSet::new(vec![square(0.0, 0.0, 10.0, 10.0)]);
        let seg: Segment2<f64> = Segment2::from_coords(2.0, 5.0, 8.0, 5.0);

        let ob = set.first_obstruction(seg, EPS).unwrap();
        assert_eq!(ob.obstacle, 0);
        assert!(ob.crossings.is_empty());
    }

    #[test]
    fn test_from_vertex_loops_propagates_validation() {
        let result: Result<ObstacleSet<f64>, _> = ObstacleSet::from_vertex_loops(vec![
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
            ],
            vec![Point2::new(5.0, 5.0)],
        ]);
        assert_eq!(result, Err(PlanError::TooFewVertices { count: 1 }));
    }

    #[test]
    fn test_containing() {
        let set = ObstacleSet::new(vec![
            square(0.0, 0.0, 2.0, 2.0),
            square(5.0, 5.0, 7.0, 7.0),
        ]);
        assert_eq!(set.containing(Point2::new(1.0, 1.0), EPS), Some(0));
        assert_eq!(set.containing(Point2::new(6.0, 6.0), EPS), Some(1));
        assert_eq!(set.containing(Point2::new(4.0, 4.0), EPS), None);
    }
}
