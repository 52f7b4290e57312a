//! Tolerance-aware segment/segment intersection predicates.
//!
//! The planner only ever needs to know whether a path segment *properly
//! crosses* an obstacle edge — passes from one side to the other at a single
//! interior point. Everything else (parallel, collinear overlap, contact at
//! an endpoint) is grazing contact that does not take the segment into the
//! obstacle interior, so it is classified as [`SegmentCrossing::Touching`]
//! and never treated as an obstruction or an error.

use crate::primitives::{Point2, Segment2};
use num_traits::Float;

/// Classification of how two segments meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentCrossing<F> {
    /// The segments do not meet.
    None,
    /// The segments properly cross at a single interior point.
    Crossing {
        /// The crossing point.
        point: Point2<F>,
        /// Parameter along the first segment (0 = start, 1 = end).
        t1: F,
        /// Parameter along the second segment.
        t2: F,
    },
    /// Degenerate contact: collinear overlap, or contact within `eps` of an
    /// endpoint of either segment. No single crossing point is meaningful,
    /// so none is reported; callers must not rely on one.
    Touching,
}

impl<F> SegmentCrossing<F> {
    /// Returns `true` for a proper crossing.
    #[inline]
    pub fn is_crossing(&self) -> bool {
        matches!(self, SegmentCrossing::Crossing { .. })
    }
}

/// Classifies how segment `s1` meets segment `s2`.
///
/// Uses the cross product of the two direction vectors as the denominator of
/// the parametric solve. A denominator within `eps` of zero means the
/// segments are parallel: if they are also collinear and share any span they
/// classify as `Touching`, otherwise `None`. For non-parallel segments the
/// parameters are solved with Cramer's rule; a `Crossing` is reported only
/// when both parameters land strictly inside `(eps, 1 - eps)` — contact at
/// or within `eps` of an endpoint classifies as `Touching`.
///
/// Never fails: every numerical edge case resolves to one of the three
/// classifications.
pub fn segment_crossing<F: Float>(s1: Segment2<F>, s2: Segment2<F>, eps: F) -> SegmentCrossing<F> {
    let d1 = s1.direction();
    let d2 = s2.direction();
    let denom = d1.cross(d2);

    if denom.abs() <= eps {
        return classify_parallel(s1, s2, eps);
    }

    let d = s2.start - s1.start;
    let t1 = d.cross(d2) / denom;
    let t2 = d.cross(d1) / denom;

    let lo = -eps;
    let hi = F::one() + eps;
    if t1 < lo || t1 > hi || t2 < lo || t2 > hi {
        return SegmentCrossing::None;
    }

    // Inside both segments but within eps of an endpoint: grazing contact.
    let inner_lo = eps;
    let inner_hi = F::one() - eps;
    if t1 <= inner_lo || t1 >= inner_hi || t2 <= inner_lo || t2 >= inner_hi {
        return SegmentCrossing::Touching;
    }

    SegmentCrossing::Crossing {
        point: s1.point_at(t1),
        t1,
        t2,
    }
}

/// Parallel case: `Touching` if collinear with any shared span, else `None`.
fn classify_parallel<F: Float>(s1: Segment2<F>, s2: Segment2<F>, eps: F) -> SegmentCrossing<F> {
    let eps_sq = eps * eps;
    let overlaps = s1.distance_squared_to_point(s2.start) <= eps_sq
        || s1.distance_squared_to_point(s2.end) <= eps_sq
        || s2.distance_squared_to_point(s1.start) <= eps_sq
        || s2.distance_squared_to_point(s1.end) <= eps_sq;

    if overlaps {
        SegmentCrossing::Touching
    } else {
        SegmentCrossing::None
    }
}
