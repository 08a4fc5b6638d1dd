//! Detection of "lapped" segment pairs: two edges running in opposite
//! directions on top of each other, as left behind on both sides of a cut.

use super::vector_2d::{cross, distance, unit};
use super::{Point2, MIN_SEGMENT_NORM};

/// Returns `true` if segments `a` and `b` are nearly anti-parallel and lie on
/// top of each other within `threshold`.
///
/// Both segments must be at least [`MIN_SEGMENT_NORM`] long. The angular
/// tolerance is the angle whose lateral deviation over the shorter segment
/// equals `threshold`. At least one endpoint of either segment must lie
/// within `threshold` of the other segment's supporting line and inside its
/// span.
#[must_use]
pub fn is_overlapping_opposing_segment(a: &[Point2; 2], b: &[Point2; 2], threshold: f64) -> bool {
    let len_a = distance(&a[0], &a[1]);
    let len_b = distance(&b[0], &b[1]);
    if len_a < MIN_SEGMENT_NORM || len_b < MIN_SEGMENT_NORM {
        return false;
    }

    let da = unit(a[1] - a[0]);
    let db = unit(b[1] - b[0]);
    let shorter = len_a.min(len_b);
    let ratio = (threshold / shorter).min(1.0);
    let cos_bound = (1.0 - ratio * ratio).sqrt();
    if da.dot(&db) > -cos_bound {
        return false;
    }

    a.iter().any(|e| endpoint_laps(e, b, len_b, threshold))
        || b.iter().any(|e| endpoint_laps(e, a, len_a, threshold))
}

/// Checks whether `e` is close to the supporting line of `seg` and projects
/// inside its span.
fn endpoint_laps(e: &Point2, seg: &[Point2; 2], seg_len: f64, threshold: f64) -> bool {
    let dir = unit(seg[1] - seg[0]);
    let perpendicular = cross(&dir, &(e - seg[0])).abs();
    if perpendicular >= threshold {
        return false;
    }
    distance(e, &seg[0]) + distance(e, &seg[1]) <= seg_len + threshold
}

/// Returns `true` if any edge of `a` laps an edge of `b`.
#[must_use]
pub fn shares_opposing_edge(a: &[Point2], b: &[Point2], threshold: f64) -> bool {
    let edges = |pts: &[Point2]| {
        let n = pts.len();
        (0..n).map(move |i| [pts[i], pts[(i + 1) % n]]).collect::<Vec<_>>()
    };
    if a.len() < 2 || b.len() < 2 {
        return false;
    }
    let ea = edges(a);
    let eb = edges(b);
    ea.iter()
        .any(|sa| eb.iter().any(|sb| is_overlapping_opposing_segment(sa, sb, threshold)))
}
