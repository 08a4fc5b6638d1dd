use crate::math::polygon_2d::point_in_polygon;
use crate::math::vector_2d::distance_to_segment;
use crate::math::{Point2, TOLERANCE};

/// Classification of a point relative to a closed polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClassification {
    Inside,
    Outside,
    OnBoundary,
}

/// Classifies a point as inside, outside, or on the boundary of a polygon.
///
/// A point within `TOLERANCE * 100` of any edge is on the boundary; other
/// points are resolved by even-odd ray casting.
#[must_use]
pub fn classify_point_in_polygon(point: &Point2, polygon: &[Point2]) -> PointClassification {
    if is_near_polygon_edge(point, polygon) {
        return PointClassification::OnBoundary;
    }
    if point_in_polygon(point, polygon) {
        PointClassification::Inside
    } else {
        PointClassification::Outside
    }
}

/// Check if a point is near any edge of the polygon (within tolerance).
fn is_near_polygon_edge(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    let edge_tol = TOLERANCE * 100.0;
    (0..n).any(|i| distance_to_segment(point, &polygon[i], &polygon[(i + 1) % n]) < edge_tol)
}
