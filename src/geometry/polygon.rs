use crate::math::polygon_2d::{self, Loopwise};
use crate::math::vector_2d::rotate;
use crate::math::{Point2, Vector2};

/// A closed polygon: an ordered point sequence whose last point connects
/// back to the first.
///
/// Orientation is never stored; it is derived from the signed area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point2>,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the polygon has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `true` if the polygon has fewer than three vertices.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Signed area, positive for counter-clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        polygon_2d::signed_area(&self.points)
    }

    /// Absolute area.
    #[must_use]
    pub fn area(&self) -> f64 {
        polygon_2d::area(&self.points)
    }

    /// Winding direction, or `None` for a zero-area polygon.
    #[must_use]
    pub fn loopwise(&self) -> Option<Loopwise> {
        polygon_2d::loopwise(&self.points)
    }

    /// Area-weighted centroid.
    #[must_use]
    pub fn centroid(&self) -> Point2 {
        polygon_2d::centroid(&self.points)
    }

    /// Returns `true` if `p` lies inside the polygon (even-odd rule).
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        polygon_2d::point_in_polygon(p, &self.points)
    }

    /// Returns a copy with consecutive duplicate points removed.
    #[must_use]
    pub fn omit_same_point(&self) -> Self {
        Self::new(polygon_2d::omit_same_point(&self.points))
    }

    /// Returns a copy with reversed vertex order (and therefore winding).
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Returns a copy with the given winding, reversing if needed.
    #[must_use]
    pub fn with_loopwise(&self, loopwise: Loopwise) -> Self {
        match self.loopwise() {
            Some(current) if current != loopwise => self.reversed(),
            _ => self.clone(),
        }
    }

    /// Returns a copy translated by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector2) -> Self {
        Self::new(self.points.iter().map(|p| p + offset).collect())
    }

    /// Returns a copy rotated by `angle` about the origin, then translated by `offset`.
    #[must_use]
    pub fn transformed(&self, angle: f64, offset: &Vector2) -> Self {
        Self::new(
            self.points
                .iter()
                .map(|p| Point2::from(rotate(&p.coords, angle) + offset))
                .collect(),
        )
    }
}

impl From<Vec<Point2>> for Polygon {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ])
    }

    #[test]
    fn with_loopwise_reverses_only_when_needed() {
        let sq = square();
        assert_eq!(sq.with_loopwise(Loopwise::CounterClockwise), sq);
        let cw = sq.with_loopwise(Loopwise::Clockwise);
        assert_eq!(cw.loopwise(), Some(Loopwise::Clockwise));
        assert!((cw.area() - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn transformed_rotates_then_translates() {
        let moved = square().transformed(std::f64::consts::PI, &Vector2::new(10.0, 0.0));
        assert!((moved.points[2].x - 8.0).abs() < 1e-9);
        assert!((moved.points[2].y + 2.0).abs() < 1e-9);
        assert!((moved.area() - 4.0).abs() < 1e-9);
    }
}
