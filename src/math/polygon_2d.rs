use std::f64::consts::PI;

use super::vector_2d::distance;
use super::{Point2, Vector2, SAME_POINT_EPSILON, TOLERANCE};

/// Winding direction of a closed polygon in a y-up frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loopwise {
    Clockwise,
    CounterClockwise,
}

impl Loopwise {
    /// Returns the opposite winding.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Absolute area of a closed polygon.
#[must_use]
pub fn area(points: &[Point2]) -> f64 {
    signed_area(points).abs()
}

/// Winding direction from the sign of the signed area.
///
/// Returns `None` when the area is below [`TOLERANCE`].
#[must_use]
pub fn loopwise(points: &[Point2]) -> Option<Loopwise> {
    let a = signed_area(points);
    if a.abs() < TOLERANCE {
        None
    } else if a > 0.0 {
        Some(Loopwise::CounterClockwise)
    } else {
        Some(Loopwise::Clockwise)
    }
}

/// Arithmetic mean of a vertex set.
#[must_use]
pub fn vertex_mean(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return Point2::origin();
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.coords);
    Point2::from(sum / n)
}

/// Area-weighted centroid of a closed polygon.
///
/// Falls back to [`vertex_mean`] when the polygon has (near-)zero area.
#[must_use]
pub fn centroid(points: &[Point2]) -> Point2 {
    let a = signed_area(points);
    if a.abs() < TOLERANCE {
        return vertex_mean(points);
    }
    let n = points.len();
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        let f = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * f;
        cy += (p.y + q.y) * f;
    }
    Point2::new(cx / (6.0 * a), cy / (6.0 * a))
}

/// Removes consecutive points closer than [`SAME_POINT_EPSILON`], including
/// a closing point that duplicates the first one.
///
/// Idempotent: applying it twice yields the same sequence as applying it once.
#[must_use]
pub fn omit_same_point(points: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out
            .last()
            .is_none_or(|q| distance(q, p) >= SAME_POINT_EPSILON)
        {
            out.push(*p);
        }
    }
    while out.len() > 1 && distance(&out[0], &out[out.len() - 1]) < SAME_POINT_EPSILON {
        out.pop();
    }
    out
}

/// Even-odd point-in-polygon test by ray casting.
///
/// Points exactly on the boundary may be classified either way.
#[must_use]
pub fn point_in_polygon(p: &Point2, points: &[Point2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = points[i];
        let b = points[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Returns a point strictly inside a simple polygon.
///
/// Scans a horizontal line through the widest vertical gap between vertex
/// heights and takes the middle of the widest interior span on it.
#[must_use]
pub fn interior_point(points: &[Point2]) -> Option<Point2> {
    if points.len() < 3 {
        return None;
    }
    let mut ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    ys.sort_by(f64::total_cmp);
    ys.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);

    let (lo, hi) = ys
        .windows(2)
        .map(|w| (w[0], w[1]))
        .max_by(|a, b| (a.1 - a.0).total_cmp(&(b.1 - b.0)))?;
    let y = (lo + hi) * 0.5;

    let n = points.len();
    let mut xs = Vec::new();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        if (a.y > y) != (b.y > y) {
            xs.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
        }
    }
    xs.sort_by(f64::total_cmp);

    let (x0, x1) = xs
        .chunks_exact(2)
        .map(|c| (c[0], c[1]))
        .max_by(|a, b| (a.1 - a.0).total_cmp(&(b.1 - b.0)))?;
    Some(Point2::new((x0 + x1) * 0.5, y))
}

/// Circumradius of the regular `n`-gon whose area is `area`.
///
/// From `area = n/2 * r² * sin(2π/n)`.
#[must_use]
pub fn regular_polygon_radius(area: f64, n: usize) -> f64 {
    if n < 3 || area <= 0.0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = n as f64;
    (2.0 * area / (n * (2.0 * PI / n).sin())).sqrt()
}

/// Vertices of a counter-clockwise regular `n`-gon.
#[must_use]
pub fn regular_polygon(center: &Point2, radius: f64, n: usize) -> Vec<Point2> {
    #[allow(clippy::cast_precision_loss)]
    let step = 2.0 * PI / n as f64;
    (0..n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = step * i as f64;
            Point2::new(center.x + radius * t.cos(), center.y + radius * t.sin())
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn ccw_square() -> Vec<Point2> {
        vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert!((signed_area(&ccw_square()) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = ccw_square();
        pts.reverse();
        assert!((signed_area(&pts) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area(&[p(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn loopwise_invariant_under_rotation() {
        let pts = vec![p(0.0, 0.0), p(4.0, 0.0), p(5.0, 3.0), p(2.0, 6.0), p(-1.0, 2.0)];
        let expected = loopwise(&pts);
        assert_eq!(expected, Some(Loopwise::CounterClockwise));
        for k in 1..pts.len() {
            let mut rotated = pts[k..].to_vec();
            rotated.extend_from_slice(&pts[..k]);
            assert_eq!(loopwise(&rotated), expected);
        }
    }

    #[test]
    fn loopwise_reversed_is_opposite() {
        let mut pts = ccw_square();
        pts.reverse();
        assert_eq!(loopwise(&pts), Some(Loopwise::Clockwise));
        assert_eq!(Loopwise::Clockwise.opposite(), Loopwise::CounterClockwise);
    }

    #[test]
    fn loopwise_collinear_is_none() {
        assert_eq!(loopwise(&[p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)]), None);
    }

    #[test]
    fn centroid_of_rectangle() {
        let c = centroid(&[p(0.0, 0.0), p(4.0, 0.0), p(4.0, 2.0), p(0.0, 2.0)]);
        assert_relative_eq!(c.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn centroid_is_area_weighted() {
        // Dense vertices on one side must not drag the centroid.
        let pts = vec![
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(2.0, 0.0),
            p(3.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 4.0),
            p(0.0, 4.0),
        ];
        let c = centroid(&pts);
        assert_relative_eq!(c.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 2.0, epsilon = 1e-12);
        assert!(vertex_mean(&pts).y < 2.0);
    }

    #[test]
    fn centroid_degenerate_falls_back_to_mean() {
        let c = centroid(&[p(0.0, 0.0), p(2.0, 0.0)]);
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 0.0);
    }

    #[test]
    fn omit_same_point_removes_duplicates_and_closing_point() {
        let pts = vec![
            p(0.0, 0.0),
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(1.0, 1.0),
            p(1.0, 1.0 + 1e-9),
            p(0.0, 0.0),
        ];
        let out = omit_same_point(&pts);
        assert_eq!(out, vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)]);
    }

    #[test]
    fn omit_same_point_idempotent() {
        let pts = vec![
            p(3.0, 3.0),
            p(0.0, 0.0),
            p(0.0, 0.0),
            p(5.0, 0.0),
            p(5.0, 5.0),
            p(3.0, 3.0),
            p(3.0, 3.0),
        ];
        let once = omit_same_point(&pts);
        let twice = omit_same_point(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn point_in_polygon_concave() {
        let u_shape = vec![
            p(0.0, 0.0),
            p(6.0, 0.0),
            p(6.0, 6.0),
            p(4.0, 6.0),
            p(4.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 6.0),
            p(0.0, 6.0),
        ];
        assert!(point_in_polygon(&p(1.0, 5.0), &u_shape));
        assert!(point_in_polygon(&p(5.0, 5.0), &u_shape));
        assert!(!point_in_polygon(&p(3.0, 5.0), &u_shape));
        assert!(!point_in_polygon(&p(7.0, 1.0), &u_shape));
    }

    #[test]
    fn interior_point_of_concave_polygon() {
        let l_shape = vec![
            p(0.0, 0.0),
            p(6.0, 0.0),
            p(6.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 6.0),
            p(0.0, 6.0),
        ];
        let q = interior_point(&l_shape).unwrap();
        assert!(point_in_polygon(&q, &l_shape));
    }

    #[test]
    fn interior_point_degenerate() {
        assert!(interior_point(&[p(0.0, 0.0), p(1.0, 0.0)]).is_none());
        assert!(interior_point(&[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]).is_none());
    }

    #[test]
    fn regular_polygon_reproduces_target_area() {
        for n in 3..16 {
            let r = regular_polygon_radius(250.0, n);
            let pts = regular_polygon(&p(10.0, -3.0), r, n);
            assert_eq!(pts.len(), n);
            assert_relative_eq!(signed_area(&pts), 250.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn regular_polygon_radius_approaches_circle() {
        let r = regular_polygon_radius(PI, 4096);
        assert_relative_eq!(r, 1.0, max_relative = 1e-5);
    }
}
