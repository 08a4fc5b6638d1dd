use super::{Point2, Vector2, UNIT_EPSILON};

/// Returns `v` scaled to unit length, or the zero vector when `‖v‖ < UNIT_EPSILON`.
#[must_use]
pub fn unit(v: Vector2) -> Vector2 {
    let len = v.norm();
    if len < UNIT_EPSILON {
        return Vector2::zeros();
    }
    v / len
}

/// Scalar 2D cross product `a.x * b.y - a.y * b.x`.
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Rotates a vector counter-clockwise by `angle` radians.
#[must_use]
pub fn rotate(v: &Vector2, angle: f64) -> Vector2 {
    let (sin, cos) = angle.sin_cos();
    Vector2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Orthogonal projection ("pedal point") of `p` onto the infinite line through `line`.
///
/// Returns `line[0]` when the line has zero length.
#[must_use]
pub fn pedal(p: &Point2, line: &[Point2; 2]) -> Point2 {
    let d = line[1] - line[0];
    let len_sq = d.norm_squared();
    if len_sq < UNIT_EPSILON * UNIT_EPSILON {
        return line[0];
    }
    let t = (p - line[0]).dot(&d) / len_sq;
    line[0] + d * t
}

/// Returns the minimum distance from `p` to the segment `a → b`.
#[must_use]
pub fn distance_to_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return distance(p, a);
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    distance(p, &(a + d * t))
}
