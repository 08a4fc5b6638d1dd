use crate::error::{GeometryError, Result};
use crate::math::vector_2d::cross;
use crate::math::{Point2, Vector2, TOLERANCE};

/// An infinite line defined by an origin point and a unit direction vector.
///
/// The parametric form is: `P(t) = origin + t * direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    origin: Point2,
    direction: Vector2,
}

impl Line {
    /// Creates a new line from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point2, direction: Vector2) -> Result<Self> {
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Creates the line through two distinct points.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn through(a: &Point2, b: &Point2) -> Result<Self> {
        Self::new(*a, b - a)
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point2 {
        &self.origin
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }

    /// Signed distance of `p` from the line; positive on the left side.
    #[must_use]
    pub fn side(&self, p: &Point2) -> f64 {
        cross(&self.direction, &(p - self.origin))
    }

    /// Parameter of the projection of `p` onto the line.
    #[must_use]
    pub fn param(&self, p: &Point2) -> f64 {
        (p - self.origin).dot(&self.direction)
    }

    /// Evaluates the line at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.origin + self.direction * t
    }
}
