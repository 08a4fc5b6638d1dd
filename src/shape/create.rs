use crate::error::{GeometryError, PhysicsError, Result};
use crate::geometry::{PaintStyle, Polygon};
use crate::physics::{BodyOptions, PhysicsWorld};

use super::Shape;

/// Builds a [`Shape`] and its (detached) physics body from a world-space
/// outline.
pub struct CreateShape {
    outer: Polygon,
    holes: Vec<Polygon>,
    style: PaintStyle,
}

impl CreateShape {
    /// Creates a new `CreateShape` operation.
    #[must_use]
    pub fn new(outer: Polygon, holes: Vec<Polygon>, style: PaintStyle) -> Self {
        Self {
            outer,
            holes,
            style,
        }
    }

    /// Executes the synthesis.
    ///
    /// The body is created at the outline centroid without friction and is
    /// not yet added to the simulation.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the outer boundary has fewer
    /// than three distinct points, or the world's error if it rejects the
    /// body.
    pub fn execute<W: PhysicsWorld>(&self, world: &mut W) -> Result<Shape> {
        let outer = self.outer.omit_same_point();
        if outer.is_degenerate() {
            return Err(GeometryError::Degenerate(format!(
                "outer boundary has {} distinct points",
                outer.len()
            ))
            .into());
        }
        let holes: Vec<Polygon> = self
            .holes
            .iter()
            .map(Polygon::omit_same_point)
            .filter(|h| !h.is_degenerate())
            .collect();

        let centroid = outer.centroid();
        let body = world.create_body(centroid, &outer.points, BodyOptions::frictionless())?;
        let Some(state) = world.body_state(body) else {
            return Err(PhysicsError::BodyNotFound.into());
        };
        let offset = -state.position.coords;

        Ok(Shape {
            body,
            vertices: outer.translated(&offset),
            holes: holes.iter().map(|h| h.translated(&offset)).collect(),
            style: self.style.for_body(),
        })
    }
}
