mod create;
mod force;
mod merge;

pub use create::CreateShape;
pub use force::slash_force;
pub use merge::MergeShapes;

use crate::geometry::{PaintStyle, Polygon};
use crate::math::Vector2;
use crate::physics::{BodyHandle, BodyState};

/// A live shape: a physics body plus the outline it was built from.
///
/// Vertices are stored relative to the body position at angle zero and
/// never change after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub body: BodyHandle,
    pub vertices: Polygon,
    pub holes: Vec<Polygon>,
    pub style: PaintStyle,
}

impl Shape {
    /// Outer boundary posed by `state`.
    #[must_use]
    pub fn world_vertices(&self, state: &BodyState) -> Polygon {
        self.vertices.transformed(state.angle, &state.position.coords)
    }

    /// Holes posed by `state`.
    #[must_use]
    pub fn world_holes(&self, state: &BodyState) -> Vec<Polygon> {
        let offset: Vector2 = state.position.coords;
        self.holes
            .iter()
            .map(|h| h.transformed(state.angle, &offset))
            .collect()
    }

    /// Outer area minus hole area.
    #[must_use]
    pub fn net_area(&self) -> f64 {
        self.vertices.area() - self.holes.iter().map(Polygon::area).sum::<f64>()
    }

    /// World-space rendering data.
    #[must_use]
    pub fn view(&self, state: &BodyState) -> ShapeView {
        ShapeView {
            outline: self.world_vertices(state),
            holes: self.world_holes(state),
            style: self.style.clone(),
        }
    }
}

/// What a renderer needs to paint one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeView {
    pub outline: Polygon,
    pub holes: Vec<Polygon>,
    pub style: PaintStyle,
}

/// An imported outline with holes, e.g. one SVG path or glyph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeSource {
    pub outer: Polygon,
    pub holes: Vec<Polygon>,
    pub style: PaintStyle,
}
