use rand::Rng;

use crate::config::EngineConfig;
use crate::error::{PhysicsError, Result};
use crate::geometry::Polygon;
use crate::math::overlap_2d::shares_opposing_edge;
use crate::math::polygon_2d::{regular_polygon, regular_polygon_radius};
use crate::math::vector_2d::midpoint;
use crate::physics::PhysicsWorld;

use super::{CreateShape, Shape};

/// Fuses two touching shapes into one regular polygon of their combined
/// area.
pub struct MergeShapes<'a> {
    first: &'a Shape,
    second: &'a Shape,
}

impl<'a> MergeShapes<'a> {
    /// Creates a new `MergeShapes` operation. The merged shape takes the
    /// style of `first`.
    #[must_use]
    pub fn new(first: &'a Shape, second: &'a Shape) -> Self {
        Self { first, second }
    }

    /// Returns `true` if the bodies' area ratio lies within the configured
    /// bounds and, when required, their outlines lap along an edge.
    #[must_use]
    pub fn is_eligible<W: PhysicsWorld>(&self, world: &W, config: &EngineConfig) -> bool {
        let (Some(a), Some(b)) = (
            world.body_state(self.first.body),
            world.body_state(self.second.body),
        ) else {
            return false;
        };
        if b.area <= 0.0 {
            return false;
        }
        let ratio = a.area / b.area;
        if !(config.merge_area_ratio_min..=config.merge_area_ratio_max).contains(&ratio) {
            return false;
        }
        !config.merge_requires_shared_edge
            || shares_opposing_edge(
                &self.first.world_vertices(&a).points,
                &self.second.world_vertices(&b).points,
                config.lap_threshold,
            )
    }

    /// Builds the merged shape and applies the sum of both bodies' current
    /// forces to it. The originals are left untouched and the new body is
    /// detached.
    ///
    /// # Errors
    ///
    /// Returns `PhysicsError::BodyNotFound` if either body is gone, or the
    /// synthesis error of the new shape.
    pub fn execute<W, R>(&self, world: &mut W, config: &EngineConfig, rng: &mut R) -> Result<Shape>
    where
        W: PhysicsWorld,
        R: Rng + ?Sized,
    {
        let (Some(a), Some(b)) = (
            world.body_state(self.first.body),
            world.body_state(self.second.body),
        ) else {
            return Err(PhysicsError::BodyNotFound.into());
        };

        let n = rng.gen_range(config.merge_min_vertices..config.merge_max_vertices);
        let center = midpoint(&a.position, &b.position);
        let radius = regular_polygon_radius(a.area + b.area, n);
        let outline = Polygon::new(regular_polygon(&center, radius, n));

        let merged = CreateShape::new(outline, Vec::new(), self.first.style.clone()).execute(world)?;
        let position = world
            .body_state(merged.body)
            .map_or(center, |s| s.position);
        world.apply_force(merged.body, position, a.force + b.force)?;
        Ok(merged)
    }
}
