use std::collections::BTreeMap;

use serde::Deserialize;
use slotmap::SlotMap;
use tracing::trace;

use crate::error::{ConfigError, PhysicsError, Result};
use crate::math::vector_2d::rotate;
use crate::math::{Point2, Vector2};

use super::mass::{triangulate, MassProperties};
use super::{BodyHandle, BodyOptions, BodyState, ContactEvent, PhysicsWorld};

/// Parameters of a [`SandboxWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Gravitational acceleration in units per second squared (y up).
    pub gravity: [f64; 2],
    /// Mass per unit area.
    pub density: f64,
    /// Thickness of the walls built by [`SandboxWorld::add_frame`].
    pub frame_depth: f64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -980.0],
            density: 0.001,
            frame_depth: 10.0,
        }
    }
}

impl SandboxConfig {
    /// Checks that the world can derive finite body masses and walls.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v > 0.0 && v.is_finite();
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(ConfigError::Invalid("gravity must be finite".into()).into());
        }
        if !positive(self.density) {
            return Err(ConfigError::Invalid("density must be positive".into()).into());
        }
        if !positive(self.frame_depth) {
            return Err(ConfigError::Invalid("frame_depth must be positive".into()).into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Body {
    /// Outline relative to `position`, at angle zero.
    local: Vec<Point2>,
    position: Point2,
    angle: f64,
    velocity: Vector2,
    force: Vector2,
    mass: f64,
    area: f64,
    options: BodyOptions,
    in_world: bool,
}

impl Body {
    fn state(&self) -> BodyState {
        BodyState {
            position: self.position,
            angle: self.angle,
            mass: self.mass,
            area: self.area,
            velocity: self.velocity,
            force: self.force,
        }
    }

    /// World-space axis-aligned bounds as `(min, max)`.
    fn bounds(&self) -> (Point2, Point2) {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.local {
            let w = self.position + rotate(&p.coords, self.angle);
            min = Point2::new(min.x.min(w.x), min.y.min(w.y));
            max = Point2::new(max.x.max(w.x), max.y.max(w.y));
        }
        (min, max)
    }
}

/// Headless [`PhysicsWorld`] for tests and offline runs.
///
/// Integrates gravity and applied forces with explicit Euler steps and
/// reports bodies whose bounding boxes keep overlapping. Collisions are
/// detected but not resolved, and forces act on the center of mass only.
#[derive(Debug, Default)]
pub struct SandboxWorld {
    config: SandboxConfig,
    bodies: SlotMap<BodyHandle, Body>,
    /// Pairs currently in contact, keyed low handle first, valued with the
    /// time the contact started.
    contacts: BTreeMap<(BodyHandle, BodyHandle), f64>,
    /// Simulated time in milliseconds.
    time: f64,
}

impl SandboxWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new(config: SandboxConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the simulated time in milliseconds.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of bodies currently simulated.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.values().filter(|b| b.in_world).count()
    }

    /// Replaces the gravity vector.
    pub fn set_gravity(&mut self, gravity: Vector2) {
        self.config.gravity = [gravity.x, gravity.y];
    }

    /// Overwrites a body's rotation.
    ///
    /// # Errors
    ///
    /// Returns `PhysicsError::BodyNotFound` for an unknown handle.
    pub fn set_angle(&mut self, handle: BodyHandle, angle: f64) -> Result<()> {
        self.body_mut(handle)?.angle = angle;
        Ok(())
    }

    /// Builds four static walls centered on the edges of the rectangle
    /// `[0, width] x [0, height]` and returns their handles.
    ///
    /// # Errors
    ///
    /// Returns an error if a wall cannot be built, e.g. for a zero frame depth.
    pub fn add_frame(&mut self, width: f64, height: f64) -> Result<[BodyHandle; 4]> {
        let h = self.config.frame_depth * 0.5;
        let walls = [
            (0.0, -h, width, h),
            (0.0, height - h, width, height + h),
            (-h, 0.0, h, height),
            (width - h, 0.0, width + h, height),
        ];
        let mut handles = [BodyHandle::default(); 4];
        for (slot, (x0, y0, x1, y1)) in handles.iter_mut().zip(walls) {
            let outline = [
                Point2::new(x0, y0),
                Point2::new(x1, y0),
                Point2::new(x1, y1),
                Point2::new(x0, y1),
            ];
            let center = Point2::new((x0 + x1) * 0.5, (y0 + y1) * 0.5);
            let options = BodyOptions {
                is_static: true,
                ..BodyOptions::default()
            };
            let handle = self.create_body(center, &outline, options)?;
            self.add_body(handle)?;
            *slot = handle;
        }
        Ok(handles)
    }

    /// Advances the simulation by `delta` milliseconds and returns the
    /// contacts that persisted through the step.
    pub fn step(&mut self, delta: f64) -> Vec<ContactEvent> {
        let dt = delta / 1000.0;
        let gravity = Vector2::new(self.config.gravity[0], self.config.gravity[1]);
        for body in self.bodies.values_mut().filter(|b| b.in_world) {
            if !body.options.is_static {
                let accel = gravity + body.force / body.mass;
                body.velocity += accel * dt;
                body.velocity *= 1.0 - body.options.friction_air;
                body.position += body.velocity * dt;
            }
            body.force = Vector2::zeros();
        }
        self.time += delta;
        self.update_contacts()
    }

    fn update_contacts(&mut self) -> Vec<ContactEvent> {
        let live: Vec<(BodyHandle, (Point2, Point2), bool)> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.in_world)
            .map(|(h, b)| (h, b.bounds(), b.options.is_static))
            .collect();

        let mut touching = BTreeMap::new();
        for (i, (ha, (amin, amax), a_static)) in live.iter().enumerate() {
            for (hb, (bmin, bmax), b_static) in &live[i + 1..] {
                if *a_static && *b_static {
                    continue;
                }
                let overlap = amin.x <= bmax.x
                    && bmin.x <= amax.x
                    && amin.y <= bmax.y
                    && bmin.y <= amax.y;
                if overlap {
                    let key = if ha < hb { (*ha, *hb) } else { (*hb, *ha) };
                    let start = self.contacts.get(&key).copied().unwrap_or(self.time);
                    touching.insert(key, start);
                }
            }
        }

        let events = touching
            .iter()
            .filter(|(key, _)| self.contacts.contains_key(key))
            .map(|(&(a, b), &start)| ContactEvent {
                a,
                b,
                duration: self.time - start,
            })
            .collect();
        self.contacts = touching;
        events
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies
            .get_mut(handle)
            .ok_or_else(|| PhysicsError::BodyNotFound.into())
    }
}

impl PhysicsWorld for SandboxWorld {
    fn create_body(
        &mut self,
        position: Point2,
        vertices: &[Point2],
        options: BodyOptions,
    ) -> Result<BodyHandle> {
        let triangles = triangulate(vertices)?;
        let MassProperties { area, centroid } = MassProperties::from_triangles(&triangles);
        if area <= 0.0 {
            return Err(PhysicsError::BodyCreation("outline encloses no area".into()).into());
        }
        let mass = area * self.config.density;
        if mass <= 0.0 || !mass.is_finite() {
            return Err(PhysicsError::BodyCreation(format!("body mass {mass} is not positive")).into());
        }
        let body = Body {
            local: vertices.iter().map(|v| Point2::from(v - centroid)).collect(),
            position,
            angle: 0.0,
            velocity: Vector2::zeros(),
            force: Vector2::zeros(),
            mass,
            area,
            options,
            in_world: false,
        };
        trace!(area, triangles = triangles.len(), "body created");
        Ok(self.bodies.insert(body))
    }

    fn add_body(&mut self, handle: BodyHandle) -> Result<()> {
        self.body_mut(handle)?.in_world = true;
        Ok(())
    }

    fn remove_body(&mut self, handle: BodyHandle) -> Result<()> {
        self.bodies
            .remove(handle)
            .ok_or(PhysicsError::BodyNotFound)?;
        self.contacts.retain(|&(a, b), _| a != handle && b != handle);
        Ok(())
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vector2) -> Result<()> {
        self.body_mut(handle)?.velocity = velocity;
        Ok(())
    }

    fn apply_force(&mut self, handle: BodyHandle, _point: Point2, force: Vector2) -> Result<()> {
        self.body_mut(handle)?.force += force;
        Ok(())
    }

    fn body_state(&self, handle: BodyHandle) -> Option<BodyState> {
        self.bodies.get(handle).map(Body::state)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square_at(world: &mut SandboxWorld, x: f64, y: f64, size: f64) -> BodyHandle {
        let outline = [p(x, y), p(x + size, y), p(x + size, y + size), p(x, y + size)];
        let center = p(x + size * 0.5, y + size * 0.5);
        let h = world
            .create_body(center, &outline, BodyOptions::frictionless())
            .unwrap();
        world.add_body(h).unwrap();
        h
    }

    fn weightless() -> SandboxWorld {
        SandboxWorld::new(SandboxConfig {
            gravity: [0.0, 0.0],
            ..SandboxConfig::default()
        })
    }

    #[test]
    fn created_body_reports_area_and_mass() {
        let mut world = weightless();
        let h = square_at(&mut world, 0.0, 0.0, 10.0);
        let s = world.body_state(h).unwrap();
        assert_relative_eq!(s.area, 100.0, epsilon = 1e-9);
        assert_relative_eq!(s.mass, 0.1, epsilon = 1e-12);
        assert_eq!(s.position, p(5.0, 5.0));
    }

    #[test]
    fn detached_body_is_not_simulated() {
        let mut world = SandboxWorld::new(SandboxConfig::default());
        let outline = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)];
        let h = world
            .create_body(p(0.5, 0.3), &outline, BodyOptions::default())
            .unwrap();
        world.step(16.0);
        assert_eq!(world.body_state(h).unwrap().position, p(0.5, 0.3));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn gravity_pulls_dynamic_bodies_down() {
        let mut world = SandboxWorld::new(SandboxConfig::default());
        let h = square_at(&mut world, 0.0, 100.0, 2.0);
        world.step(100.0);
        let s = world.body_state(h).unwrap();
        assert!(s.velocity.y < 0.0);
        assert!(s.position.y < 101.0);
    }

    #[test]
    fn gravity_can_be_turned_sideways() {
        let mut world = weightless();
        let h = square_at(&mut world, 0.0, 0.0, 2.0);
        world.set_gravity(Vector2::new(100.0, 0.0));
        world.step(100.0);
        let s = world.body_state(h).unwrap();
        assert!(s.velocity.x > 0.0);
        assert_relative_eq!(s.velocity.y, 0.0);
    }

    #[test]
    fn set_angle_is_reported_and_checked() {
        let mut world = weightless();
        let h = square_at(&mut world, 0.0, 0.0, 2.0);
        world.set_angle(h, 0.5).unwrap();
        assert_relative_eq!(world.body_state(h).unwrap().angle, 0.5);
        world.remove_body(h).unwrap();
        assert!(world.set_angle(h, 0.5).is_err());
    }

    #[test]
    fn applied_force_is_cleared_after_step() {
        let mut world = weightless();
        let h = square_at(&mut world, 0.0, 0.0, 10.0);
        world
            .apply_force(h, p(5.0, 5.0), Vector2::new(1.0, 0.0))
            .unwrap();
        assert_relative_eq!(world.body_state(h).unwrap().force.x, 1.0);
        world.step(10.0);
        let s = world.body_state(h).unwrap();
        assert!(s.velocity.x > 0.0);
        assert_eq!(s.force, Vector2::zeros());
    }

    #[test]
    fn removed_body_is_gone() {
        let mut world = weightless();
        let h = square_at(&mut world, 0.0, 0.0, 1.0);
        world.remove_body(h).unwrap();
        assert!(world.body_state(h).is_none());
        assert!(world.remove_body(h).is_err());
        assert!(world.set_velocity(h, Vector2::zeros()).is_err());
    }

    #[test]
    fn self_intersecting_outline_is_rejected() {
        let mut world = weightless();
        let bow_tie = [p(0.0, 0.0), p(2.0, 2.0), p(2.0, 0.0), p(0.0, 2.0)];
        let err = world.create_body(p(1.0, 1.0), &bow_tie, BodyOptions::default());
        assert!(err.is_err());
    }

    #[test]
    fn persistent_contact_accumulates_duration() {
        let mut world = weightless();
        let a = square_at(&mut world, 0.0, 0.0, 10.0);
        let b = square_at(&mut world, 9.0, 0.0, 10.0);
        assert!(world.step(100.0).is_empty());
        let events = world.step(100.0);
        assert_eq!(events.len(), 1);
        assert_relative_eq!(events[0].duration, 100.0);
        let pair = [events[0].a, events[0].b];
        assert!(pair.contains(&a) && pair.contains(&b));
        let events = world.step(100.0);
        assert_relative_eq!(events[0].duration, 200.0);
    }

    #[test]
    fn contact_events_come_in_handle_order() {
        let mut world = weightless();
        for i in 0..5 {
            square_at(&mut world, f64::from(i) * 9.0, 0.0, 10.0);
        }
        square_at(&mut world, 0.0, 9.0, 40.0);
        world.step(10.0);
        let events = world.step(10.0);
        assert!(events.len() > 4);
        assert!(events.windows(2).all(|w| (w[0].a, w[0].b) < (w[1].a, w[1].b)));
        assert!(events.iter().all(|e| e.a < e.b));
    }

    #[test]
    fn outline_is_centered_on_position() {
        let mut world = weightless();
        let outline = [p(0.0, 0.0), p(4.0, 0.0), p(4.0, 2.0), p(0.0, 2.0)];
        let h = world
            .create_body(p(10.0, 10.0), &outline, BodyOptions::default())
            .unwrap();
        let (min, max) = world.bodies[h].bounds();
        assert_relative_eq!(min.x, 8.0, epsilon = 1e-9);
        assert_relative_eq!(min.y, 9.0, epsilon = 1e-9);
        assert_relative_eq!(max.x, 12.0, epsilon = 1e-9);
        assert_relative_eq!(max.y, 11.0, epsilon = 1e-9);
    }

    #[test]
    fn massless_density_is_rejected() {
        let config = SandboxConfig {
            density: 0.0,
            ..SandboxConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(SandboxConfig::default().validate().is_ok());

        let mut world = SandboxWorld::new(config);
        let outline = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)];
        let err = world.create_body(p(0.5, 0.3), &outline, BodyOptions::default());
        assert!(matches!(
            err,
            Err(crate::error::SlashError::Physics(PhysicsError::BodyCreation(_)))
        ));
    }

    #[test]
    fn separated_bodies_report_no_contact() {
        let mut world = weightless();
        square_at(&mut world, 0.0, 0.0, 10.0);
        square_at(&mut world, 20.0, 0.0, 10.0);
        world.step(10.0);
        assert!(world.step(10.0).is_empty());
    }

    #[test]
    fn frame_walls_are_static() {
        let mut world = SandboxWorld::new(SandboxConfig::default());
        let walls = world.add_frame(800.0, 600.0).unwrap();
        world.step(100.0);
        for h in walls {
            let s = world.body_state(h).unwrap();
            assert_eq!(s.velocity, Vector2::zeros());
        }
        assert_eq!(world.body_count(), 4);
    }
}
