mod mass;
mod sandbox;

pub use mass::{triangulate, MassProperties};
pub use sandbox::{SandboxConfig, SandboxWorld};

use crate::error::Result;
use crate::math::{Point2, Vector2};

slotmap::new_key_type! {
    /// Opaque handle of a rigid body owned by a [`PhysicsWorld`].
    pub struct BodyHandle;
}

/// Surface parameters of a new body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyOptions {
    /// Coulomb friction against other bodies.
    pub friction: f64,
    /// Fraction of velocity lost per step to air drag.
    pub friction_air: f64,
    /// Static bodies never move.
    pub is_static: bool,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            friction: 0.1,
            friction_air: 0.01,
            is_static: false,
        }
    }
}

impl BodyOptions {
    /// Frictionless dynamic body, the setup of every sliced fragment.
    #[must_use]
    pub fn frictionless() -> Self {
        Self {
            friction: 0.0,
            friction_air: 0.0,
            is_static: false,
        }
    }
}

/// Snapshot of a body's pose and dynamics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Point2,
    pub angle: f64,
    pub mass: f64,
    pub area: f64,
    pub velocity: Vector2,
    /// Force accumulated for the current step.
    pub force: Vector2,
}

/// Two bodies that stayed in contact, and for how long (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub a: BodyHandle,
    pub b: BodyHandle,
    pub duration: f64,
}

/// The rigid-body engine the shape lifecycle drives.
///
/// Bodies are created detached and start simulating once added. Removing a
/// body frees it.
pub trait PhysicsWorld {
    /// Builds a body from world-space `vertices`, moved so that their centroid
    /// sits at `position`.
    ///
    /// # Errors
    ///
    /// Returns `PhysicsError::BodyCreation` if the outline cannot be turned
    /// into a body.
    fn create_body(
        &mut self,
        position: Point2,
        vertices: &[Point2],
        options: BodyOptions,
    ) -> Result<BodyHandle>;

    /// Starts simulating a created body.
    ///
    /// # Errors
    ///
    /// Returns `PhysicsError::BodyNotFound` for an unknown handle.
    fn add_body(&mut self, handle: BodyHandle) -> Result<()>;

    /// Removes and frees a body.
    ///
    /// # Errors
    ///
    /// Returns `PhysicsError::BodyNotFound` for an unknown handle.
    fn remove_body(&mut self, handle: BodyHandle) -> Result<()>;

    /// Overwrites a body's linear velocity.
    ///
    /// # Errors
    ///
    /// Returns `PhysicsError::BodyNotFound` for an unknown handle.
    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vector2) -> Result<()>;

    /// Applies `force` at world point `point` for the next step.
    ///
    /// # Errors
    ///
    /// Returns `PhysicsError::BodyNotFound` for an unknown handle.
    fn apply_force(&mut self, handle: BodyHandle, point: Point2, force: Vector2) -> Result<()>;

    /// Current state of a body, or `None` if the handle is unknown.
    fn body_state(&self, handle: BodyHandle) -> Option<BodyState>;
}
