pub mod config;
pub mod error;
pub mod geometry;
pub mod lifecycle;
pub mod math;
pub mod operations;
pub mod physics;
pub mod shape;

pub use config::EngineConfig;
pub use error::{Result, SlashError};
pub use lifecycle::{ShapeId, ShapeLifecycle, Slash, SlashReport};
pub use physics::{PhysicsWorld, SandboxConfig, SandboxWorld};
