use thiserror::Error;

/// Top-level error type for the slashgeo engine.
#[derive(Debug, Error)]
pub enum SlashError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors reported by the physics collaborator.
#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("body creation failed: {0}")]
    BodyCreation(String),

    #[error("body not found")]
    BodyNotFound,
}

/// Errors related to engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Convenience type alias for results using [`SlashError`].
pub type Result<T> = std::result::Result<T, SlashError>;
