pub mod intersect_2d;
pub mod overlap_2d;
pub mod polygon_2d;
pub mod vector_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Norm below which a vector is treated as zero when normalizing.
pub const UNIT_EPSILON: f64 = 1e-9;

/// Distance below which two consecutive polygon points are merged.
pub const SAME_POINT_EPSILON: f64 = 1e-6;

/// Minimal segment length considered by overlap tests.
pub const MIN_SEGMENT_NORM: f64 = 1e-6;
