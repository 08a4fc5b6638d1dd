mod classify;
mod difference;

pub use classify::{classify_point_in_polygon, PointClassification};
pub use difference::Difference;
