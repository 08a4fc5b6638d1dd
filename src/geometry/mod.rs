pub mod line;
pub mod polygon;
pub mod style;

pub use line::Line;
pub use polygon::Polygon;
pub use style::{LineJoin, PaintStyle};
