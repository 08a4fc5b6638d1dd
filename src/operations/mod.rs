pub mod boolean;
pub mod grouping;
pub mod split;

pub use boolean::Difference;
pub use grouping::{GroupByContainment, PolygonGroup};
pub use split::SplitByLine;
