mod containment;

pub use containment::{GroupByContainment, PolygonGroup};
