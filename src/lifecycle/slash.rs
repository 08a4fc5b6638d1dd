use tracing::trace;

use crate::geometry::{Line, Polygon};
use crate::math::vector_2d::{distance, unit};
use crate::math::{Point2, SAME_POINT_EPSILON};
use crate::operations::{Difference, GroupByContainment, PolygonGroup, SplitByLine};

use super::ShapeId;

/// A user cut, kept around for fade-out rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slash {
    pub line: [Point2; 2],
    /// Ticks since the cut was made.
    pub age: u32,
}

/// Outcome of one slash.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlashReport {
    /// Number of shapes the line actually split.
    pub split: usize,
    /// Fragments that entered the live set.
    pub created: Vec<ShapeId>,
    /// Fragments that could not be turned into bodies.
    pub dropped: usize,
}

/// Extends the drag `a -> b` to a line of half length `extent` on both
/// sides of `a`. Returns `None` when the two points coincide.
#[must_use]
pub fn expand_line(a: &Point2, b: &Point2, extent: f64) -> Option<[Point2; 2]> {
    if distance(a, b) < SAME_POINT_EPSILON {
        return None;
    }
    let v = unit(b - a) * extent;
    Some([a - v, a + v])
}

/// Cuts a posed outline and its holes, then regroups the pieces.
///
/// Returns `None` if the line does not split the outer boundary. Holes wound
/// like the outer boundary are split along with it. Oppositely wound holes
/// that the line crosses are subtracted from every piece; the others are
/// carried over whole.
#[must_use]
pub fn cut_outline(outer: &Polygon, holes: &[Polygon], line: &Line) -> Option<Vec<PolygonGroup>> {
    let mut pieces = SplitByLine::new(outer.clone(), *line).execute();
    if pieces.len() < 2 {
        return None;
    }

    let winding = outer.loopwise();
    let mut subtract = Vec::new();
    for hole in holes {
        let split = SplitByLine::new(hole.clone(), *line).execute();
        if split.is_empty() {
            pieces.push(hole.clone());
        } else if hole.loopwise() == winding {
            pieces.extend(split);
        } else {
            subtract.push(hole);
        }
    }
    trace!(
        pieces = pieces.len(),
        subtract = subtract.len(),
        "outline cut"
    );

    let pieces: Vec<Polygon> = subtract.iter().fold(pieces, |acc, &hole| {
        acc.into_iter()
            .flat_map(|piece| Difference::new(piece, hole.clone()).execute())
            .collect()
    });
    Some(GroupByContainment::new(pieces).execute())
}
