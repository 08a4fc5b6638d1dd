use tracing::debug;

use crate::error::Result;
use crate::geometry::{Line, Polygon};
use crate::math::polygon_2d::{area, omit_same_point, signed_area};
use crate::math::vector_2d::cross;
use crate::math::{Point2, TOLERANCE};

/// Cuts a closed polygon with an infinite line.
///
/// Returns every closed piece on either side of the line, each keeping the
/// winding of the input. A line that misses the polygon (or only touches it)
/// yields an empty result. Parts of a concave polygon that meet the line only
/// at a vertex or along an edge come out as separate pieces.
pub struct SplitByLine {
    polygon: Polygon,
    line: Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    On,
}

/// A point of the augmented ring with its parameter along the cutting line.
#[derive(Debug, Clone, Copy)]
struct RingNode {
    point: Point2,
    side: Side,
    param: f64,
}

/// A maximal boundary run strictly on one side, bounded by the on-line
/// nodes where it leaves and rejoins the line.
type Chain = Vec<usize>;

impl SplitByLine {
    /// Creates a new `SplitByLine` operation.
    #[must_use]
    pub fn new(polygon: Polygon, line: Line) -> Self {
        Self { polygon, line }
    }

    /// Creates the operation from the two points defining the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide.
    pub fn through(polygon: Polygon, line: &[Point2; 2]) -> Result<Self> {
        Ok(Self::new(polygon, Line::through(&line[0], &line[1])?))
    }

    /// Executes the split.
    #[must_use]
    pub fn execute(&self) -> Vec<Polygon> {
        let points = omit_same_point(&self.polygon.points);
        if points.len() < 3 {
            return Vec::new();
        }
        let winding = signed_area(&points);
        if winding.abs() < TOLERANCE {
            return Vec::new();
        }

        let mut ring = self.build_ring(&points);
        absorb_convex_touches(&mut ring, winding > 0.0);
        let has = |side: Side| ring.iter().any(|n| n.side == side);
        if !has(Side::Left) || !has(Side::Right) {
            return Vec::new();
        }

        let mut pieces = Vec::new();
        for side in [Side::Left, Side::Right] {
            // Interior lies left of a counter-clockwise boundary, so the left
            // pieces run along the line forwards and the right ones backwards.
            let forward = (side == Side::Left) == (winding > 0.0);
            let chains = collect_chains(&ring, side);
            let Some(next) = link_chains(&ring, &chains, forward) else {
                debug!(?side, chains = chains.len(), "cut points do not alternate, skipping split");
                return Vec::new();
            };
            let mut used = vec![false; chains.len()];
            for start in 0..chains.len() {
                if used[start] {
                    continue;
                }
                let Some(points) = trace_piece(&ring, &chains, &next, start, &mut used) else {
                    debug!(start, "split loop did not close");
                    continue;
                };
                let points = omit_same_point(&points);
                if points.len() >= 3 && area(&points) >= TOLERANCE {
                    pieces.push(Polygon::new(points));
                }
            }
        }
        pieces
    }

    /// Classifies every vertex and inserts the crossing points between
    /// vertices on opposite sides.
    fn build_ring(&self, points: &[Point2]) -> Vec<RingNode> {
        let side_of = |s: f64| {
            if s >= TOLERANCE {
                Side::Left
            } else if s <= -TOLERANCE {
                Side::Right
            } else {
                Side::On
            }
        };
        let n = points.len();
        let mut ring = Vec::with_capacity(n + 4);
        for i in 0..n {
            let j = (i + 1) % n;
            let si = self.line.side(&points[i]);
            let sj = self.line.side(&points[j]);
            ring.push(RingNode {
                point: points[i],
                side: side_of(si),
                param: self.line.param(&points[i]),
            });
            let (a, b) = (side_of(si), side_of(sj));
            if a != Side::On && b != Side::On && a != b {
                let t = si / (si - sj);
                let param = self.line.param(&(points[i] + (points[j] - points[i]) * t));
                ring.push(RingNode {
                    point: self.line.point_at(param),
                    side: Side::On,
                    param,
                });
            }
        }
        ring
    }
}

/// A lone on-line vertex at a convex corner whose neighbours share a side
/// only grazes the line. It joins that side so the boundary is not broken
/// there. A reflex corner stays on the line and separates the two arms.
fn absorb_convex_touches(ring: &mut [RingNode], counter_clockwise: bool) {
    let n = ring.len();
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let next = ring[(i + 1) % n];
        if ring[i].side != Side::On || prev.side == Side::On || prev.side != next.side {
            continue;
        }
        let turn = cross(&(ring[i].point - prev.point), &(next.point - ring[i].point));
        let convex = if counter_clockwise { turn >= 0.0 } else { turn <= 0.0 };
        if convex {
            ring[i].side = prev.side;
        }
    }
}

/// Maximal runs of `side` nodes, each extended by the on-line node before
/// and after it.
fn collect_chains(ring: &[RingNode], side: Side) -> Vec<Chain> {
    let n = ring.len();
    let mut chains = Vec::new();
    for i in 0..n {
        let before = (i + n - 1) % n;
        if ring[i].side != side || ring[before].side == side {
            continue;
        }
        let mut chain = vec![before];
        let mut idx = i;
        while ring[idx].side == side {
            chain.push(idx);
            idx = (idx + 1) % n;
        }
        chain.push(idx);
        chains.push(chain);
    }
    chains
}

/// Pairs every chain exit with the entry that follows it along the line.
///
/// Sorted in travel direction the endpoints must alternate exit, entry. At a
/// shared point the entry goes first, so a reflex touch closes the arm behind
/// it before opening the next one. Returns the successor of each chain, or
/// `None` when the endpoints do not alternate.
fn link_chains(ring: &[RingNode], chains: &[Chain], forward: bool) -> Option<Vec<usize>> {
    let sign = if forward { 1.0 } else { -1.0 };
    let mut ends: Vec<(f64, bool, usize)> = Vec::with_capacity(chains.len() * 2);
    for (c, chain) in chains.iter().enumerate() {
        let (&entry, &exit) = (chain.first()?, chain.last()?);
        ends.push((sign * ring[entry].param, true, c));
        ends.push((sign * ring[exit].param, false, c));
    }
    ends.sort_by(|a, b| a.0.total_cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut next = vec![usize::MAX; chains.len()];
    for pair in ends.chunks_exact(2) {
        let [(_, false, from), (_, true, to)] = pair else {
            return None;
        };
        next[*from] = *to;
    }
    Some(next)
}

/// Concatenates linked chains from `start` until the loop closes.
fn trace_piece(
    ring: &[RingNode],
    chains: &[Chain],
    next: &[usize],
    start: usize,
    used: &mut [bool],
) -> Option<Vec<Point2>> {
    let mut points = Vec::new();
    let mut current = start;
    loop {
        used[current] = true;
        points.extend(chains[current].iter().map(|&i| ring[i].point));
        current = *next.get(current)?;
        if current == start {
            break;
        }
        if used.get(current).copied().unwrap_or(true) {
            return None;
        }
    }
    Some(points)
}
