use tracing::debug;

use crate::geometry::Polygon;
use crate::math::intersect_2d::segment_segment_intersect;
use crate::math::polygon_2d::{area, interior_point, omit_same_point, point_in_polygon, Loopwise};
use crate::math::{Point2, TOLERANCE};

use super::classify::{classify_point_in_polygon, PointClassification};

/// Crossings this close to the end of an edge belong to the next edge.
const PARAM_EPSILON: f64 = 1e-9;

/// Computes the boolean difference `subject \ clip` of two simple polygons.
///
/// Output loops keep the subject's winding. When the clip lies strictly
/// inside the subject, the result is the subject followed by the clip wound
/// the opposite way, ready to be regrouped as a hole by
/// [`GroupByContainment`](crate::operations::GroupByContainment).
pub struct Difference {
    subject: Polygon,
    clip: Polygon,
}

/// Intersection of a subject edge with a clip edge.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    point: Point2,
    subject_edge: usize,
    subject_t: f64,
    clip_edge: usize,
    clip_t: f64,
}

/// A point of an augmented ring, tagged with its crossing index if any.
#[derive(Debug, Clone, Copy)]
struct Node {
    point: Point2,
    crossing: Option<usize>,
}

/// A run of ring points from one crossing to the next, both ends included.
#[derive(Debug, Clone)]
struct Arc {
    start: usize,
    end: usize,
    points: Vec<Point2>,
}

impl Difference {
    /// Creates a new `Difference` operation (subject minus clip).
    #[must_use]
    pub fn new(subject: Polygon, clip: Polygon) -> Self {
        Self { subject, clip }
    }

    /// Executes the difference.
    #[must_use]
    pub fn execute(&self) -> Vec<Polygon> {
        let subject = self.subject.omit_same_point();
        let Some(winding) = subject.loopwise().filter(|_| !subject.is_degenerate()) else {
            return Vec::new();
        };
        let clip = self.clip.omit_same_point();
        if clip.is_degenerate() || clip.loopwise().is_none() {
            return vec![subject];
        }

        // Opposing orientations: subject counter-clockwise, clip clockwise.
        let s = subject.with_loopwise(Loopwise::CounterClockwise).points;
        let c = clip.with_loopwise(Loopwise::Clockwise).points;

        let crossings = find_crossings(&s, &c);
        if crossings.is_empty() {
            return disjoint_difference(subject, &clip, winding);
        }
        if crossings.len() % 2 != 0 {
            debug!(crossings = crossings.len(), "odd crossing count, keeping subject");
            return vec![subject];
        }

        let s_ring = build_ring(&s, &crossings, |x| (x.subject_edge, x.subject_t));
        let c_ring = build_ring(&c, &crossings, |x| (x.clip_edge, x.clip_t));

        let mut kept = Vec::new();
        for arc in split_arcs(&s_ring) {
            match probe(&arc, &c) {
                Some(PointClassification::Outside) => kept.push(arc),
                Some(_) => {}
                None => {
                    debug!("subject arc lies on clip boundary, keeping subject");
                    return vec![subject];
                }
            }
        }
        for arc in split_arcs(&c_ring) {
            match probe(&arc, &s) {
                Some(PointClassification::Inside) => kept.push(arc),
                Some(_) => {}
                None => {
                    debug!("clip arc lies on subject boundary, keeping subject");
                    return vec![subject];
                }
            }
        }

        let Some(loops) = stitch(&kept, crossings.len()) else {
            debug!("difference arcs did not stitch, keeping subject");
            return vec![subject];
        };

        loops
            .into_iter()
            .map(|pts| omit_same_point(&pts))
            .filter(|pts| pts.len() >= 3 && area(pts) >= TOLERANCE)
            .map(|pts| Polygon::new(pts).with_loopwise(winding))
            .collect()
    }
}

/// Result when the boundaries never cross.
fn disjoint_difference(subject: Polygon, clip: &Polygon, winding: Loopwise) -> Vec<Polygon> {
    let inside = |a: &Polygon, b: &Polygon| {
        interior_point(&a.points).is_some_and(|q| point_in_polygon(&q, &b.points))
            && a.area() <= b.area()
    };
    if inside(&subject, clip) {
        Vec::new()
    } else if inside(clip, &subject) {
        let hole = clip.with_loopwise(winding.opposite());
        vec![subject, hole]
    } else {
        vec![subject]
    }
}

/// Finds every proper crossing between subject and clip edges.
///
/// Parameters are taken half-open (`[0, 1)`) so a crossing through a vertex
/// is reported once.
fn find_crossings(s: &[Point2], c: &[Point2]) -> Vec<Crossing> {
    let mut crossings = Vec::new();
    for i in 0..s.len() {
        let a0 = s[i];
        let a1 = s[(i + 1) % s.len()];
        for j in 0..c.len() {
            let b0 = c[j];
            let b1 = c[(j + 1) % c.len()];
            let Some((point, t, u)) = segment_segment_intersect(&a0, &a1, &b0, &b1) else {
                continue;
            };
            if t >= 1.0 - PARAM_EPSILON || u >= 1.0 - PARAM_EPSILON {
                continue;
            }
            crossings.push(Crossing {
                point,
                subject_edge: i,
                subject_t: t,
                clip_edge: j,
                clip_t: u,
            });
        }
    }
    crossings
}

/// Inserts crossings into a ring, ordered by parameter along each edge.
fn build_ring<F>(points: &[Point2], crossings: &[Crossing], locate: F) -> Vec<Node>
where
    F: Fn(&Crossing) -> (usize, f64),
{
    let mut ring = Vec::with_capacity(points.len() + crossings.len());
    for (i, &point) in points.iter().enumerate() {
        ring.push(Node {
            point,
            crossing: None,
        });
        let mut on_edge: Vec<(usize, f64)> = crossings
            .iter()
            .enumerate()
            .filter_map(|(k, x)| {
                let (edge, t) = locate(x);
                (edge == i).then_some((k, t))
            })
            .collect();
        on_edge.sort_by(|a, b| a.1.total_cmp(&b.1));
        for (k, _) in on_edge {
            ring.push(Node {
                point: crossings[k].point,
                crossing: Some(k),
            });
        }
    }
    ring
}

/// Cuts a ring into arcs between consecutive crossing nodes.
fn split_arcs(ring: &[Node]) -> Vec<Arc> {
    let nodes: Vec<usize> = (0..ring.len()).filter(|&i| ring[i].crossing.is_some()).collect();
    let mut arcs = Vec::with_capacity(nodes.len());
    for (k, &from) in nodes.iter().enumerate() {
        let to = nodes[(k + 1) % nodes.len()];
        let mut points = Vec::new();
        let mut idx = from;
        loop {
            points.push(ring[idx].point);
            if idx == to && points.len() > 1 {
                break;
            }
            idx = (idx + 1) % ring.len();
        }
        if let (Some(start), Some(end)) = (ring[from].crossing, ring[to].crossing) {
            arcs.push(Arc { start, end, points });
        }
    }
    arcs
}

/// Classifies an arc against the other polygon by the midpoint of its first
/// segment that does not lie on the other boundary.
fn probe(arc: &Arc, other: &[Point2]) -> Option<PointClassification> {
    arc.points
        .windows(2)
        .filter(|w| (w[1] - w[0]).norm() >= TOLERANCE)
        .map(|w| Point2::from((w[0].coords + w[1].coords) * 0.5))
        .map(|mid| classify_point_in_polygon(&mid, other))
        .find(|&class| class != PointClassification::OnBoundary)
}

/// Chains kept arcs end-to-start into closed loops.
///
/// Returns `None` if a crossing starts more than one kept arc or a chain
/// cannot be continued.
fn stitch(kept: &[Arc], crossing_count: usize) -> Option<Vec<Vec<Point2>>> {
    let mut starting = vec![None; crossing_count];
    for (i, arc) in kept.iter().enumerate() {
        if starting[arc.start].replace(i).is_some() {
            return None;
        }
    }

    let mut used = vec![false; kept.len()];
    let mut loops = Vec::new();
    for first in 0..kept.len() {
        if used[first] {
            continue;
        }
        let mut points = Vec::new();
        let mut current = first;
        loop {
            used[current] = true;
            let arc = &kept[current];
            points.extend_from_slice(&arc.points[..arc.points.len() - 1]);
            let next = starting[arc.end]?;
            if next == first {
                break;
            }
            if used[next] {
                return None;
            }
            current = next;
        }
        loops.push(points);
    }
    Some(loops)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::new(vec![p(x0, y0), p(x1, y0), p(x1, y1), p(x0, y1)])
    }

    #[test]
    fn overlapping_rectangle_is_notched_out() {
        let out = Difference::new(rect(0.0, 0.0, 10.0, 10.0), rect(5.0, 2.0, 15.0, 8.0)).execute();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].area(), 70.0, epsilon = 1e-9);
        assert_eq!(out[0].loopwise(), Some(Loopwise::CounterClockwise));
        assert_eq!(out[0].len(), 8);
    }

    #[test]
    fn empty_clip_keeps_subject() {
        let subject = rect(0.0, 0.0, 3.0, 3.0);
        let out = Difference::new(subject.clone(), Polygon::default()).execute();
        assert_eq!(out, vec![subject]);
    }

    #[test]
    fn duplicate_points_are_removed_from_kept_subject() {
        let subject = Polygon::new(vec![p(0.0, 0.0), p(0.0, 0.0), p(3.0, 0.0), p(3.0, 3.0)]);
        let out = Difference::new(subject, Polygon::default()).execute();
        assert_eq!(out[0].points, vec![p(0.0, 0.0), p(3.0, 0.0), p(3.0, 3.0)]);
    }

    #[test]
    fn disjoint_clip_keeps_subject() {
        let subject = rect(0.0, 0.0, 3.0, 3.0);
        let out = Difference::new(subject.clone(), rect(5.0, 5.0, 6.0, 6.0)).execute();
        assert_eq!(out, vec![subject]);
    }

    #[test]
    fn covering_clip_removes_subject() {
        let out = Difference::new(rect(1.0, 1.0, 2.0, 2.0), rect(0.0, 0.0, 3.0, 3.0)).execute();
        assert!(out.is_empty());
    }

    #[test]
    fn enclosed_clip_becomes_opposite_loop() {
        let out = Difference::new(rect(0.0, 0.0, 10.0, 10.0), rect(4.0, 4.0, 6.0, 6.0)).execute();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].loopwise(), Some(Loopwise::CounterClockwise));
        assert_eq!(out[1].loopwise(), Some(Loopwise::Clockwise));
        assert_relative_eq!(out[1].area(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn band_cuts_subject_in_two() {
        let out = Difference::new(rect(0.0, 0.0, 10.0, 10.0), rect(-5.0, 4.0, 15.0, 6.0)).execute();
        assert_eq!(out.len(), 2);
        for piece in &out {
            assert_relative_eq!(piece.area(), 40.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn straddling_hole_punched_from_half() {
        let left_half = rect(0.0, 0.0, 5.0, 10.0);
        let hole = rect(3.0, 3.0, 7.0, 7.0).reversed();
        let out = Difference::new(left_half, hole).execute();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].area(), 42.0, epsilon = 1e-9);
    }

    #[test]
    fn clockwise_subject_stays_clockwise() {
        let subject = rect(0.0, 0.0, 10.0, 10.0).reversed();
        let out = Difference::new(subject, rect(5.0, 2.0, 15.0, 8.0)).execute();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].loopwise(), Some(Loopwise::Clockwise));
        assert_relative_eq!(out[0].area(), 70.0, epsilon = 1e-9);
    }

    #[test]
    fn pointed_clip_bites_triangle() {
        let subject = rect(0.0, 0.0, 10.0, 10.0);
        let clip = Polygon::new(vec![p(8.0, 5.0), p(12.0, 3.0), p(16.0, 5.0), p(12.0, 7.0)]);
        let out = Difference::new(subject, clip).execute();
        assert_eq!(out.len(), 1);
        // Triangle (8,5),(10,4),(10,6) is removed: area 2.
        assert_relative_eq!(out[0].area(), 98.0, epsilon = 1e-9);
    }
}
