//! Regrouping of flat polygon lists into outer boundaries with holes.

use tracing::debug;

use crate::geometry::Polygon;
use crate::math::polygon_2d::interior_point;
use crate::math::Point2;

/// An outer boundary together with the polygons directly nested inside it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonGroup {
    pub outer: Polygon,
    pub holes: Vec<Polygon>,
}

impl PolygonGroup {
    /// Outer area minus the area of every hole.
    #[must_use]
    pub fn net_area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(Polygon::area).sum::<f64>()
    }
}

/// Partitions a flat polygon list into [`PolygonGroup`]s by nesting depth.
///
/// A polygon nested inside an even number of others is an outer boundary;
/// one nested inside an odd number is a hole of its smallest container.
/// Winding is left untouched.
pub struct GroupByContainment {
    polygons: Vec<Polygon>,
}

struct Candidate {
    polygon: Polygon,
    area: f64,
    probe: Point2,
}

impl GroupByContainment {
    /// Creates a new `GroupByContainment` operation.
    #[must_use]
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// Executes the grouping. Degenerate and zero-area polygons are dropped.
    #[must_use]
    pub fn execute(self) -> Vec<PolygonGroup> {
        let candidates: Vec<Candidate> = self
            .polygons
            .into_iter()
            .map(|p| p.omit_same_point())
            .filter(|p| !p.is_degenerate() && p.loopwise().is_some())
            .filter_map(|polygon| {
                let probe = interior_point(&polygon.points)?;
                let area = polygon.area();
                Some(Candidate {
                    polygon,
                    area,
                    probe,
                })
            })
            .collect();

        // containers[b] = indices of polygons enclosing b's probe point.
        let containers: Vec<Vec<usize>> = candidates
            .iter()
            .enumerate()
            .map(|(b, inner)| {
                candidates
                    .iter()
                    .enumerate()
                    .filter(|&(a, outer)| {
                        a != b && outer.area > inner.area && outer.polygon.contains(&inner.probe)
                    })
                    .map(|(a, _)| a)
                    .collect()
            })
            .collect();

        let mut group_of = vec![None; candidates.len()];
        let mut groups: Vec<PolygonGroup> = Vec::new();
        for (i, c) in candidates.iter().enumerate() {
            if containers[i].len() % 2 == 0 {
                group_of[i] = Some(groups.len());
                groups.push(PolygonGroup {
                    outer: c.polygon.clone(),
                    holes: Vec::new(),
                });
            }
        }

        for (i, c) in candidates.iter().enumerate() {
            if containers[i].len() % 2 == 0 {
                continue;
            }
            let direct = containers[i]
                .iter()
                .copied()
                .min_by(|&a, &b| candidates[a].area.total_cmp(&candidates[b].area));
            if let Some(g) = direct.and_then(|d| group_of[d]) {
                groups[g].holes.push(c.polygon.clone());
            } else {
                debug!(index = i, "hole without an outer container, dropped");
            }
        }
        groups
    }
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
    fn separate_polygons_form_separate_groups() {
        let groups =
            GroupByContainment::new(vec![rect(0.0, 0.0, 1.0, 1.0), rect(5.0, 5.0, 6.0, 6.0)])
                .execute();
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.holes.is_empty()));
        assert_eq!(groups[0].outer, rect(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn nested_polygon_becomes_hole() {
        let hole = rect(4.0, 4.0, 6.0, 6.0).reversed();
        let groups =
            GroupByContainment::new(vec![hole.clone(), rect(0.0, 0.0, 10.0, 10.0)]).execute();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].holes, vec![hole]);
        assert_relative_eq!(groups[0].net_area(), 96.0, epsilon = 1e-9);
    }

    #[test]
    fn island_inside_hole_is_outer_again() {
        let groups = GroupByContainment::new(vec![
            rect(0.0, 0.0, 10.0, 10.0),
            rect(2.0, 2.0, 8.0, 8.0).reversed(),
            rect(4.0, 4.0, 6.0, 6.0),
        ])
        .execute();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].holes.len(), 1);
        assert_eq!(groups[1].outer, rect(4.0, 4.0, 6.0, 6.0));
        assert!(groups[1].holes.is_empty());
    }

    #[test]
    fn hole_goes_to_direct_container() {
        let groups = GroupByContainment::new(vec![
            rect(0.0, 0.0, 20.0, 20.0),
            rect(2.0, 2.0, 18.0, 18.0),
            rect(4.0, 4.0, 16.0, 16.0),
            rect(8.0, 8.0, 10.0, 10.0),
        ])
        .execute();
        // Depths 0, 1, 2, 3: the innermost is a hole of the 12x12 square.
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].holes, vec![rect(2.0, 2.0, 18.0, 18.0)]);
        assert_eq!(groups[1].outer, rect(4.0, 4.0, 16.0, 16.0));
        assert_eq!(groups[1].holes, vec![rect(8.0, 8.0, 10.0, 10.0)]);
    }

    #[test]
    fn degenerate_polygons_are_dropped() {
        let groups = GroupByContainment::new(vec![
            Polygon::new(vec![p(0.0, 0.0), p(1.0, 0.0)]),
            Polygon::new(vec![p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)]),
            rect(0.0, 0.0, 1.0, 1.0),
        ])
        .execute();
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn concave_outer_with_probe_in_notch_is_not_a_container() {
        let u_shape = Polygon::new(vec![
            p(0.0, 0.0),
            p(6.0, 0.0),
            p(6.0, 6.0),
            p(4.0, 6.0),
            p(4.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 6.0),
            p(0.0, 6.0),
        ]);
        let in_notch = rect(2.5, 3.0, 3.5, 5.0);
        let groups = GroupByContainment::new(vec![u_shape, in_notch]).execute();
        assert_eq!(groups.len(), 2);
    }
}
