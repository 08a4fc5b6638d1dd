//! Outline decomposition into triangles, used to derive body area and mass.

use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{PhysicsError, Result};
use crate::math::polygon_2d::point_in_polygon;
use crate::math::vector_2d::cross;
use crate::math::{Point2, Vector2};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Area and centroid of a decomposed outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub area: f64,
    pub centroid: Point2,
}

impl MassProperties {
    /// Sums the triangles of a decomposition.
    #[must_use]
    pub fn from_triangles(triangles: &[[Point2; 3]]) -> Self {
        let mut area = 0.0;
        let mut weighted = Vector2::zeros();
        for [a, b, c] in triangles {
            let t = cross(&(b - a), &(c - a)).abs() * 0.5;
            area += t;
            weighted += (a.coords + b.coords + c.coords) * (t / 3.0);
        }
        let centroid = if area > 0.0 {
            Point2::from(weighted / area)
        } else {
            Point2::origin()
        };
        Self { area, centroid }
    }
}

/// Decomposes a simple polygon into triangles with a constrained Delaunay
/// triangulation of its boundary.
///
/// # Errors
///
/// Returns `PhysicsError::BodyCreation` if the outline has fewer than three
/// points, a point cannot be inserted, or two boundary edges cross.
pub fn triangulate(points: &[Point2]) -> Result<Vec<[Point2; 3]>> {
    let mut cdt = Cdt::new();
    insert_constraint_loop(&mut cdt, points)?;

    // Every face lies wholly inside or outside the constrained boundary, so
    // its centroid decides.
    let triangles = cdt
        .inner_faces()
        .map(|face| {
            face.vertices().map(|v| {
                let pos = v.position();
                Point2::new(pos.x, pos.y)
            })
        })
        .filter(|[a, b, c]| {
            let center = Point2::from((a.coords + b.coords + c.coords) / 3.0);
            point_in_polygon(&center, points)
        })
        .collect();
    Ok(triangles)
}

fn insert_constraint_loop(cdt: &mut Cdt, points: &[Point2]) -> Result<()> {
    if points.len() < 3 {
        return Err(PhysicsError::BodyCreation("outline needs at least 3 points".into()).into());
    }

    let mut handles = Vec::with_capacity(points.len());
    for p in points {
        let h = cdt
            .insert(SpadePoint2::new(p.x, p.y))
            .map_err(|e: InsertionError| PhysicsError::BodyCreation(format!("CDT insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(PhysicsError::BodyCreation("self-intersecting outline".into()).into());
        }
        cdt.add_constraint(from, to);
    }

    Ok(())
}
