//! Triangle subdivision along the intersection line of two planes.

use nalgebra::{Point3, Vector3};

use crate::{EdgeCrossing, Line3D, Plane3D, Result, Tolerance, Triangle};

/// Shape of a subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutKind {
    /// The cut crosses two edges: one triangle plus one quadrilateral,
    /// emitted as a 5-vertex strip `[A, Xab, Xac, B, C]`.
    TriangleAndQuad,
    /// The cut runs through a vertex and the opposite edge: two triangles,
    /// emitted as a 4-vertex strip `[P, X, V, Q]`.
    TwoTriangles,
}

/// Result of cutting a triangle: the vertices of a new triangle strip whose
/// triangles each lie on one side of the cutting plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Subdivision {
    pub kind: CutKind,
    pub strip: Vec<Point3<f64>>,
}

/// Geometry that can be cut by a splitting plane.
pub trait Cuttable {
    /// Cuts the geometry by `plane`.
    ///
    /// Returns `Ok(None)` when no subdivision is needed: the planes are
    /// parallel, or the intersection line misses the geometry's extent, or
    /// it only touches a vertex or edge.
    fn cut(&self, plane: &Plane3D, tol: &Tolerance) -> Result<Option<Subdivision>>;
}

impl Cuttable for Triangle {
    fn cut(&self, plane: &Plane3D, tol: &Tolerance) -> Result<Option<Subdivision>> {
        let own = self.plane(tol)?;
        let Some(line) = plane.intersect(&own, tol) else {
            return Ok(None);
        };

        if !straddles(self, &line, own.normal(), tol) {
            return Ok(None);
        }

        Ok(subdivide(self, &line, own.normal(), tol))
    }
}

/// Side of each vertex relative to `line`, measured inside the triangle's
/// plane: the sign of the perpendicular offset along the triangle normal.
fn vertex_sides(
    triangle: &Triangle,
    line: &Line3D,
    normal: Vector3<f64>,
    tol: &Tolerance,
) -> [i8; 3] {
    triangle.vertices().map(|v| {
        let side = line.offset_of(v, tol).dot(&normal);
        if side > 0.0 {
            1
        } else if side < 0.0 {
            -1
        } else {
            0
        }
    })
}

/// True when the offsets of the vertices disagree pairwise, i.e. vertices
/// lie strictly on both sides of the line.
fn straddles(triangle: &Triangle, line: &Line3D, normal: Vector3<f64>, tol: &Tolerance) -> bool {
    let sides = vertex_sides(triangle, line, normal, tol);
    (0..3).any(|i| (i + 1..3).any(|j| sides[i] * sides[j] < 0))
}

fn subdivide(
    triangle: &Triangle,
    line: &Line3D,
    normal: Vector3<f64>,
    tol: &Tolerance,
) -> Option<Subdivision> {
    let v = triangle.vertices();
    let sides = vertex_sides(triangle, line, normal, tol);

    // crossings[k] is the cut point on edge k -> k+1.
    let crossings: [Option<Point3<f64>>; 3] = std::array::from_fn(|k| {
        match line.cross_segment(v[k], v[(k + 1) % 3], tol) {
            EdgeCrossing::Interior(p) => Some(p),
            _ => None,
        }
    });
    let cut_edges: Vec<usize> = (0..3).filter(|&k| crossings[k].is_some()).collect();

    match cut_edges.as_slice() {
        [e1, e2] => {
            // The apex is the vertex shared by both cut edges.
            let apex = if (e1 + 1) % 3 == *e2 { *e2 } else { *e1 };
            let (b, c) = ((apex + 1) % 3, (apex + 2) % 3);
            let x_ab = crossings[apex]?;
            let x_ac = crossings[c]?;
            Some(Subdivision {
                kind: CutKind::TriangleAndQuad,
                strip: vec![v[apex], x_ab, x_ac, v[b], v[c]],
            })
        }
        [edge] => {
            // The vertex opposite the cut edge must lie on the line.
            let on_line = (edge + 2) % 3;
            if sides[on_line] != 0 {
                log::debug!(
                    "cut crosses one edge but misses the opposite vertex; keeping triangle"
                );
                return None;
            }
            let (p, q) = (*edge, (edge + 1) % 3);
            let x = crossings[*edge]?;
            Some(Subdivision {
                kind: CutKind::TwoTriangles,
                strip: vec![v[p], x, v[on_line], v[q]],
            })
        }
        _ => {
            log::debug!(
                "straddling triangle with {} interior crossings; keeping triangle",
                cut_edges.len()
            );
            None
        }
    }
}
