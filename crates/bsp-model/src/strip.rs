//! Triangle strips and the locators that address their triangles.

use nalgebra::Matrix4;

use crate::{BspError, Color, Result, Triangle, Vertex};

/// Identifies triangle `sub_index` of strip `part` inside a model.
///
/// The triangle is `strip[sub_index], strip[sub_index + 1], strip[sub_index + 2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleRef {
    pub part: usize,
    pub sub_index: usize,
}

impl TriangleRef {
    pub const fn new(part: usize, sub_index: usize) -> Self {
        Self { part, sub_index }
    }
}

/// An ordered vertex sequence where every window of three consecutive
/// vertices forms a triangle, drawn with one flat color.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStrip {
    vertices: Vec<Vertex>,
    color: Color,
}

impl PolygonStrip {
    /// Creates a strip. Fails with [`BspError::InvalidGeometry`] for fewer
    /// than three vertices.
    pub fn new(vertices: Vec<Vertex>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(BspError::InvalidGeometry(format!(
                "a polygon strip needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        Ok(Self {
            vertices,
            color: Color::DEFAULT_PART,
        })
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, r: u8, g: u8, b: u8) {
        self.color = Color::rgb(r, g, b);
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false for a constructed strip.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of triangles (`len - 2`).
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.vertices.len().saturating_sub(2)
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns an owned copy of the vertices.
    pub fn all_vertices(&self) -> Vec<Vertex> {
        self.vertices.clone()
    }

    /// Returns the raw window `[v[i], v[i+1], v[i+2]]`.
    ///
    /// # Errors
    ///
    /// [`BspError::IndexOutOfRange`] when `sub_index >= len - 2`. A strip
    /// does not know its own position in a model, so the error carries
    /// `part: 0`; lookups through a [`TriangleRef`] report the real part.
    pub fn triangle_at(&self, sub_index: usize) -> Result<[Vertex; 3]> {
        if sub_index >= self.triangle_count() {
            return Err(BspError::IndexOutOfRange {
                part: 0,
                sub_index,
                len: self.vertices.len(),
            });
        }
        let v = &self.vertices;
        Ok([v[sub_index], v[sub_index + 1], v[sub_index + 2]])
    }

    /// Returns triangle `sub_index` with its winding corrected.
    ///
    /// Strips alternate winding; the first two vertices of odd triangles are
    /// swapped so every triangle faces the same way as triangle 0.
    pub fn triangle(&self, sub_index: usize) -> Result<Triangle> {
        let [a, b, c] = self.triangle_at(sub_index)?;
        Ok(if sub_index % 2 == 0 {
            Triangle::new(a.point(), b.point(), c.point())
        } else {
            Triangle::new(b.point(), a.point(), c.point())
        })
    }

    /// Vertex indices of the strip's perimeter: `v0`, the odd vertices
    /// ascending, the last vertex, then the remaining even vertices
    /// descending.
    pub fn outline(&self) -> Vec<usize> {
        outline_order(self.vertices.len())
    }

    /// Index pairs of the interior diagonals shared by adjacent triangles.
    pub fn diagonals(&self) -> impl Iterator<Item = (usize, usize)> {
        (1..self.vertices.len().saturating_sub(2)).map(|i| (i, i + 1))
    }

    /// Applies a homogeneous transform to every vertex in place.
    pub fn affine(&mut self, m: &Matrix4<f64>) {
        for v in &mut self.vertices {
            *v = v.transformed(m);
        }
    }
}

/// Perimeter order of a strip with `len` vertices.
pub(crate) fn outline_order(len: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let last = len - 1;
    let mut order = Vec::with_capacity(len);
    order.push(0);
    order.extend((1..last).step_by(2));
    if last > 0 {
        order.push(last);
    }
    // Even indices below the last vertex, descending (skipping 0).
    if last >= 2 {
        let top = if last % 2 == 0 { last - 2 } else { last - 1 };
        order.extend((2..=top).rev().step_by(2));
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    fn quad() -> PolygonStrip {
        PolygonStrip::new(vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
            Vertex::new(1.0, 1.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn too_few_vertices_is_invalid() {
        let err = PolygonStrip::new(vec![Vertex::new(0.0, 0.0, 0.0); 2]).unwrap_err();
        assert!(matches!(err, BspError::InvalidGeometry(_)));
    }

    #[test]
    fn triangle_at_windows() {
        let strip = quad();
        let v = strip.vertices();

        assert_eq!(strip.triangle_at(0).unwrap(), [v[0], v[1], v[2]]);
        assert_eq!(strip.triangle_at(1).unwrap(), [v[1], v[2], v[3]]);
        assert!(matches!(
            strip.triangle_at(2),
            Err(BspError::IndexOutOfRange { sub_index: 2, len: 4, .. })
        ));
        assert_eq!(strip.triangle_count(), 2);
    }

    #[test]
    fn huge_sub_index_is_out_of_range() {
        let strip = quad();
        assert!(matches!(
            strip.triangle_at(usize::MAX),
            Err(BspError::IndexOutOfRange { sub_index: usize::MAX, len: 4, .. })
        ));
        assert!(strip.triangle(usize::MAX - 1).is_err());
    }

    #[test]
    fn odd_triangles_keep_strip_facing() {
        // Zigzag order a, b, d, c of the unit square.
        let strip = PolygonStrip::new(vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0),
            Vertex::new(1.0, 1.0, 0.0),
        ])
        .unwrap();
        let tol = crate::Tolerance::default();
        let up = Vector3::new(0.0, 0.0, 1.0);

        assert_abs_diff_eq!(strip.triangle(0).unwrap().unit_normal(&tol).unwrap(), up);
        assert_abs_diff_eq!(strip.triangle(1).unwrap().unit_normal(&tol).unwrap(), up);
    }

    #[test]
    fn set_color_mutates_in_place() {
        let mut strip = quad();
        assert_eq!(strip.color(), Color::DEFAULT_PART);
        strip.set_color(1, 2, 3);
        assert_eq!(strip.color(), Color::rgb(1, 2, 3));
    }

    #[test]
    fn all_vertices_is_a_copy() {
        let strip = quad();
        let mut copy = strip.all_vertices();
        copy[0] = Vertex::new(9.0, 9.0, 9.0);
        assert_eq!(strip.vertices()[0], Vertex::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn outline_walks_the_perimeter() {
        assert_eq!(outline_order(3), vec![0, 1, 2]);
        assert_eq!(outline_order(4), vec![0, 1, 3, 2]);
        assert_eq!(outline_order(5), vec![0, 1, 3, 4, 2]);
        assert_eq!(outline_order(6), vec![0, 1, 3, 5, 4, 2]);
    }

    #[test]
    fn diagonals_are_interior_edges() {
        let strip = quad();
        assert_eq!(strip.diagonals().collect::<Vec<_>>(), vec![(1, 2)]);
    }

    #[test]
    fn affine_moves_every_vertex() {
        let mut strip = quad();
        strip.affine(&nalgebra::Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 2.0, 2.0)));
        assert_eq!(strip.vertices()[2], Vertex::new(2.0, 2.0, 0.0));
    }
}
