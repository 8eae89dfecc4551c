//! Triangle geometry resolved from a strip.

use nalgebra::{Point3, Vector3};

use crate::{BspError, Plane3D, Result, Tolerance};

/// A triangle in 3D space, defined by three vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    vertices: [Point3<f64>; 3],
}

impl Triangle {
    /// Creates a new triangle from three points.
    ///
    /// The winding order determines the normal direction via the right-hand rule:
    /// normal = (b - a) × (c - a)
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Returns the three vertices of the triangle.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>; 3] {
        &self.vertices
    }

    /// Computes the (unnormalized) normal vector of the triangle.
    pub fn normal(&self) -> Vector3<f64> {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a))
    }

    /// Computes the unit normal vector of the triangle.
    ///
    /// Fails with [`BspError::DegenerateGeometry`] for collinear vertices.
    pub fn unit_normal(&self, tol: &Tolerance) -> Result<Vector3<f64>> {
        let n = self.normal();
        let len = n.norm();
        if len > tol.magnitude {
            Ok(n / len)
        } else {
            Err(BspError::DegenerateGeometry(format!(
                "triangle {:?} has collinear vertices",
                self.vertices.map(|p| [p.x, p.y, p.z])
            )))
        }
    }

    /// Mean of the three vertices.
    pub fn centroid(&self) -> Point3<f64> {
        let [a, b, c] = &self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    pub fn area(&self) -> f64 {
        self.normal().norm() * 0.5
    }

    /// Returns the plane through the centroid, oriented by the winding.
    pub fn plane(&self, tol: &Tolerance) -> Result<Plane3D> {
        Plane3D::from_point_and_normal(self.centroid(), self.unit_normal(tol)?, tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normal_follows_winding() {
        let t = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let tol = Tolerance::default();
        assert_abs_diff_eq!(t.unit_normal(&tol).unwrap(), Vector3::new(0.0, 0.0, 1.0));
        assert_abs_diff_eq!(t.area(), 0.5);
        assert_abs_diff_eq!(t.centroid(), Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0));
    }

    #[test]
    fn collinear_triangle_is_degenerate() {
        let t = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        );
        let err = t.plane(&Tolerance::default()).unwrap_err();
        assert!(matches!(err, BspError::DegenerateGeometry(_)));
    }
}
