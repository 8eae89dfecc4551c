//! Plane representation and plane-plane intersection.

use nalgebra::{Point3, Vector3};

use crate::{BspError, Line3D, Result, Tolerance};

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Positive side of the normal.
    Front,
    /// Negative side of the normal.
    Back,
    /// Within the tolerance of the plane.
    OnPlane,
}

/// A plane in 3D space, represented as `normal · point = offset`.
///
/// The normal is always unit length, so [`signed_distance`](Self::signed_distance)
/// is a true euclidean distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane3D {
    normal: Vector3<f64>,
    offset: f64,
    anchor: Point3<f64>,
}

impl Plane3D {
    /// Creates a plane through `anchor` with the given (not necessarily unit) normal.
    ///
    /// Fails with [`BspError::DegenerateGeometry`] if the normal is shorter
    /// than `tol.magnitude`.
    pub fn from_point_and_normal(
        anchor: Point3<f64>,
        normal: Vector3<f64>,
        tol: &Tolerance,
    ) -> Result<Self> {
        let norm = normal.norm();
        if !(norm > tol.magnitude) {
            return Err(BspError::DegenerateGeometry(format!(
                "plane normal {:?} has zero length",
                normal.as_slice()
            )));
        }
        let unit_normal = normal / norm;
        Ok(Self {
            normal: unit_normal,
            offset: unit_normal.dot(&anchor.coords),
            anchor,
        })
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// The point the plane was built from (a triangle's mean position).
    #[inline]
    pub fn anchor(&self) -> Point3<f64> {
        self.anchor
    }

    /// Signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind
    #[inline]
    pub fn signed_distance(&self, point: Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.anchor))
    }

    /// Classifies which side of the plane a point lies on.
    pub fn classify_point(&self, point: Point3<f64>, epsilon: f64) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Computes the line where this plane meets `other`.
    ///
    /// Returns `None` when the planes are parallel, i.e. when the cross
    /// product of the normals is shorter than `tol.direction`.
    ///
    /// The returned line point is found by fixing the coordinate along which
    /// the line direction is largest to zero and solving the two plane
    /// equations for the remaining two coordinates.
    pub fn intersect(&self, other: &Plane3D, tol: &Tolerance) -> Option<Line3D> {
        let n1 = self.normal;
        let n2 = other.normal;
        let direction = n1.cross(&n2);
        if direction.norm() < tol.direction {
            return None;
        }

        let k = direction.iamax();
        let (i, j) = ((k + 1) % 3, (k + 2) % 3);

        let det = n1[i] * n2[j] - n1[j] * n2[i];
        if det.abs() < tol.magnitude {
            return None;
        }

        let (d1, d2) = (self.offset, other.offset);
        let mut point = Point3::origin();
        point[i] = (d1 * n2[j] - d2 * n1[j]) / det;
        point[j] = (n1[i] * d2 - n2[i] * d1) / det;

        Line3D::new(point, direction, tol).ok()
    }
}
