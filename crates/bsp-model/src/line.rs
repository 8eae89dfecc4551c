//! Infinite lines, used for the intersection of two triangle planes.

use nalgebra::{Point3, Vector3};

use crate::{BspError, Result, Tolerance};

/// Where a line meets a segment `a -> b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeCrossing {
    /// Strictly inside the segment, away from both endpoints.
    Interior(Point3<f64>),
    /// Snapped onto `a`.
    AtStart,
    /// Snapped onto `b`.
    AtEnd,
    /// The lines meet, but beyond the segment.
    Outside,
    /// The segment runs parallel to the line.
    Parallel,
}

/// A line `point + t * direction` with a unit direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Line3D {
    point: Point3<f64>,
    direction: Vector3<f64>,
}

impl Line3D {
    /// Creates a line through `point`. The direction is normalized.
    pub fn new(point: Point3<f64>, direction: Vector3<f64>, tol: &Tolerance) -> Result<Self> {
        let norm = direction.norm();
        if !(norm > tol.magnitude) {
            return Err(BspError::DegenerateGeometry(
                "line direction has zero length".to_string(),
            ));
        }
        Ok(Self {
            point,
            direction: direction / norm,
        })
    }

    #[inline]
    pub fn point(&self) -> Point3<f64> {
        self.point
    }

    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    #[inline]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.point + self.direction * t
    }

    /// Perpendicular offset of `p` from the line: `direction × (p - point)`.
    ///
    /// Components smaller than `tol.direction` are zeroed, so points lying on
    /// the line yield the zero vector.
    pub fn offset_of(&self, p: Point3<f64>, tol: &Tolerance) -> Vector3<f64> {
        self.direction
            .cross(&(p - self.point))
            .map(|c| if c.abs() < tol.direction { 0.0 } else { c })
    }

    /// Finds where this line meets the segment `a -> b` using the closest
    /// points between the two (infinite) lines.
    ///
    /// Hits within `tol.direction` (in segment parameter space) of an
    /// endpoint snap to that endpoint.
    pub fn cross_segment(&self, a: Point3<f64>, b: Point3<f64>, tol: &Tolerance) -> EdgeCrossing {
        let edge = b - a;
        let w0 = self.point - a;

        let dd = self.direction.dot(&self.direction);
        let de = self.direction.dot(&edge);
        let ee = edge.dot(&edge);
        let dw = self.direction.dot(&w0);
        let ew = edge.dot(&w0);

        let denom = dd * ee - de * de;
        if denom.abs() <= tol.magnitude * ee.max(1.0) {
            return EdgeCrossing::Parallel;
        }

        let s = (dd * ew - de * dw) / denom;
        if s.abs() <= tol.direction {
            EdgeCrossing::AtStart
        } else if (s - 1.0).abs() <= tol.direction {
            EdgeCrossing::AtEnd
        } else if s > 0.0 && s < 1.0 {
            EdgeCrossing::Interior(a + edge * s)
        } else {
            EdgeCrossing::Outside
        }
    }
}
