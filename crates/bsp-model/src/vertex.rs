//! Homogeneous model vertices.

use nalgebra::{Matrix4, Point3, Vector4};

use crate::{BspError, Result};

/// A homogeneous 3D point `(x, y, z, w)` with `w = 1` for model geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    coords: Vector4<f64>,
}

impl Vertex {
    /// Creates a vertex from cartesian components.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            coords: Vector4::new(x, y, z, 1.0),
        }
    }

    /// Creates a vertex from raw homogeneous coordinates.
    pub fn from_homogeneous(coords: Vector4<f64>) -> Self {
        Self { coords }
    }

    pub fn from_point(point: Point3<f64>) -> Self {
        Self::new(point.x, point.y, point.z)
    }

    /// Parses a vertex from textual components.
    pub fn from_strs(x: &str, y: &str, z: &str) -> Result<Self> {
        let parse = |axis: &str, s: &str| {
            s.trim().parse::<f64>().map_err(|e| {
                BspError::InvalidGeometry(format!("cannot parse {axis} component {s:?}: {e}"))
            })
        };
        Ok(Self::new(parse("x", x)?, parse("y", y)?, parse("z", z)?))
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.coords.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.coords.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.coords.z
    }

    #[inline]
    pub fn w(&self) -> f64 {
        self.coords.w
    }

    /// Returns the homogeneous coordinates.
    #[inline]
    pub fn homogeneous(&self) -> Vector4<f64> {
        self.coords
    }

    /// Returns the cartesian point (the `x, y, z` components).
    #[inline]
    pub fn point(&self) -> Point3<f64> {
        Point3::new(self.coords.x, self.coords.y, self.coords.z)
    }

    /// Applies a homogeneous transform.
    pub fn transformed(&self, m: &Matrix4<f64>) -> Self {
        Self {
            coords: m * self.coords,
        }
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(point: Point3<f64>) -> Self {
        Self::from_point(point)
    }
}
