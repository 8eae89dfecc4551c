//! BSP-tree rendering of polygon-strip models.
//!
//! A [`Model`] owns a vertex store and a list of [`PolygonStrip`]s. Building
//! its BSP tree splits triangles that straddle a splitting plane into new
//! strips, after which the tree can be walked from any viewpoint to draw
//! the visible triangles back to front on a [`DrawSurface`].

mod color;
mod config;
mod cuttable;
mod error;
mod line;
mod model;
mod plane;
mod render;
mod strip;
mod surface;
mod triangle;
mod vertex;

pub mod bsp;

pub use color::Color;
pub use config::{RenderOptions, Tolerance};
pub use cuttable::{CutKind, Cuttable, Subdivision};
pub use error::{BspError, Result};
pub use line::{EdgeCrossing, Line3D};
pub use model::{Model, PartsReport};
pub use plane::{Plane3D, PlaneSide};
pub use render::{Projection, RenderStats, Renderer};
pub use strip::{PolygonStrip, TriangleRef};
pub use surface::{DrawCommand, DrawSurface, RecordedPolygon, RecordingSurface};
pub use triangle::Triangle;
pub use vertex::Vertex;
