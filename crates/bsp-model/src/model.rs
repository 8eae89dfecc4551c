//! Model assembly: vertex store, strips, and the BSP tree built over them.

use nalgebra::{Matrix3, Matrix3x4, Matrix4, Point3, RowVector4};

use crate::bsp::{traverse_facing, BspTree, CollectingVisitor, PartitionStats, Partitioner};
use crate::{
    BspError, Color, DrawSurface, PolygonStrip, RenderOptions, RenderStats, Renderer, Result,
    Tolerance, TriangleRef, Vertex,
};

/// Diagnostics from [`Model::set_parts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartsReport {
    /// Number of strips appended.
    pub added: usize,
    /// Indices (into the input groups) skipped for having fewer than three entries.
    pub skipped: Vec<usize>,
}

/// A static polygonal model drawn through a BSP tree.
///
/// Building the tree appends strips to [`parts`](Self::parts) (the
/// pieces of subdivided triangles) after the strips added through
/// [`set_parts`](Self::set_parts). Those pieces belong to the tree: every
/// rebuild drops them and splits the source strips again, so a rebuild
/// with the same root yields the same tree and parts.
#[derive(Debug, Clone, Default)]
pub struct Model {
    vertexes: Vec<Vertex>,
    parts: Vec<PolygonStrip>,
    /// Leading entries of `parts` that came from `set_parts`.
    source_parts: usize,
    tree: Option<BspTree<TriangleRef>>,
    tolerance: Tolerance,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Replaces the vertex store.
    pub fn set_vertexes(&mut self, vertexes: Vec<Vertex>) {
        self.vertexes = vertexes;
    }

    /// Appends to the vertex store.
    pub fn add_vertexes(&mut self, vertexes: impl IntoIterator<Item = Vertex>) {
        self.vertexes.extend(vertexes);
    }

    #[inline]
    pub fn vertexes(&self) -> &[Vertex] {
        &self.vertexes
    }

    #[inline]
    pub fn parts(&self) -> &[PolygonStrip] {
        &self.parts
    }

    /// Mutable access to one strip, e.g. to recolor it.
    pub fn part_mut(&mut self, index: usize) -> Option<&mut PolygonStrip> {
        self.parts.get_mut(index)
    }

    #[inline]
    pub fn tree(&self) -> Option<&BspTree<TriangleRef>> {
        self.tree.as_ref()
    }

    /// Appends one strip per index group, copying the referenced vertices.
    ///
    /// Any built tree is discarded together with the pieces it appended.
    /// `colors[i]`, when present, colors the strip built from group `i`.
    /// Groups with fewer than three indices are skipped and reported; an
    /// index past the vertex store fails with [`BspError::InvalidGeometry`]
    /// before anything is appended.
    pub fn set_parts(
        &mut self,
        index_groups: &[Vec<usize>],
        colors: Option<&[Color]>,
    ) -> Result<PartsReport> {
        let mut report = PartsReport::default();
        let mut strips = Vec::with_capacity(index_groups.len());

        for (i, group) in index_groups.iter().enumerate() {
            if group.len() < 3 {
                log::warn!(
                    "index group {i} has {} entries (at least 3 needed); skipped",
                    group.len()
                );
                report.skipped.push(i);
                continue;
            }

            let vertices = group
                .iter()
                .map(|&index| {
                    self.vertexes.get(index).copied().ok_or_else(|| {
                        BspError::InvalidGeometry(format!(
                            "index group {i} references vertex {index}, but only {} exist",
                            self.vertexes.len()
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let mut strip = PolygonStrip::new(vertices)?;
            if let Some(color) = colors.and_then(|c| c.get(i)) {
                strip = strip.with_color(*color);
            }
            strips.push(strip);
        }

        report.added = strips.len();
        self.discard_tree();
        self.parts.extend(strips);
        self.source_parts = self.parts.len();
        Ok(report)
    }

    /// Every triangle of every current part, in part order.
    pub fn triangle_refs(&self) -> Vec<TriangleRef> {
        self.parts
            .iter()
            .enumerate()
            .flat_map(|(part, strip)| {
                (0..strip.triangle_count()).map(move |sub| TriangleRef::new(part, sub))
            })
            .collect()
    }

    /// Number of strips added through [`set_parts`](Self::set_parts); any
    /// parts after these are pieces appended by the current tree.
    #[inline]
    pub fn source_part_count(&self) -> usize {
        self.source_parts
    }

    fn discard_tree(&mut self) {
        self.tree = None;
        self.parts.truncate(self.source_parts);
    }

    /// Discards any existing tree, with the pieces it appended, and builds a
    /// new one over every triangle of the source strips, splitting first
    /// by `root`. On failure no tree is kept and no pieces remain.
    pub fn make_bsp_tree(&mut self, root: TriangleRef) -> Result<PartitionStats> {
        self.discard_tree();

        let strip = self.parts.get(root.part).ok_or(BspError::IndexOutOfRange {
            part: root.part,
            sub_index: root.sub_index,
            len: self.parts.len(),
        })?;
        if root.sub_index >= strip.triangle_count() {
            return Err(BspError::IndexOutOfRange {
                part: root.part,
                sub_index: root.sub_index,
                len: strip.len(),
            });
        }

        let triangles = self.triangle_refs();
        let partitioner = Partitioner::new(self.tolerance);
        match partitioner.build_tree(&mut self.parts, &triangles, root) {
            Ok((tree, stats)) => {
                self.tree = Some(tree);
                Ok(stats)
            }
            Err(err) => {
                self.discard_tree();
                Err(err)
            }
        }
    }

    /// Applies a homogeneous transform to every vertex of every part.
    pub fn affine(&mut self, m: &Matrix4<f64>) {
        for part in &mut self.parts {
            part.affine(m);
        }
    }

    /// World-space position of the camera described by an external (pose)
    /// matrix: the origin moved by the inverse pose.
    pub fn viewpoint(external: &Matrix3x4<f64>) -> Result<Point3<f64>> {
        let pose = Matrix4::from_rows(&[
            external.row(0).into_owned(),
            external.row(1).into_owned(),
            external.row(2).into_owned(),
            RowVector4::new(0.0, 0.0, 0.0, 1.0),
        ]);
        let inverse = pose.try_inverse().ok_or_else(|| {
            BspError::DegenerateGeometry("external matrix is not invertible".to_string())
        })?;
        let w = inverse[(3, 3)];
        Ok(Point3::new(inverse[(0, 3)], inverse[(1, 3)], inverse[(2, 3)]) / w)
    }

    /// Triangles the renderer would draw from `viewpoint`, in draw order.
    pub fn draw_order(&self, viewpoint: Point3<f64>) -> Result<Vec<TriangleRef>> {
        let tree = self.tree.as_ref().ok_or(BspError::EmptyTree)?;
        let mut visitor = CollectingVisitor::new();
        traverse_facing(tree, &self.parts, viewpoint, &self.tolerance, &mut visitor)?;
        Ok(visitor.into_triangles())
    }

    /// Draws the model in BSP visibility order for the given camera.
    /// Without a tree nothing is drawn.
    pub fn render<D: DrawSurface>(
        &self,
        camera: &Matrix3<f64>,
        external: &Matrix3x4<f64>,
        options: &RenderOptions,
        surface: &mut D,
    ) -> Result<RenderStats> {
        if self.tree.is_none() {
            log::debug!("model rendered before make_bsp_tree; nothing drawn");
            return Ok(RenderStats::default());
        }
        let viewpoint = Self::viewpoint(external)?;
        Renderer::new(options)
            .with_tolerance(self.tolerance)
            .render(self.tree.as_ref(), &self.parts, camera, external, viewpoint, surface)
    }

    /// Orthographic wireframe of all parts.
    pub fn render_frame<D: DrawSurface>(&self, options: &RenderOptions, surface: &mut D) {
        Renderer::new(options).render_frame(&self.parts, surface);
    }

    /// Perspective wireframe of all parts, without visibility ordering.
    pub fn render_frame_perspective<D: DrawSurface>(
        &self,
        camera: &Matrix3<f64>,
        external: &Matrix3x4<f64>,
        options: &RenderOptions,
        surface: &mut D,
    ) {
        Renderer::new(options).render_frame_perspective(&self.parts, camera, external, surface);
    }
}
