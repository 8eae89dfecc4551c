//! Projection, shading and the renderers that feed a [`DrawSurface`].

use nalgebra::{Matrix3, Matrix3x4, Point2, Point3, Vector3};

use crate::bsp::{traverse_facing, BspTree, TriangleVisitor, VisibleTriangle};
use crate::strip::outline_order;
use crate::{
    Color, DrawSurface, PolygonStrip, RenderOptions, Result, Tolerance, TriangleRef, Vertex,
};

/// Pinhole projection through `camera · external`.
///
/// Points are visible when their camera-space depth is negative; the
/// perspective divide uses the negated depth.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    calibration: Matrix3x4<f64>,
    external: Matrix3x4<f64>,
}

impl Projection {
    pub fn new(camera: &Matrix3<f64>, external: &Matrix3x4<f64>) -> Self {
        Self {
            calibration: camera * external,
            external: *external,
        }
    }

    /// Camera-space depth of a vertex.
    #[inline]
    pub fn depth(&self, vertex: &Vertex) -> f64 {
        (self.external * vertex.homogeneous()).z
    }

    /// Projects a vertex to image coordinates. Returns `None` for vertices
    /// at or behind the camera plane.
    pub fn project(&self, vertex: &Vertex) -> Option<Point2<f64>> {
        let depth = self.depth(vertex);
        if depth >= 0.0 {
            return None;
        }
        let image = self.calibration * vertex.homogeneous() / -depth;
        Some(Point2::new(image.x, image.y))
    }
}

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Triangles emitted to the surface.
    pub drawn: usize,
    /// Facing triangles dropped because fewer than three vertices were in
    /// front of the camera.
    pub clipped: usize,
}

/// Emits draw calls for strips and BSP trees.
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    options: &'a RenderOptions,
    tolerance: Tolerance,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            tolerance: Tolerance::default(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Maps image coordinates to surface coordinates: y is flipped and the
    /// center offset added.
    #[inline]
    fn to_surface(&self, x: f64, y: f64) -> (f64, f64) {
        let [cx, cy] = self.options.center_offset;
        (x + cx, -y + cy)
    }

    /// Flat shading intensity in `[0, 1]` for a triangle.
    ///
    /// A Lambert term against the fixed light direction, attenuated by an
    /// inverse-square falloff once the viewpoint is farther than
    /// `standard_luminous_distance`, lifted by the ambient floor.
    pub fn shade(
        &self,
        normal: Vector3<f64>,
        centroid: Point3<f64>,
        viewpoint: Point3<f64>,
    ) -> f64 {
        let light = Vector3::from(self.options.light_direction);
        let lambert = match light.try_normalize(self.tolerance.magnitude) {
            Some(light) => normal.dot(&-light).max(0.0),
            None => 1.0,
        };

        let distance = (viewpoint - centroid).norm();
        let falloff = if distance > self.tolerance.magnitude {
            (self.options.standard_luminous_distance / distance).powi(2).min(1.0)
        } else {
            1.0
        };

        let ambient = self.options.ambient.clamp(0.0, 1.0);
        (ambient + (1.0 - ambient) * lambert * falloff).clamp(0.0, 1.0)
    }

    /// Draws the triangles of `tree` in visibility order as seen from
    /// `viewpoint`. An absent tree draws nothing.
    pub fn render<D: DrawSurface>(
        &self,
        tree: Option<&BspTree<TriangleRef>>,
        parts: &[PolygonStrip],
        camera: &Matrix3<f64>,
        external: &Matrix3x4<f64>,
        viewpoint: Point3<f64>,
        surface: &mut D,
    ) -> Result<RenderStats> {
        let Some(tree) = tree else {
            log::debug!("render requested without a BSP tree; nothing drawn");
            return Ok(RenderStats::default());
        };

        let mut visitor = DrawVisitor {
            renderer: self,
            parts,
            projection: Projection::new(camera, external),
            viewpoint,
            surface,
            stats: RenderStats::default(),
        };
        traverse_facing(tree, parts, viewpoint, &self.tolerance, &mut visitor)?;
        Ok(visitor.stats)
    }

    /// Orthographic wireframe of every strip, ignoring depth.
    pub fn render_frame<D: DrawSurface>(&self, parts: &[PolygonStrip], surface: &mut D) {
        for strip in parts {
            let points: Vec<(f64, f64)> = strip
                .vertices()
                .iter()
                .map(|v| self.to_surface(v.x(), v.y()))
                .collect();
            self.draw_strip(&points, strip.color(), surface);
        }
    }

    /// Perspective wireframe of every strip with no visibility ordering.
    /// Vertices behind the camera are dropped.
    pub fn render_frame_perspective<D: DrawSurface>(
        &self,
        parts: &[PolygonStrip],
        camera: &Matrix3<f64>,
        external: &Matrix3x4<f64>,
        surface: &mut D,
    ) {
        let projection = Projection::new(camera, external);
        for strip in parts {
            let points: Vec<(f64, f64)> = strip
                .vertices()
                .iter()
                .filter_map(|v| projection.project(v))
                .map(|p| self.to_surface(p.x, p.y))
                .collect();
            if points.is_empty() {
                continue;
            }
            self.draw_strip(&points, Color::rgba(0, 0, 0, 0), surface);
        }
    }

    fn draw_strip<D: DrawSurface>(&self, points: &[(f64, f64)], fill: Color, surface: &mut D) {
        surface.set_stroke(self.options.stroke_color);
        surface.set_fill(fill);
        surface.begin_polygon();
        for i in outline_order(points.len()) {
            let (x, y) = points[i];
            surface.add_vertex(x, y);
        }
        surface.end_polygon(true);

        if self.options.show_sub_grid {
            surface.set_stroke(self.options.sub_grid_stroke());
            for i in 1..points.len().saturating_sub(2) {
                let ((x1, y1), (x2, y2)) = (points[i], points[i + 1]);
                surface.draw_line(x1, y1, x2, y2);
            }
        }
    }
}

/// Projects and draws each visible triangle handed over by the traversal.
struct DrawVisitor<'r, 'p, D> {
    renderer: &'r Renderer<'r>,
    parts: &'p [PolygonStrip],
    projection: Projection,
    viewpoint: Point3<f64>,
    surface: &'p mut D,
    stats: RenderStats,
}

impl<D: DrawSurface> DrawVisitor<'_, '_, D> {
    fn project_to_surface(&self, point: Point3<f64>) -> Option<(f64, f64)> {
        self.projection
            .project(&Vertex::from_point(point))
            .map(|p| self.renderer.to_surface(p.x, p.y))
    }

    /// Interior strip diagonals bordering triangle `sub_index`.
    fn draw_sub_grid(&mut self, strip: &PolygonStrip, sub_index: usize) {
        let last_diagonal = strip.len().saturating_sub(3);
        let edges = [
            (sub_index >= 1).then_some((sub_index, sub_index + 1)),
            (sub_index < last_diagonal).then_some((sub_index + 1, sub_index + 2)),
        ];

        self.surface.set_stroke(self.renderer.options.sub_grid_stroke());
        for (i, j) in edges.into_iter().flatten() {
            let vertices = strip.vertices();
            let a = self.project_to_surface(vertices[i].point());
            let b = self.project_to_surface(vertices[j].point());
            if let (Some((x1, y1)), Some((x2, y2))) = (a, b) {
                self.surface.draw_line(x1, y1, x2, y2);
            }
        }
    }
}

impl<D: DrawSurface> TriangleVisitor for DrawVisitor<'_, '_, D> {
    fn visit(&mut self, visible: &VisibleTriangle) {
        let points: Vec<(f64, f64)> = visible
            .shape
            .vertices()
            .iter()
            .filter_map(|p| self.project_to_surface(*p))
            .collect();
        if points.len() < 3 {
            self.stats.clipped += 1;
            return;
        }

        let parts = self.parts;
        let Some(strip) = parts.get(visible.triangle.part) else {
            return;
        };
        let intensity = self
            .renderer
            .shade(visible.normal, visible.centroid, self.viewpoint);

        self.surface.set_stroke(self.renderer.options.stroke_color);
        self.surface.set_fill(strip.color().shaded(intensity));
        self.surface.begin_polygon();
        for (x, y) in points {
            self.surface.add_vertex(x, y);
        }
        self.surface.end_polygon(true);
        self.stats.drawn += 1;

        if self.renderer.options.show_sub_grid {
            self.draw_sub_grid(strip, visible.triangle.sub_index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingSurface;
    use approx::assert_abs_diff_eq;

    /// Camera at the origin looking down -z, unit focal length.
    fn camera() -> (Matrix3<f64>, Matrix3x4<f64>) {
        (Matrix3::identity(), Matrix3x4::identity())
    }

    fn strip(z: f64) -> PolygonStrip {
        PolygonStrip::new(vec![
            Vertex::new(0.0, 0.0, z),
            Vertex::new(1.0, 0.0, z),
            Vertex::new(0.0, 1.0, z),
            Vertex::new(1.0, 1.0, z),
        ])
        .unwrap()
    }

    #[test]
    fn projection_divides_by_negated_depth() {
        let (k, e) = camera();
        let projection = Projection::new(&k, &e);

        let p = projection.project(&Vertex::new(2.0, -4.0, -2.0)).unwrap();
        assert_abs_diff_eq!(p, Point2::new(1.0, -2.0));
        assert!(projection.project(&Vertex::new(0.0, 0.0, 0.0)).is_none());
        assert!(projection.project(&Vertex::new(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn shade_uses_light_and_falloff() {
        let options = RenderOptions {
            ambient: 0.0,
            standard_luminous_distance: 10.0,
            ..Default::default()
        };
        let renderer = Renderer::new(&options);
        let up = Vector3::new(0.0, 0.0, 1.0);

        // Facing the light, within the luminous distance.
        let near = renderer.shade(up, Point3::origin(), Point3::new(0.0, 0.0, 5.0));
        assert_abs_diff_eq!(near, 1.0);

        // Twice the distance: a quarter of the light.
        let far = renderer.shade(up, Point3::origin(), Point3::new(0.0, 0.0, 20.0));
        assert_abs_diff_eq!(far, 0.25);

        // Facing away from the light.
        let away = renderer.shade(-up, Point3::origin(), Point3::new(0.0, 0.0, 5.0));
        assert_abs_diff_eq!(away, 0.0);
    }

    #[test]
    fn ambient_sets_the_floor() {
        let options = RenderOptions {
            ambient: 0.3,
            ..Default::default()
        };
        let renderer = Renderer::new(&options);
        let side = renderer.shade(Vector3::x(), Point3::origin(), Point3::new(0.0, 0.0, 5.0));
        assert_abs_diff_eq!(side, 0.3);
    }

    #[test]
    fn render_without_tree_is_a_no_op() {
        let options = RenderOptions::default();
        let (k, e) = camera();
        let mut surface = RecordingSurface::new();
        let stats = Renderer::new(&options)
            .render(None, &[], &k, &e, Point3::origin(), &mut surface)
            .unwrap();

        assert_eq!(stats, RenderStats::default());
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn render_draws_facing_triangles_with_shaded_fill() {
        let options = RenderOptions {
            show_sub_grid: false,
            ambient: 0.0,
            ..Default::default()
        };
        let (k, e) = camera();
        let parts = vec![strip(-5.0)];
        let mut tree = BspTree::new(TriangleRef::new(0, 0));
        tree.add_left(TriangleRef::new(0, 1));

        let mut surface = RecordingSurface::new();
        let stats = Renderer::new(&options)
            .render(Some(&tree), &parts, &k, &e, Point3::origin(), &mut surface)
            .unwrap();

        assert_eq!(stats.drawn, 2);
        let polygons = surface.polygons();
        assert_eq!(polygons.len(), 2);
        for polygon in &polygons {
            assert_eq!(polygon.fill, Color::DEFAULT_PART);
            assert_eq!(polygon.stroke, Color::BLACK);
            assert!(polygon.closed);
            // y is flipped on the surface.
            assert!(polygon.vertices.iter().all(|&(_, y)| y <= 0.0));
        }
    }

    #[test]
    fn render_clips_triangles_behind_the_camera() {
        let options = RenderOptions::default();
        let (k, e) = camera();
        // Faces +z, lies behind the camera at z = 5.
        let parts = vec![strip(5.0)];
        let tree = BspTree::new(TriangleRef::new(0, 0));

        let mut surface = RecordingSurface::new();
        let stats = Renderer::new(&options)
            .render(Some(&tree), &parts, &k, &e, Point3::new(0.0, 0.0, 10.0), &mut surface)
            .unwrap();

        assert_eq!(stats, RenderStats { drawn: 0, clipped: 1 });
        assert!(surface.polygons().is_empty());
    }

    #[test]
    fn render_sub_grid_marks_interior_diagonal() {
        let options = RenderOptions::default();
        let (k, e) = camera();
        let parts = vec![strip(-5.0)];
        let tree = BspTree::new(TriangleRef::new(0, 0));

        let mut surface = RecordingSurface::new();
        Renderer::new(&options)
            .render(Some(&tree), &parts, &k, &e, Point3::origin(), &mut surface)
            .unwrap();

        // Triangle 0 of a 4-vertex strip borders the diagonal v1-v2.
        assert_eq!(surface.line_count(), 1);
    }

    #[test]
    fn render_frame_outlines_each_strip() {
        let options = RenderOptions {
            center_offset: [10.0, 20.0],
            ..Default::default()
        };
        let parts = vec![strip(0.0)];
        let mut surface = RecordingSurface::new();
        Renderer::new(&options).render_frame(&parts, &mut surface);

        let polygons = surface.polygons();
        assert_eq!(polygons.len(), 1);
        assert_eq!(
            polygons[0].vertices,
            vec![(10.0, 20.0), (11.0, 20.0), (11.0, 19.0), (10.0, 19.0)]
        );
        assert_eq!(polygons[0].fill, Color::DEFAULT_PART);
        assert_eq!(surface.line_count(), 1);
    }

    #[test]
    fn render_frame_perspective_drops_hidden_vertices() {
        let options = RenderOptions {
            show_sub_grid: false,
            ..Default::default()
        };
        let (k, e) = camera();
        let mut hidden = PolygonStrip::new(vec![Vertex::new(0.0, 0.0, 1.0); 3]).unwrap();
        hidden.set_color(9, 9, 9);
        let parts = vec![strip(-2.0), hidden];

        let mut surface = RecordingSurface::new();
        Renderer::new(&options).render_frame_perspective(&parts, &k, &e, &mut surface);

        let polygons = surface.polygons();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].vertices.len(), 4);
        assert_eq!(polygons[0].fill, Color::rgba(0, 0, 0, 0));
    }
}
