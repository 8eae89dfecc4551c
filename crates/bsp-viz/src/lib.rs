//! Shared visualization utilities for the BSP model demos.

use bsp_model::{Color as ModelColor, DrawSurface, Model, Result, TriangleRef, Vertex};
use macroquad::prelude::*;
use nalgebra::{Isometry3, Matrix3, Matrix3x4, Point3, Rotation3, Vector3};

pub mod navigator;
pub use navigator::TreeNavigator;

fn to_macroquad(color: ModelColor) -> Color {
    Color::from_rgba(color.r, color.g, color.b, color.a)
}

/// [`DrawSurface`] backed by macroquad's immediate-mode 2D shapes.
///
/// Polygons are filled as a triangle fan, then stroked.
pub struct MacroquadSurface {
    stroke: Color,
    fill: Color,
    polygon: Vec<Vec2>,
    pub line_width: f32,
}

impl Default for MacroquadSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroquadSurface {
    pub fn new() -> Self {
        Self {
            stroke: BLACK,
            fill: BLANK,
            polygon: Vec::new(),
            line_width: 1.0,
        }
    }
}

impl DrawSurface for MacroquadSurface {
    fn set_stroke(&mut self, color: ModelColor) {
        self.stroke = to_macroquad(color);
    }

    fn set_fill(&mut self, color: ModelColor) {
        self.fill = to_macroquad(color);
    }

    fn begin_polygon(&mut self) {
        self.polygon.clear();
    }

    fn add_vertex(&mut self, x: f64, y: f64) {
        self.polygon.push(vec2(x as f32, y as f32));
    }

    fn end_polygon(&mut self, closed: bool) {
        let points = std::mem::take(&mut self.polygon);
        if points.len() >= 3 && self.fill.a > 0.0 {
            for i in 1..points.len() - 1 {
                draw_triangle(points[0], points[i], points[i + 1], self.fill);
            }
        }
        for pair in points.windows(2) {
            draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, self.line_width, self.stroke);
        }
        if closed && points.len() > 2 {
            let (first, last) = (points[0], points[points.len() - 1]);
            draw_line(last.x, last.y, first.x, first.y, self.line_width, self.stroke);
        }
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        draw_line(
            x1 as f32,
            y1 as f32,
            x2 as f32,
            y2 as f32,
            self.line_width,
            self.stroke,
        );
    }
}

/// Intrinsic matrix with focal length `focal` (in pixels) and the
/// principal point at the origin; screen centering is done through
/// [`RenderOptions::center_offset`](bsp_model::RenderOptions).
pub fn camera_matrix(focal: f64) -> Matrix3<f64> {
    Matrix3::new(focal, 0.0, 0.0, 0.0, focal, 0.0, 0.0, 0.0, 1.0)
}

/// Adds the eight corners and six faces of a cube to `model`.
///
/// Each face becomes a 4-vertex strip wound so that both of its triangles
/// face outward.
pub fn add_cube(
    model: &mut Model,
    center: Point3<f64>,
    size: f64,
    rotation: &Rotation3<f64>,
    color: ModelColor,
) -> Result<()> {
    let half = size / 2.0;
    let unit_corners = [
        Vector3::new(-half, -half, -half), // 0: left-bottom-back
        Vector3::new(half, -half, -half),  // 1: right-bottom-back
        Vector3::new(half, half, -half),   // 2: right-top-back
        Vector3::new(-half, half, -half),  // 3: left-top-back
        Vector3::new(-half, -half, half),  // 4: left-bottom-front
        Vector3::new(half, -half, half),   // 5: right-bottom-front
        Vector3::new(half, half, half),    // 6: right-top-front
        Vector3::new(-half, half, half),   // 7: left-top-front
    ];

    let base = model.vertexes().len();
    model.add_vertexes(
        unit_corners
            .iter()
            .map(|v| Vertex::from_point(center + rotation * v)),
    );

    // Counter-clockwise faces a, b, c, d (viewed from outside) as strips a, b, d, c.
    let faces: [[usize; 4]; 6] = [
        [4, 5, 6, 7], // front (+Z)
        [1, 0, 3, 2], // back (-Z)
        [0, 4, 7, 3], // left (-X)
        [5, 1, 2, 6], // right (+X)
        [7, 6, 2, 3], // top (+Y)
        [0, 1, 5, 4], // bottom (-Y)
    ];
    let groups: Vec<Vec<usize>> = faces
        .iter()
        .map(|f| vec![base + f[0], base + f[1], base + f[3], base + f[2]])
        .collect();
    model.set_parts(&groups, Some(&[color; 6][..]))?;
    Ok(())
}

/// A flat strip with a folded one crossing it; building the tree from
/// the flat strip first forces subdivision.
pub fn add_crossing_strips(model: &mut Model) -> Result<()> {
    let base = model.vertexes().len();
    model.add_vertexes([
        // flat strip in the z = 0 plane
        Vertex::new(-1.0, -5.0, 0.0),
        Vertex::new(1.0, -5.0, 0.0),
        Vertex::new(-1.0, 5.0, 0.0),
        Vertex::new(1.0, 5.0, 0.0),
        // tent folded across it
        Vertex::new(-6.0, -1.0, -2.0),
        Vertex::new(-6.0, 1.0, -2.0),
        Vertex::new(0.0, -1.0, 2.0),
        Vertex::new(0.0, 1.0, 2.0),
        Vertex::new(6.0, -1.0, -2.0),
        Vertex::new(6.0, 1.0, -2.0),
    ]);
    model.set_parts(
        &[
            (base..base + 4).collect(),
            (base + 4..base + 10).collect(),
        ],
        Some(&[ModelColor::rgb(40, 90, 200), ModelColor::rgb(200, 80, 40)][..]),
    )?;
    Ok(())
}

/// Builds the tree with the first triangle as root and logs the outcome.
pub fn build_tree(model: &mut Model) -> Result<()> {
    let stats = model.make_bsp_tree(TriangleRef::new(0, 0))?;
    if let Some(tree) = model.tree() {
        log::info!(
            "BSP tree built: {} nodes, depth {}, {} subdivisions, {} parts",
            tree.node_count(),
            tree.depth(),
            stats.subdivisions,
            model.parts().len()
        );
    }
    Ok(())
}

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub target: Point3<f64>,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl OrbitCamera {
    pub fn new(distance: f64, yaw: f64, pitch: f64) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: Point3::origin(),
            zoom_speed: 2.0,
            min_distance: 5.0,
            max_distance: 200.0,
        }
    }

    /// Sets the zoom configuration (speed and distance limits).
    pub fn with_zoom(mut self, speed: f64, min: f64, max: f64) -> Self {
        self.zoom_speed = speed;
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Updates camera state from user input (mouse drag, scroll, arrow keys).
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= f64::from(delta.x) * 2.0;
            self.pitch -= f64::from(delta.y) * 2.0;
        }

        // Clamp pitch to keep the up vector usable
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        let scroll = f64::from(mouse_wheel().1);
        self.distance -= scroll * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);

        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Point3<f64> {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vector3::new(x, y, z)
    }

    /// Pose matrix `[R | t]` mapping world coordinates into camera space,
    /// with the camera looking down its negative z axis.
    pub fn external(&self) -> Matrix3x4<f64> {
        let view = Isometry3::look_at_rh(&self.position(), &self.target, &Vector3::y());
        view.to_homogeneous().fixed_view::<3, 4>(0, 0).into_owned()
    }
}
