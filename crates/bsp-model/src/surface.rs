//! The drawing surface consumed by the renderers.

use crate::Color;

/// A 2D canvas with stroke/fill state and polygon and line primitives.
pub trait DrawSurface {
    fn set_stroke(&mut self, color: Color);
    fn set_fill(&mut self, color: Color);
    fn begin_polygon(&mut self);
    fn add_vertex(&mut self, x: f64, y: f64);
    /// Finishes the current polygon; `closed` joins the last vertex to the first.
    fn end_polygon(&mut self, closed: bool);
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetStroke(Color),
    SetFill(Color),
    BeginPolygon,
    Vertex(f64, f64),
    EndPolygon { closed: bool },
    Line(f64, f64, f64, f64),
}

/// A polygon reassembled from recorded commands.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPolygon {
    pub stroke: Color,
    pub fill: Color,
    pub vertices: Vec<(f64, f64)>,
    pub closed: bool,
}

/// A headless surface that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Completed polygons in drawing order, with the stroke and fill that
    /// were active when each one began.
    pub fn polygons(&self) -> Vec<RecordedPolygon> {
        let mut stroke = Color::BLACK;
        let mut fill = Color::BLACK;
        let mut current: Option<RecordedPolygon> = None;
        let mut polygons = Vec::new();

        for command in &self.commands {
            match *command {
                DrawCommand::SetStroke(c) => stroke = c,
                DrawCommand::SetFill(c) => fill = c,
                DrawCommand::BeginPolygon => {
                    current = Some(RecordedPolygon {
                        stroke,
                        fill,
                        vertices: Vec::new(),
                        closed: false,
                    });
                }
                DrawCommand::Vertex(x, y) => {
                    if let Some(polygon) = current.as_mut() {
                        polygon.vertices.push((x, y));
                    }
                }
                DrawCommand::EndPolygon { closed } => {
                    if let Some(mut polygon) = current.take() {
                        polygon.closed = closed;
                        polygons.push(polygon);
                    }
                }
                DrawCommand::Line(..) => {}
            }
        }
        polygons
    }

    /// Number of lines drawn.
    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line(..)))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn set_stroke(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetStroke(color));
    }

    fn set_fill(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetFill(color));
    }

    fn begin_polygon(&mut self) {
        self.commands.push(DrawCommand::BeginPolygon);
    }

    fn add_vertex(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::Vertex(x, y));
    }

    fn end_polygon(&mut self, closed: bool) {
        self.commands.push(DrawCommand::EndPolygon { closed });
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.commands.push(DrawCommand::Line(x1, y1, x2, y2));
    }
}
