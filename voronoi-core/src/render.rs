//! Render primitives derived from a diagram.

use crate::voronoi::Diagram;
use crate::Position;

/// A 3D vertex as handed to the rendering surface. `z` is always 0.
pub type Vertex = [f32; 3];

fn vertex(p: &Position) -> Vertex {
    [p.x as f32, p.y as f32, 0.0]
}

/// Point cloud and line list for one diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderGeometry {
    /// One vertex per cell, at its site
    pub points: Vec<Vertex>,
    /// Two vertices per edge, so the length is always even
    pub lines: Vec<Vertex>,
}

impl RenderGeometry {
    pub fn from_diagram(diagram: &Diagram) -> Self {
        Self {
            points: diagram_points(diagram),
            lines: diagram_lines(diagram),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty()
    }

    /// Number of line segments
    pub fn segment_count(&self) -> usize {
        self.lines.len() / 2
    }

    /// Points as packed native-endian f32 triples, ready for a vertex buffer.
    pub fn point_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.points.as_slice())
    }

    /// Line endpoints as packed f32 triples.
    pub fn line_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.lines.as_slice())
    }

    /// Draw both primitive sets. Empty sets are not handed to the surface.
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        if !self.points.is_empty() {
            surface.draw_points(&self.points);
        }
        if !self.lines.is_empty() {
            surface.draw_lines(&self.lines);
        }
    }
}

/// Cell sites, one per cell.
pub fn diagram_points(diagram: &Diagram) -> Vec<Vertex> {
    diagram.cells.iter().map(|cell| vertex(&cell.site)).collect()
}

/// Endpoints of every edge, flattened.
pub fn diagram_lines(diagram: &Diagram) -> Vec<Vertex> {
    diagram
        .edges
        .iter()
        .flat_map(|edge| [vertex(&edge.a), vertex(&edge.b)])
        .collect()
}

/// Something that can draw points and line lists.
pub trait RenderSurface {
    fn draw_points(&mut self, points: &[Vertex]);

    /// `lines` holds segment endpoints pairwise.
    fn draw_lines(&mut self, lines: &[Vertex]);
}

/// Surface that keeps what it was last asked to draw.
///
/// Call [`RecordingSurface::clear`] between frames.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub points: Vec<Vertex>,
    pub lines: Vec<Vertex>,
    pub draw_calls: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
        self.draw_calls = 0;
    }
}

impl RenderSurface for RecordingSurface {
    fn draw_points(&mut self, points: &[Vertex]) {
        self.points.extend_from_slice(points);
        self.draw_calls += 1;
    }

    fn draw_lines(&mut self, lines: &[Vertex]) {
        self.lines.extend_from_slice(lines);
        self.draw_calls += 1;
    }
}
