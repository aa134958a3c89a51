//! Diagram types and the geometry engine trait.

use crate::{BoundingBox, Position, Result};

/// A Voronoi cell: the region closer to `site` than to any other site,
/// clipped to the bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Index of the site in the input slice
    pub site_index: usize,
    pub site: Position,
    /// Closed polygon. May be empty for a site outside the box.
    pub vertices: Vec<Position>,
}

impl Cell {
    /// Unsigned polygon area (shoelace).
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let (a, b) = (self.vertices[i], self.vertices[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() * 0.5
    }
}

/// A boundary segment between two cells, or between a cell and the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: Position,
    pub b: Position,
    /// Site on one side of the edge
    pub left: usize,
    /// Site on the other side; `None` for bounding-box edges
    pub right: Option<usize>,
}

impl Edge {
    pub fn is_border(&self) -> bool {
        self.right.is_none()
    }
}

/// Result of a diagram construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    pub cells: Vec<Cell>,
    /// Every edge appears once, even when shared by two cells.
    pub edges: Vec<Edge>,
}

impl Diagram {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Summed area of all cells. Equals the box area when the cells tile it.
    pub fn area(&self) -> f64 {
        self.cells.iter().map(Cell::area).sum()
    }
}

/// Trait for Voronoi construction engines.
///
/// Engines must be deterministic for a given input. Coincident sites are
/// rejected upstream and need not be handled.
pub trait GeometryEngine {
    /// Compute the diagram of `sites` clipped to `bbox`.
    ///
    /// With `close_cells` the bounding-box segments that close each cell are
    /// part of [`Diagram::edges`].
    fn compute(
        &mut self,
        sites: &[Position],
        bbox: &BoundingBox,
        close_cells: bool,
    ) -> Result<Diagram>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

impl<E: GeometryEngine + ?Sized> GeometryEngine for Box<E> {
    fn compute(
        &mut self,
        sites: &[Position],
        bbox: &BoundingBox,
        close_cells: bool,
    ) -> Result<Diagram> {
        (**self).compute(sites, bbox, close_cells)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
