//! Voronoi engine backed by the `voronator` crate (Delaunay dual).
//!
//! `voronator` only returns cell polygons and needs a proper triangulation,
//! so edges are recovered from the polygons here, and inputs it rejects are
//! handed to [`ClipEngine`].

use std::collections::HashMap;

use voronator::delaunator::Point;
use voronator::VoronoiDiagram;

use crate::clip::ClipEngine;
use crate::voronoi::{Cell, Diagram, Edge, GeometryEngine};
use crate::{BoundingBox, Position, Result};

/// Endpoints are matched across cells on this grid (world units).
const VERTEX_SNAP: f64 = 1e-6;

/// Edges shorter than this are dropped.
const MIN_EDGE_LEN_SQ: f64 = 1e-18;

/// Tolerance of the tiling checks, relative to the box size.
const TILING_TOLERANCE: f64 = 1e-6;

/// Engine delegating construction to `voronator`.
#[derive(Debug, Clone, Default)]
pub struct VoronatorEngine {
    fallback: ClipEngine,
}

impl VoronatorEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct SnappedVertex(i64, i64);

impl From<Position> for SnappedVertex {
    fn from(p: Position) -> Self {
        SnappedVertex((p.x / VERTEX_SNAP).round() as i64, (p.y / VERTEX_SNAP).round() as i64)
    }
}

fn edge_key(a: Position, b: Position) -> (SnappedVertex, SnappedVertex) {
    let (ka, kb) = (SnappedVertex::from(a), SnappedVertex::from(b));
    if (ka.0, ka.1) <= (kb.0, kb.1) {
        (ka, kb)
    } else {
        (kb, ka)
    }
}

/// Whether the segment runs along one side of the box.
fn on_border(a: Position, b: Position, bbox: &BoundingBox) -> bool {
    let near = |u: f64, v: f64| (u - v).abs() <= VERTEX_SNAP;
    (near(a.x, bbox.xmin) && near(b.x, bbox.xmin))
        || (near(a.x, bbox.xmax) && near(b.x, bbox.xmax))
        || (near(a.y, bbox.ymin) && near(b.y, bbox.ymin))
        || (near(a.y, bbox.ymax) && near(b.y, bbox.ymax))
}

/// Build edges from closed cell polygons. A segment seen from two cells is
/// a shared edge and is kept once; a segment along the box is a border edge.
/// A segment only one cell reports stays with `right == None`.
fn edges_from_cells(cells: &[Cell], bbox: &BoundingBox, close_cells: bool) -> Vec<Edge> {
    let mut edges: Vec<Edge> = Vec::new();
    let mut seen: HashMap<(SnappedVertex, SnappedVertex), usize> = HashMap::new();

    for cell in cells {
        let n = cell.vertices.len();
        for k in 0..n {
            let a = cell.vertices[k];
            let b = cell.vertices[(k + 1) % n];
            if a.dist_sq(&b) < MIN_EDGE_LEN_SQ {
                continue;
            }
            if on_border(a, b, bbox) {
                if close_cells {
                    edges.push(Edge { a, b, left: cell.site_index, right: None });
                }
                continue;
            }
            match seen.get(&edge_key(a, b)) {
                Some(&idx) => edges[idx].right = Some(cell.site_index),
                None => {
                    seen.insert(edge_key(a, b), edges.len());
                    edges.push(Edge { a, b, left: cell.site_index, right: None });
                }
            }
        }
    }

    edges
}

/// First reason `diagram` fails to tile `bbox` with one cell per site, if any.
///
/// Checked: the cell count, the summed cell area against the box area, every
/// unpaired segment lying on the box, and both ends of every shared edge
/// being equidistant from its two sites.
fn tiling_defect(
    diagram: &Diagram,
    sites: &[Position],
    bbox: &BoundingBox,
) -> Option<&'static str> {
    if diagram.cells.len() != sites.len() {
        return Some("cell count differs from site count");
    }

    let box_area = bbox.area();
    if (diagram.area() - box_area).abs() > TILING_TOLERANCE * box_area {
        return Some("cells do not cover the box");
    }

    let tol = TILING_TOLERANCE * bbox.width().max(bbox.height());
    for edge in &diagram.edges {
        match edge.right {
            None if !on_border(edge.a, edge.b, bbox) => {
                return Some("interior segment with a single cell");
            }
            None => {}
            Some(right) => {
                let (l, r) = (sites[edge.left], sites[right]);
                let off_bisector = [edge.a, edge.b]
                    .iter()
                    .any(|p| (p.dist_sq(&l).sqrt() - p.dist_sq(&r).sqrt()).abs() > tol);
                if off_bisector {
                    return Some("shared edge off the bisector");
                }
            }
        }
    }
    None
}

impl GeometryEngine for VoronatorEngine {
    fn compute(
        &mut self,
        sites: &[Position],
        bbox: &BoundingBox,
        close_cells: bool,
    ) -> Result<Diagram> {
        if sites.len() < 3 {
            tracing::debug!(
                sites = sites.len(),
                "too few sites for triangulation, using clip engine"
            );
            return self.fallback.compute(sites, bbox, close_cells);
        }

        let coords: Vec<(f64, f64)> = sites.iter().map(|p| (p.x, p.y)).collect();
        let Some(diagram) = VoronoiDiagram::<Point>::from_tuple(
            &(bbox.xmin, bbox.ymin),
            &(bbox.xmax, bbox.ymax),
            &coords,
        ) else {
            tracing::debug!(sites = sites.len(), "voronator rejected input, using clip engine");
            return self.fallback.compute(sites, bbox, close_cells);
        };

        let cells: Vec<Cell> = diagram
            .cells()
            .iter()
            .zip(sites)
            .enumerate()
            .map(|(i, (polygon, site))| Cell {
                site_index: i,
                site: *site,
                vertices: polygon.points().iter().map(|p| Position::new(p.x, p.y)).collect(),
            })
            .collect();

        let edges = edges_from_cells(&cells, bbox, close_cells);
        let diagram = Diagram { cells, edges };
        if let Some(defect) = tiling_defect(&diagram, sites, bbox) {
            tracing::debug!(
                sites = sites.len(),
                defect,
                "voronator diagram rejected, using clip engine"
            );
            return self.fallback.compute(sites, bbox, close_cells);
        }
        Ok(diagram)
    }

    fn name(&self) -> &'static str {
        "voronator"
    }
}
