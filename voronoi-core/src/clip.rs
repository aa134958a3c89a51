//! Half-plane clipping Voronoi engine.
//!
//! Each cell starts as the bounding box and is cut by the perpendicular
//! bisector to every other site, nearest first. Handles every input size,
//! including one, two and collinear sites.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::voronoi::{Cell, Diagram, Edge, GeometryEngine};
use crate::{BoundingBox, Position, Result};

/// Distances within this of a clipping line count as on the line.
const CLIP_EPS: f64 = 1e-9;

/// Edges shorter than this are dropped.
const MIN_EDGE_LEN_SQ: f64 = 1e-18;

/// Engine that clips the bounding box by bisector half-planes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipEngine;

impl ClipEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Convex polygon with a neighbor tag per edge.
///
/// `neighbors[i]` belongs to the edge from `vertices[i]` to `vertices[i + 1]`;
/// `None` marks a bounding-box edge.
#[derive(Debug, Clone)]
struct ClippedCell {
    vertices: Vec<Position>,
    neighbors: Vec<Option<usize>>,
}

impl ClippedCell {
    fn from_box(bbox: &BoundingBox) -> Self {
        Self {
            vertices: bbox.corners().to_vec(),
            neighbors: vec![None; 4],
        }
    }

    fn max_radius_sq(&self, center: &Position) -> f64 {
        self.vertices
            .iter()
            .map(|v| v.dist_sq(center))
            .fold(0.0, f64::max)
    }

    /// Keep the part of the polygon where `(v - point) . normal <= 0`.
    fn clip(&mut self, point: Position, normal: Position, neighbor: usize) {
        let n = self.vertices.len();
        if n < 3 {
            return;
        }

        let dists: Vec<f64> = self
            .vertices
            .iter()
            .map(|v| (v.x - point.x) * normal.x + (v.y - point.y) * normal.y)
            .collect();

        if dists.iter().all(|&d| d <= CLIP_EPS) {
            return;
        }
        if dists.iter().all(|&d| d >= -CLIP_EPS) {
            self.vertices.clear();
            self.neighbors.clear();
            return;
        }

        let mut vertices = Vec::with_capacity(n + 1);
        let mut neighbors = Vec::with_capacity(n + 1);

        for i in 0..n {
            let j = (i + 1) % n;
            let (di, dj) = (dists[i], dists[j]);
            let (vi, vj) = (self.vertices[i], self.vertices[j]);
            let edge_neighbor = self.neighbors[i];

            if di <= CLIP_EPS {
                vertices.push(vi);
                neighbors.push(edge_neighbor);
                if dj > CLIP_EPS {
                    // leaving: the segment from the exit point is the new bisector edge
                    vertices.push(lerp(vi, vj, di / (di - dj)));
                    neighbors.push(Some(neighbor));
                }
            } else if dj <= CLIP_EPS {
                // entering: the rest of this edge survives
                vertices.push(lerp(vi, vj, di / (di - dj)));
                neighbors.push(edge_neighbor);
            }
        }

        self.vertices = vertices;
        self.neighbors = neighbors;
    }
}

fn lerp(a: Position, b: Position, t: f64) -> Position {
    Position::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
}

fn clip_cell(index: usize, sites: &[Position], bbox: &BoundingBox) -> ClippedCell {
    let site = sites[index];
    let mut cell = ClippedCell::from_box(bbox);

    let mut others: Vec<(f64, usize)> = sites
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != index)
        .map(|(j, other)| (site.dist_sq(other), j))
        .collect();
    others.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (dist_sq, j) in others {
        if cell.vertices.is_empty() {
            break;
        }
        // a bisector further away than the farthest vertex cannot cut the cell
        if dist_sq > 4.0 * cell.max_radius_sq(&site) {
            break;
        }
        let other = sites[j];
        let mid = Position::new((site.x + other.x) / 2.0, (site.y + other.y) / 2.0);
        let normal = Position::new(other.x - site.x, other.y - site.y);
        cell.clip(mid, normal, j);
    }

    cell
}

impl GeometryEngine for ClipEngine {
    fn compute(
        &mut self,
        sites: &[Position],
        bbox: &BoundingBox,
        close_cells: bool,
    ) -> Result<Diagram> {
        #[cfg(feature = "parallel")]
        let clipped: Vec<ClippedCell> = (0..sites.len())
            .into_par_iter()
            .map(|i| clip_cell(i, sites, bbox))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let clipped: Vec<ClippedCell> = (0..sites.len())
            .map(|i| clip_cell(i, sites, bbox))
            .collect();

        let mut edges = Vec::new();
        for (i, cell) in clipped.iter().enumerate() {
            let n = cell.vertices.len();
            for k in 0..n {
                let a = cell.vertices[k];
                let b = cell.vertices[(k + 1) % n];
                if a.dist_sq(&b) < MIN_EDGE_LEN_SQ {
                    continue;
                }
                let emit = match cell.neighbors[k] {
                    Some(j) => i < j,
                    None => close_cells,
                };
                if emit {
                    edges.push(Edge { a, b, left: i, right: cell.neighbors[k] });
                }
            }
        }

        let cells = clipped
            .into_iter()
            .enumerate()
            .map(|(i, cell)| Cell {
                site_index: i,
                site: sites[i],
                vertices: cell.vertices,
            })
            .collect();

        Ok(Diagram { cells, edges })
    }

    fn name(&self) -> &'static str {
        "clip"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BoundingBox {
        BoundingBox::new(-50.0, 50.0, -50.0, 50.0)
    }

    #[test]
    fn test_empty_input() {
        let diagram = ClipEngine.compute(&[], &bbox(), true).unwrap();
        assert!(diagram.cells.is_empty());
        assert!(diagram.edges.is_empty());
    }

    #[test]
    fn test_single_site_fills_box() {
        let diagram = ClipEngine
            .compute(&[Position::new(3.0, -7.0)], &bbox(), true)
            .unwrap();
        assert_eq!(diagram.cells.len(), 1);
        assert!((diagram.cells[0].area() - 10_000.0).abs() < 1e-6);
        assert_eq!(diagram.edges.len(), 4);
        assert!(diagram.edges.iter().all(Edge::is_border));
    }

    #[test]
    fn test_two_sites_split_box() {
        let sites = [Position::new(-10.0, 0.0), Position::new(10.0, 0.0)];
        let diagram = ClipEngine.compute(&sites, &bbox(), true).unwrap();

        for cell in &diagram.cells {
            assert!((cell.area() - 5_000.0).abs() < 1e-6);
        }

        let shared: Vec<&Edge> = diagram.edges.iter().filter(|e| !e.is_border()).collect();
        assert_eq!(shared.len(), 1);
        assert_eq!((shared[0].left, shared[0].right), (0, Some(1)));
        assert!(shared[0].a.x.abs() < 1e-9 && shared[0].b.x.abs() < 1e-9);
        // 3 border edges per half
        assert_eq!(diagram.edges.len(), 7);
    }

    #[test]
    fn test_open_cells_skip_border_edges() {
        let sites = [Position::new(-10.0, 0.0), Position::new(10.0, 0.0)];
        let diagram = ClipEngine.compute(&sites, &bbox(), false).unwrap();
        assert_eq!(diagram.edges.len(), 1);
    }

    #[test]
    fn test_collinear_sites() {
        let sites = [
            Position::new(-20.0, 0.0),
            Position::new(0.0, 0.0),
            Position::new(20.0, 0.0),
        ];
        let diagram = ClipEngine.compute(&sites, &bbox(), true).unwrap();
        let areas: Vec<f64> = diagram.cells.iter().map(|c| c.area()).collect();
        assert!((areas.iter().sum::<f64>() - 10_000.0).abs() < 1e-6);
        assert!((areas[1] - 2_000.0).abs() < 1e-6);
        assert_eq!(diagram.edges.iter().filter(|e| !e.is_border()).count(), 2);
    }

    #[test]
    fn test_cells_tile_the_box() {
        let sites = crate::random_sites(40, 100.0, 100.0, 3);
        let diagram = ClipEngine.compute(&sites, &bbox(), true).unwrap();
        let total = diagram.area();
        assert!((total - 10_000.0).abs() < 1e-6, "total area {}", total);

        for cell in &diagram.cells {
            assert!(cell.area() > 0.0);
        }
    }

    #[test]
    fn test_shared_edges_are_equidistant() {
        let sites = crate::random_sites(25, 100.0, 100.0, 11);
        let diagram = ClipEngine.compute(&sites, &bbox(), true).unwrap();
        for edge in diagram.edges.iter().filter(|e| !e.is_border()) {
            let (l, r) = (sites[edge.left], sites[edge.right.unwrap()]);
            for p in [edge.a, edge.b] {
                let diff = p.dist_sq(&l).sqrt() - p.dist_sq(&r).sqrt();
                assert!(diff.abs() < 1e-6, "edge {:?} not on bisector", edge);
            }
        }
    }
}
