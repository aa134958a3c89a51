//! Mutable diagram state with lazy recomputation.

use crate::render::{RenderGeometry, RenderSurface};
use crate::voronoi::GeometryEngine;
use crate::{same_site_set, Position, Result, Viewport};

/// Whether the stored geometry matches the current sites and viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Clean,
    Dirty,
}

/// Sites and viewport, plus the render geometry last derived from them.
///
/// Mutators only mark the state dirty; the engine runs on the next
/// [`render`](DiagramState::render) or [`refresh`](DiagramState::refresh).
/// While the state is clean, `geometry()` is exactly what the engine
/// produces for `(viewport, sites)`.
pub struct DiagramState<E> {
    viewport: Viewport,
    sites: Vec<Position>,
    freshness: Freshness,
    geometry: RenderGeometry,
    engine: E,
}

impl<E: GeometryEngine> DiagramState<E> {
    /// Create the state and compute the first diagram right away.
    ///
    /// `width` and `height` must be positive.
    pub fn new(width: f64, height: f64, sites: Vec<Position>, engine: E) -> Result<Self> {
        let mut state = Self {
            viewport: Viewport::new(width, height),
            sites,
            freshness: Freshness::Dirty,
            geometry: RenderGeometry::default(),
            engine,
        };
        state.refresh()?;
        Ok(state)
    }

    pub fn sites(&self) -> &[Position] {
        &self.sites
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn is_dirty(&self) -> bool {
        self.freshness == Freshness::Dirty
    }

    /// Geometry from the last computation. Stale while the state is dirty.
    pub fn geometry(&self) -> &RenderGeometry {
        &self.geometry
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Replace the sites unless `sites` holds the same positions in any order.
    ///
    /// Returns whether the state changed.
    pub fn set_sites(&mut self, sites: Vec<Position>) -> bool {
        if same_site_set(&sites, &self.sites) {
            return false;
        }
        self.sites = sites;
        self.freshness = Freshness::Dirty;
        true
    }

    /// Append a site unless one already sits at exactly the same position.
    ///
    /// Coincident sites break diagram construction, so a duplicate is
    /// dropped silently. Returns whether the site was added.
    pub fn add_point(&mut self, p: Position) -> bool {
        if self.sites.iter().any(|s| s.x == p.x && s.y == p.y) {
            return false;
        }
        self.sites.push(p);
        self.freshness = Freshness::Dirty;
        true
    }

    /// Resize the viewport. Returns whether the size changed.
    pub fn set_dimensions(&mut self, width: f64, height: f64) -> bool {
        if self.viewport.width == width && self.viewport.height == height {
            return false;
        }
        self.viewport = Viewport::new(width, height);
        self.freshness = Freshness::Dirty;
        true
    }

    /// Recompute the geometry if dirty. Returns whether the engine ran.
    ///
    /// On engine failure the old geometry is kept and the state stays dirty.
    pub fn refresh(&mut self) -> Result<bool> {
        if self.freshness == Freshness::Clean {
            return Ok(false);
        }

        let bbox = self.viewport.bounding_box();
        let diagram = self.engine.compute(&self.sites, &bbox, true)?;
        self.geometry = RenderGeometry::from_diagram(&diagram);
        self.freshness = Freshness::Clean;

        tracing::debug!(
            engine = self.engine.name(),
            sites = self.sites.len(),
            cells = diagram.cells.len(),
            edges = diagram.edges.len(),
            width = self.viewport.width,
            height = self.viewport.height,
            "recomputed diagram"
        );
        Ok(true)
    }

    /// Bring the geometry up to date, then draw it.
    pub fn render(&mut self, surface: &mut dyn RenderSurface) -> Result<()> {
        self.refresh()?;
        self.geometry.draw(surface);
        Ok(())
    }
}

impl<E> std::fmt::Debug for DiagramState<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramState")
            .field("viewport", &self.viewport)
            .field("sites", &self.sites.len())
            .field("freshness", &self.freshness)
            .finish()
    }
}
