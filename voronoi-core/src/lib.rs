//! Incremental Voronoi diagram state.
//!
//! Holds a set of sites and a viewport, recomputes the diagram only when
//! either changed, and turns the result into point and line primitives for
//! rendering. Diagram construction sits behind [`GeometryEngine`]: a
//! half-plane clipping engine is always available, and the `voronator`
//! feature adds an engine backed by the `voronator` crate.

mod site;
mod state;
mod voronoi;

pub mod clip;
pub mod input;
pub mod render;

#[cfg(feature = "voronator")]
mod delaunay;

pub use clip::ClipEngine;
pub use input::{
    screen_to_world, ButtonState, FrameInput, InputContext, InputOutcome, ResizeTracker,
};
pub use render::{RecordingSurface, RenderGeometry, RenderSurface, Vertex};
pub use site::{random_sites, same_site_set, BoundingBox, Position, SiteKey, Viewport};
pub use state::{DiagramState, Freshness};
pub use voronoi::{Cell, Diagram, Edge, GeometryEngine};

#[cfg(feature = "voronator")]
pub use delaunay::VoronatorEngine;

/// Number of random sites the front ends start with.
pub const DEFAULT_SITE_COUNT: usize = 30;

/// Error type for Voronoi operations
#[derive(Debug, thiserror::Error)]
pub enum VoronoiError {
    #[error("{engine} engine produced no diagram for {sites} sites")]
    Engine { engine: &'static str, sites: usize },

    #[error("Engine not available: {0}")]
    EngineUnavailable(String),
}

pub type Result<T> = std::result::Result<T, VoronoiError>;

/// Engine selected by name, as used by the front ends.
///
/// `"voronator"` needs the `voronator` feature.
pub fn engine_by_name(name: &str) -> Result<Box<dyn GeometryEngine + Send>> {
    match name {
        "clip" => Ok(Box::new(ClipEngine::new())),
        #[cfg(feature = "voronator")]
        "voronator" => Ok(Box::new(VoronatorEngine::new())),
        other => Err(VoronoiError::EngineUnavailable(other.to_string())),
    }
}
