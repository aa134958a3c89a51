//! WASM bindings for voronoi-core.
//!
//! Exposes a stateful `VoronoiView` that holds the sites and viewport,
//! takes pointer and resize events from the page, and returns render
//! primitives as flat typed arrays for efficient JS interop.

use voronoi_core::{
    engine_by_name, random_sites, ClipEngine, DiagramState, FrameInput, GeometryEngine,
    InputContext, Position, RenderGeometry, RenderSurface, Vertex, VoronoiError,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(e: VoronoiError) -> JsError {
    JsError::new(&e.to_string())
}

fn positions_from_flat(flat: &[f64]) -> Vec<Position> {
    flat.chunks_exact(2)
        .map(|xy| Position::new(xy[0], xy[1]))
        .collect()
}

fn flatten(vertices: &[Vertex]) -> Vec<f32> {
    vertices.iter().flat_map(|v| v.iter().copied()).collect()
}

/// Render primitives for one frame.
/// All data is exposed as flat typed arrays, three floats per vertex.
#[wasm_bindgen]
pub struct ViewFrame {
    points: Vec<f32>,
    lines: Vec<f32>,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl ViewFrame {
    /// Flat [x0,y0,z0, x1,y1,z1, ...] site positions (length = num_sites * 3)
    #[wasm_bindgen(getter)]
    pub fn points(&self) -> Vec<f32> {
        self.points.clone()
    }

    /// Flat segment endpoints, two vertices per edge (length = num_edges * 6)
    #[wasm_bindgen(getter)]
    pub fn lines(&self) -> Vec<f32> {
        self.lines.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Surface that copies the primitives out for the page to draw.
#[derive(Default)]
struct FrameSurface {
    points: Vec<f32>,
    lines: Vec<f32>,
}

impl RenderSurface for FrameSurface {
    fn draw_points(&mut self, points: &[Vertex]) {
        self.points = flatten(points);
    }

    fn draw_lines(&mut self, lines: &[Vertex]) {
        self.lines = flatten(lines);
    }
}

type Engine = Box<dyn GeometryEngine + Send>;

/// Interactive Voronoi view.
/// Holds the diagram state and the pointer/resize tracking that feeds it.
#[wasm_bindgen]
pub struct VoronoiView {
    state: DiagramState<Engine>,
    input: InputContext,
    cursor: (f64, f64),
    left_down: bool,
}

#[wasm_bindgen]
impl VoronoiView {
    /// Create a view of `width` x `height` pixels with `count` random sites.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, count: usize, seed: u32) -> Result<VoronoiView, JsError> {
        let engine: Engine = match engine_by_name("voronator") {
            Ok(engine) => engine,
            Err(_) => Box::new(ClipEngine::new()),
        };
        let sites = random_sites(count, width as f64, height as f64, seed as u64);
        let state =
            DiagramState::new(width as f64, height as f64, sites, engine).map_err(js_error)?;
        Ok(Self {
            state,
            input: InputContext::new(width, height),
            cursor: (0.0, 0.0),
            left_down: false,
        })
    }

    /// Replace the sites with flat [x0,y0, x1,y1, ...] world positions.
    /// Returns false when the set is unchanged.
    pub fn set_sites(&mut self, positions: &[f64]) -> bool {
        self.state.set_sites(positions_from_flat(positions))
    }

    /// Add a site at a world position. Returns false for a duplicate.
    pub fn add_point(&mut self, x: f64, y: f64) -> bool {
        self.state.add_point(Position::new(x, y))
    }

    /// Feed the primary button state at a screen position.
    /// Returns true when this press added a site.
    pub fn click(&mut self, sx: f64, sy: f64, down: bool) -> bool {
        self.cursor = (sx, sy);
        self.left_down = down;
        self.apply(self.input.size()).added
    }

    /// Feed a new canvas size. Returns true when the bounding box changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.apply((width, height)).resized
    }

    /// Primitives for the current frame, recomputing the diagram if needed.
    pub fn render(&mut self) -> Result<ViewFrame, JsError> {
        let mut surface = FrameSurface::default();
        self.state.render(&mut surface).map_err(js_error)?;
        let (width, height) = self.input.size();
        Ok(ViewFrame { points: surface.points, lines: surface.lines, width, height })
    }

    /// Get current site positions as flat [x0,y0, x1,y1, ...].
    pub fn get_positions(&self) -> Vec<f64> {
        self.state.sites().iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Get current site count.
    pub fn site_count(&self) -> usize {
        self.state.sites().len()
    }

    /// Whether the next `render` recomputes the diagram.
    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    /// Name of the engine building the diagram.
    pub fn engine(&self) -> String {
        self.state.engine().name().to_string()
    }
}

impl VoronoiView {
    fn apply(&mut self, size: (u32, u32)) -> voronoi_core::InputOutcome {
        let input = FrameInput { size, cursor: self.cursor, left_down: self.left_down };
        self.input.apply(&input, &mut self.state)
    }

    /// Current geometry without recomputing.
    pub fn geometry(&self) -> &RenderGeometry {
        self.state.geometry()
    }
}
