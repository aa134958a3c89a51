//! The per-frame loop: apply input, then render.

use voronoi_core::{DiagramState, FrameInput, GeometryEngine, InputContext, InputOutcome, Position};

use crate::raster::RasterSurface;

/// Diagram state plus the input context that drives it.
pub struct Session<E> {
    state: DiagramState<E>,
    input: InputContext,
    /// Fixed output size; `None` renders each frame at the window size
    canvas: Option<(u32, u32)>,
    point_radius: u32,
}

impl<E: GeometryEngine> Session<E> {
    pub fn new(
        width: u32,
        height: u32,
        sites: Vec<Position>,
        engine: E,
    ) -> voronoi_core::Result<Self> {
        Ok(Self {
            state: DiagramState::new(width as f64, height as f64, sites, engine)?,
            input: InputContext::new(width, height),
            canvas: None,
            point_radius: 1,
        })
    }

    /// Render every frame onto a `width` x `height` image, centered.
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.canvas = Some((width, height));
        self
    }

    pub fn with_point_radius(mut self, radius: u32) -> Self {
        self.point_radius = radius;
        self
    }

    pub fn state(&self) -> &DiagramState<E> {
        &self.state
    }

    /// Run one frame: input first, then render.
    pub fn frame(
        &mut self,
        input: &FrameInput,
    ) -> voronoi_core::Result<(InputOutcome, image::RgbImage)> {
        let outcome = self.input.apply(input, &mut self.state);

        let (w, h) = self.canvas.unwrap_or_else(|| self.input.size());
        let mut surface = RasterSurface::new(w, h, self.point_radius);
        self.state.render(&mut surface)?;
        Ok((outcome, surface.into_image()))
    }
}

/// Largest size any frame reaches, used as the GIF canvas.
pub fn max_size(frames: &[FrameInput]) -> Option<(u32, u32)> {
    frames
        .iter()
        .map(|f| f.size)
        .reduce(|a, b| (a.0.max(b.0), a.1.max(b.1)))
}
