//! Per-frame input handling: clicks add sites, resizes change the viewport.

use crate::state::DiagramState;
use crate::voronoi::GeometryEngine;
use crate::Position;

/// Convert a screen position (origin top-left, y down) to world space
/// (origin at the viewport center, y up).
pub fn screen_to_world(sx: f64, sy: f64, width: f64, height: f64) -> Position {
    Position::new(sx - width / 2.0, -sy + height / 2.0)
}

/// Button state across two consecutive frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pressed: bool,
    was_pressed: bool,
}

impl ButtonState {
    /// Advance one frame with the button's current state.
    pub fn update(&mut self, down: bool) {
        self.was_pressed = self.pressed;
        self.pressed = down;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Pressed this frame but not the one before
    pub fn just_pressed(&self) -> bool {
        self.pressed && !self.was_pressed
    }
}

/// Remembers the last observed surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeTracker {
    last: (u32, u32),
}

impl ResizeTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self { last: (width, height) }
    }

    pub fn size(&self) -> (u32, u32) {
        self.last
    }

    /// Record this frame's size; returns it if it differs from the last one.
    pub fn observe(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if self.last == (width, height) {
            return None;
        }
        self.last = (width, height);
        Some(self.last)
    }
}

/// What the platform reported for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Surface size in pixels
    pub size: (u32, u32),
    /// Cursor in screen coordinates
    pub cursor: (f64, f64),
    pub left_down: bool,
}

/// What applying a frame's input did to the diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputOutcome {
    pub resized: bool,
    /// World position of a click this frame, if any
    pub clicked: Option<Position>,
    /// Whether the click added a site (false for a duplicate)
    pub added: bool,
}

/// Input state owned by the frame loop.
#[derive(Debug, Clone)]
pub struct InputContext {
    left: ButtonState,
    resize: ResizeTracker,
}

impl InputContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            left: ButtonState::default(),
            resize: ResizeTracker::new(width, height),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.resize.size()
    }

    /// Apply one frame of input: a size change first, then a click edge.
    pub fn apply<E: GeometryEngine>(
        &mut self,
        input: &FrameInput,
        state: &mut DiagramState<E>,
    ) -> InputOutcome {
        let mut outcome = InputOutcome::default();

        let (prev_w, prev_h) = self.resize.size();
        if let Some((w, h)) = self.resize.observe(input.size.0, input.size.1) {
            tracing::info!("w:{}->{}  h:{}->{}", prev_w, w, prev_h, h);
            outcome.resized = state.set_dimensions(w as f64, h as f64);
        }

        self.left.update(input.left_down);
        if self.left.just_pressed() {
            let (w, h) = self.resize.size();
            let (sx, sy) = input.cursor;
            let world = screen_to_world(sx, sy, w as f64, h as f64);
            tracing::info!(
                screen_x = sx,
                screen_y = sy,
                world_x = world.x,
                world_y = world.y,
                "mouse click"
            );
            outcome.clicked = Some(world);
            outcome.added = state.add_point(world);
        }

        outcome
    }
}
