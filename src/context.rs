//! Per-activation and per-frame records passed between engine and scene.

use tracing::warn;

use crate::input::Decoded;
use crate::scene::Scene;
use crate::types::{Input, Point, SurfaceGeometry};

/// Placement data handed to `Scene::init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitContext {
    origin: Point,
    width: u16,
    height: u16,
}

impl InitContext {
    pub fn new(geometry: &SurfaceGeometry) -> Self {
        InitContext {
            origin: geometry.origin(),
            width: geometry.width,
            height: geometry.height,
        }
    }

    /// Top-left corner of the render surface on the terminal.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }
}

/// One frame's input plus the scene's answer to it.
///
/// Built fresh by the engine for every frame and read once after
/// `Scene::run` returns.
#[derive(Default)]
pub struct FrameContext {
    input: Input,
    mouse_position: Point,
    pending_scene: Option<Box<dyn Scene>>,
    exit_requested: bool,
    redraw_forced: bool,
}

impl FrameContext {
    pub fn new(decoded: Decoded) -> Self {
        FrameContext {
            input: decoded.input,
            mouse_position: decoded.position,
            ..Default::default()
        }
    }

    pub fn input(&self) -> Input {
        self.input
    }

    /// Pointer position of an `Input::Clicked` frame, `(0, 0)` otherwise.
    pub fn mouse_position(&self) -> Point {
        self.mouse_position
    }

    /// Ask the engine to switch to `scene` before anything is drawn.
    ///
    /// Only the first request of a frame counts.
    pub fn request_scene(&mut self, scene: Box<dyn Scene>) {
        if let Some(pending) = &self.pending_scene {
            warn!(
                kept = pending.title(),
                ignored = scene.title(),
                "scene transition already requested this frame"
            );
            return;
        }
        self.pending_scene = Some(scene);
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Repaint every cell this frame instead of only the changed ones.
    pub fn force_redraw(&mut self) {
        self.redraw_forced = true;
    }

    pub fn has_pending_scene(&self) -> bool {
        self.pending_scene.is_some()
    }

    pub fn has_exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn redraw_forced(&self) -> bool {
        self.redraw_forced
    }

    pub(crate) fn take_pending_scene(&mut self) -> Option<Box<dyn Scene>> {
        self.pending_scene.take()
    }
}
