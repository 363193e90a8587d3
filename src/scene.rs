//! The scene interface implemented by applications.

use crate::context::{FrameContext, InitContext};
use crate::surface::Surface;

/// A unit of application state driven by the engine: a screen or mode.
///
/// The engine owns exactly one active scene. A scene hands control to another
/// by passing it to `FrameContext::request_scene`; the engine drops the old
/// scene once its `run` has returned.
pub trait Scene {
    /// Shown in the border of the render surface while the scene is active.
    fn title(&self) -> &str;

    /// Called once when the scene becomes active.
    fn init(&mut self, ctx: &InitContext);

    /// Called once per frame with that frame's input.
    fn run(&mut self, ctx: &mut FrameContext);

    /// Called after `run` unless the frame ended in a transition or exit.
    fn draw(&mut self, surface: &mut Surface);
}
