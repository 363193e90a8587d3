//! Terminal backends the engine drives.
//!
//! A backend owns the render surface and the raw input stream. The engine
//! only sequences calls into it; glyph and colour encoding live here.

mod headless;
mod tty;

pub use headless::{HeadlessTerminal, TerminalCall};
pub use tty::{CrosstermTerminal, restore_terminal};

use crate::error::EngineError;
use crate::input::InputSource;
use crate::surface::Surface;

pub trait Terminal: InputSource {
    fn set_title(&mut self, title: &str);

    /// Reset the surface for a new frame. `force_redraw` bypasses diffing on
    /// the next `refresh`.
    fn prepare(&mut self, force_redraw: bool);

    fn surface(&mut self) -> &mut Surface;

    /// Flush the prepared frame to the terminal.
    fn refresh(&mut self) -> Result<(), EngineError>;
}
