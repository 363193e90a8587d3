//! In-memory backend: scripted input, captured output.
//!
//! Runs the engine without a terminal. Every call the engine makes is
//! recorded, and presented frames are kept as plain text rows.

use std::collections::VecDeque;

use super::Terminal;
use crate::error::EngineError;
use crate::input::{InputSource, RawCode, RawMouse};
use crate::surface::Surface;
use crate::types::SurfaceGeometry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCall {
    SetTitle(String),
    Prepare { force_redraw: bool },
    Refresh { cells_written: usize },
}

pub struct HeadlessTerminal {
    surface: Surface,
    screen: Vec<Vec<char>>,
    input: VecDeque<RawCode>,
    mouse: VecDeque<RawMouse>,
    calls: Vec<TerminalCall>,
}

impl HeadlessTerminal {
    pub fn new(geometry: &SurfaceGeometry) -> Self {
        HeadlessTerminal {
            surface: Surface::new(geometry),
            screen: vec![vec![' '; geometry.width as usize]; geometry.height as usize],
            input: VecDeque::new(),
            mouse: VecDeque::new(),
            calls: Vec::new(),
        }
    }

    /// Queue raw codes, read back in order. An exhausted queue reads as
    /// `RawCode::Empty`.
    pub fn push_codes(&mut self, codes: impl IntoIterator<Item = RawCode>) {
        self.input.extend(codes);
    }

    /// Queue a pointer event along with the `RawCode::Mouse` announcing it.
    pub fn push_mouse(&mut self, mouse: RawMouse) {
        self.input.push_back(RawCode::Mouse);
        self.mouse.push_back(mouse);
    }

    pub fn calls(&self) -> &[TerminalCall] {
        &self.calls
    }

    pub fn refresh_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, TerminalCall::Refresh { .. }))
            .count()
    }

    /// Raw codes not yet read.
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// The last presented frame, one string per row.
    pub fn screen(&self) -> Vec<String> {
        self.screen.iter().map(|row| row.iter().collect()).collect()
    }
}

impl InputSource for HeadlessTerminal {
    fn read_raw(&mut self) -> RawCode {
        self.input.pop_front().unwrap_or(RawCode::Empty)
    }

    fn mouse_event(&mut self) -> Option<RawMouse> {
        self.mouse.pop_front()
    }
}

impl Terminal for HeadlessTerminal {
    fn set_title(&mut self, title: &str) {
        self.calls.push(TerminalCall::SetTitle(title.to_string()));
        self.surface.set_title(title);
    }

    fn prepare(&mut self, force_redraw: bool) {
        self.calls.push(TerminalCall::Prepare { force_redraw });
        self.surface.prepare(force_redraw);
    }

    fn surface(&mut self) -> &mut Surface {
        &mut self.surface
    }

    fn refresh(&mut self) -> Result<(), EngineError> {
        let changes = self.surface.changes();
        for change in &changes {
            self.screen[change.y as usize][change.x as usize] = change.cell.ch;
        }
        self.calls.push(TerminalCall::Refresh {
            cells_written: changes.len(),
        });
        self.surface.mark_presented();
        Ok(())
    }
}
