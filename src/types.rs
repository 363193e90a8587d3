//! Shared value types for the frame loop.
//!
//! - Engine → Scene: `Input` and `Point`, the normalized per-frame input
//! - Config → Engine: `SurfaceGeometry`
//! - Scene → Surface: `Cell`, `Style` and `Color`

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Normalized input
// ---------------------------------------------------------------------------

/// The single input symbol a scene sees for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Input {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Escape,
    Clicked,
}

/// A terminal cell coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Point { x, y }
    }
}

// ---------------------------------------------------------------------------
// Surface placement
// ---------------------------------------------------------------------------

/// Size and origin of the render surface, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    pub width: u16,
    pub height: u16,
    #[serde(default)]
    pub x: u16,
    #[serde(default)]
    pub y: u16,
}

impl SurfaceGeometry {
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        SurfaceGeometry {
            width: 80,
            height: 24,
            x: 0,
            y: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Cell style primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
}

impl Style {
    pub fn fg(color: NamedColor) -> Self {
        Style {
            fg: Some(Color::Named(color)),
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

/// A single cell that differs from what the terminal currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}
