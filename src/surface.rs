//! Surface — the cell buffer scenes draw into each frame.
//!
//! The surface knows nothing about terminals. It keeps the frame being drawn
//! and the frame last presented, and reports the cells that differ so the
//! backend only writes what changed.

use crate::types::{Cell, CellChange, Style, SurfaceGeometry};

pub struct Surface {
    width: u16,
    height: u16,
    title: String,
    grid: Vec<Vec<Cell>>,
    presented: Option<Vec<Vec<Cell>>>,
    force_redraw: bool,
}

impl Surface {
    pub fn new(geometry: &SurfaceGeometry) -> Self {
        let w = geometry.width as usize;
        let h = geometry.height as usize;
        Surface {
            width: geometry.width,
            height: geometry.height,
            title: String::new(),
            grid: vec![vec![Cell::default(); w]; h],
            presented: None,
            force_redraw: false,
        }
    }

    /// Drawable width inside the border.
    pub fn width(&self) -> u16 {
        self.width.saturating_sub(2)
    }

    /// Drawable height inside the border.
    pub fn height(&self) -> u16 {
        self.height.saturating_sub(2)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Put one character at `(x, y)` inside the border. Writes outside the
    /// drawable area are dropped.
    pub fn put(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if x < self.width() && y < self.height() {
            self.grid[y as usize + 1][x as usize + 1] = Cell { ch, style };
        }
    }

    /// Print `text` left to right from `(x, y)`, clipped at the border.
    pub fn print(&mut self, x: u16, y: u16, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            let Some(cx) = u16::try_from(i).ok().and_then(|i| x.checked_add(i)) else {
                break;
            };
            if cx >= self.width() {
                break;
            }
            self.put(cx, y, ch, style);
        }
    }

    /// Character and style at `(x, y)` inside the border.
    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        if x < self.width() && y < self.height() {
            Some(self.grid[y as usize + 1][x as usize + 1])
        } else {
            None
        }
    }

    /// Start a new frame: blank the buffer and redraw the border and title.
    pub fn prepare(&mut self, force_redraw: bool) {
        for row in &mut self.grid {
            row.fill(Cell::default());
        }
        self.draw_border();
        self.force_redraw = force_redraw;
    }

    pub fn redraw_forced(&self) -> bool {
        self.force_redraw
    }

    /// Cells that differ from the last presented frame. Every cell is
    /// returned before the first present and when a redraw is forced.
    pub fn changes(&self) -> Vec<CellChange> {
        match &self.presented {
            Some(prev) if !self.force_redraw => diff(prev, &self.grid),
            _ => full(&self.grid),
        }
    }

    /// Record the current buffer as what the terminal now shows.
    pub fn mark_presented(&mut self) {
        match &mut self.presented {
            Some(prev) => prev.clone_from(&self.grid),
            None => self.presented = Some(self.grid.clone()),
        }
        self.force_redraw = false;
    }

    fn draw_border(&mut self) {
        let w = self.width as usize;
        let h = self.height as usize;
        if w < 2 || h < 2 {
            return;
        }
        let frame = Style::default();
        for x in 1..w - 1 {
            self.grid[0][x] = Cell { ch: '─', style: frame };
            self.grid[h - 1][x] = Cell { ch: '─', style: frame };
        }
        for row in &mut self.grid[1..h - 1] {
            row[0] = Cell { ch: '│', style: frame };
            row[w - 1] = Cell { ch: '│', style: frame };
        }
        self.grid[0][0] = Cell { ch: '┌', style: frame };
        self.grid[0][w - 1] = Cell { ch: '┐', style: frame };
        self.grid[h - 1][0] = Cell { ch: '└', style: frame };
        self.grid[h - 1][w - 1] = Cell { ch: '┘', style: frame };

        if self.title.is_empty() {
            return;
        }
        // " title " sits on the top edge, two cells in from the corner.
        let title = Style::default().bold();
        let label = format!(" {} ", self.title);
        for (i, ch) in label.chars().enumerate() {
            let x = i + 2;
            if x >= w - 1 {
                break;
            }
            self.grid[0][x] = Cell { ch, style: title };
        }
    }
}

fn full(grid: &[Vec<Cell>]) -> Vec<CellChange> {
    grid.iter()
        .enumerate()
        .flat_map(|(y, row)| {
            row.iter().enumerate().map(move |(x, cell)| CellChange {
                x: x as u16,
                y: y as u16,
                cell: *cell,
            })
        })
        .collect()
}

fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
    let mut changes = Vec::new();
    for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
        for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
            if prev_cell != next_cell {
                changes.push(CellChange {
                    x: x as u16,
                    y: y as u16,
                    cell: *next_cell,
                });
            }
        }
    }
    changes
}
