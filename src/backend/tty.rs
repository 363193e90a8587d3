//! Crossterm backend: raw-mode terminal on stdout.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::{cursor, execute, queue, style, terminal};
use tracing::{debug, warn};

use super::Terminal;
use crate::error::EngineError;
use crate::input::{Button, InputSource, PointerState, RawCode, RawMouse};
use crate::surface::Surface;
use crate::types::{Color, NamedColor, Point, Style, SurfaceGeometry};

pub struct CrosstermTerminal {
    stdout: io::Stdout,
    surface: Surface,
    origin: Point,
    pending: VecDeque<RawCode>,
    mouse: Option<RawMouse>,
    /// Cell of the last primary-button press, used to detect clicks.
    pressed_at: Option<Point>,
    resized: bool,
}

/// Set while the terminal is in raw mode under our control. Shared by `Drop`
/// and the panic hook so only one of them restores it.
static ACQUIRED: AtomicBool = AtomicBool::new(false);

impl CrosstermTerminal {
    /// Take over the terminal: raw keystrokes, no echo, mouse reporting,
    /// hidden cursor, alternate screen.
    ///
    /// The terminal is restored when the value is dropped, including when
    /// setup fails halfway.
    pub fn acquire(geometry: &SurfaceGeometry) -> Result<Self, EngineError> {
        let (term_w, term_h) = terminal::size().map_err(EngineError::Backend)?;
        let need_w = geometry.x.saturating_add(geometry.width);
        let need_h = geometry.y.saturating_add(geometry.height);
        if term_w < need_w || term_h < need_h {
            return Err(EngineError::TerminalTooSmall {
                need_w,
                need_h,
                have_w: term_w,
                have_h: term_h,
            });
        }

        terminal::enable_raw_mode().map_err(EngineError::Backend)?;
        ACQUIRED.store(true, Ordering::SeqCst);
        let mut tty = CrosstermTerminal {
            stdout: io::stdout(),
            surface: Surface::new(geometry),
            origin: geometry.origin(),
            pending: VecDeque::new(),
            mouse: None,
            pressed_at: None,
            resized: false,
        };
        execute!(
            tty.stdout,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )
        .map_err(EngineError::Backend)?;

        debug!(?geometry, "terminal acquired");
        Ok(tty)
    }

    fn next_event(&mut self) -> Option<Event> {
        match event::poll(Duration::ZERO) {
            Ok(true) => match event::read() {
                Ok(ev) => Some(ev),
                Err(e) => {
                    warn!(error = %e, "failed to read terminal event");
                    None
                }
            },
            Ok(false) => None,
            Err(e) => {
                warn!(error = %e, "failed to poll terminal");
                None
            }
        }
    }

    /// Turn a crossterm event into a raw code. Events with no raw code
    /// (key releases, focus changes, resizes, pointer events other than a
    /// primary click) yield `None`.
    fn translate(&mut self, ev: Event) -> Option<RawCode> {
        match ev {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    return None;
                }
                let code = match key.code {
                    KeyCode::Up => RawCode::Up,
                    KeyCode::Down => RawCode::Down,
                    KeyCode::Left => RawCode::Left,
                    KeyCode::Right => RawCode::Right,
                    KeyCode::Enter => RawCode::Enter,
                    KeyCode::Esc => RawCode::Escape,
                    KeyCode::Char(c) => RawCode::Char(c),
                    _ => RawCode::Other,
                };
                // Crossterm already folded ESC + key into one alt-modified
                // event; unfold it so alt chords read as an escape sequence.
                if key.modifiers.contains(KeyModifiers::ALT) && code != RawCode::Escape {
                    self.pending.push_back(code);
                    return Some(RawCode::Escape);
                }
                Some(code)
            }
            Event::Mouse(mouse) => {
                self.mouse = Some(self.primary_click(&mouse)?);
                Some(RawCode::Mouse)
            }
            Event::Resize(_, _) => {
                self.resized = true;
                None
            }
            _ => None,
        }
    }

    /// A primary press and release on the same cell is a click. Motion,
    /// scrolling and other buttons are dropped so they never take a frame's
    /// input slot.
    fn primary_click(&mut self, mouse: &MouseEvent) -> Option<RawMouse> {
        let at = Point::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed_at = Some(at);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                (self.pressed_at.take() == Some(at)).then_some(RawMouse {
                    state: PointerState::Clicked(Button::Primary),
                    x: at.x,
                    y: at.y,
                })
            }
            _ => None,
        }
    }
}

impl InputSource for CrosstermTerminal {
    fn read_raw(&mut self) -> RawCode {
        if let Some(code) = self.pending.pop_front() {
            return code;
        }
        while let Some(ev) = self.next_event() {
            if let Some(code) = self.translate(ev) {
                return code;
            }
        }
        RawCode::Empty
    }

    fn mouse_event(&mut self) -> Option<RawMouse> {
        self.mouse.take()
    }
}

impl Terminal for CrosstermTerminal {
    fn set_title(&mut self, title: &str) {
        self.surface.set_title(title);
    }

    fn prepare(&mut self, force_redraw: bool) {
        self.surface.prepare(force_redraw || self.resized);
    }

    fn surface(&mut self) -> &mut Surface {
        &mut self.surface
    }

    fn refresh(&mut self) -> Result<(), EngineError> {
        if self.resized {
            queue!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
            self.resized = false;
        }
        for change in self.surface.changes() {
            let cs = to_content_style(&change.cell.style);
            queue!(
                self.stdout,
                cursor::MoveTo(self.origin.x + change.x, self.origin.y + change.y),
                style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
            )?;
        }
        self.stdout.flush()?;
        self.surface.mark_presented();
        Ok(())
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        if restore_terminal() {
            debug!("terminal restored");
        }
    }
}

/// Put the terminal back the way `acquire` found it. Safe to call from a
/// panic hook; errors are ignored.
///
/// Only the first call after `acquire` does anything; it returns `true`.
pub fn restore_terminal() -> bool {
    if !ACQUIRED.swap(false, Ordering::SeqCst) {
        return false;
    }
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        DisableMouseCapture,
        cursor::Show,
        terminal::LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
    true
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}
