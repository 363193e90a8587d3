//! Scenes for the `frameloop` binary: an input inspector and its help page.

use frameloop::types::{NamedColor, Style};
use frameloop::{FrameContext, InitContext, Input, Point, Scene, Surface};

const HISTORY: usize = 8;

#[derive(Default)]
pub struct Inspector {
    origin: Point,
    width: u16,
    height: u16,
    cursor: Point,
    last_click: Option<Point>,
    history: Vec<Input>,
    frames: u64,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen coordinates to the drawable area inside the border.
    fn to_local(&self, at: Point) -> Option<Point> {
        let x = at.x.checked_sub(self.origin.x + 1)?;
        let y = at.y.checked_sub(self.origin.y + 1)?;
        (x < self.width && y < self.height).then_some(Point::new(x, y))
    }
}

impl Scene for Inspector {
    fn title(&self) -> &str {
        "Input inspector"
    }

    fn init(&mut self, ctx: &InitContext) {
        self.origin = ctx.origin();
        self.width = ctx.width().saturating_sub(2);
        self.height = ctx.height().saturating_sub(2);
        self.cursor = Point::new(self.width / 2, self.height / 2);
    }

    fn run(&mut self, ctx: &mut FrameContext) {
        self.frames += 1;
        let input = ctx.input();
        match input {
            Input::None => return,
            Input::Up => self.cursor.y = self.cursor.y.saturating_sub(1),
            Input::Down => self.cursor.y = (self.cursor.y + 1).min(self.height.saturating_sub(1)),
            Input::Left => self.cursor.x = self.cursor.x.saturating_sub(1),
            Input::Right => self.cursor.x = (self.cursor.x + 1).min(self.width.saturating_sub(1)),
            Input::Clicked => {
                let at = ctx.mouse_position();
                self.last_click = Some(at);
                if let Some(local) = self.to_local(at) {
                    self.cursor = local;
                }
            }
            Input::Confirm => ctx.request_scene(Box::new(Help)),
            Input::Escape => ctx.request_exit(),
        }
        self.history.insert(0, input);
        self.history.truncate(HISTORY);
    }

    fn draw(&mut self, surface: &mut Surface) {
        let label = Style::default().dim();
        surface.print(1, 0, "frame", label);
        surface.print(8, 0, &self.frames.to_string(), Style::default());
        surface.print(1, 1, "click", label);
        let click = match self.last_click {
            Some(p) => format!("{}, {}", p.x, p.y),
            None => "-".to_string(),
        };
        surface.print(8, 1, &click, Style::default());
        surface.print(1, 2, "inputs", label);
        for (i, input) in self.history.iter().enumerate() {
            let style = if i == 0 { Style::default().bold() } else { label };
            surface.print(8, 2 + i as u16, &format!("{input:?}"), style);
        }
        surface.put(self.cursor.x, self.cursor.y, '@', Style::fg(NamedColor::Yellow).bold());

        let hint = "[Enter] help  [Esc] quit";
        let y = surface.height().saturating_sub(1);
        surface.print(1, y, hint, label);
    }
}

pub struct Help;

const HELP_LINES: &[&str] = &[
    "Arrow keys move the @ marker.",
    "A left click moves it to the clicked cell.",
    "Alt chords are swallowed as escape sequences.",
    "",
    "[Enter] back  [Esc] quit",
];

impl Scene for Help {
    fn title(&self) -> &str {
        "Help"
    }

    fn init(&mut self, _ctx: &InitContext) {}

    fn run(&mut self, ctx: &mut FrameContext) {
        match ctx.input() {
            Input::Confirm => ctx.request_scene(Box::new(Inspector::new())),
            Input::Escape => ctx.request_exit(),
            _ => {}
        }
    }

    fn draw(&mut self, surface: &mut Surface) {
        for (i, line) in HELP_LINES.iter().enumerate() {
            surface.print(1, 1 + i as u16, line, Style::default());
        }
    }
}
