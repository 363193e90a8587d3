//! Input decoder — raw backend codes to one normalized `Input` per frame.
//!
//! The decoder never blocks and never fails: anything it does not recognize
//! degrades to `Input::None`, since stray terminal sequences are routine.

use crate::types::{Input, Point};

/// A key code as delivered by the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawCode {
    /// Nothing pending.
    Empty,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Char(char),
    /// Escape, or the lead byte of an alt-modified sequence.
    Escape,
    /// A pointer event is waiting in the backend's mouse state.
    Mouse,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerState {
    Clicked(Button),
    Pressed(Button),
    Released(Button),
    Moved,
    Scrolled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMouse {
    pub state: PointerState,
    pub x: u16,
    pub y: u16,
}

/// Non-blocking source of raw input.
pub trait InputSource {
    /// Read one raw code, or `RawCode::Empty` if nothing is pending.
    fn read_raw(&mut self) -> RawCode;

    /// Extended state of the pointer event announced by `RawCode::Mouse`.
    fn mouse_event(&mut self) -> Option<RawMouse>;
}

/// The outcome of decoding one frame's input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decoded {
    pub input: Input,
    /// Meaningful only for `Input::Clicked`, otherwise `(0, 0)`.
    pub position: Point,
}

impl Decoded {
    fn key(input: Input) -> Self {
        Decoded {
            input,
            position: Point::default(),
        }
    }
}

/// Read and normalize at most one input event (two raw reads for escape).
pub fn decode<S: InputSource + ?Sized>(source: &mut S) -> Decoded {
    match source.read_raw() {
        RawCode::Up => Decoded::key(Input::Up),
        RawCode::Down => Decoded::key(Input::Down),
        RawCode::Left => Decoded::key(Input::Left),
        RawCode::Right => Decoded::key(Input::Right),
        RawCode::Enter | RawCode::Char('\n') | RawCode::Char('\r') | RawCode::Char(' ') => {
            Decoded::key(Input::Confirm)
        }
        // A lone escape has nothing behind it; anything that follows means
        // an alt/multi-byte sequence, which is swallowed along with its tail.
        RawCode::Escape => match source.read_raw() {
            RawCode::Empty => Decoded::key(Input::Escape),
            _ => Decoded::default(),
        },
        RawCode::Mouse => match source.mouse_event() {
            Some(RawMouse {
                state: PointerState::Clicked(Button::Primary),
                x,
                y,
            }) => Decoded {
                input: Input::Clicked,
                position: Point::new(x, y),
            },
            _ => Decoded::default(),
        },
        RawCode::Empty | RawCode::Char(_) | RawCode::Other => Decoded::default(),
    }
}
