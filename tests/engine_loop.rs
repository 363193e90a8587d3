use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use pretty_assertions::assert_eq;

use frameloop::backend::{HeadlessTerminal, Terminal, TerminalCall};
use frameloop::clock::Clock;
use frameloop::input::{Button, InputSource, PointerState, RawCode, RawMouse};
use frameloop::types::{Style, SurfaceGeometry};
use frameloop::{
    Engine, EngineConfig, EngineError, EngineState, FrameContext, FrameOutcome, InitContext,
    Input, Point, Scene, Surface,
};

const BUDGET: u64 = 33;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

type Log = Rc<RefCell<Vec<String>>>;

/// Shared millisecond counter; only sleeps and scene work advance it.
#[derive(Clone, Default)]
struct FakeClock {
    now: Rc<Cell<u64>>,
    sleeps: Rc<RefCell<Vec<u64>>>,
}

impl FakeClock {
    fn advance(&self, millis: u64) {
        self.now.set(self.now.get() + millis);
    }

    fn sleeps(&self) -> Vec<u64> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for FakeClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }

    fn sleep_millis(&mut self, millis: u64) {
        self.sleeps.borrow_mut().push(millis);
        self.advance(millis);
    }
}

type RunHook = Box<dyn FnMut(u32, &mut FrameContext)>;

/// A scene that logs every hook call and delegates `run` to a closure
/// receiving the scene-local frame number.
struct Probe {
    name: &'static str,
    log: Log,
    frame: u32,
    on_run: RunHook,
    text: Option<&'static str>,
}

impl Probe {
    fn new(name: &'static str, log: &Log, on_run: impl FnMut(u32, &mut FrameContext) + 'static) -> Self {
        Probe {
            name,
            log: log.clone(),
            frame: 0,
            on_run: Box::new(on_run),
            text: None,
        }
    }

    fn idle(name: &'static str, log: &Log) -> Self {
        Self::new(name, log, |_, _| {})
    }

    fn with_text(mut self, text: &'static str) -> Self {
        self.text = Some(text);
        self
    }
}

impl Scene for Probe {
    fn title(&self) -> &str {
        self.name
    }

    fn init(&mut self, ctx: &InitContext) {
        let origin = ctx.origin();
        self.log
            .borrow_mut()
            .push(format!("init {} at {},{}", self.name, origin.x, origin.y));
    }

    fn run(&mut self, ctx: &mut FrameContext) {
        self.log
            .borrow_mut()
            .push(format!("run {} {:?}", self.name, ctx.input()));
        (self.on_run)(self.frame, ctx);
        self.frame += 1;
    }

    fn draw(&mut self, surface: &mut Surface) {
        self.log.borrow_mut().push(format!("draw {}", self.name));
        if let Some(text) = self.text {
            surface.print(0, 0, text, Style::default());
        }
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.log.borrow_mut().push(format!("drop {}", self.name));
    }
}

fn geometry() -> SurfaceGeometry {
    SurfaceGeometry {
        width: 20,
        height: 6,
        x: 5,
        y: 2,
    }
}

fn engine() -> (Engine<HeadlessTerminal, FakeClock>, FakeClock) {
    let config = EngineConfig {
        geometry: geometry(),
        frame_budget_ms: BUDGET,
        log_file: None,
    };
    let clock = FakeClock::default();
    let engine = Engine::new(HeadlessTerminal::new(&geometry()), clock.clone(), &config);
    (engine, clock)
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

// ---------------------------------------------------------------------------
// Frame loop
// ---------------------------------------------------------------------------

#[test]
fn draws_three_frames_then_exits() {
    let log = Log::default();
    let (mut engine, clock) = engine();
    let scene = Probe::new("a", &log, |frame, ctx| {
        if frame == 3 {
            ctx.request_exit();
        }
    });

    engine.start(Box::new(scene)).unwrap();

    assert_eq!(engine.state(), EngineState::Terminated);
    assert_eq!(engine.frames_drawn(), 3);
    assert_eq!(engine.terminal().refresh_count(), 3);
    assert_eq!(clock.sleeps(), vec![BUDGET, BUDGET, BUDGET]);
    assert_eq!(
        entries(&log),
        vec![
            "init a at 5,2",
            "run a None",
            "draw a",
            "run a None",
            "draw a",
            "run a None",
            "draw a",
            "run a None",
        ]
    );
}

#[test]
fn pacing_sleeps_the_rest_of_the_budget() {
    let log = Log::default();
    let (mut engine, clock) = engine();
    let work = clock.clone();
    let costs = [10, BUDGET - 1, BUDGET, 50];
    let scene = Probe::new("a", &log, move |frame, ctx| match costs.get(frame as usize) {
        Some(&cost) => work.advance(cost),
        None => ctx.request_exit(),
    });

    engine.start(Box::new(scene)).unwrap();

    assert_eq!(engine.frames_drawn(), 4);
    // Over-budget frames are not compensated for.
    assert_eq!(clock.sleeps(), vec![BUDGET - 10, 1]);
}

#[test]
fn exit_skips_draw_even_with_input() {
    let log = Log::default();
    let (mut engine, clock) = engine();
    engine.terminal_mut().push_codes([RawCode::Up]);
    engine.activate(Box::new(Probe::new("a", &log, |_, ctx| ctx.request_exit())));

    assert_eq!(engine.step().unwrap(), FrameOutcome::Exited);

    assert_eq!(engine.state(), EngineState::Terminated);
    assert_eq!(entries(&log), vec!["init a at 5,2", "run a Up"]);
    assert_eq!(engine.terminal().calls(), &[TerminalCall::SetTitle("a".into())]);
    assert!(clock.sleeps().is_empty());
}

#[test]
fn terminated_engine_stays_terminated() {
    let log = Log::default();
    let (mut engine, _clock) = engine();
    engine
        .start(Box::new(Probe::new("a", &log, |_, ctx| ctx.request_exit())))
        .unwrap();
    let runs = entries(&log).len();

    assert_eq!(engine.step().unwrap(), FrameOutcome::Exited);
    engine.run().unwrap();
    assert_eq!(entries(&log).len(), runs);
}

#[test]
fn running_without_scene_fails() {
    let (mut engine, _clock) = engine();
    assert!(matches!(engine.run(), Err(EngineError::NoScene)));
    assert!(matches!(engine.step(), Err(EngineError::NoScene)));
    assert_eq!(engine.state(), EngineState::Uninitialized);
}

// ---------------------------------------------------------------------------
// Scene transitions
// ---------------------------------------------------------------------------

#[test]
fn confirm_switches_scene_without_drawing_or_pacing() {
    let log = Log::default();
    let (mut engine, clock) = engine();
    engine.terminal_mut().push_codes([RawCode::Enter, RawCode::Up]);
    let next_log = log.clone();
    engine.activate(Box::new(Probe::new("a", &log, move |_, ctx| {
        if ctx.input() == Input::Confirm {
            ctx.request_scene(Box::new(Probe::idle("b", &next_log)));
        }
    })));

    assert_eq!(engine.step().unwrap(), FrameOutcome::Transitioned);

    // The old scene is gone before the new one initializes, and the next
    // code is still waiting for the next frame.
    assert_eq!(
        entries(&log),
        vec!["init a at 5,2", "run a Confirm", "drop a", "init b at 5,2"]
    );
    assert_eq!(engine.terminal().pending_input(), 1);
    assert_eq!(engine.frames_drawn(), 0);
    assert!(clock.sleeps().is_empty());
    assert_eq!(engine.scene_title(), Some("b"));

    assert_eq!(engine.step().unwrap(), FrameOutcome::Drawn);
    assert_eq!(&entries(&log)[4..], ["run b Up", "draw b"]);
    assert_eq!(
        engine.terminal().calls()[..2],
        [TerminalCall::SetTitle("a".into()), TerminalCall::SetTitle("b".into())]
    );
}

#[test]
fn transition_wins_over_exit() {
    let log = Log::default();
    let (mut engine, _clock) = engine();
    let next_log = log.clone();
    engine.activate(Box::new(Probe::new("a", &log, move |_, ctx| {
        ctx.request_exit();
        ctx.request_scene(Box::new(Probe::idle("b", &next_log)));
    })));

    assert_eq!(engine.step().unwrap(), FrameOutcome::Transitioned);
    assert_ne!(engine.state(), EngineState::Terminated);
    assert_eq!(engine.scene_title(), Some("b"));
    assert_eq!(engine.step().unwrap(), FrameOutcome::Drawn);
}

#[test]
fn chained_transitions_run_to_exit() {
    let log = Log::default();
    let (mut engine, _clock) = engine();
    let b_log = log.clone();
    let a = Probe::new("a", &log, move |_, ctx| {
        let c_log = b_log.clone();
        ctx.request_scene(Box::new(Probe::new("b", &b_log, move |frame, ctx| {
            if frame == 1 {
                ctx.request_scene(Box::new(Probe::new("c", &c_log, |_, ctx| {
                    ctx.request_exit()
                })));
            }
        })));
    });

    engine.start(Box::new(a)).unwrap();

    assert_eq!(engine.frames_drawn(), 1);
    assert_eq!(
        entries(&log),
        vec![
            "init a at 5,2",
            "run a None",
            "drop a",
            "init b at 5,2",
            "run b None",
            "draw b",
            "run b None",
            "drop b",
            "init c at 5,2",
            "run c None",
        ]
    );
}

// ---------------------------------------------------------------------------
// Input and drawing
// ---------------------------------------------------------------------------

#[test]
fn escape_followed_by_input_reads_as_none() {
    let log = Log::default();
    let (mut engine, _clock) = engine();
    engine
        .terminal_mut()
        .push_codes([RawCode::Escape, RawCode::Char('x'), RawCode::Escape]);
    engine.activate(Box::new(Probe::idle("a", &log)));

    engine.step().unwrap();
    engine.step().unwrap();

    assert_eq!(&entries(&log)[1..], ["run a None", "draw a", "run a Escape", "draw a"]);
}

#[test]
fn primary_click_reaches_scene_with_position() {
    let (mut engine, _clock) = engine();
    let seen = Rc::new(Cell::new(None));
    let sink = seen.clone();
    engine.terminal_mut().push_mouse(RawMouse {
        state: PointerState::Clicked(Button::Primary),
        x: 7,
        y: 3,
    });
    engine.terminal_mut().push_mouse(RawMouse {
        state: PointerState::Clicked(Button::Secondary),
        x: 9,
        y: 4,
    });
    engine.activate(Box::new(Probe::new("a", &Log::default(), move |_, ctx| {
        sink.set(Some((ctx.input(), ctx.mouse_position())));
    })));

    engine.step().unwrap();
    assert_eq!(seen.get(), Some((Input::Clicked, Point::new(7, 3))));
    engine.step().unwrap();
    assert_eq!(seen.get(), Some((Input::None, Point::new(0, 0))));
}

#[test]
fn forced_redraw_repaints_every_cell() {
    let (mut engine, _clock) = engine();
    let cells = (geometry().width * geometry().height) as usize;
    engine.activate(Box::new(Probe::new("a", &Log::default(), |frame, ctx| {
        if frame == 2 {
            ctx.force_redraw();
        }
    })));

    for _ in 0..3 {
        engine.step().unwrap();
    }

    let refreshes: Vec<_> = engine
        .terminal()
        .calls()
        .iter()
        .filter(|c| !matches!(c, TerminalCall::SetTitle(_)))
        .cloned()
        .collect();
    assert_eq!(
        refreshes,
        vec![
            TerminalCall::Prepare { force_redraw: false },
            TerminalCall::Refresh { cells_written: cells },
            TerminalCall::Prepare { force_redraw: false },
            TerminalCall::Refresh { cells_written: 0 },
            TerminalCall::Prepare { force_redraw: true },
            TerminalCall::Refresh { cells_written: cells },
        ]
    );
}

#[test]
fn scene_output_lands_inside_the_border() {
    let (mut engine, _clock) = engine();
    engine.activate(Box::new(Probe::idle("Menu", &Log::default()).with_text("hi")));

    engine.step().unwrap();

    let screen = engine.terminal().screen();
    assert_eq!(screen[0], "┌─ Menu ───────────┐");
    assert_eq!(screen[1], "│hi                │");
    assert_eq!(screen[5], "└──────────────────┘");
}

// ---------------------------------------------------------------------------
// Teardown
// ---------------------------------------------------------------------------

/// Headless terminal that counts how often it is torn down.
struct Tracked {
    inner: HeadlessTerminal,
    teardowns: Rc<Cell<u32>>,
}

impl InputSource for Tracked {
    fn read_raw(&mut self) -> RawCode {
        self.inner.read_raw()
    }

    fn mouse_event(&mut self) -> Option<RawMouse> {
        self.inner.mouse_event()
    }
}

impl Terminal for Tracked {
    fn set_title(&mut self, title: &str) {
        self.inner.set_title(title);
    }

    fn prepare(&mut self, force_redraw: bool) {
        self.inner.prepare(force_redraw);
    }

    fn surface(&mut self) -> &mut Surface {
        self.inner.surface()
    }

    fn refresh(&mut self) -> Result<(), EngineError> {
        self.inner.refresh()
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.teardowns.set(self.teardowns.get() + 1);
    }
}

fn tracked_engine(teardowns: &Rc<Cell<u32>>) -> Engine<Tracked, FakeClock> {
    let terminal = Tracked {
        inner: HeadlessTerminal::new(&geometry()),
        teardowns: teardowns.clone(),
    };
    Engine::new(terminal, FakeClock::default(), &EngineConfig::default())
}

#[test]
fn teardown_runs_once_after_exit() {
    let teardowns = Rc::new(Cell::new(0));
    let mut engine = tracked_engine(&teardowns);
    engine
        .start(Box::new(Probe::new("a", &Log::default(), |_, ctx| ctx.request_exit())))
        .unwrap();
    assert_eq!(teardowns.get(), 0);
    drop(engine);
    assert_eq!(teardowns.get(), 1);
}

#[test]
fn teardown_runs_once_when_a_scene_panics() {
    let teardowns = Rc::new(Cell::new(0));
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut engine = tracked_engine(&teardowns);
        let scene = Probe::new("a", &Log::default(), |_, _| panic!("scene failed"));
        let _ = engine.start(Box::new(scene));
    }));
    assert!(result.is_err());
    assert_eq!(teardowns.get(), 1);
}
