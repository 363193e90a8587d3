//! Engine — the scene state machine and frame loop.
//!
//! Each frame: decode input, let the active scene react, then either switch
//! scenes, stop, or draw and sleep out the rest of the frame budget.
//!
//! A scene switch is immediate: the frame that requested it is neither drawn
//! nor paced, and the next frame starts with the new scene.

use tracing::{debug, info, warn};

use crate::backend::{CrosstermTerminal, Terminal};
use crate::clock::{Clock, SystemClock, pacing_delay};
use crate::config::EngineConfig;
use crate::context::{FrameContext, InitContext};
use crate::error::EngineError;
use crate::input;
use crate::scene::Scene;
use crate::types::SurfaceGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Running,
    /// Final. The engine does not run again.
    Terminated,
}

/// How a single frame ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    Transitioned,
    Exited,
}

pub struct Engine<T: Terminal, C: Clock = SystemClock> {
    terminal: T,
    clock: C,
    geometry: SurfaceGeometry,
    frame_budget_ms: u64,
    scene: Option<Box<dyn Scene>>,
    state: EngineState,
    frames_drawn: u64,
}

impl Engine<CrosstermTerminal, SystemClock> {
    /// Acquire the real terminal at the configured geometry.
    pub fn configure(config: &EngineConfig) -> Result<Self, EngineError> {
        let terminal = CrosstermTerminal::acquire(&config.geometry)?;
        Ok(Self::new(terminal, SystemClock::new(), config))
    }
}

impl<T: Terminal, C: Clock> Engine<T, C> {
    pub fn new(terminal: T, clock: C, config: &EngineConfig) -> Self {
        Engine {
            terminal,
            clock,
            geometry: config.geometry,
            frame_budget_ms: config.frame_budget_ms,
            scene: None,
            state: EngineState::Uninitialized,
            frames_drawn: 0,
        }
    }

    /// Activate `scene` and run until a scene asks to exit.
    pub fn start(&mut self, scene: Box<dyn Scene>) -> Result<(), EngineError> {
        self.activate(scene);
        self.run()
    }

    /// Make `scene` the active scene, dropping the previous one, and
    /// initialize it with the surface placement.
    pub fn activate(&mut self, scene: Box<dyn Scene>) {
        let scene = self.scene.insert(scene);
        self.terminal.set_title(scene.title());
        scene.init(&InitContext::new(&self.geometry));
        info!(title = scene.title(), "scene activated");
    }

    pub fn run(&mut self) -> Result<(), EngineError> {
        if self.scene.is_none() {
            return Err(EngineError::NoScene);
        }
        if self.state == EngineState::Terminated {
            return Ok(());
        }
        self.state = EngineState::Running;
        while self.state == EngineState::Running {
            if let Err(e) = self.step() {
                self.state = EngineState::Terminated;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Run exactly one frame.
    pub fn step(&mut self) -> Result<FrameOutcome, EngineError> {
        if self.state == EngineState::Terminated {
            return Ok(FrameOutcome::Exited);
        }
        let Some(scene) = self.scene.as_mut() else {
            return Err(EngineError::NoScene);
        };

        let start = self.clock.now_millis();
        let mut ctx = FrameContext::new(input::decode(&mut self.terminal));
        scene.run(&mut ctx);

        // `run` has returned, so the outgoing scene can be dropped safely.
        if let Some(next) = ctx.take_pending_scene() {
            if ctx.has_exit_requested() {
                warn!(
                    next = next.title(),
                    "exit and scene transition requested in one frame; transitioning"
                );
            }
            debug!(from = scene.title(), to = next.title(), "scene transition");
            self.activate(next);
            return Ok(FrameOutcome::Transitioned);
        }

        if ctx.has_exit_requested() {
            info!(title = scene.title(), "exit requested");
            self.state = EngineState::Terminated;
            return Ok(FrameOutcome::Exited);
        }

        self.terminal.prepare(ctx.redraw_forced());
        scene.draw(self.terminal.surface());
        self.terminal.refresh()?;
        self.frames_drawn += 1;

        let elapsed = self.clock.now_millis().saturating_sub(start);
        match pacing_delay(elapsed, self.frame_budget_ms) {
            Some(delay) => self.clock.sleep_millis(delay),
            None => debug!(elapsed, budget = self.frame_budget_ms, "frame over budget"),
        }
        Ok(FrameOutcome::Drawn)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn scene_title(&self) -> Option<&str> {
        self.scene.as_deref().map(|s| s.title())
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }
}
