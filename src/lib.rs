//! A minimal real-time loop for terminal programs.
//!
//! The [`Engine`] owns the render surface and one active [`Scene`]. Every
//! frame it decodes input, lets the scene react through a [`FrameContext`],
//! switches scenes or exits when asked, and otherwise draws and sleeps out
//! the remainder of a fixed frame budget.

pub mod backend;
pub mod clock;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod input;
pub mod logging;
pub mod scene;
pub mod surface;
pub mod types;

pub use config::EngineConfig;
pub use context::{FrameContext, InitContext};
pub use engine::{Engine, EngineState, FrameOutcome};
pub use error::{ConfigError, EngineError};
pub use scene::Scene;
pub use surface::Surface;
pub use types::{Input, Point};
