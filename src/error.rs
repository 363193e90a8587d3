use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that end the frame loop. None of them are recovered locally.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to acquire terminal: {0}")]
    Backend(#[source] io::Error),
    #[error("terminal too small: need {need_w}x{need_h}, have {have_w}x{have_h}")]
    TerminalTooSmall {
        need_w: u16,
        need_h: u16,
        have_w: u16,
        have_h: u16,
    },
    #[error("terminal output failed: {0}")]
    Output(#[from] io::Error),
    #[error("no active scene")]
    NoScene,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("frame budget must be at least 1 ms")]
    ZeroBudget,
    #[error("surface must be at least 3x3, got {width}x{height}")]
    SurfaceTooSmall { width: u16, height: u16 },
}
