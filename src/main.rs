mod inspector;

use std::path::Path;
use std::{panic, process};

use anyhow::{Context, Result};

use frameloop::{Engine, EngineConfig, backend, logging};

use inspector::Inspector;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const USAGE: &str = "frameloop [config.json]";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    let config = match args.next().as_deref() {
        Some("-h" | "--help") => {
            println!("frameloop — terminal frame loop input inspector\n\nUsage:\n  {USAGE}");
            return Ok(());
        }
        Some(path) => EngineConfig::from_path(Path::new(path))
            .with_context(|| format!("Failed to load config {path}"))?,
        None => EngineConfig::load(),
    };

    if let Some(log_file) = &config.log_file {
        logging::init(log_file)
            .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
    }

    // Restore before the default hook prints; the engine's drop during
    // unwinding then finds nothing left to undo.
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        backend::restore_terminal();
        default_hook(info);
    }));

    let mut engine = Engine::configure(&config).context("Failed to start engine")?;
    engine.start(Box::new(Inspector::new()))?;
    Ok(())
}
