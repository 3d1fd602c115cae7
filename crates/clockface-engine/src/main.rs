//! Headless engine binary for Clockface voxel clocks.
//!
//! Wires the clock registry, an in-memory world host, and the periodic
//! driver together, and accepts console commands on stdin. All clock
//! mutation and rendering happens on a single task.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `clockface-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the dial and the driver schedule
//! 4. Load the clock registry from its JSON file
//! 5. Create the simulated worlds with every clock's chunks loaded
//! 6. Start the console reader
//! 7. Run the driver loop until Ctrl-C or console EOF

mod console;
mod error;
mod session;

use std::path::Path;

use clockface_core::config::ClockfaceConfig;
use clockface_core::dial::Dial;
use clockface_core::driver::Schedule;
use clockface_core::registry::ClockRegistry;
use clockface_core::store::JsonFileStore;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::session::Session;

/// Configuration file, relative to the working directory.
const CONFIG_PATH: &str = "clockface-config.yaml";

/// Console lines buffered ahead of the driver loop.
const CONSOLE_BUFFER: usize = 32;

/// Application entry point for the Clockface engine.
///
/// # Errors
///
/// Returns an error if configuration, the dial, the schedule, the
/// registry, or the console reader cannot be set up.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("clockface-engine starting");
    info!(
        data_dir = %config.storage.data_dir.display(),
        initial_delay_ticks = config.driver.initial_delay_ticks,
        interval_ticks = config.driver.interval_ticks,
        tick_duration_ms = config.driver.tick_duration_ms,
        "Configuration loaded"
    );

    // 3. Dial and schedule.
    let dial = Dial::new(&config.dial)?;
    let schedule = Schedule::from_config(&config.driver)?;

    // 4. Clock registry.
    let registry_path = config.storage.registry_path();
    let registry = ClockRegistry::load(JsonFileStore::new(&registry_path))?;
    info!(
        path = %registry_path.display(),
        clocks = registry.len(),
        "Clock registry ready"
    );

    // 5. Simulated worlds.
    let mut session = Session::new(
        registry,
        config.world.clone(),
        dial,
        config.driver.interval_ticks,
    );
    info!(
        default_world = %config.world.default_world,
        day_length = config.world.day_length,
        start_time = config.world.start_time,
        "World host initialized"
    );

    // 6. Console.
    let (line_tx, line_rx) = mpsc::channel(CONSOLE_BUFFER);
    console::spawn_stdin_reader(line_tx)?;
    println!("{}", console::USAGE);

    // 7. Driver loop.
    session::run(&mut session, &schedule, line_rx, shutdown_signal()).await;

    info!(
        ticks = session.ticks(),
        clocks = session.registry().len(),
        "clockface-engine shutdown complete"
    );
    Ok(())
}

/// Load configuration from `clockface-config.yaml`, or defaults when the
/// file is absent.
fn load_config() -> Result<ClockfaceConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(ClockfaceConfig::from_file(config_path)?)
    } else {
        // Parsing the empty document still applies environment overrides.
        Ok(ClockfaceConfig::parse("")?)
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves
/// and the engine stops on console EOF only.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
