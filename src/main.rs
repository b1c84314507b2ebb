//! # Gamepad Bridge
//!
//! Drive a virtual game controller from keyboard and mouse input.
//!
//! This binary runs a self-contained demo session: the input capture is the
//! injectable mock and the virtual controller is the logging console pad, so
//! it works without any drivers installed. A scripted WASD, button and mouse
//! sequence is replayed every two seconds.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError};

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, sleep, Duration};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use gamepad_bridge::capture::mock::MockInputCapture;
use gamepad_bridge::capture::{RawKeyEvent, RawMouseEvent};
use gamepad_bridge::config::{Config, LoggingConfig};
use gamepad_bridge::controller::console::ConsoleGamepad;
use gamepad_bridge::orchestrator::{Notification, Orchestrator};

/// Time between two replays of the demo script
const SCRIPT_PERIOD: Duration = Duration::from_secs(2);

/// Log file name prefix inside `logging.directory`
const LOG_FILE_PREFIX: &str = "gamepad-bridge.log";

/// One step of the demo input script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptStep {
    Key(RawKeyEvent),
    Mouse(RawMouseEvent),
    Wait(Duration),
}

/// Walk forward, strafe, jump and sweep the camera.
fn demo_script() -> Vec<ScriptStep> {
    use ScriptStep::{Key, Mouse, Wait};

    let mut steps = vec![
        Key(RawKeyEvent::pressed(17)), // W
        Wait(Duration::from_millis(300)),
        Key(RawKeyEvent::pressed(32)), // D
        Wait(Duration::from_millis(200)),
        Key(RawKeyEvent::released(32)),
        Key(RawKeyEvent::released(17)),
        Key(RawKeyEvent::pressed(57)), // Space
        Wait(Duration::from_millis(100)),
        Key(RawKeyEvent::released(57)),
    ];

    for _ in 0..10 {
        steps.push(Mouse(RawMouseEvent::motion(6000, -2500)));
        steps.push(Wait(Duration::from_millis(16)));
    }

    steps
}

async fn play_script(capture: &MockInputCapture, steps: &[ScriptStep]) {
    for step in steps {
        match *step {
            ScriptStep::Key(event) => capture.inject_key(event),
            ScriptStep::Mouse(event) => capture.inject_mouse(event),
            ScriptStep::Wait(duration) => sleep(duration).await,
        }
    }
}

/// Sets up console logging and, if configured, a daily rolling log file.
///
/// `RUST_LOG` overrides the configured level. The returned guard must be held
/// for as long as file logging is needed.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Main entry point for the Gamepad Bridge demo
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (first argument, or built-in defaults)
///    - Set up logging
///    - Initialize the capture and the virtual controller
///
/// 2. **Main Loop**
///    - Replay the demo script every two seconds
///    - Log the controller state after each replay
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Stop the session and disconnect the controller
///
/// # Errors
///
/// Returns error if the configuration is invalid or initialization fails
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config(std::env::args().nth(1).map(PathBuf::from))?;
    let _log_guard = init_logging(&config.logging);

    info!("Gamepad Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let capture = Arc::new(MockInputCapture::new());
    let gamepad = ConsoleGamepad::new();
    let pad_state = gamepad.published_state();

    let orchestrator = Orchestrator::new(capture.clone(), Box::new(gamepad), &config)?;

    let mut notifications = orchestrator.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match notifications.recv().await {
                // Already logged where it was raised
                Ok(Notification::Log(_)) => {}
                Ok(notification) => debug!("Notification: {:?}", notification),
                Err(RecvError::Lagged(missed)) => warn!("Missed {} notifications", missed),
                Err(RecvError::Closed) => break,
            }
        }
    });

    orchestrator.initialize()?;
    orchestrator.start().await?;
    orchestrator.set_paused(false);

    let script = demo_script();
    let mut ticker = interval(SCRIPT_PERIOD);

    info!("Replaying demo input every {:?}", SCRIPT_PERIOD);
    info!("Press Ctrl+C to exit");

    let mut rounds: u64 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                play_script(&capture, &script).await;
                rounds += 1;

                let state = pad_state.lock().unwrap_or_else(PoisonError::into_inner).clone();
                info!(
                    "Round {}: {:?} - Left: ({},{}) Right: ({},{})",
                    rounds,
                    orchestrator.state(),
                    state.left_thumb_x,
                    state.left_thumb_y,
                    state.right_thumb_x,
                    state.right_thumb_y
                );
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    orchestrator.stop().await;
    drop(orchestrator);
    printer.await?;

    info!("Replayed the demo script {} times", rounds);
    Ok(())
}
