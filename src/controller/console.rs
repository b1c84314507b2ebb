//! # Console Gamepad
//!
//! A [`GamepadOutput`] that reports to the log instead of a driver.
//!
//! Used by the demo binary on machines without a virtual-HID bus. It keeps a
//! [`GamepadState`] so the most recent report can be inspected, and logs a
//! state summary whenever a stick is deflected past [`REPORT_THRESHOLD`].

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use super::output::GamepadOutput;
use super::state::{GamepadAxis, GamepadButton, GamepadState};
use crate::error::Result;

/// Minimum stick deflection that gets logged.
pub const REPORT_THRESHOLD: i16 = 1000;

/// Logging virtual controller.
#[derive(Debug, Default)]
pub struct ConsoleGamepad {
    staged: GamepadState,
    published: Arc<Mutex<GamepadState>>,
    connected: bool,
    reports: u64,
}

impl ConsoleGamepad {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the last submitted report.
    ///
    /// The handle stays valid after the gamepad is moved into an orchestrator.
    #[must_use]
    pub fn published_state(&self) -> Arc<Mutex<GamepadState>> {
        Arc::clone(&self.published)
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Number of reports submitted since creation.
    #[must_use]
    pub fn reports(&self) -> u64 {
        self.reports
    }
}

impl GamepadOutput for ConsoleGamepad {
    fn initialize(&mut self) -> Result<()> {
        self.connected = true;
        info!("Console gamepad connected (no virtual-HID driver in use)");
        Ok(())
    }

    fn set_button_state(&mut self, button: GamepadButton, pressed: bool) -> Result<()> {
        info!("Button {}: {}", button, if pressed { "PRESSED" } else { "released" });
        self.staged.set_button(button, pressed);
        Ok(())
    }

    fn set_axis_value(&mut self, axis: GamepadAxis, value: i16) -> Result<()> {
        if value.unsigned_abs() > REPORT_THRESHOLD.unsigned_abs() {
            debug!("Axis {:?}: {} ({:.1}%)", axis, value, f64::from(value) / 327.67);
        }
        self.staged.set_axis(axis, value);
        Ok(())
    }

    fn submit_report(&mut self) -> Result<()> {
        self.reports += 1;
        if self.staged.any_stick_moved(REPORT_THRESHOLD) {
            info!(
                "Gamepad state - Left: ({},{}) Right: ({},{})",
                self.staged.left_thumb_x,
                self.staged.left_thumb_y,
                self.staged.right_thumb_x,
                self.staged.right_thumb_y
            );
        }
        *self.published.lock().unwrap_or_else(PoisonError::into_inner) = self.staged.clone();
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.connected {
            self.connected = false;
            info!("Console gamepad disconnected");
        }
    }
}
