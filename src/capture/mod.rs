//! # Input Capture Module
//!
//! Raw keyboard and mouse events and the collaborator that delivers them.
//!
//! A capture backend (a keyboard/mouse filter driver, an evdev grab, ...)
//! runs a monitoring loop and, for every event it receives:
//!
//! 1. asks the [`InputHandler`] whether the event must be suppressed from the
//!    OS (`should_block_key` / `should_block_mouse`),
//! 2. forwards it to the OS when it is not suppressed,
//! 3. hands it to the handler (`on_key` / `on_mouse`) either way.
//!
//! Being observed and being suppressed are independent: the handler sees
//! every event, blocked or not.
//!
//! # Testability
//!
//! [`mock::MockInputCapture`] lets tests and the demo binary inject synthetic
//! events without a driver.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

pub mod mock;

/// Key transition reported by the capture driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdge {
    Pressed,
    Released,
}

/// A raw keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    /// Hardware scan code.
    pub code: u16,
    pub edge: KeyEdge,
    /// Driver-specific extra information, passed through untouched.
    pub device_info: u32,
}

impl RawKeyEvent {
    #[must_use]
    pub fn pressed(code: u16) -> Self {
        Self {
            code,
            edge: KeyEdge::Pressed,
            device_info: 0,
        }
    }

    #[must_use]
    pub fn released(code: u16) -> Self {
        Self {
            code,
            edge: KeyEdge::Released,
            device_info: 0,
        }
    }

    #[must_use]
    pub fn is_press(&self) -> bool {
        self.edge == KeyEdge::Pressed
    }
}

/// A raw mouse event. Motion is relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMouseEvent {
    pub dx: i32,
    pub dy: i32,
    /// Button transition flags (0 for pure motion).
    pub button_flags: u16,
    pub device_info: u32,
}

impl RawMouseEvent {
    /// A pure motion event.
    #[must_use]
    pub fn motion(dx: i32, dy: i32) -> Self {
        Self {
            dx,
            dy,
            button_flags: 0,
            device_info: 0,
        }
    }

    /// A click without motion.
    #[must_use]
    pub fn buttons(button_flags: u16) -> Self {
        Self {
            dx: 0,
            dy: 0,
            button_flags,
            device_info: 0,
        }
    }

    #[must_use]
    pub fn has_motion(&self) -> bool {
        self.dx != 0 || self.dy != 0
    }
}

/// Receives events from a capture backend.
///
/// Methods are called from the backend's monitoring task and must not block.
pub trait InputHandler: Send + Sync {
    /// `true` if the key event must not reach the OS.
    fn should_block_key(&self, event: &RawKeyEvent) -> bool;

    /// `true` if the mouse event must not reach the OS.
    fn should_block_mouse(&self, event: &RawMouseEvent) -> bool;

    fn on_key(&self, event: RawKeyEvent);

    fn on_mouse(&self, event: RawMouseEvent);
}

/// A source of raw keyboard and mouse events.
#[async_trait]
pub trait InputCapture: Send + Sync {
    /// Opens the capture driver.
    fn initialize(&self) -> Result<()>;

    /// Runs the monitoring loop until `cancel` fires.
    ///
    /// Returns once the loop has exited; no handler call happens after that.
    async fn start_monitoring(
        &self,
        handler: Arc<dyn InputHandler>,
        cancel: CancellationToken,
    ) -> Result<()>;
}
