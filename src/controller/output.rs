//! Trait abstraction for the virtual controller driver to enable testing

use super::state::{GamepadAxis, GamepadButton};
use crate::error::Result;

/// A virtual game controller the orchestrator reports to.
///
/// Calls arrive serialized: the orchestrator never invokes two methods
/// concurrently. `set_*` calls stage values, [`submit_report`](Self::submit_report)
/// publishes them to the OS as one report.
#[cfg_attr(test, mockall::automock)]
pub trait GamepadOutput: Send {
    /// Connects to the virtual device driver.
    fn initialize(&mut self) -> Result<()>;

    /// Stages a button state.
    fn set_button_state(&mut self, button: GamepadButton, pressed: bool) -> Result<()>;

    /// Stages an axis value.
    fn set_axis_value(&mut self, axis: GamepadAxis, value: i16) -> Result<()>;

    /// Publishes all staged values.
    fn submit_report(&mut self) -> Result<()>;

    /// Unplugs the virtual device. Safe to call more than once.
    fn disconnect(&mut self);
}
