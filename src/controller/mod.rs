//! # Controller Module
//!
//! The virtual game controller side of the bridge.
//!
//! This module handles:
//! - Button and axis vocabulary shared by the mapping engine and drivers
//! - The [`GamepadOutput`] driver abstraction
//! - A logging driver for running without a virtual-HID bus

pub mod console;
pub mod output;
pub mod state;

pub use output::GamepadOutput;
pub use state::{GamepadAxis, GamepadButton, GamepadState};
