//! # Mapping Engine
//!
//! Turns raw keyboard and mouse events into logical controller changes.
//!
//! - Keys bound to buttons produce [`MappingEvent::ButtonStateChanged`] on
//!   every press and release edge.
//! - Keys bound to the left stick are tracked in an active set; each change
//!   recomputes both axes from the held keys and produces
//!   [`MappingEvent::LeftStickChanged`].
//! - Mouse motion goes through the [`AxisTransform`] and produces
//!   [`MappingEvent::RightStickChanged`].
//!
//! The engine has no knowledge of pausing or output devices. It only tracks
//! state and reports what changed.

use std::collections::HashSet;

use tracing::debug;

use super::bindings::{Direction, KeyBinding, KeyBindingTable, StickAxis};
use super::transform::{to_stick, AxisState, AxisTransform, StickPosition};
use crate::capture::{RawKeyEvent, RawMouseEvent};
use crate::controller::GamepadButton;

/// A logical change of the virtual controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingEvent {
    ButtonStateChanged { button: GamepadButton, pressed: bool },
    LeftStickChanged(StickPosition),
    RightStickChanged(StickPosition),
}

/// Stateful keyboard/mouse to controller mapper.
///
/// # Examples
///
/// ```
/// use gamepad_bridge::capture::RawKeyEvent;
/// use gamepad_bridge::mapping::engine::{MappingEngine, MappingEvent};
/// use gamepad_bridge::mapping::transform::StickPosition;
///
/// let mut engine = MappingEngine::default();
///
/// // W pushes the left stick fully forward
/// let event = engine.handle_key(&RawKeyEvent::pressed(17));
/// assert_eq!(event, Some(MappingEvent::LeftStickChanged(StickPosition::new(0, 32767))));
/// ```
#[derive(Debug, Clone)]
pub struct MappingEngine {
    bindings: KeyBindingTable,
    transform: AxisTransform,
    axis_state: AxisState,
    /// Axis-bound codes currently held down.
    active_keys: HashSet<u16>,
}

impl Default for MappingEngine {
    fn default() -> Self {
        Self::new(KeyBindingTable::default(), AxisTransform::default())
    }
}

impl MappingEngine {
    #[must_use]
    pub fn new(bindings: KeyBindingTable, transform: AxisTransform) -> Self {
        Self {
            bindings,
            transform,
            axis_state: AxisState::default(),
            active_keys: HashSet::new(),
        }
    }

    /// Processes one key edge.
    ///
    /// Returns `None` for codes that are not bound.
    pub fn handle_key(&mut self, event: &RawKeyEvent) -> Option<MappingEvent> {
        let pressed = event.is_press();

        if !pressed {
            // Released codes always leave the active set, even if they were
            // rebound while held.
            self.active_keys.remove(&event.code);
        }

        match self.bindings.lookup(event.code)? {
            KeyBinding::Button(button) => {
                debug!("Key {} -> {} {}", event.code, button, pressed);
                Some(MappingEvent::ButtonStateChanged { button, pressed })
            }
            KeyBinding::Axis { .. } => {
                if pressed {
                    self.active_keys.insert(event.code);
                }
                Some(MappingEvent::LeftStickChanged(self.left_stick()))
            }
        }
    }

    /// Processes one mouse event.
    ///
    /// Events without motion (clicks, wheel) return `None` and leave the
    /// smoothing state untouched.
    pub fn handle_mouse(&mut self, event: &RawMouseEvent) -> Option<MappingEvent> {
        if !event.has_motion() {
            return None;
        }

        let (position, state) = self.transform.apply(event.dx, event.dy, self.axis_state);
        self.axis_state = state;
        Some(MappingEvent::RightStickChanged(position))
    }

    /// Re-centers the right stick.
    ///
    /// The smoothing state is kept, so the next motion continues from where
    /// the filter left off.
    #[must_use]
    pub fn reset_right_stick(&self) -> MappingEvent {
        MappingEvent::RightStickChanged(StickPosition::CENTER)
    }

    /// Current left stick position from the held axis keys.
    #[must_use]
    pub fn left_stick(&self) -> StickPosition {
        StickPosition::new(
            to_stick(self.axis_sum(StickAxis::X)),
            to_stick(self.axis_sum(StickAxis::Y)),
        )
    }

    fn axis_sum(&self, axis: StickAxis) -> f64 {
        self.active_keys
            .iter()
            .map(|code| self.bindings.contribution(*code, axis))
            .sum::<f64>()
            .clamp(-1.0, 1.0)
    }

    /// Binds `code` to a button.
    ///
    /// If `code` was held as an axis key it is released from the stick and the
    /// new left stick position is returned.
    pub fn bind_button(&mut self, code: u16, button: GamepadButton) -> Option<MappingEvent> {
        self.bindings.bind_button(code, button);
        self.release_rebound(code)
    }

    /// Binds `code` to a left stick contribution. See [`bind_button`](Self::bind_button).
    pub fn bind_axis(&mut self, code: u16, axis: StickAxis, direction: Direction) -> Option<MappingEvent> {
        self.bindings.bind_axis(code, axis, direction);
        self.release_rebound(code)
    }

    /// Removes the binding for `code`. See [`bind_button`](Self::bind_button).
    pub fn unbind(&mut self, code: u16) -> Option<MappingEvent> {
        self.bindings.unbind(code);
        self.release_rebound(code)
    }

    fn release_rebound(&mut self, code: u16) -> Option<MappingEvent> {
        if self.active_keys.remove(&code) {
            debug!("Key {} rebound while held", code);
            Some(MappingEvent::LeftStickChanged(self.left_stick()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn bindings(&self) -> &KeyBindingTable {
        &self.bindings
    }

    #[must_use]
    pub fn transform(&self) -> &AxisTransform {
        &self.transform
    }

    /// Mutable access to the mouse transform. Changes apply from the next event.
    pub fn transform_mut(&mut self) -> &mut AxisTransform {
        &mut self.transform
    }

    #[must_use]
    pub fn axis_state(&self) -> AxisState {
        self.axis_state
    }

    #[must_use]
    pub fn is_key_active(&self, code: u16) -> bool {
        self.active_keys.contains(&code)
    }
}
