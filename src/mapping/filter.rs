//! # Filter Policy
//!
//! Decides which captured events are hidden from the operating system.
//!
//! Suppression is independent of mapping: a blocked event is still handed to
//! the [`MappingEngine`](super::engine::MappingEngine), and an event that is
//! let through is mapped all the same.

use std::collections::HashSet;

use super::bindings::KeyBindingTable;
use crate::capture::{RawKeyEvent, RawMouseEvent};

/// Event suppression rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPolicy {
    blocking_enabled: bool,
    /// Hotkey codes, blocked whenever blocking is on.
    reserved: HashSet<u16>,
}

impl FilterPolicy {
    /// Creates a policy.
    ///
    /// # Arguments
    ///
    /// * `blocking_enabled` - Whether suppression is active at all
    /// * `reserved` - Codes that are blocked even though they are not bound
    ///
    /// # Examples
    ///
    /// ```
    /// use gamepad_bridge::capture::RawKeyEvent;
    /// use gamepad_bridge::mapping::bindings::KeyBindingTable;
    /// use gamepad_bridge::mapping::filter::FilterPolicy;
    ///
    /// let bindings = KeyBindingTable::default();
    /// let policy = FilterPolicy::new(true, [82]);
    ///
    /// assert!(policy.should_block_key(&RawKeyEvent::pressed(57), &bindings)); // bound
    /// assert!(policy.should_block_key(&RawKeyEvent::pressed(82), &bindings)); // hotkey
    /// assert!(!policy.should_block_key(&RawKeyEvent::pressed(100), &bindings));
    /// ```
    #[must_use]
    pub fn new(blocking_enabled: bool, reserved: impl IntoIterator<Item = u16>) -> Self {
        Self {
            blocking_enabled,
            reserved: reserved.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn should_block_key(&self, event: &RawKeyEvent, bindings: &KeyBindingTable) -> bool {
        self.blocking_enabled && (bindings.is_bound(event.code) || self.reserved.contains(&event.code))
    }

    /// Pure motion is blocked; anything carrying click flags goes through.
    #[must_use]
    pub fn should_block_mouse(&self, event: &RawMouseEvent) -> bool {
        self.blocking_enabled && event.has_motion() && event.button_flags == 0
    }

    #[must_use]
    pub fn blocking_enabled(&self) -> bool {
        self.blocking_enabled
    }

    pub fn set_blocking_enabled(&mut self, enabled: bool) {
        self.blocking_enabled = enabled;
    }

    #[must_use]
    pub fn is_reserved(&self, code: u16) -> bool {
        self.reserved.contains(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::GamepadButton;

    fn policy(enabled: bool) -> FilterPolicy {
        FilterPolicy::new(enabled, [82, 87])
    }

    // ==================== Key Tests ====================

    #[test]
    fn test_bound_key_is_blocked() {
        let mut bindings = KeyBindingTable::empty();
        bindings.bind_button(25, GamepadButton::Start);

        assert!(policy(true).should_block_key(&RawKeyEvent::pressed(25), &bindings));
        assert!(policy(true).should_block_key(&RawKeyEvent::released(25), &bindings));
    }

    #[test]
    fn test_unbound_key_passes() {
        let bindings = KeyBindingTable::default();
        assert!(!policy(true).should_block_key(&RawKeyEvent::pressed(100), &bindings));
    }

    #[test]
    fn test_reserved_key_is_blocked() {
        let bindings = KeyBindingTable::empty();
        assert!(policy(true).should_block_key(&RawKeyEvent::pressed(87), &bindings));
    }

    #[test]
    fn test_disabled_blocks_nothing() {
        let bindings = KeyBindingTable::default();
        let policy = policy(false);

        assert!(!policy.should_block_key(&RawKeyEvent::pressed(57), &bindings));
        assert!(!policy.should_block_key(&RawKeyEvent::pressed(82), &bindings));
        assert!(!policy.should_block_mouse(&RawMouseEvent::motion(10, 10)));
    }

    #[test]
    fn test_toggle_blocking() {
        let bindings = KeyBindingTable::default();
        let mut policy = policy(true);

        policy.set_blocking_enabled(false);
        assert!(!policy.blocking_enabled());
        assert!(!policy.should_block_key(&RawKeyEvent::pressed(57), &bindings));

        policy.set_blocking_enabled(true);
        assert!(policy.should_block_key(&RawKeyEvent::pressed(57), &bindings));
    }

    // ==================== Mouse Tests ====================

    #[test]
    fn test_motion_is_blocked() {
        assert!(policy(true).should_block_mouse(&RawMouseEvent::motion(0, -3)));
    }

    #[test]
    fn test_clicks_pass() {
        let policy = policy(true);
        assert!(!policy.should_block_mouse(&RawMouseEvent::buttons(0x01)));

        let drag = RawMouseEvent {
            dx: 5,
            dy: 5,
            button_flags: 0x02,
            device_info: 0,
        };
        assert!(!policy.should_block_mouse(&drag));
    }

    #[test]
    fn test_zero_motion_passes() {
        assert!(!policy(true).should_block_mouse(&RawMouseEvent::motion(0, 0)));
    }
}
