//! # Key Binding Table
//!
//! Maps keyboard scan codes to controller inputs.
//!
//! A code is bound to at most one target: either a [`GamepadButton`] or a
//! signed contribution to one left-stick axis. Binding a code again replaces
//! whatever it was bound to.
//!
//! ## Default Layout
//!
//! | Key | Scan code | Target |
//! |-----|-----------|--------|
//! | W / S | 17 / 31 | Left stick Y +/- |
//! | D / A | 32 / 30 | Left stick X +/- |
//! | Space | 57 | A |
//! | Left Ctrl | 29 | B |
//! | R | 19 | X |
//! | 1 | 2 | Y |
//! | Tab | 15 | Back |
//! | Esc | 1 | Start |
//! | Q / E | 16 / 18 | Left / Right shoulder |
//! | Left Alt | 56 | D-Pad up |
//! | Caps Lock | 58 | D-Pad down |
//! | C | 46 | D-Pad left |
//! | 3 | 4 | D-Pad right |
//! | Left Shift | 42 | Left thumb |
//! | V | 47 | Right thumb |
//!
//! ## Usage
//!
//! ```
//! use gamepad_bridge::controller::GamepadButton;
//! use gamepad_bridge::mapping::bindings::{Direction, KeyBinding, KeyBindingTable, StickAxis};
//!
//! let mut table = KeyBindingTable::empty();
//! table.bind_button(57, GamepadButton::A);
//! table.bind_axis(17, StickAxis::Y, Direction::Positive);
//!
//! assert_eq!(table.lookup(57), Some(KeyBinding::Button(GamepadButton::A)));
//! table.unbind(57);
//! assert_eq!(table.lookup(57), None);
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::config::BindingsConfig;
use crate::controller::GamepadButton;
use crate::error::{GamepadError, Result};

/// Left-stick axis a key contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickAxis {
    X,
    Y,
}

/// Sign of an axis contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

impl TryFrom<i8> for Direction {
    type Error = GamepadError;

    fn try_from(value: i8) -> Result<Self> {
        match value {
            1 => Ok(Direction::Positive),
            -1 => Ok(Direction::Negative),
            other => Err(GamepadError::InvalidBinding(format!(
                "axis direction must be 1 or -1, got {}",
                other
            ))),
        }
    }
}

/// What a key code drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBinding {
    Button(GamepadButton),
    Axis { axis: StickAxis, direction: Direction },
}

/// Scan code to [`KeyBinding`] map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindingTable {
    bindings: HashMap<u16, KeyBinding>,
}

impl Default for KeyBindingTable {
    /// The WASD + mouse layout from the module docs.
    fn default() -> Self {
        let mut table = Self::empty();

        for (code, button) in [
            (57, GamepadButton::A),             // Space
            (29, GamepadButton::B),             // Left Ctrl
            (19, GamepadButton::X),             // R
            (2, GamepadButton::Y),              // 1
            (15, GamepadButton::Back),          // Tab
            (1, GamepadButton::Start),          // Esc
            (16, GamepadButton::LeftShoulder),  // Q
            (18, GamepadButton::RightShoulder), // E
            (56, GamepadButton::Up),            // Left Alt
            (58, GamepadButton::Down),          // Caps Lock
            (46, GamepadButton::Left),          // C
            (4, GamepadButton::Right),          // 3
            (42, GamepadButton::LeftThumb),     // Left Shift
            (47, GamepadButton::RightThumb),    // V
        ] {
            table.bind_button(code, button);
        }

        table.bind_axis(17, StickAxis::Y, Direction::Positive); // W
        table.bind_axis(31, StickAxis::Y, Direction::Negative); // S
        table.bind_axis(32, StickAxis::X, Direction::Positive); // D
        table.bind_axis(30, StickAxis::X, Direction::Negative); // A

        table
    }
}

impl KeyBindingTable {
    /// Creates a table with no bindings.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Builds a table from the `[bindings]` config section.
    ///
    /// Starts from the default layout when `use_defaults` is set, then applies
    /// button entries followed by axis entries.
    ///
    /// # Errors
    ///
    /// Returns [`GamepadError::InvalidBinding`] for an unknown button name or
    /// an axis direction other than 1 / -1.
    pub fn from_config(config: &BindingsConfig) -> Result<Self> {
        let mut table = if config.use_defaults {
            Self::default()
        } else {
            Self::empty()
        };

        for entry in &config.button {
            let button = entry.button.parse::<GamepadButton>()?;
            table.bind_button(entry.code, button);
        }

        for entry in &config.axis {
            let direction = Direction::try_from(entry.direction)?;
            table.bind_axis(entry.code, entry.axis, direction);
        }

        Ok(table)
    }

    /// Binds `code` to a button, replacing any previous binding.
    pub fn bind_button(&mut self, code: u16, button: GamepadButton) -> Option<KeyBinding> {
        debug!("Binding key {} to button {}", code, button);
        self.bindings.insert(code, KeyBinding::Button(button))
    }

    /// Binds `code` to a left-stick contribution, replacing any previous binding.
    pub fn bind_axis(&mut self, code: u16, axis: StickAxis, direction: Direction) -> Option<KeyBinding> {
        debug!("Binding key {} to axis {:?} {:?}", code, axis, direction);
        self.bindings.insert(code, KeyBinding::Axis { axis, direction })
    }

    /// Removes the binding for `code`. Unbound codes are ignored.
    pub fn unbind(&mut self, code: u16) -> Option<KeyBinding> {
        self.bindings.remove(&code)
    }

    #[must_use]
    pub fn lookup(&self, code: u16) -> Option<KeyBinding> {
        self.bindings.get(&code).copied()
    }

    #[must_use]
    pub fn is_bound(&self, code: u16) -> bool {
        self.bindings.contains_key(&code)
    }

    /// Signed contribution of `code` to `axis` (0.0 if it has none).
    #[must_use]
    pub fn contribution(&self, code: u16, axis: StickAxis) -> f64 {
        match self.lookup(code) {
            Some(KeyBinding::Axis { axis: bound, direction }) if bound == axis => direction.sign(),
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over bindings in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, KeyBinding)> + '_ {
        self.bindings.iter().map(|(code, binding)| (*code, *binding))
    }

    /// All bindings, sorted by scan code.
    #[must_use]
    pub fn entries(&self) -> Vec<(u16, KeyBinding)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by_key(|(code, _)| *code);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisBindingConfig, ButtonBindingConfig};

    // ==================== Default Layout Tests ====================

    #[test]
    fn test_default_layout() {
        let table = KeyBindingTable::default();
        assert_eq!(table.len(), 18);
        assert_eq!(table.lookup(57), Some(KeyBinding::Button(GamepadButton::A)));
        assert_eq!(table.lookup(47), Some(KeyBinding::Button(GamepadButton::RightThumb)));
        assert_eq!(
            table.lookup(17),
            Some(KeyBinding::Axis {
                axis: StickAxis::Y,
                direction: Direction::Positive
            })
        );
        assert_eq!(
            table.lookup(30),
            Some(KeyBinding::Axis {
                axis: StickAxis::X,
                direction: Direction::Negative
            })
        );
    }

    #[test]
    fn test_default_layout_leaves_hotkeys_unbound() {
        let table = KeyBindingTable::default();
        for code in [82, 25, 87, 67] {
            assert!(!table.is_bound(code), "hotkey {} must not be bound", code);
        }
    }

    // ==================== Mutation Tests ====================

    #[test]
    fn test_rebind_replaces_previous_binding() {
        let mut table = KeyBindingTable::empty();
        table.bind_axis(17, StickAxis::Y, Direction::Positive);
        let previous = table.bind_button(17, GamepadButton::B);

        assert!(matches!(previous, Some(KeyBinding::Axis { .. })));
        assert_eq!(table.lookup(17), Some(KeyBinding::Button(GamepadButton::B)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unbind_unknown_code_is_noop() {
        let mut table = KeyBindingTable::default();
        let before = table.clone();
        assert_eq!(table.unbind(999), None);
        assert_eq!(table, before);
    }

    #[test]
    fn test_contribution() {
        let table = KeyBindingTable::default();
        assert_eq!(table.contribution(17, StickAxis::Y), 1.0);
        assert_eq!(table.contribution(31, StickAxis::Y), -1.0);
        assert_eq!(table.contribution(17, StickAxis::X), 0.0);
        assert_eq!(table.contribution(57, StickAxis::Y), 0.0);
        assert_eq!(table.contribution(999, StickAxis::X), 0.0);
    }

    #[test]
    fn test_entries_sorted() {
        let table = KeyBindingTable::default();
        let codes: Vec<u16> = table.entries().iter().map(|(code, _)| *code).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_direction_try_from() {
        assert_eq!(Direction::try_from(1).unwrap(), Direction::Positive);
        assert_eq!(Direction::try_from(-1).unwrap(), Direction::Negative);
        assert!(matches!(Direction::try_from(0), Err(GamepadError::InvalidBinding(_))));
        assert!(matches!(Direction::try_from(2), Err(GamepadError::InvalidBinding(_))));
    }

    // ==================== Config Tests ====================

    #[test]
    fn test_from_config_overrides_defaults() {
        let config = BindingsConfig {
            use_defaults: true,
            button: vec![ButtonBindingConfig {
                code: 57,
                button: "B".to_string(),
            }],
            axis: vec![AxisBindingConfig {
                code: 72,
                axis: StickAxis::Y,
                direction: 1,
            }],
        };

        let table = KeyBindingTable::from_config(&config).unwrap();
        assert_eq!(table.lookup(57), Some(KeyBinding::Button(GamepadButton::B)));
        assert!(table.is_bound(72));
        assert!(table.is_bound(17));
    }

    #[test]
    fn test_from_config_without_defaults() {
        let config = BindingsConfig {
            use_defaults: false,
            button: vec![ButtonBindingConfig {
                code: 44,
                button: "Start".to_string(),
            }],
            axis: vec![],
        };

        let table = KeyBindingTable::from_config(&config).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.is_bound(17));
    }

    #[test]
    fn test_from_config_rejects_bad_entries() {
        let bad_button = BindingsConfig {
            use_defaults: false,
            button: vec![ButtonBindingConfig {
                code: 44,
                button: "Select".to_string(),
            }],
            axis: vec![],
        };
        assert!(matches!(
            KeyBindingTable::from_config(&bad_button),
            Err(GamepadError::InvalidBinding(_))
        ));

        let bad_axis = BindingsConfig {
            use_defaults: false,
            button: vec![],
            axis: vec![AxisBindingConfig {
                code: 44,
                axis: StickAxis::X,
                direction: 0,
            }],
        };
        assert!(matches!(
            KeyBindingTable::from_config(&bad_axis),
            Err(GamepadError::InvalidBinding(_))
        ));
    }
}
