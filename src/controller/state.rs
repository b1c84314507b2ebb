//! # Virtual Controller State
//!
//! Buttons, axes and a snapshot of everything the virtual pad currently
//! reports.
//!
//! ## Axis Values
//!
//! | Axis | Range | Center |
//! |------|-------|--------|
//! | Thumb sticks | -32767..=32767 | 0 |
//! | Triggers | 0..=255 | 0 |
//!
//! ## Usage
//!
//! ```
//! use gamepad_bridge::controller::{GamepadAxis, GamepadButton, GamepadState};
//!
//! let mut state = GamepadState::new();
//! state.set_button(GamepadButton::A, true);
//! state.set_axis(GamepadAxis::LeftThumbY, 32767);
//!
//! assert!(state.is_pressed(GamepadButton::A));
//! assert!(state.any_stick_moved(1000));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::GamepadError;

/// Full deflection of a thumb stick axis.
pub const STICK_MAX: i16 = i16::MAX;

/// Center value of a thumb stick axis.
pub const STICK_CENTER: i16 = 0;

/// Digital buttons of the virtual controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GamepadButton {
    A,
    B,
    X,
    Y,
    Start,
    Back,
    LeftShoulder,
    RightShoulder,
    LeftThumb,
    RightThumb,
    /// D-Pad up.
    Up,
    /// D-Pad down.
    Down,
    /// D-Pad left.
    Left,
    /// D-Pad right.
    Right,
}

impl GamepadButton {
    /// Every button, in report order.
    pub const ALL: [GamepadButton; 14] = [
        GamepadButton::A,
        GamepadButton::B,
        GamepadButton::X,
        GamepadButton::Y,
        GamepadButton::Start,
        GamepadButton::Back,
        GamepadButton::LeftShoulder,
        GamepadButton::RightShoulder,
        GamepadButton::LeftThumb,
        GamepadButton::RightThumb,
        GamepadButton::Up,
        GamepadButton::Down,
        GamepadButton::Left,
        GamepadButton::Right,
    ];

    /// Canonical name, as accepted by [`FromStr`] and used in config files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            GamepadButton::A => "A",
            GamepadButton::B => "B",
            GamepadButton::X => "X",
            GamepadButton::Y => "Y",
            GamepadButton::Start => "Start",
            GamepadButton::Back => "Back",
            GamepadButton::LeftShoulder => "LeftShoulder",
            GamepadButton::RightShoulder => "RightShoulder",
            GamepadButton::LeftThumb => "LeftThumb",
            GamepadButton::RightThumb => "RightThumb",
            GamepadButton::Up => "Up",
            GamepadButton::Down => "Down",
            GamepadButton::Left => "Left",
            GamepadButton::Right => "Right",
        }
    }
}

impl fmt::Display for GamepadButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GamepadButton {
    type Err = GamepadError;

    /// Parses a button name case-insensitively, ignoring `_` and `-`
    /// (`"left_shoulder"`, `"LeftShoulder"` and `"left-shoulder"` are equal).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        GamepadButton::ALL
            .into_iter()
            .find(|button| button.name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| GamepadError::InvalidBinding(format!("unknown gamepad button '{}'", s)))
    }
}

/// Analog axes of the virtual controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadAxis {
    LeftThumbX,
    LeftThumbY,
    RightThumbX,
    RightThumbY,
    LeftTrigger,
    RightTrigger,
}

/// Everything the virtual pad currently reports.
///
/// Output devices keep one of these and update it from
/// [`GamepadOutput`](super::GamepadOutput) calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GamepadState {
    pressed: BTreeSet<GamepadButton>,
    /// Left stick X. -32767 = full left, 32767 = full right.
    pub left_thumb_x: i16,
    /// Left stick Y. -32767 = full down, 32767 = full up.
    pub left_thumb_y: i16,
    /// Right stick X.
    pub right_thumb_x: i16,
    /// Right stick Y.
    pub right_thumb_y: i16,
    /// Left trigger (0-255).
    pub left_trigger: i16,
    /// Right trigger (0-255).
    pub right_trigger: i16,
}

impl GamepadState {
    /// Creates a state with sticks centered and nothing pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_button(&mut self, button: GamepadButton, pressed: bool) {
        if pressed {
            self.pressed.insert(button);
        } else {
            self.pressed.remove(&button);
        }
    }

    #[must_use]
    pub fn is_pressed(&self, button: GamepadButton) -> bool {
        self.pressed.contains(&button)
    }

    pub fn set_axis(&mut self, axis: GamepadAxis, value: i16) {
        match axis {
            GamepadAxis::LeftThumbX => self.left_thumb_x = value,
            GamepadAxis::LeftThumbY => self.left_thumb_y = value,
            GamepadAxis::RightThumbX => self.right_thumb_x = value,
            GamepadAxis::RightThumbY => self.right_thumb_y = value,
            GamepadAxis::LeftTrigger => self.left_trigger = value,
            GamepadAxis::RightTrigger => self.right_trigger = value,
        }
    }

    #[must_use]
    pub fn axis(&self, axis: GamepadAxis) -> i16 {
        match axis {
            GamepadAxis::LeftThumbX => self.left_thumb_x,
            GamepadAxis::LeftThumbY => self.left_thumb_y,
            GamepadAxis::RightThumbX => self.right_thumb_x,
            GamepadAxis::RightThumbY => self.right_thumb_y,
            GamepadAxis::LeftTrigger => self.left_trigger,
            GamepadAxis::RightTrigger => self.right_trigger,
        }
    }

    /// Checks if any stick is deflected further than `threshold` from center.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamepad_bridge::controller::GamepadState;
    ///
    /// let mut state = GamepadState::new();
    /// assert!(!state.any_stick_moved(1000));
    ///
    /// state.right_thumb_x = -4000;
    /// assert!(state.any_stick_moved(1000));
    /// ```
    #[must_use]
    pub fn any_stick_moved(&self, threshold: i16) -> bool {
        [
            self.left_thumb_x,
            self.left_thumb_y,
            self.right_thumb_x,
            self.right_thumb_y,
        ]
        .iter()
        .any(|value| value.unsigned_abs() > threshold.unsigned_abs())
    }

    #[must_use]
    pub fn any_button_pressed(&self) -> bool {
        !self.pressed.is_empty()
    }

    /// Buttons currently held, in report order.
    pub fn pressed_buttons(&self) -> impl Iterator<Item = GamepadButton> + '_ {
        self.pressed.iter().copied()
    }
}
