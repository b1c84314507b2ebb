//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and key is optional; missing values fall back to the
//! defaults documented in `config/default.toml`.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GamepadError, Result};
use crate::mapping::bindings::{KeyBindingTable, StickAxis};
use crate::mapping::transform::AxisTransform;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub mapping: MappingConfig,
    #[serde(default)]
    pub hotkeys: HotkeyConfig,
    #[serde(default)]
    pub watchdog: WatchdogConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub bindings: BindingsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Mouse shaping and suppression
#[derive(Debug, Deserialize, Clone)]
pub struct MappingConfig {
    /// Percent of full range (0-100)
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f64,

    #[serde(default = "default_sensitivity")]
    pub horizontal_sensitivity: f64,

    #[serde(default = "default_sensitivity")]
    pub vertical_sensitivity: f64,

    #[serde(default = "default_exponential_curve")]
    pub exponential_curve: bool,

    /// Percent of the previous value kept on each update (0-100)
    #[serde(default = "default_noise_filter")]
    pub noise_filter: f64,

    #[serde(default)]
    pub reverse_mode: bool,

    #[serde(default = "default_block_keys")]
    pub block_keys: bool,
}

/// Hotkey scan codes
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyConfig {
    #[serde(default = "default_pause_key")]
    pub pause: u16,

    #[serde(default = "default_panic_key")]
    pub panic: u16,

    #[serde(default = "default_reverse_mode_key")]
    pub reverse_mode: u16,

    #[serde(default = "default_block_keys_key")]
    pub block_keys: u16,
}

/// Right stick re-centering
#[derive(Debug, Deserialize, Clone)]
pub struct WatchdogConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_inactivity_threshold_ms")]
    pub inactivity_threshold_ms: u64,
}

/// Session behaviour
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_start_paused")]
    pub start_paused: bool,

    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,
}

/// Key bindings
#[derive(Debug, Deserialize, Clone)]
pub struct BindingsConfig {
    /// Start from the built-in layout before applying the entries below
    #[serde(default = "default_use_defaults")]
    pub use_defaults: bool,

    #[serde(default)]
    pub button: Vec<ButtonBindingConfig>,

    #[serde(default)]
    pub axis: Vec<AxisBindingConfig>,
}

/// `[[bindings.button]]` entry
#[derive(Debug, Deserialize, Clone)]
pub struct ButtonBindingConfig {
    pub code: u16,
    pub button: String,
}

/// `[[bindings.axis]]` entry
#[derive(Debug, Deserialize, Clone)]
pub struct AxisBindingConfig {
    pub code: u16,
    pub axis: StickAxis,
    /// 1 or -1
    pub direction: i8,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enables a daily rolling log file in this directory
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

// Default value functions
fn default_dead_zone() -> f64 { 5.0 }
fn default_sensitivity() -> f64 { 1.0 }
fn default_exponential_curve() -> bool { true }
fn default_noise_filter() -> f64 { 15.0 }
fn default_block_keys() -> bool { true }

fn default_pause_key() -> u16 { 82 } // Insert
fn default_panic_key() -> u16 { 25 } // P
fn default_reverse_mode_key() -> u16 { 87 } // F11
fn default_block_keys_key() -> u16 { 67 } // F9

fn default_poll_interval_ms() -> u64 { 50 }
fn default_inactivity_threshold_ms() -> u64 { 50 }

fn default_start_paused() -> bool { true }
fn default_notification_capacity() -> usize { 256 }

fn default_use_defaults() -> bool { true }

fn default_log_level() -> String { "info".to_string() }

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            dead_zone: default_dead_zone(),
            horizontal_sensitivity: default_sensitivity(),
            vertical_sensitivity: default_sensitivity(),
            exponential_curve: default_exponential_curve(),
            noise_filter: default_noise_filter(),
            reverse_mode: false,
            block_keys: default_block_keys(),
        }
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            pause: default_pause_key(),
            panic: default_panic_key(),
            reverse_mode: default_reverse_mode_key(),
            block_keys: default_block_keys_key(),
        }
    }
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            inactivity_threshold_ms: default_inactivity_threshold_ms(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_paused: default_start_paused(),
            notification_capacity: default_notification_capacity(),
        }
    }
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            use_defaults: default_use_defaults(),
            button: Vec::new(),
            axis: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

impl MappingConfig {
    /// Mouse transform described by this section.
    #[must_use]
    pub fn transform(&self) -> AxisTransform {
        AxisTransform {
            dead_zone: self.dead_zone,
            horizontal_sensitivity: self.horizontal_sensitivity,
            vertical_sensitivity: self.vertical_sensitivity,
            exponential_curve: self.exponential_curve,
            noise_filter: self.noise_filter,
            reverse_mode: self.reverse_mode,
        }
    }
}

impl HotkeyConfig {
    /// All hotkey codes, in `pause, panic, reverse_mode, block_keys` order.
    #[must_use]
    pub fn codes(&self) -> [u16; 4] {
        [self.pause, self.panic, self.reverse_mode, self.block_keys]
    }
}

impl WatchdogConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn inactivity_threshold(&self) -> Duration {
        Duration::from_millis(self.inactivity_threshold_ms)
    }
}

fn invalid(message: impl std::fmt::Display) -> GamepadError {
    GamepadError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gamepad_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails
    ///
    /// # Examples
    ///
    /// ```
    /// use gamepad_bridge::config::Config;
    ///
    /// let config = Config::from_toml("[mapping]\ndead_zone = 10.0\n")?;
    /// assert_eq!(config.mapping.dead_zone, 10.0);
    /// assert_eq!(config.hotkeys.pause, 82);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the binding table described by `[bindings]`.
    ///
    /// # Errors
    ///
    /// Returns [`GamepadError::InvalidBinding`] for unknown buttons or bad directions
    pub fn key_bindings(&self) -> Result<KeyBindingTable> {
        KeyBindingTable::from_config(&self.bindings)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Mapping percentages
        for (name, value) in [
            ("dead_zone", self.mapping.dead_zone),
            ("noise_filter", self.mapping.noise_filter),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(invalid(format!("{} must be between 0 and 100", name)));
            }
        }

        for (name, value) in [
            ("horizontal_sensitivity", self.mapping.horizontal_sensitivity),
            ("vertical_sensitivity", self.mapping.vertical_sensitivity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{} must be a non-negative number", name)));
            }
        }

        // Hotkeys must not shadow each other
        let codes = self.hotkeys.codes();
        for (i, code) in codes.iter().enumerate() {
            if codes[i + 1..].contains(code) {
                return Err(invalid(format!("hotkey code {} is assigned more than once", code)));
            }
        }

        // Watchdog timing
        if self.watchdog.poll_interval_ms == 0 || self.watchdog.poll_interval_ms > 1000 {
            return Err(invalid("poll_interval_ms must be between 1 and 1000"));
        }

        if self.watchdog.inactivity_threshold_ms == 0 || self.watchdog.inactivity_threshold_ms > 5000 {
            return Err(invalid("inactivity_threshold_ms must be between 1 and 5000"));
        }

        if self.session.notification_capacity == 0 {
            return Err(invalid("notification_capacity must be greater than 0"));
        }

        if self.logging.level.trim().is_empty() {
            return Err(invalid("logging level cannot be empty"));
        }

        // Bindings, which must leave the hotkeys alone
        let bindings = self.key_bindings().map_err(invalid)?;
        if let Some(code) = codes.iter().find(|code| bindings.is_bound(**code)) {
            return Err(invalid(format!("key {} is bound but also used as a hotkey", code)));
        }

        Ok(())
    }
}
