//! # Orchestrator
//!
//! Owns the input capture, the mapping engine and the virtual controller, and
//! runs the session around them.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --initialize()--> Initialized --start()--> Running <--> Paused
//!                                                    ^          |
//!                                                    +-stop()---+--> Stopped
//! ```
//!
//! While running, the capture backend delivers events on its own task and the
//! inactivity watchdog polls on another. Both serialize through a single lock,
//! so events, setter calls and watchdog resets never interleave.
//!
//! ## Hotkeys
//!
//! | Default key | Scan code | Action |
//! |-------------|-----------|--------|
//! | Insert | 82 | Pause / resume |
//! | P | 25 | Panic (stop everything) |
//! | F11 | 87 | Toggle reverse mode |
//! | F9 | 67 | Toggle key blocking |
//!
//! Hotkeys act on the press edge. Their release edges are swallowed.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use gamepad_bridge::capture::mock::MockInputCapture;
//! use gamepad_bridge::config::Config;
//! use gamepad_bridge::controller::console::ConsoleGamepad;
//! use gamepad_bridge::orchestrator::{Orchestrator, OrchestratorState};
//!
//! # tokio_test::block_on(async {
//! let capture = Arc::new(MockInputCapture::new());
//! let orchestrator = Orchestrator::new(capture, Box::new(ConsoleGamepad::new()), &Config::default())?;
//!
//! orchestrator.initialize()?;
//! orchestrator.start().await?;
//! assert_eq!(orchestrator.state(), OrchestratorState::Paused);
//!
//! orchestrator.set_paused(false);
//! assert_eq!(orchestrator.state(), OrchestratorState::Running);
//!
//! orchestrator.stop().await;
//! assert_eq!(orchestrator.state(), OrchestratorState::Stopped);
//! # Ok::<(), gamepad_bridge::error::GamepadError>(())
//! # })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod watchdog;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::capture::{InputCapture, InputHandler, RawKeyEvent, RawMouseEvent};
use crate::config::{Config, HotkeyConfig};
use crate::controller::{GamepadAxis, GamepadButton, GamepadOutput};
use crate::error::{GamepadError, Result};
use crate::mapping::{
    AxisTransform, Direction, FilterPolicy, KeyBindingTable, MappingEngine, MappingEvent, StickAxis,
    StickPosition,
};
use watchdog::InactivityWatchdog;

/// Externally visible session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Uninitialized,
    Initialized,
    Running,
    /// Running with forwarding suspended.
    Paused,
    Stopped,
}

/// Messages broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A user-facing log line.
    Log(String),
    RunningChanged(bool),
    PausedChanged(bool),
    ReverseModeToggled(bool),
    BlockKeysToggled(bool),
    /// The panic hotkey or [`Orchestrator::panic`] stopped the session.
    Panic,
    ButtonChanged { button: GamepadButton, pressed: bool },
    LeftStickChanged(StickPosition),
    RightStickChanged(StickPosition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Initialized,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hotkey {
    Pause,
    Panic,
    ReverseMode,
    BlockKeys,
}

impl Hotkey {
    fn from_code(hotkeys: &HotkeyConfig, code: u16) -> Option<Self> {
        if code == hotkeys.pause {
            Some(Hotkey::Pause)
        } else if code == hotkeys.panic {
            Some(Hotkey::Panic)
        } else if code == hotkeys.reverse_mode {
            Some(Hotkey::ReverseMode)
        } else if code == hotkeys.block_keys {
            Some(Hotkey::BlockKeys)
        } else {
            None
        }
    }
}

/// Background tasks of a running session.
struct Workers {
    cancel: CancellationToken,
    capture_task: JoinHandle<()>,
    watchdog_task: JoinHandle<()>,
}

impl Workers {
    async fn join(self) {
        for (name, task) in [("capture", self.capture_task), ("watchdog", self.watchdog_task)] {
            if let Err(e) = task.await {
                warn!("The {} task ended abnormally: {}", name, e);
            }
        }
    }
}

/// Everything guarded by the session lock.
struct Core {
    phase: Phase,
    paused: bool,
    engine: MappingEngine,
    filter: FilterPolicy,
    output: Box<dyn GamepadOutput>,
    watchdog: InactivityWatchdog,
    key_capture: Option<oneshot::Sender<u16>>,
    workers: Option<Workers>,
    /// Joins the workers of a session ended by the panic hotkey.
    draining: Option<JoinHandle<()>>,
}

impl Core {
    /// Moves a running session to `Stopped` and cancels its workers.
    fn halt(&mut self) -> Option<Workers> {
        if self.phase != Phase::Running {
            return None;
        }
        self.phase = Phase::Stopped;
        let workers = self.workers.take();
        if let Some(workers) = &workers {
            workers.cancel.cancel();
        }
        workers
    }
}

struct Shared {
    capture: Arc<dyn InputCapture>,
    core: Mutex<Core>,
    notifier: broadcast::Sender<Notification>,
    hotkeys: HotkeyConfig,
    poll_interval: Duration,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, notification: Notification) {
        // No subscribers is fine
        let _ = self.notifier.send(notification);
    }

    fn announce(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.notify(Notification::Log(message));
    }

    fn report(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.notify(Notification::Log(message));
    }

    fn raise_panic(&self) {
        let message = "PANIC: all input processing stopped";
        error!("{}", message);
        self.notify(Notification::Log(message.to_string()));
        self.notify(Notification::Panic);
    }

    fn stopped(&self) {
        self.notify(Notification::RunningChanged(false));
        self.announce("Input monitoring stopped");
    }

    /// Waits for a session ended from the capture task to wind down.
    async fn finish_draining(&self) {
        let draining = self.lock().draining.take();
        if let Some(draining) = draining {
            if let Err(e) = draining.await {
                warn!("The drain task ended abnormally: {}", e);
            }
        }
    }

    /// Sends a mapping result to the virtual controller unless paused.
    fn forward(&self, core: &mut Core, event: MappingEvent) {
        if core.paused {
            return;
        }

        let output = core.output.as_mut();
        let (result, notification) = match event {
            MappingEvent::ButtonStateChanged { button, pressed } => (
                send_button(output, button, pressed),
                Notification::ButtonChanged { button, pressed },
            ),
            MappingEvent::LeftStickChanged(position) => (
                send_stick(output, GamepadAxis::LeftThumbX, GamepadAxis::LeftThumbY, position),
                Notification::LeftStickChanged(position),
            ),
            MappingEvent::RightStickChanged(position) => (
                send_stick(output, GamepadAxis::RightThumbX, GamepadAxis::RightThumbY, position),
                Notification::RightStickChanged(position),
            ),
        };

        match result {
            Ok(()) => self.notify(notification),
            Err(e) => self.report(format!("Failed to update virtual gamepad: {}", e)),
        }
    }

    fn set_paused(&self, core: &mut Core, paused: bool) {
        if core.paused == paused {
            return;
        }
        core.paused = paused;
        self.notify(Notification::PausedChanged(paused));
        self.announce(if paused {
            "Input processing paused"
        } else {
            "Input processing resumed"
        });
    }

    fn set_reverse_mode(&self, core: &mut Core, enabled: bool) {
        let transform = core.engine.transform_mut();
        if transform.reverse_mode == enabled {
            return;
        }
        transform.reverse_mode = enabled;
        self.notify(Notification::ReverseModeToggled(enabled));
        self.announce(format!("Reverse mode {}", if enabled { "enabled" } else { "disabled" }));
    }

    fn set_block_keys(&self, core: &mut Core, enabled: bool) {
        if core.filter.blocking_enabled() == enabled {
            return;
        }
        core.filter.set_blocking_enabled(enabled);
        self.notify(Notification::BlockKeysToggled(enabled));
        self.announce(format!("Key blocking {}", if enabled { "enabled" } else { "disabled" }));
    }

    fn watchdog_tick(&self, now: Instant) {
        let mut core = self.lock();
        if core.phase != Phase::Running || core.paused {
            return;
        }
        if core.watchdog.poll(now) {
            debug!("Mouse idle, re-centering right stick");
            let event = core.engine.reset_right_stick();
            self.forward(&mut core, event);
        }
    }
}

fn send_button(output: &mut dyn GamepadOutput, button: GamepadButton, pressed: bool) -> Result<()> {
    output.set_button_state(button, pressed)?;
    output.submit_report()
}

fn send_stick(
    output: &mut dyn GamepadOutput,
    x_axis: GamepadAxis,
    y_axis: GamepadAxis,
    position: StickPosition,
) -> Result<()> {
    output.set_axis_value(x_axis, position.x)?;
    output.set_axis_value(y_axis, position.y)?;
    output.submit_report()
}

/// The [`InputHandler`] handed to the capture backend.
struct EventRouter {
    shared: Arc<Shared>,
}

impl EventRouter {
    fn run_hotkey(&self, core: &mut Core, hotkey: Hotkey) {
        debug!("Hotkey {:?}", hotkey);
        match hotkey {
            Hotkey::Pause => {
                let paused = !core.paused;
                self.shared.set_paused(core, paused);
            }
            Hotkey::ReverseMode => {
                let enabled = !core.engine.transform().reverse_mode;
                self.shared.set_reverse_mode(core, enabled);
            }
            Hotkey::BlockKeys => {
                let enabled = !core.filter.blocking_enabled();
                self.shared.set_block_keys(core, enabled);
            }
            Hotkey::Panic => {
                // We are on the capture task, which cannot await itself.
                // The join is handed to `stop()` and `start()` through `draining`.
                let Some(workers) = core.halt() else {
                    self.shared.raise_panic();
                    return;
                };
                match Handle::try_current() {
                    Ok(handle) => {
                        let shared = Arc::clone(&self.shared);
                        core.draining = Some(handle.spawn(async move {
                            workers.join().await;
                            shared.stopped();
                            shared.raise_panic();
                        }));
                    }
                    Err(_) => {
                        self.shared.stopped();
                        self.shared.raise_panic();
                    }
                }
            }
        }
    }
}

impl InputHandler for EventRouter {
    fn should_block_key(&self, event: &RawKeyEvent) -> bool {
        let core = self.shared.lock();
        core.filter.should_block_key(event, core.engine.bindings())
    }

    fn should_block_mouse(&self, event: &RawMouseEvent) -> bool {
        self.shared.lock().filter.should_block_mouse(event)
    }

    fn on_key(&self, event: RawKeyEvent) {
        let mut core = self.shared.lock();

        if event.is_press() {
            if let Some(sender) = core.key_capture.take() {
                if sender.send(event.code).is_ok() {
                    self.shared.announce(format!("Captured key code {}", event.code));
                    return;
                }
                debug!("Key capture was abandoned");
            }
        }

        if let Some(hotkey) = Hotkey::from_code(&self.shared.hotkeys, event.code) {
            if event.is_press() {
                self.run_hotkey(&mut core, hotkey);
            }
            return;
        }

        if let Some(mapped) = core.engine.handle_key(&event) {
            self.shared.forward(&mut core, mapped);
        }
    }

    fn on_mouse(&self, event: RawMouseEvent) {
        let mut core = self.shared.lock();

        if event.has_motion() {
            core.watchdog.record_motion(Instant::now());
        }

        if let Some(mapped) = core.engine.handle_mouse(&event) {
            self.shared.forward(&mut core, mapped);
        }
    }
}

/// Runs a keyboard/mouse to gamepad session.
///
/// Dropping the orchestrator cancels any running workers and disconnects the
/// virtual controller.
pub struct Orchestrator {
    shared: Arc<Shared>,
}

impl Orchestrator {
    /// Creates an orchestrator from its collaborators and configuration.
    ///
    /// # Arguments
    ///
    /// * `capture` - Source of raw keyboard and mouse events
    /// * `output` - Virtual controller driver
    /// * `config` - Mapping, hotkey, watchdog, session and binding settings
    ///
    /// # Errors
    ///
    /// Returns [`GamepadError::InvalidBinding`] if the configured bindings are
    /// invalid or bind a hotkey code
    pub fn new(capture: Arc<dyn InputCapture>, output: Box<dyn GamepadOutput>, config: &Config) -> Result<Self> {
        let bindings = config.key_bindings()?;
        if let Some(code) = config.hotkeys.codes().into_iter().find(|code| bindings.is_bound(*code)) {
            return Err(GamepadError::InvalidBinding(format!(
                "key {} is both bound and reserved for a hotkey",
                code
            )));
        }
        let engine = MappingEngine::new(bindings, config.mapping.transform());
        let filter = FilterPolicy::new(config.mapping.block_keys, config.hotkeys.codes());
        let (notifier, _) = broadcast::channel(config.session.notification_capacity.max(1));

        let core = Core {
            phase: Phase::Uninitialized,
            paused: config.session.start_paused,
            engine,
            filter,
            output,
            watchdog: InactivityWatchdog::new(config.watchdog.inactivity_threshold()),
            key_capture: None,
            workers: None,
            draining: None,
        };

        Ok(Self {
            shared: Arc::new(Shared {
                capture,
                core: Mutex::new(core),
                notifier,
                hotkeys: config.hotkeys,
                poll_interval: config.watchdog.poll_interval(),
            }),
        })
    }

    // ==================== Lifecycle ====================

    /// Opens the capture driver and connects the virtual controller.
    ///
    /// Does nothing once initialized.
    ///
    /// # Errors
    ///
    /// Returns [`GamepadError::Initialization`] if either collaborator fails;
    /// the orchestrator then stays uninitialized.
    pub fn initialize(&self) -> Result<()> {
        let mut core = self.shared.lock();
        if core.phase != Phase::Uninitialized {
            debug!("Already initialized");
            return Ok(());
        }

        if let Err(e) = self.shared.capture.initialize() {
            return Err(self.initialization_failed("input capture", e));
        }
        if let Err(e) = core.output.initialize() {
            return Err(self.initialization_failed("virtual gamepad", e));
        }

        core.phase = Phase::Initialized;
        self.shared.announce("Input capture and virtual gamepad initialized");
        Ok(())
    }

    fn initialization_failed(&self, what: &str, e: GamepadError) -> GamepadError {
        let message = format!("Failed to initialize {}: {}", what, e);
        error!("{}", message);
        self.shared.notify(Notification::Log(message));
        match e {
            GamepadError::Initialization(_) => e,
            other => GamepadError::Initialization(other.to_string()),
        }
    }

    /// Starts the capture and watchdog tasks.
    ///
    /// Does nothing if already running. A stopped session can be started again
    /// once its previous monitoring loop has exited.
    ///
    /// # Errors
    ///
    /// Returns [`GamepadError::NotInitialized`] before [`initialize`](Self::initialize)
    pub async fn start(&self) -> Result<()> {
        self.shared.finish_draining().await;

        let mut core = self.shared.lock();
        match core.phase {
            Phase::Uninitialized => return Err(GamepadError::NotInitialized),
            Phase::Running => {
                debug!("Already running");
                return Ok(());
            }
            Phase::Initialized | Phase::Stopped => {}
        }

        let cancel = CancellationToken::new();

        let capture_task = {
            let capture = Arc::clone(&self.shared.capture);
            let shared = Arc::clone(&self.shared);
            let handler: Arc<dyn InputHandler> = Arc::new(EventRouter {
                shared: Arc::clone(&self.shared),
            });
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if let Err(e) = capture.start_monitoring(handler, cancel).await {
                    shared.report(format!("Input monitoring failed: {}", e));
                }
            })
        };

        let watchdog_task = {
            let shared = Arc::clone(&self.shared);
            tokio::spawn(watchdog::run(self.shared.poll_interval, cancel.clone(), move |now| {
                shared.watchdog_tick(now)
            }))
        };

        core.workers = Some(Workers {
            cancel,
            capture_task,
            watchdog_task,
        });
        core.phase = Phase::Running;
        drop(core);

        self.shared.notify(Notification::RunningChanged(true));
        self.shared.announce("Input monitoring started");
        Ok(())
    }

    /// Cancels the workers and waits for them to finish.
    ///
    /// After a panic hotkey this still waits for the old monitoring loop to
    /// exit. Does nothing otherwise if not running.
    pub async fn stop(&self) {
        self.shared.finish_draining().await;

        let workers = self.shared.lock().halt();
        if let Some(workers) = workers {
            workers.join().await;
            self.shared.stopped();
        }
    }

    /// Stops everything and raises [`Notification::Panic`].
    pub async fn panic(&self) {
        self.stop().await;
        self.shared.raise_panic();
    }

    #[must_use]
    pub fn state(&self) -> OrchestratorState {
        let core = self.shared.lock();
        match core.phase {
            Phase::Uninitialized => OrchestratorState::Uninitialized,
            Phase::Initialized => OrchestratorState::Initialized,
            Phase::Running if core.paused => OrchestratorState::Paused,
            Phase::Running => OrchestratorState::Running,
            Phase::Stopped => OrchestratorState::Stopped,
        }
    }

    // ==================== Settings ====================

    /// Suspends or resumes forwarding to the virtual controller.
    pub fn set_paused(&self, paused: bool) {
        let mut core = self.shared.lock();
        self.shared.set_paused(&mut core, paused);
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.shared.lock().paused
    }

    /// Sets the mouse dead zone in percent, clamped to 0-100.
    pub fn set_dead_zone(&self, percent: f64) {
        let value = clamp_percent(percent);
        self.shared.lock().engine.transform_mut().dead_zone = value;
        self.shared.announce(format!("Dead zone set to {:.1}%", value));
    }

    /// Sets the horizontal sensitivity multiplier (negative values become 0).
    ///
    /// NaN and infinite values are rejected and the current value is kept.
    pub fn set_horizontal_sensitivity(&self, sensitivity: f64) {
        let Some(value) = self.checked_sensitivity("Horizontal", sensitivity) else {
            return;
        };
        self.shared.lock().engine.transform_mut().horizontal_sensitivity = value;
        self.shared.announce(format!("Horizontal sensitivity set to {:.2}", value));
    }

    /// Sets the vertical sensitivity multiplier (negative values become 0).
    ///
    /// NaN and infinite values are rejected and the current value is kept.
    pub fn set_vertical_sensitivity(&self, sensitivity: f64) {
        let Some(value) = self.checked_sensitivity("Vertical", sensitivity) else {
            return;
        };
        self.shared.lock().engine.transform_mut().vertical_sensitivity = value;
        self.shared.announce(format!("Vertical sensitivity set to {:.2}", value));
    }

    fn checked_sensitivity(&self, which: &str, sensitivity: f64) -> Option<f64> {
        if sensitivity.is_finite() {
            Some(sensitivity.max(0.0))
        } else {
            self.shared
                .report(format!("{} sensitivity must be a finite number, got {}", which, sensitivity));
            None
        }
    }

    pub fn set_exponential_curve(&self, enabled: bool) {
        self.shared.lock().engine.transform_mut().exponential_curve = enabled;
        self.shared.announce(format!(
            "Exponential curve {}",
            if enabled { "enabled" } else { "disabled" }
        ));
    }

    /// Sets the noise filter strength in percent, clamped to 0-100.
    pub fn set_noise_filter(&self, percent: f64) {
        let value = clamp_percent(percent);
        self.shared.lock().engine.transform_mut().noise_filter = value;
        self.shared.announce(format!("Noise filter set to {:.1}%", value));
    }

    pub fn set_reverse_mode(&self, enabled: bool) {
        let mut core = self.shared.lock();
        self.shared.set_reverse_mode(&mut core, enabled);
    }

    pub fn set_block_keys(&self, enabled: bool) {
        let mut core = self.shared.lock();
        self.shared.set_block_keys(&mut core, enabled);
    }

    #[must_use]
    pub fn block_keys(&self) -> bool {
        self.shared.lock().filter.blocking_enabled()
    }

    /// Current mouse transform settings.
    #[must_use]
    pub fn transform(&self) -> AxisTransform {
        *self.shared.lock().engine.transform()
    }

    // ==================== Bindings ====================

    /// Binds `code` to `button`, replacing any previous binding.
    ///
    /// # Errors
    ///
    /// Returns [`GamepadError::InvalidBinding`] if `code` is a hotkey
    pub fn bind_button(&self, code: u16, button: GamepadButton) -> Result<()> {
        self.check_bindable(code)?;
        let mut core = self.shared.lock();
        if let Some(event) = core.engine.bind_button(code, button) {
            self.shared.forward(&mut core, event);
        }
        Ok(())
    }

    /// Binds `code` to the button called `name` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`GamepadError::InvalidBinding`] for unknown names or hotkey
    /// codes; bindings are left unchanged.
    pub fn bind_button_by_name(&self, code: u16, name: &str) -> Result<()> {
        match name.parse::<GamepadButton>() {
            Ok(button) => self.bind_button(code, button),
            Err(e) => {
                self.shared.report(format!("Cannot bind key {}: {}", code, e));
                Err(e)
            }
        }
    }

    /// Binds `code` to one direction of a left stick axis.
    ///
    /// # Errors
    ///
    /// Returns [`GamepadError::InvalidBinding`] if `code` is a hotkey
    pub fn bind_axis(&self, code: u16, axis: StickAxis, direction: Direction) -> Result<()> {
        self.check_bindable(code)?;
        let mut core = self.shared.lock();
        if let Some(event) = core.engine.bind_axis(code, axis, direction) {
            self.shared.forward(&mut core, event);
        }
        Ok(())
    }

    /// Hotkeys are handled before bindings, so a bound hotkey would never fire.
    fn check_bindable(&self, code: u16) -> Result<()> {
        if Hotkey::from_code(&self.shared.hotkeys, code).is_none() {
            return Ok(());
        }
        let e = GamepadError::InvalidBinding(format!("key {} is reserved for a hotkey", code));
        self.shared.report(format!("Cannot bind key {}: {}", code, e));
        Err(e)
    }

    /// Removes the binding for `code`. Unbound codes are ignored.
    pub fn unbind(&self, code: u16) {
        let mut core = self.shared.lock();
        if let Some(event) = core.engine.unbind(code) {
            self.shared.forward(&mut core, event);
        }
    }

    /// Snapshot of the current bindings.
    #[must_use]
    pub fn bindings(&self) -> KeyBindingTable {
        self.shared.lock().engine.bindings().clone()
    }

    // ==================== Subscriptions ====================

    /// Resolves with the scan code of the next key press.
    ///
    /// The captured press is consumed and not mapped. A newer request replaces
    /// a pending one, whose receiver then resolves with an error.
    pub fn capture_next_key(&self) -> oneshot::Receiver<u16> {
        let (sender, receiver) = oneshot::channel();
        self.shared.lock().key_capture = Some(sender);
        self.shared.announce("Waiting for a key press to capture");
        receiver
    }

    /// Subscribes to notifications. Drop the receiver to unsubscribe.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.shared.notifier.subscribe()
    }

    /// The handler the capture backend is driven with.
    ///
    /// Useful for feeding events synchronously without starting a session.
    #[must_use]
    pub fn handler(&self) -> Arc<dyn InputHandler> {
        Arc::new(EventRouter {
            shared: Arc::clone(&self.shared),
        })
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        let mut core = self.shared.lock();
        if let Some(workers) = core.halt() {
            debug!("Orchestrator dropped while running");
            drop(workers);
        }
        if core.phase != Phase::Uninitialized {
            core.output.disconnect();
        }
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
