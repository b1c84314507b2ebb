//! Integration tests for a full bridge session.
//!
//! These tests drive the orchestrator end-to-end through the public API:
//! `MockInputCapture` feeds events on the capture task and `ConsoleGamepad`
//! exposes what the virtual controller last reported.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use gamepad_bridge::capture::mock::MockInputCapture;
use gamepad_bridge::capture::{RawKeyEvent, RawMouseEvent};
use gamepad_bridge::config::Config;
use gamepad_bridge::controller::console::ConsoleGamepad;
use gamepad_bridge::controller::{GamepadButton, GamepadState};
use gamepad_bridge::orchestrator::{Notification, Orchestrator, OrchestratorState};

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Session {
    orchestrator: Orchestrator,
    capture: Arc<MockInputCapture>,
    pad: Arc<Mutex<GamepadState>>,
}

impl Session {
    async fn start(config: &Config) -> Self {
        let capture = Arc::new(MockInputCapture::new());
        let gamepad = ConsoleGamepad::new();
        let pad = gamepad.published_state();

        let orchestrator = Orchestrator::new(capture.clone(), Box::new(gamepad), config)
            .expect("configuration must be valid");
        orchestrator.initialize().expect("mock collaborators must initialize");
        orchestrator.start().await.expect("session must start");

        Self {
            orchestrator,
            capture,
            pad,
        }
    }

    fn pad(&self) -> GamepadState {
        self.pad.lock().unwrap().clone()
    }
}

fn live_config() -> Config {
    let mut config = Config::default();
    config.session.start_paused = false;
    config
}

/// Gives the capture task time to drain injected events.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_wasd_drives_left_stick() {
    let session = Session::start(&live_config()).await;

    session.capture.inject_key(RawKeyEvent::pressed(17)); // W
    session.capture.inject_key(RawKeyEvent::pressed(30)); // A
    settle().await;

    let pad = session.pad();
    assert_eq!(pad.left_thumb_x, -32767);
    assert_eq!(pad.left_thumb_y, 32767);

    session.capture.inject_key(RawKeyEvent::released(17));
    session.capture.inject_key(RawKeyEvent::released(30));
    settle().await;

    let pad = session.pad();
    assert_eq!((pad.left_thumb_x, pad.left_thumb_y), (0, 0));

    session.orchestrator.stop().await;
}

#[tokio::test]
async fn test_buttons_reach_the_virtual_pad() {
    let session = Session::start(&live_config()).await;

    session.capture.inject_key(RawKeyEvent::pressed(57)); // Space
    session.capture.inject_key(RawKeyEvent::pressed(47)); // V
    settle().await;

    let pad = session.pad();
    assert!(pad.is_pressed(GamepadButton::A));
    assert!(pad.is_pressed(GamepadButton::RightThumb));

    session.capture.inject_key(RawKeyEvent::released(57));
    settle().await;
    assert!(!session.pad().is_pressed(GamepadButton::A));

    session.orchestrator.stop().await;
}

#[tokio::test]
async fn test_session_starts_paused_until_hotkey() {
    let session = Session::start(&Config::default()).await;
    assert_eq!(session.orchestrator.state(), OrchestratorState::Paused);

    session.capture.inject_key(RawKeyEvent::pressed(57));
    settle().await;
    assert!(!session.pad().any_button_pressed());

    session.capture.tap_key(82); // Insert
    settle().await;
    assert_eq!(session.orchestrator.state(), OrchestratorState::Running);

    session.capture.inject_key(RawKeyEvent::pressed(29)); // Left Ctrl
    settle().await;
    assert!(session.pad().is_pressed(GamepadButton::B));

    session.orchestrator.stop().await;
}

#[tokio::test]
async fn test_blocking_decisions() {
    let session = Session::start(&live_config()).await;

    session.capture.inject_key(RawKeyEvent::pressed(100)); // unbound
    session.capture.inject_key(RawKeyEvent::pressed(57)); // bound
    session.capture.inject_mouse(RawMouseEvent::motion(10, 10));
    session.capture.inject_mouse(RawMouseEvent::buttons(0x01));
    settle().await;

    assert_eq!(session.capture.suppressed_count(), 2);
    assert_eq!(session.capture.passed_through_count(), 2);

    session.capture.inject_key(RawKeyEvent::pressed(67)); // F9, itself blocked
    session.capture.inject_key(RawKeyEvent::released(57));
    settle().await;

    assert!(!session.orchestrator.block_keys());
    assert_eq!(session.capture.suppressed_count(), 3);
    assert_eq!(session.capture.passed_through_count(), 3);

    // Unblocked keys are still mapped
    assert!(!session.pad().is_pressed(GamepadButton::A));

    session.orchestrator.stop().await;
}

#[tokio::test]
async fn test_mouse_moves_then_recenters_right_stick() {
    let session = Session::start(&live_config()).await;

    session.capture.inject_mouse(RawMouseEvent::motion(16000, -16000));
    settle().await;
    // The default watchdog may already have fired; check the notification trail instead
    let mut notifications = session.orchestrator.subscribe();

    session.capture.inject_mouse(RawMouseEvent::motion(16000, -16000));
    tokio::time::sleep(Duration::from_millis(250)).await;

    let mut moved = false;
    let mut centered = 0;
    while let Ok(notification) = notifications.try_recv() {
        match notification {
            Notification::RightStickChanged(position) if position.x > 0 && position.y > 0 => moved = true,
            Notification::RightStickChanged(position) if position.x == 0 && position.y == 0 => {
                centered += 1
            }
            _ => {}
        }
    }

    assert!(moved, "motion must deflect the right stick");
    assert_eq!(centered, 1, "idle mouse must re-center exactly once");
    let pad = session.pad();
    assert_eq!((pad.right_thumb_x, pad.right_thumb_y), (0, 0));

    session.orchestrator.stop().await;
}

#[tokio::test]
async fn test_panic_hotkey_ends_session() {
    let session = Session::start(&live_config()).await;
    let mut notifications = session.orchestrator.subscribe();

    session.capture.inject_key(RawKeyEvent::pressed(25)); // P
    session.capture.inject_key(RawKeyEvent::pressed(57)); // not delivered
    settle().await;

    assert_eq!(session.orchestrator.state(), OrchestratorState::Stopped);
    assert!(!session.pad().is_pressed(GamepadButton::A));

    let mut panicked = false;
    while let Ok(notification) = notifications.try_recv() {
        panicked |= notification == Notification::Panic;
    }
    assert!(panicked);

    // A panicked session can be started again
    session.orchestrator.start().await.unwrap();
    settle().await;
    assert!(session.pad().is_pressed(GamepadButton::A));
    session.orchestrator.stop().await;
}

#[tokio::test]
async fn test_custom_bindings_from_toml() {
    let config = Config::from_toml(
        r#"
[session]
start_paused = false

[bindings]
use_defaults = false

[[bindings.button]]
code = 44
button = "start"

[[bindings.axis]]
code = 72
axis = "y"
direction = -1
"#,
    )
    .unwrap();
    let session = Session::start(&config).await;

    session.capture.inject_key(RawKeyEvent::pressed(44));
    session.capture.inject_key(RawKeyEvent::pressed(72));
    session.capture.inject_key(RawKeyEvent::pressed(57)); // default layout is off
    settle().await;

    let pad = session.pad();
    assert!(pad.is_pressed(GamepadButton::Start));
    assert!(!pad.is_pressed(GamepadButton::A));
    assert_eq!(pad.left_thumb_y, -32767);
    assert_eq!(session.capture.passed_through_count(), 1);

    session.orchestrator.stop().await;
}

#[tokio::test]
async fn test_key_capture_while_running() {
    let session = Session::start(&live_config()).await;

    let captured = session.orchestrator.capture_next_key();
    session.capture.inject_key(RawKeyEvent::pressed(57));

    let code = tokio::time::timeout(Duration::from_secs(1), captured)
        .await
        .expect("key capture must resolve")
        .expect("capture must not be abandoned");
    assert_eq!(code, 57);

    settle().await;
    assert!(!session.pad().is_pressed(GamepadButton::A));

    session.orchestrator.stop().await;
}
