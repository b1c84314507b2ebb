//! Mock input capture for tests and the demo binary.
//!
//! Events are injected through a channel and delivered by
//! [`InputCapture::start_monitoring`] exactly the way a driver-backed capture
//! would: filter decision first, then the handler callback.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{InputCapture, InputHandler, RawKeyEvent, RawMouseEvent};
use crate::error::{GamepadError, Result};

/// An injected event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedEvent {
    Key(RawKeyEvent),
    Mouse(RawMouseEvent),
}

/// A mock implementation of [`InputCapture`] that allows tests to inject events.
///
/// Events injected before monitoring starts are queued and delivered once it
/// does. The capture can be monitored again after a previous loop exited.
#[derive(Debug)]
pub struct MockInputCapture {
    sender: UnboundedSender<InjectedEvent>,
    receiver: Mutex<Option<UnboundedReceiver<InjectedEvent>>>,
    fail_initialize: AtomicBool,
    suppressed: AtomicU64,
    passed_through: AtomicU64,
}

impl MockInputCapture {
    /// Creates a new mock input capture.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(Some(receiver)),
            fail_initialize: AtomicBool::new(false),
            suppressed: AtomicU64::new(0),
            passed_through: AtomicU64::new(0),
        }
    }

    /// Makes the next [`initialize`](InputCapture::initialize) calls fail.
    pub fn set_fail_initialize(&self, fail: bool) {
        self.fail_initialize.store(fail, Ordering::SeqCst);
    }

    pub fn inject_key(&self, event: RawKeyEvent) {
        self.inject(InjectedEvent::Key(event));
    }

    pub fn inject_mouse(&self, event: RawMouseEvent) {
        self.inject(InjectedEvent::Mouse(event));
    }

    /// Presses and releases `code`.
    pub fn tap_key(&self, code: u16) {
        self.inject_key(RawKeyEvent::pressed(code));
        self.inject_key(RawKeyEvent::released(code));
    }

    fn inject(&self, event: InjectedEvent) {
        // The receiver lives in `self`, so the channel cannot be closed here.
        let _ = self.sender.send(event);
    }

    /// Events the handler asked to suppress.
    #[must_use]
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed.load(Ordering::SeqCst)
    }

    /// Events that would have been forwarded to the OS.
    #[must_use]
    pub fn passed_through_count(&self) -> u64 {
        self.passed_through.load(Ordering::SeqCst)
    }

    fn take_receiver(&self) -> Option<UnboundedReceiver<InjectedEvent>> {
        self.receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn restore_receiver(&self, receiver: UnboundedReceiver<InjectedEvent>) {
        *self.receiver.lock().unwrap_or_else(PoisonError::into_inner) = Some(receiver);
    }

    fn dispatch(&self, handler: &dyn InputHandler, event: InjectedEvent) {
        let blocked = match &event {
            InjectedEvent::Key(key) => handler.should_block_key(key),
            InjectedEvent::Mouse(mouse) => handler.should_block_mouse(mouse),
        };

        if blocked {
            self.suppressed.fetch_add(1, Ordering::SeqCst);
        } else {
            self.passed_through.fetch_add(1, Ordering::SeqCst);
        }
        debug!("Delivering {:?} (blocked: {})", event, blocked);

        match event {
            InjectedEvent::Key(key) => handler.on_key(key),
            InjectedEvent::Mouse(mouse) => handler.on_mouse(mouse),
        }
    }
}

impl Default for MockInputCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputCapture for MockInputCapture {
    fn initialize(&self) -> Result<()> {
        if self.fail_initialize.load(Ordering::SeqCst) {
            return Err(GamepadError::Initialization(
                "mock capture configured to fail".to_string(),
            ));
        }
        info!("Mock input capture initialized");
        Ok(())
    }

    async fn start_monitoring(
        &self,
        handler: Arc<dyn InputHandler>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let mut receiver = self.take_receiver().ok_or_else(|| {
            GamepadError::Monitoring("mock capture is already being monitored".to_string())
        })?;

        info!("Mock input monitoring started");
        loop {
            // Nothing is delivered once cancelled, even if events are queued
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                event = receiver.recv() => match event {
                    Some(event) => self.dispatch(handler.as_ref(), event),
                    None => break,
                },
            }
        }

        self.restore_receiver(receiver);
        info!("Mock input monitoring stopped");
        Ok(())
    }
}
