//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`pennypost_app::Runtime`] orchestration code runs in both production and
//! simulation.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use pennypost_app::{App, AppEvent, Driver, KeyInput, Screen};

use crate::invariants::{InvariantRegistry, Violation};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Shared state for event injection.
///
/// This allows injection and inspection while the runtime owns the driver.
#[derive(Default)]
struct SharedState {
    pending_events: VecDeque<AppEvent>,
    renders: usize,
    last_screen: Option<Screen>,
    violations: Vec<Violation>,
    stopped: bool,
    fail_render: Option<String>,
}

/// Simulation driver for deterministic testing.
///
/// Clones share state: keep one to drive a runtime that owns the other.
#[derive(Clone)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    invariants: Option<Arc<InvariantRegistry>>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(SharedState::default())), invariants: None }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.lock().pending_events.push_back(event);
    }

    /// Inject a key press.
    pub fn inject_key(&self, key: KeyInput) {
        self.inject_event(AppEvent::Key(key));
    }

    /// Inject each character of `text` as a key press.
    pub fn inject_text(&self, text: &str) {
        let mut state = self.lock();
        state.pending_events.extend(text.chars().map(|c| AppEvent::Key(KeyInput::Char(c))));
    }

    /// Inject a tick event.
    pub fn inject_tick(&self) {
        self.inject_event(AppEvent::Tick);
    }

    /// Make the next render fail with `reason`.
    pub fn fail_next_render(&self, reason: &str) {
        self.lock().fail_render = Some(reason.to_string());
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        !self.lock().pending_events.is_empty()
    }

    /// Number of completed renders.
    pub fn render_count(&self) -> usize {
        self.lock().renders
    }

    /// Screen at the most recent render.
    pub fn last_screen(&self) -> Option<Screen> {
        self.lock().last_screen
    }

    /// Invariant violations observed at render time.
    pub fn violations(&self) -> Vec<Violation> {
        self.lock().violations.clone()
    }

    /// True once the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        // Let spawned requests make progress between scripted inputs.
        tokio::task::yield_now().await;
        Ok(self.lock().pending_events.pop_front())
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let violations = self.invariants.as_ref().map(|registry| registry.check_all(app));

        let mut state = self.lock();
        if let Some(reason) = state.fail_render.take() {
            return Err(SimDriverError(reason));
        }
        state.renders += 1;
        state.last_screen = Some(app.screen());
        if let Some(violations) = violations {
            for violation in &violations {
                tracing::error!(
                    invariant = violation.invariant,
                    message = %violation.message,
                    "invariant violated"
                );
            }
            state.violations.extend(violations);
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}
