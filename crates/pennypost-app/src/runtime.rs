//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: Session and API bridge
//! - [`Driver`]: Platform-specific I/O
//!
//! Requests run concurrently on a [`JoinSet`]. Every spawned request ends in
//! exactly one completion: the bridge's events, or
//! [`AppEvent::RequestAborted`] if the task panicked. Pending flags are
//! therefore always cleared.

use std::collections::HashMap;

use pennypost_client::{Api, SessionService, Storage};
use tokio::task::{self, JoinError, JoinSet};

use crate::{App, AppAction, AppEvent, Bridge, Driver, RequestKind};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `A`: Remote API adapter
/// - `S`: Session storage
pub struct Runtime<D, A, S>
where
    D: Driver,
    A: Api,
    S: Storage,
{
    driver: D,
    app: App,
    bridge: Bridge<A, S>,
    in_flight: JoinSet<Vec<AppEvent>>,
    kinds: HashMap<task::Id, RequestKind>,
}

impl<D, A, S> Runtime<D, A, S>
where
    D: Driver,
    A: Api,
    S: Storage,
{
    /// Create a new runtime over `driver` and `session`.
    pub fn new(driver: D, session: SessionService<A, S>) -> Self {
        Self {
            driver,
            app: App::new(),
            bridge: Bridge::new(session),
            in_flight: JoinSet::new(),
            kinds: HashMap::new(),
        }
    }

    /// Application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Platform driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Bridge to the session service.
    pub fn bridge(&self) -> &Bridge<A, S> {
        &self.bridge
    }

    /// Number of requests in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Run the main event loop.
    ///
    /// Restores any cached session, then processes input events and request
    /// completions as they arrive until the app quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        if self.start()? {
            self.driver.stop();
            return Ok(());
        }

        loop {
            tokio::select! {
                event = self.driver.poll_event() => match event? {
                    Some(event) => {
                        if self.dispatch(event)? {
                            break;
                        }
                    },
                    None => {
                        tracing::debug!(pending = self.in_flight.len(), "input closed, draining");
                        self.settle().await?;
                        break;
                    },
                },
                Some(joined) = self.in_flight.join_next_with_id(), if !self.in_flight.is_empty() => {
                    if self.complete(joined)? {
                        break;
                    }
                },
            }
        }

        self.in_flight.abort_all();
        self.driver.stop();
        Ok(())
    }

    /// Render the first frame and restore a cached session.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn start(&mut self) -> Result<bool, D::Error> {
        self.driver.render(&self.app)?;
        for event in self.bridge.restore() {
            if self.dispatch(event)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Feed one event to the App and execute the resulting actions.
    /// Requests are spawned, not awaited.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn dispatch(&mut self, event: AppEvent) -> Result<bool, D::Error> {
        let actions = self.app.handle(event);
        self.process_actions(actions)
    }

    /// Wait for every in-flight request, including those spawned by earlier
    /// completions, and apply the results.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub async fn settle(&mut self) -> Result<bool, D::Error> {
        while let Some(joined) = self.in_flight.join_next_with_id().await {
            if self.complete(joined)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Stop the driver.
    pub fn stop(&mut self) {
        self.in_flight.abort_all();
        self.driver.stop();
    }

    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => return Ok(true),
                action => {
                    if self.bridge.apply_local(&action) {
                        continue;
                    }
                    if let Some((kind, request)) = self.bridge.request(action) {
                        let handle = self.in_flight.spawn(request);
                        self.kinds.insert(handle.id(), kind);
                    }
                },
            }
        }
        Ok(false)
    }

    fn complete(
        &mut self,
        joined: Result<(task::Id, Vec<AppEvent>), JoinError>,
    ) -> Result<bool, D::Error> {
        let events = match joined {
            Ok((id, events)) => {
                self.kinds.remove(&id);
                events
            },
            Err(err) => match self.kinds.remove(&err.id()) {
                Some(kind) => {
                    tracing::error!(%kind, error = %err, "request task failed");
                    vec![AppEvent::RequestAborted { kind }]
                },
                None => {
                    tracing::error!(error = %err, "untracked request task failed");
                    vec![]
                },
            },
        };

        for event in events {
            if self.dispatch(event)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
