//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Ticks come from a tokio
//! interval so notifications expire while the user is idle.

use std::io::{self, Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use pennypost_app::{App, AppEvent, Driver, KeyInput, TICK_INTERVAL};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::time::{Interval, MissedTickBehavior};

use crate::ui;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns raw mode and the alternate screen for its lifetime; both are
/// restored on drop.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    ticker: Interval,
}

impl TerminalDriver {
    /// Enter raw mode and the alternate screen.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Ok(Self { terminal, event_stream: EventStream::new(), ticker })
    }
}

/// Convert a crossterm key event to [`KeyInput`].
///
/// Returns `None` for non-press events and keys without a binding.
pub fn convert_key(event: KeyEvent) -> Option<KeyInput> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char(c) => Some(KeyInput::Ctrl(c.to_ascii_lowercase())),
            _ => None,
        };
    }

    match event.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Tab if event.modifiers.contains(KeyModifiers::SHIFT) => Some(KeyInput::BackTab),
        KeyCode::Tab => Some(KeyInput::Tab),
        KeyCode::BackTab => Some(KeyInput::BackTab),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}

/// Convert a crossterm event to an [`AppEvent`], if it maps to one.
pub fn convert_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) => convert_key(key).map(AppEvent::Key),
        Event::Resize(cols, rows) => Some(AppEvent::Resize(cols, rows)),
        _ => None,
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        loop {
            tokio::select! {
                biased;

                maybe_event = self.event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if let Some(event) = convert_event(event) {
                                return Ok(Some(event));
                            }
                        },
                        Some(Err(e)) => return Err(TerminalError::Io(e)),
                        None => return Ok(None),
                    }
                }

                _ = self.ticker.tick() => return Ok(Some(AppEvent::Tick)),
            }
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, app))?;
        Ok(())
    }

    fn stop(&mut self) {
        let _ = self.terminal.show_cursor();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
