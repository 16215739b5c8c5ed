//! Keyboard input for the terminal driver.
//!
//! Raw mode delivers each key as soon as it is pressed, without echo or line
//! buffering. It also swallows the terminal's own interrupt, so `Ctrl-C` is
//! mapped to a quit request here.

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use grid_chase_core::Delta;
use tracing::warn;

/// Decoded key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyInput {
    /// Step requested for the player; unknown keys stand still.
    Move(Delta),
    /// Leave the session.
    Quit,
}

/// Blocking source of key presses.
pub(crate) trait InputSource {
    /// Waits for the next key press.
    fn next_key(&mut self) -> Result<KeyInput>;
}

/// Maps a crossterm key event, ignoring releases and repeats.
pub(crate) fn map_key(key: KeyEvent) -> Option<KeyInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let input = match key.code {
        KeyCode::Esc => KeyInput::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyInput::Quit,
        KeyCode::Char(character) => KeyInput::Move(Delta::from_key(character)),
        _ => KeyInput::Move(Delta::NONE),
    };
    Some(input)
}

/// Keeps the terminal in raw mode until dropped.
#[derive(Debug)]
pub(crate) struct RawModeGuard;

impl RawModeGuard {
    pub(crate) fn enable() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw terminal mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(error) = disable_raw_mode() {
            warn!(%error, "failed to restore terminal mode");
        }
    }
}

/// Reads key presses from the controlling terminal.
#[derive(Debug)]
pub(crate) struct TerminalInput<'guard> {
    _raw_mode: &'guard RawModeGuard,
}

impl<'guard> TerminalInput<'guard> {
    pub(crate) fn new(raw_mode: &'guard RawModeGuard) -> Self {
        Self {
            _raw_mode: raw_mode,
        }
    }
}

impl InputSource for TerminalInput<'_> {
    fn next_key(&mut self) -> Result<KeyInput> {
        loop {
            let event = event::read().context("failed to read terminal event")?;
            if let Event::Key(key) = event {
                if let Some(input) = map_key(key) {
                    return Ok(input);
                }
            }
        }
    }
}
