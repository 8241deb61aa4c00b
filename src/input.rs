//! Keyboard input: crossterm key events mapped onto game commands.
//!
//! Movement is sampled once per frame from a "held keys" table.  Many
//! terminals never send key-release events, so a key counts as held if its
//! last press or repeat arrived within `HOLD_WINDOW_MS` of the current frame;
//! terminals that do report releases drop the key immediately.  The window is
//! measured on the frame clock rather than in frames, so `--fps` does not
//! change it.  Fire, pause, start and quit are one-shot commands handed back
//! to the caller as they arrive.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::entities::Direction;

/// A key counts as held for this many milliseconds after its last
/// press/repeat.  Must stay above the slowest OS key-repeat gap (15 Hz).
pub const HOLD_WINDOW_MS: u64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Fire,
    TogglePause,
    /// Start from the title screen or restart after a game over.
    Start,
    Quit,
}

impl Command {
    fn is_held_kind(self) -> bool {
        matches!(self, Command::MoveLeft | Command::MoveRight)
    }
}

/// Map a key to its command, if it has one.
pub fn command_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::MoveRight),
        KeyCode::Char(' ') => Some(Command::Fire),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(Command::TogglePause),
        KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Start),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

/// Tracks which directional commands are held.
#[derive(Debug, Default)]
pub struct InputSampler {
    /// Clock time of each held command's last press/repeat.
    last_seen: HashMap<Command, u64>,
    now: u64,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the frame starting at `now` (ms); call once before draining
    /// the frame's events.
    pub fn next_frame(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    /// Feed one key event.  Returns the command for edge-triggered keys
    /// (fire, pause, start, quit) on press; held keys are recorded instead.
    pub fn handle_key(&mut self, event: KeyEvent) -> Option<Command> {
        let command = command_for(event.code, event.modifiers)?;
        match event.kind {
            KeyEventKind::Press => {
                if command.is_held_kind() {
                    self.last_seen.insert(command, self.now);
                    None
                } else {
                    Some(command)
                }
            }
            KeyEventKind::Repeat => {
                if command.is_held_kind() {
                    self.last_seen.insert(command, self.now);
                }
                None
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&command);
                None
            }
        }
    }

    pub fn is_held(&self, command: Command) -> bool {
        self.last_seen
            .get(&command)
            .map(|&last| self.now.saturating_sub(last) <= HOLD_WINDOW_MS)
            .unwrap_or(false)
    }

    /// Directions currently held, left first.
    pub fn held_directions(&self) -> Vec<Direction> {
        let mut held = Vec::with_capacity(2);
        if self.is_held(Command::MoveLeft) {
            held.push(Direction::Left);
        }
        if self.is_held(Command::MoveRight) {
            held.push(Direction::Right);
        }
        held
    }

    /// Forget every held key, e.g. when a new session starts.
    pub fn clear(&mut self) {
        self.last_seen.clear();
    }
}
