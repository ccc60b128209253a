//! Held-direction tracking for terminals.
//!
//! Without keyboard enhancement a terminal reports only presses, and a held
//! key shows up as the initial press followed, after the OS auto-repeat
//! delay, by a stream of repeats. A key therefore counts as held while its
//! last event is recent enough: a generous window after the first press
//! bridges the auto-repeat delay, a short one between repeats keeps release
//! latency low. Terminals that also send releases drop a key at once.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use crate::entities::{Direction, HeldDirections};

/// Window after a key's first press. Auto-repeat usually starts 250–500 ms
/// after the press, so a single tap keeps the hero moving for up to this long
/// on press-only terminals.
pub const FIRST_REPEAT_WINDOW: Duration = Duration::from_millis(550);

/// Window between auto-repeat events (OS repeat rates are ≥ 15 Hz).
pub const HOLD_WINDOW: Duration = Duration::from_millis(150);

pub const KEY_BINDINGS: &[(KeyCode, Direction)] = &[
    (KeyCode::Up, Direction::Up),
    (KeyCode::Char('w'), Direction::Up),
    (KeyCode::Down, Direction::Down),
    (KeyCode::Char('s'), Direction::Down),
    (KeyCode::Left, Direction::Left),
    (KeyCode::Char('a'), Direction::Left),
    (KeyCode::Right, Direction::Right),
    (KeyCode::Char('d'), Direction::Right),
];

/// Letter keys are tracked lower-case so Shift doesn't split a binding.
pub fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[derive(Debug, Clone, Copy)]
struct KeyHold {
    last_seen: Instant,
    repeating: bool,
}

impl KeyHold {
    fn window(&self) -> Duration {
        if self.repeating {
            HOLD_WINDOW
        } else {
            FIRST_REPEAT_WINDOW
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_seen) <= self.window()
    }
}

#[derive(Debug, Default)]
pub struct HeldKeys {
    keys: HashMap<KeyCode, KeyHold>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press or repeat of `code` at `at`. A press that lands while
    /// the key is still live counts as auto-repeat.
    pub fn press(&mut self, code: KeyCode, at: Instant) {
        let code = normalize(code);
        let repeating = self.keys.get(&code).is_some_and(|hold| hold.is_live(at));
        self.keys.insert(code, KeyHold { last_seen: at, repeating });
    }

    /// An explicit auto-repeat event.
    pub fn repeat(&mut self, code: KeyCode, at: Instant) {
        self.keys
            .insert(normalize(code), KeyHold { last_seen: at, repeating: true });
    }

    pub fn release(&mut self, code: KeyCode) {
        self.keys.remove(&normalize(code));
    }

    pub fn is_held(&self, code: KeyCode, now: Instant) -> bool {
        self.keys
            .get(&normalize(code))
            .is_some_and(|hold| hold.is_live(now))
    }

    /// Directions of every bound key still held at `now`.
    pub fn directions(&self, now: Instant) -> HeldDirections {
        KEY_BINDINGS
            .iter()
            .filter(|(key, _)| self.is_held(key.clone(), now))
            .map(|(_, direction)| *direction)
            .collect()
    }
}
