use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use internet_gauntlet::entities::{Direction, HeldDirections};
use internet_gauntlet::input::{HeldKeys, FIRST_REPEAT_WINDOW, HOLD_WINDOW};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ── Press-only terminals ──────────────────────────────────────────────────────

#[test]
fn held_key_survives_the_auto_repeat_delay() {
    let t0 = Instant::now();
    let mut keys = HeldKeys::new();
    keys.press(KeyCode::Left, t0);

    // Typical OS delay before the first repeat
    for gap in [200, 300, 400, 500] {
        assert!(keys.is_held(KeyCode::Left, t0 + ms(gap)), "dropped after {gap} ms");
    }

    // The first repeat arrives at 500 ms; then repeats every 33 ms
    let mut at = t0 + ms(500);
    for _ in 0..10 {
        keys.press(KeyCode::Left, at);
        assert_eq!(
            keys.directions(at + ms(33)),
            HeldDirections::none().with(Direction::Left)
        );
        at += ms(33);
    }
}

#[test]
fn tap_expires_after_first_repeat_window() {
    let t0 = Instant::now();
    let mut keys = HeldKeys::new();
    keys.press(KeyCode::Char('w'), t0);
    assert!(keys.is_held(KeyCode::Char('w'), t0 + FIRST_REPEAT_WINDOW));
    assert!(!keys.is_held(KeyCode::Char('w'), t0 + FIRST_REPEAT_WINDOW + ms(1)));
}

#[test]
fn repeating_key_drops_quickly_once_repeats_stop() {
    let t0 = Instant::now();
    let mut keys = HeldKeys::new();
    keys.press(KeyCode::Right, t0);
    keys.press(KeyCode::Right, t0 + ms(400));

    let last = t0 + ms(400);
    assert!(keys.is_held(KeyCode::Right, last + HOLD_WINDOW));
    assert!(!keys.is_held(KeyCode::Right, last + HOLD_WINDOW + ms(1)));
}

#[test]
fn press_after_expiry_starts_a_fresh_hold() {
    let t0 = Instant::now();
    let mut keys = HeldKeys::new();
    keys.press(KeyCode::Down, t0);
    keys.press(KeyCode::Down, t0 + ms(100));

    // Long after release, a new press gets the long window again
    let again = t0 + ms(2000);
    keys.press(KeyCode::Down, again);
    assert!(keys.is_held(KeyCode::Down, again + ms(400)));
}

// ── Enhanced terminals ────────────────────────────────────────────────────────

#[test]
fn release_drops_key_immediately() {
    let t0 = Instant::now();
    let mut keys = HeldKeys::new();
    keys.press(KeyCode::Up, t0);
    keys.release(KeyCode::Up);
    assert!(keys.directions(t0).is_empty());
}

#[test]
fn explicit_repeat_uses_short_window() {
    let t0 = Instant::now();
    let mut keys = HeldKeys::new();
    keys.repeat(KeyCode::Char('a'), t0);
    assert!(!keys.is_held(KeyCode::Char('a'), t0 + HOLD_WINDOW + ms(1)));
}

// ── Bindings ──────────────────────────────────────────────────────────────────

#[test]
fn two_keys_give_a_diagonal() {
    let t0 = Instant::now();
    let mut keys = HeldKeys::new();
    keys.press(KeyCode::Char('w'), t0);
    keys.press(KeyCode::Right, t0);
    keys.press(KeyCode::Char('x'), t0);
    assert_eq!(
        keys.directions(t0 + ms(16)),
        HeldDirections::none().with(Direction::Up).with(Direction::Right)
    );
}

#[test]
fn shifted_letters_share_the_binding() {
    let t0 = Instant::now();
    let mut keys = HeldKeys::new();
    keys.press(KeyCode::Char('D'), t0);
    assert!(keys.is_held(KeyCode::Char('d'), t0));
    keys.release(KeyCode::Char('d'));
    assert!(!keys.is_held(KeyCode::Char('D'), t0));
}
