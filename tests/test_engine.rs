use internet_gauntlet::compute::init_state;
use internet_gauntlet::config::Tuning;
use internet_gauntlet::engine::Engine;
use internet_gauntlet::entities::*;
use internet_gauntlet::events::{FrameEvents, RunObserver, StatusFeed, IDLE_MESSAGE};

use rand::rngs::mock::StepRng;

const FRAME: f64 = 16.0;

fn make_engine() -> Engine<StepRng> {
    Engine::with_rng(Tuning::default(), StepRng::new(0, 0))
}

fn hazard_on(hero: &Hero) -> Hazard {
    Hazard { x: hero.x, y: hero.y, width: 26.0, height: 26.0, vx: 0.0, vy: 0.0, spin: 0.0 }
}

fn pickup_on(hero: &Hero) -> Pickup {
    Pickup { x: hero.x, y: hero.y, width: 32.0, height: 32.0, vx: 0.0, vy: 0.0, pulse: 0.0 }
}

/// Engine resumed from a running state prepared by `setup`.
fn engine_with(setup: impl FnOnce(&mut RunState)) -> Engine<StepRng> {
    let tuning = Tuning::default();
    let mut state = init_state(&tuning);
    setup(&mut state);
    Engine::resume(tuning, state, StepRng::new(0, 0))
}

/// Records every callback in order.
#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl RunObserver for Recorder {
    fn on_run_started(&mut self) {
        self.calls.push("started".into());
    }
    fn on_score_changed(&mut self, new_score: u32) {
        self.calls.push(format!("score {new_score}"));
    }
    fn on_level_changed(&mut self, new_level: u32) {
        self.calls.push(format!("level {new_level}"));
    }
    fn on_life_lost(&mut self, remaining_lives: u32) {
        self.calls.push(format!("life {remaining_lives}"));
    }
    fn on_game_over(&mut self, final_score: u32) {
        self.calls.push(format!("over {final_score}"));
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn new_engine_is_not_started() {
    let mut engine = make_engine();
    assert_eq!(engine.status(), RunStatus::NotStarted);

    let events = engine.advance(FRAME, HeldDirections::none().with(Direction::Left));
    assert!(events.is_empty());
    assert_eq!(engine.state().clock_ms, 0.0);
    assert_eq!(engine.hero().x, 335.0);
}

#[test]
fn start_enters_running_with_initial_values() {
    let mut engine = make_engine();
    engine.start();
    assert!(engine.is_running());
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.level(), 1);
    assert_eq!(engine.lives(), 3);
    assert!(engine.hazards().is_empty());
    assert!(engine.pickups().is_empty());
    assert!(engine.zones().is_empty());
}

#[test]
fn second_start_fully_resets_the_run() {
    let mut tuning = Tuning::default();
    tuning.zones.period_ms = 1000.0;
    let mut engine = Engine::with_rng(tuning, StepRng::new(0, 0));
    engine.start();

    // Spawns a hazard and a zone, then a pickup
    engine.advance(1401.0, HeldDirections::none());
    engine.advance(1300.0, HeldDirections::none().with(Direction::Up));
    assert!(!engine.hazards().is_empty());
    assert!(!engine.pickups().is_empty());
    assert!(!engine.zones().is_empty());

    engine.start();
    assert!(engine.hazards().is_empty());
    assert!(engine.pickups().is_empty());
    assert!(engine.zones().is_empty());
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.level(), 1);
    assert_eq!(engine.lives(), 3);
    assert_eq!(engine.hero().y, 390.0);
    assert_eq!(engine.state().clock_ms, 0.0);
    assert_eq!(engine.state().hazard_timer.interval_ms, 1400.0);
}

#[test]
fn start_resets_score_level_and_lives() {
    let mut engine = engine_with(|s| {
        s.score = 900;
        s.level = 3;
        s.lives = 1;
        s.hero.invulnerable_ms = 800.0;
    });
    engine.start();
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.level(), 1);
    assert_eq!(engine.lives(), 3);
    assert_eq!(engine.hero().invulnerable_ms, 0.0);
}

#[test]
fn game_over_is_terminal_until_restart() {
    let mut engine = engine_with(|s| {
        s.lives = 1;
        s.score = 270;
        s.hazards.push(hazard_on(&s.hero));
    });

    let events = engine.advance(FRAME, HeldDirections::none());
    assert_eq!(events.game_over, Some(270));
    assert_eq!(engine.status(), RunStatus::GameOver);
    assert_eq!(engine.lives(), 0);

    // Further frames change nothing
    let before = engine.state().clone();
    let events = engine.advance(500.0, HeldDirections::none().with(Direction::Right));
    assert!(events.is_empty());
    assert_eq!(engine.state(), &before);

    engine.start();
    assert!(engine.is_running());
    assert_eq!(engine.lives(), 3);
}

// ── Frame contract ────────────────────────────────────────────────────────────

#[test]
fn advance_moves_hero_with_held_directions() {
    let mut engine = make_engine();
    engine.start();
    engine.advance(100.0, HeldDirections::none().with(Direction::Left));
    assert!((engine.hero().x - (335.0 - 32.4)).abs() < 1e-9);
}

#[test]
fn invalid_delta_is_a_no_op_frame() {
    let mut engine = make_engine();
    engine.start();
    engine.advance(FRAME, HeldDirections::none());
    let before = engine.state().clone();

    for delta in [-1.0, f64::NAN, f64::INFINITY] {
        let events = engine.advance(delta, HeldDirections::none().with(Direction::Down));
        assert!(events.is_empty());
        assert_eq!(engine.state(), &before);
    }
}

#[test]
fn hazard_hit_then_grace_protects() {
    let mut engine = engine_with(|s| s.hazards.push(hazard_on(&s.hero)));
    let events = engine.advance(FRAME, HeldDirections::none());
    assert_eq!(events.life_lost, Some(2));
    assert_eq!(engine.hero().invulnerable_ms, 1200.0);

    // Another hazard right away is ignored
    let mut state = engine.state().clone();
    state.hazards.push(hazard_on(&state.hero));
    let mut engine = Engine::resume(Tuning::default(), state, StepRng::new(0, 0));
    let events = engine.advance(FRAME, HeldDirections::none());
    assert!(events.life_lost.is_none());
    assert_eq!(engine.lives(), 2);
    assert_eq!(engine.hazards().len(), 1);
}

// ── Observers ─────────────────────────────────────────────────────────────────

#[test]
fn observer_receives_events_in_order() {
    let mut engine = engine_with(|s| {
        s.score = 390;
        s.pickups.push(pickup_on(&s.hero));
    });
    let mut recorder = Recorder::default();
    let events = engine.advance_with(FRAME, HeldDirections::none(), &mut recorder);

    assert_eq!(events.score_changed, Some(480));
    assert_eq!(events.level_changed, Some(2));
    assert_eq!(recorder.calls, vec!["score 480", "level 2"]);
}

#[test]
fn observer_hears_game_over_with_final_score() {
    let mut engine = engine_with(|s| {
        s.lives = 1;
        s.score = 90;
        s.hazards.push(hazard_on(&s.hero));
    });
    let mut recorder = Recorder::default();
    engine.advance_with(FRAME, HeldDirections::none(), &mut recorder);
    assert_eq!(recorder.calls, vec!["life 0", "over 90"]);
}

#[test]
fn start_with_notifies_observer() {
    let mut engine = make_engine();
    let mut recorder = Recorder::default();
    engine.start_with(&mut recorder);
    assert_eq!(recorder.calls, vec!["started"]);
}

#[test]
fn quiet_frame_dispatches_nothing() {
    let mut engine = make_engine();
    engine.start();
    let mut recorder = Recorder::default();
    let events = engine.advance_with(FRAME, HeldDirections::none(), &mut recorder);
    assert_eq!(events, FrameEvents::default());
    assert!(recorder.calls.is_empty());
}

// ── Status feed ───────────────────────────────────────────────────────────────

#[test]
fn status_feed_tracks_latest_event() {
    let mut feed = StatusFeed::default();
    assert_eq!(feed.message(), IDLE_MESSAGE);

    let mut engine = engine_with(|s| s.pickups.push(pickup_on(&s.hero)));
    engine.advance_with(FRAME, HeldDirections::none(), &mut feed);
    assert!(feed.message().contains("90 Mbps"));

    let mut engine = engine_with(|s| {
        s.score = 390;
        s.pickups.push(pickup_on(&s.hero));
    });
    engine.advance_with(FRAME, HeldDirections::none(), &mut feed);
    assert!(feed.message().starts_with("Level 2"));
}

#[test]
fn status_feed_reports_breach_and_severed_connection() {
    let mut feed = StatusFeed::default();
    let mut engine = engine_with(|s| s.hazards.push(hazard_on(&s.hero)));
    engine.advance_with(FRAME, HeldDirections::none(), &mut feed);
    assert!(feed.message().contains("2 attempts left"));

    let mut engine = engine_with(|s| {
        s.lives = 1;
        s.hazards.push(hazard_on(&s.hero));
    });
    engine.advance_with(FRAME, HeldDirections::none(), &mut feed);
    assert!(feed.message().starts_with("Connection severed"));
}
