use internet_gauntlet::compute::init_state;
use internet_gauntlet::config::Tuning;
use internet_gauntlet::entities::*;

fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect { x, y, width, height }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn rect_edges() {
    let r = rect(10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.right(), 40.0);
    assert_eq!(r.bottom(), 60.0);
}

#[test]
fn overlapping_boxes_collide() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let b = rect(5.0, 5.0, 10.0, 10.0);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}

#[test]
fn touching_edges_do_not_collide() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    // Shares the right edge
    assert!(!a.overlaps(&rect(10.0, 0.0, 10.0, 10.0)));
    // Shares the bottom edge
    assert!(!a.overlaps(&rect(0.0, 10.0, 10.0, 10.0)));
    // Shares only a corner
    assert!(!a.overlaps(&rect(10.0, 10.0, 5.0, 5.0)));
}

#[test]
fn contained_box_collides() {
    let outer = rect(0.0, 0.0, 100.0, 100.0);
    let inner = rect(40.0, 40.0, 2.0, 2.0);
    assert!(outer.overlaps(&inner));
    assert!(inner.overlaps(&outer));
}

#[test]
fn bounded_entities_report_their_box() {
    let zone = HazardZone { x: 1.0, y: 2.0, width: 3.0, height: 4.0, lifetime_ms: 5.0 };
    assert_eq!(zone.rect(), rect(1.0, 2.0, 3.0, 4.0));

    let pickup = Pickup { x: 7.0, y: 8.0, width: 32.0, height: 32.0, vx: 0.0, vy: 1.0, pulse: 0.0 };
    assert_eq!(pickup.rect(), rect(7.0, 8.0, 32.0, 32.0));
}

// ── HeldDirections ────────────────────────────────────────────────────────────

#[test]
fn held_directions_start_empty() {
    let held = HeldDirections::none();
    assert!(held.is_empty());
    assert_eq!(held.iter().count(), 0);
}

#[test]
fn held_directions_collect_and_dedupe() {
    let held: HeldDirections =
        [Direction::Left, Direction::Up, Direction::Left].into_iter().collect();
    assert!(held.contains(Direction::Left));
    assert!(held.contains(Direction::Up));
    assert!(!held.contains(Direction::Right));
    assert_eq!(held.iter().count(), 2);
}

#[test]
fn direction_units_are_screen_space() {
    assert_eq!(Direction::Up.unit(), (0.0, -1.0));
    assert_eq!(Direction::Down.unit(), (0.0, 1.0));
    assert_eq!(Direction::Left.unit(), (-1.0, 0.0));
    assert_eq!(Direction::Right.unit(), (1.0, 0.0));
}

// ── SpawnTimer ────────────────────────────────────────────────────────────────

#[test]
fn spawn_timer_due_only_strictly_after_interval() {
    let timer = SpawnTimer::new(1400.0);
    assert!(!timer.is_due(1400.0));
    assert!(timer.is_due(1400.5));
}

#[test]
fn spawn_timer_steps_down_to_floor() {
    let timer = SpawnTimer { last_ms: 0.0, interval_ms: 455.0 };
    let fired = timer.fired(2000.0, 8.0, 450.0);
    assert_eq!(fired.last_ms, 2000.0);
    assert_eq!(fired.interval_ms, 450.0);

    let again = fired.fired(3000.0, 8.0, 450.0);
    assert_eq!(again.interval_ms, 450.0);
}

// ── RunState ──────────────────────────────────────────────────────────────────

#[test]
fn run_state_clone_is_independent() {
    let original = init_state(&Tuning::default());
    let mut cloned = original.clone();

    cloned.hero.x = 99.0;
    cloned.score = 999;
    cloned.hazards.push(Hazard {
        x: 5.0,
        y: 5.0,
        width: 26.0,
        height: 26.0,
        vx: 0.0,
        vy: 0.2,
        spin: 0.0,
    });

    assert_eq!(original.hero.x, 335.0);
    assert_eq!(original.score, 0);
    assert!(original.hazards.is_empty());
}

#[test]
fn hero_invulnerability_flag() {
    let mut hero = init_state(&Tuning::default()).hero;
    assert!(!hero.is_invulnerable());
    hero.invulnerable_ms = 0.5;
    assert!(hero.is_invulnerable());
}
