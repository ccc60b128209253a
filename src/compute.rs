//! Pure game-logic functions.
//!
//! Every public function takes immutable inputs (and, where needed, an RNG
//! handle) and returns new values. Side effects are limited to the injected
//! RNG and to `log` output.

use std::f64::consts::TAU;

use log::{debug, info};
use rand::Rng;

use crate::config::Tuning;
use crate::entities::{
    Bounded, HazardZone, Hazard, HeldDirections, Hero, Pickup, RunState, RunStatus, SpawnTimer,
};
use crate::events::FrameEvents;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Strict AABB overlap between any two bounded entities.
pub fn intersects(a: &impl Bounded, b: &impl Bounded) -> bool {
    a.rect().overlaps(&b.rect())
}

/// Uniform draw in `[low, low + span)`. Never panics on an empty span.
fn roll(rng: &mut impl Rng, low: f64, span: f64) -> f64 {
    low + rng.gen::<f64>() * span.max(0.0)
}

/// Negative and non-finite deltas become an empty frame.
pub fn sanitize_delta(delta_ms: f64) -> f64 {
    if delta_ms.is_finite() && delta_ms > 0.0 {
        delta_ms
    } else {
        0.0
    }
}

fn clamp_hero(hero: &mut Hero, tuning: &Tuning) {
    let p = &tuning.playfield;
    hero.x = p.margin.max(hero.x.min(p.width - hero.width - p.margin));
    hero.y = p.margin.max(hero.y.min(p.height - hero.height - p.margin));
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// Build the initial state of a fresh run.
pub fn init_state(tuning: &Tuning) -> RunState {
    let p = &tuning.playfield;
    let h = &tuning.hero;
    RunState {
        hero: Hero {
            x: p.width / 2.0 - h.width / 2.0,
            y: p.height - h.start_offset_y,
            width: h.width,
            height: h.height,
            vx: 0.0,
            vy: 0.0,
            invulnerable_ms: 0.0,
        },
        hazards: Vec::new(),
        pickups: Vec::new(),
        zones: Vec::new(),
        score: 0,
        level: 1,
        lives: h.start_lives,
        clock_ms: 0.0,
        hazard_timer: SpawnTimer::new(tuning.hazards.spawn.initial_ms),
        pickup_timer: SpawnTimer::new(tuning.pickups.spawn.initial_ms),
        zone_timer: SpawnTimer::new(tuning.zones.period_ms),
        status: RunStatus::Running,
    }
}

// ── Hero ──────────────────────────────────────────────────────────────────────

/// Move the hero along the normalized sum of held directions, then clamp it
/// inside the playfield margins.
pub fn move_hero(
    hero: &Hero,
    held: HeldDirections,
    level: u32,
    delta_ms: f64,
    tuning: &Tuning,
) -> Hero {
    let (dx, dy) = held
        .iter()
        .map(|d| d.unit())
        .fold((0.0_f64, 0.0_f64), |(ax, ay), (ux, uy)| (ax + ux, ay + uy));

    let magnitude = dx.hypot(dy);
    let (vx, vy) = if magnitude > 0.0 {
        let speed = tuning.hero.base_speed
            * delta_ms
            * (1.0 + level as f64 * tuning.hero.level_speed_bonus);
        (dx / magnitude * speed, dy / magnitude * speed)
    } else {
        (0.0, 0.0)
    };

    let mut moved = Hero {
        x: hero.x + vx,
        y: hero.y + vy,
        vx,
        vy,
        ..hero.clone()
    };
    clamp_hero(&mut moved, tuning);
    moved
}

pub fn decay_invulnerability(hero: &Hero, delta_ms: f64) -> Hero {
    Hero {
        invulnerable_ms: (hero.invulnerable_ms - delta_ms).max(0.0),
        ..hero.clone()
    }
}

// ── Spawners ──────────────────────────────────────────────────────────────────

/// A new hazard just above the top edge.
pub fn spawn_hazard(rng: &mut impl Rng, level: u32, tuning: &Tuning) -> Hazard {
    let t = &tuning.hazards;
    let p = &tuning.playfield;
    let size = roll(rng, t.min_size, t.size_range);
    let x = roll(rng, p.spawn_inset, p.width - size - 2.0 * p.spawn_inset);
    let vy = roll(rng, t.base_speed, t.speed_jitter) + level as f64 * t.level_speed;
    let vx = roll(rng, -0.5, 1.0) * t.drift;
    let spin = roll(rng, 0.0, TAU);
    Hazard { x, y: -size, width: size, height: size, vx, vy, spin }
}

/// A new pickup just above the top edge, falling straight down.
pub fn spawn_pickup(rng: &mut impl Rng, level: u32, tuning: &Tuning) -> Pickup {
    let t = &tuning.pickups;
    let p = &tuning.playfield;
    let x = roll(rng, p.spawn_inset, p.width - t.size - 2.0 * p.spawn_inset);
    Pickup {
        x,
        y: -t.size,
        width: t.size,
        height: t.size,
        vx: 0.0,
        vy: t.base_speed + level as f64 * t.level_speed,
        pulse: 0.0,
    }
}

/// A new zone anywhere inside the spawn inset.
pub fn spawn_zone(rng: &mut impl Rng, tuning: &Tuning) -> HazardZone {
    let t = &tuning.zones;
    let p = &tuning.playfield;
    HazardZone {
        x: roll(rng, p.spawn_inset, p.width - t.width - 2.0 * p.spawn_inset),
        y: roll(rng, p.spawn_inset, p.height - t.height - 2.0 * p.spawn_inset),
        width: t.width,
        height: t.height,
        lifetime_ms: t.lifetime_ms,
    }
}

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Score granted by one pickup at `level`.
pub fn collect_reward(level: u32, tuning: &Tuning) -> u32 {
    let s = &tuning.scoring;
    s.base_reward.saturating_add(level.saturating_mul(s.level_reward_bonus))
}

/// Level reached with `score`, never below `current`.
pub fn level_for_score(score: u32, current: u32, tuning: &Tuning) -> u32 {
    let threshold = tuning.scoring.level_threshold.max(1);
    let mut level = current;
    while score / threshold > level.saturating_sub(1) {
        level += 1;
    }
    level
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the run by `delta_ms` milliseconds with `held` directions.
///
/// Returns the next state and the frame's events. A run that is not
/// `Running` is returned unchanged with no events.
pub fn tick(
    state: &RunState,
    delta_ms: f64,
    held: HeldDirections,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> (RunState, FrameEvents) {
    let mut events = FrameEvents::default();
    if state.status != RunStatus::Running {
        return (state.clone(), events);
    }

    let delta = sanitize_delta(delta_ms);
    let now = state.clock_ms + delta;
    let level = state.level;

    // ── 1. Move hero ─────────────────────────────────────────────────────────
    let hero = move_hero(&state.hero, held, level, delta, tuning);

    // ── 2. Invulnerability countdown ─────────────────────────────────────────
    let mut hero = decay_invulnerability(&hero, delta);

    // ── 3. Hazard spawner ────────────────────────────────────────────────────
    let mut hazards = state.hazards.clone();
    let mut hazard_timer = state.hazard_timer;
    if hazard_timer.is_due(now) {
        let hazard = spawn_hazard(rng, level, tuning);
        debug!("hazard spawned at x={:.1} size={:.1}", hazard.x, hazard.width);
        hazards.push(hazard);
        let s = &tuning.hazards.spawn;
        hazard_timer = hazard_timer.fired(now, s.step_ms, s.floor_ms);
    }

    // ── 4. Pickup spawner ────────────────────────────────────────────────────
    let mut pickups = state.pickups.clone();
    let mut pickup_timer = state.pickup_timer;
    if pickup_timer.is_due(now) {
        let pickup = spawn_pickup(rng, level, tuning);
        debug!("pickup spawned at x={:.1}", pickup.x);
        pickups.push(pickup);
        let s = &tuning.pickups.spawn;
        pickup_timer = pickup_timer.fired(now, s.step_ms, s.floor_ms);
    }

    // ── 5. Zone spawner (fixed period) ───────────────────────────────────────
    let mut zones = state.zones.clone();
    let mut zone_timer = state.zone_timer;
    if zone_timer.is_due(now) {
        let zone = spawn_zone(rng, tuning);
        debug!("zone spawned at ({:.1}, {:.1})", zone.x, zone.y);
        zones.push(zone);
        let s = tuning.zone_spawner();
        zone_timer = zone_timer.fired(now, s.step_ms, s.floor_ms);
    }

    // ── 6. Advance & cull ────────────────────────────────────────────────────
    let zones: Vec<HazardZone> = zones
        .into_iter()
        .map(|z| HazardZone { lifetime_ms: z.lifetime_ms - delta, ..z })
        .filter(|z| z.lifetime_ms > 0.0)
        .collect();

    let hazard_limit = tuning.playfield.height + tuning.hazards.cull_margin;
    let hazards: Vec<Hazard> = hazards
        .into_iter()
        .map(|h| Hazard {
            x: h.x + h.vx * delta,
            y: h.y + h.vy * delta,
            spin: h.spin + delta * tuning.hazards.spin_rate,
            ..h
        })
        .filter(|h| h.y < hazard_limit)
        .collect();

    let pickup_limit = tuning.playfield.height + tuning.pickups.cull_margin;
    let pickups: Vec<Pickup> = pickups
        .into_iter()
        .map(|p| Pickup {
            x: p.x + p.vx * delta,
            y: p.y + p.vy * delta,
            pulse: p.pulse + delta * tuning.pickups.pulse_rate,
            ..p
        })
        .filter(|p| p.y < pickup_limit)
        .collect();

    // ── 7. Collision: hero ↔ zones (one-way floor) ───────────────────────────
    for zone in &zones {
        if intersects(&hero, zone) {
            hero.y = zone.y - hero.height - tuning.hero.zone_clearance;
        }
    }
    clamp_hero(&mut hero, tuning);

    // ── 8. Collision: hero ↔ hazards, in spawn order ─────────────────────────
    let mut lives = state.lives;
    let mut status = RunStatus::Running;
    let mut surviving_hazards = Vec::with_capacity(hazards.len());

    for hazard in hazards {
        let hit = status == RunStatus::Running
            && !hero.is_invulnerable()
            && intersects(&hero, &hazard);
        if !hit {
            surviving_hazards.push(hazard);
            continue;
        }
        lives = lives.saturating_sub(1);
        hero.invulnerable_ms = tuning.hero.grace_ms;
        events.life_lost = Some(lives);
        info!("life lost, {lives} remaining");
        if lives == 0 {
            status = RunStatus::GameOver;
            events.game_over = Some(state.score);
            info!("game over with score {}", state.score);
        }
    }

    // ── 9. Collision: hero ↔ pickups ─────────────────────────────────────────
    let mut score = state.score;
    let mut new_level = level;
    let pickups: Vec<Pickup> = if status == RunStatus::Running {
        pickups
            .into_iter()
            .filter(|pickup| {
                if !intersects(&hero, pickup) {
                    return true;
                }
                score = score.saturating_add(collect_reward(new_level, tuning));
                new_level = level_for_score(score, new_level, tuning);
                false
            })
            .collect()
    } else {
        pickups
    };

    if score != state.score {
        events.score_changed = Some(score);
    }
    if new_level != level {
        events.level_changed = Some(new_level);
        info!("level up to {new_level}");
    }

    // ── 10. Assemble the next state ──────────────────────────────────────────
    let next = RunState {
        hero,
        hazards: surviving_hazards,
        pickups,
        zones,
        score,
        level: new_level,
        lives,
        clock_ms: now,
        hazard_timer,
        pickup_timer,
        zone_timer,
        status,
    };
    (next, events)
}
