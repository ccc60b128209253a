//! The simulation loop engine: owns one run and advances it frame by frame.
//!
//! The engine never schedules itself. The host calls [`Engine::advance`] once
//! per frame with the elapsed time and the held directions.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::compute::{init_state, tick};
use crate::config::Tuning;
use crate::entities::{HazardZone, Hazard, HeldDirections, Hero, Pickup, RunState, RunStatus};
use crate::events::{FrameEvents, NoopObserver, RunObserver};

pub struct Engine<R: Rng = StdRng> {
    tuning: Tuning,
    state: RunState,
    rng: R,
}

impl Engine<StdRng> {
    /// An engine seeded from OS entropy.
    pub fn new(tuning: Tuning) -> Self {
        Self::with_rng(tuning, StdRng::from_entropy())
    }
}

impl<R: Rng> Engine<R> {
    /// An engine in the `NotStarted` state drawing spawns from `rng`.
    pub fn with_rng(tuning: Tuning, rng: R) -> Self {
        let state = RunState { status: RunStatus::NotStarted, ..init_state(&tuning) };
        Self { tuning, state, rng }
    }

    /// Continue from an existing run state.
    pub fn resume(tuning: Tuning, state: RunState, rng: R) -> Self {
        Self { tuning, state, rng }
    }

    /// Reset everything and enter `Running`. Valid from any status.
    pub fn start(&mut self) {
        self.state = init_state(&self.tuning);
        info!("run started with {} lives", self.state.lives);
    }

    /// Same as [`Engine::start`], notifying `observer`.
    pub fn start_with(&mut self, observer: &mut dyn RunObserver) {
        self.start();
        observer.on_run_started();
    }

    /// Advance one frame.
    pub fn advance(&mut self, delta_ms: f64, held: HeldDirections) -> FrameEvents {
        self.advance_with(delta_ms, held, &mut NoopObserver)
    }

    /// Advance one frame and dispatch its events to `observer`.
    pub fn advance_with(
        &mut self,
        delta_ms: f64,
        held: HeldDirections,
        observer: &mut dyn RunObserver,
    ) -> FrameEvents {
        if self.state.status != RunStatus::Running {
            return FrameEvents::default();
        }
        if !(delta_ms.is_finite() && delta_ms >= 0.0) {
            warn!("ignoring frame delta {delta_ms}");
        }
        let (next, events) = tick(&self.state, delta_ms, held, &self.tuning, &mut self.rng);
        self.state = next;
        events.dispatch(observer);
        events
    }

    // ── Read accessors ───────────────────────────────────────────────────────

    pub fn status(&self) -> RunStatus {
        self.state.status
    }

    pub fn is_running(&self) -> bool {
        self.state.status == RunStatus::Running
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn lives(&self) -> u32 {
        self.state.lives
    }

    pub fn hero(&self) -> &Hero {
        &self.state.hero
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.state.hazards
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.state.pickups
    }

    pub fn zones(&self) -> &[HazardZone] {
        &self.state.zones
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}
