//! Per-frame events and the observer surface the presentation layer hooks into.

/// Everything observable that happened during one frame. Each event fires at
/// most once per frame and carries the value at the end of the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameEvents {
    /// New score.
    pub score_changed: Option<u32>,
    /// New level.
    pub level_changed: Option<u32>,
    /// Remaining lives.
    pub life_lost: Option<u32>,
    /// Final score.
    pub game_over: Option<u32>,
}

impl FrameEvents {
    pub fn is_empty(&self) -> bool {
        *self == FrameEvents::default()
    }

    /// Fire the matching callbacks in a fixed order:
    /// score, level, life lost, game over.
    pub fn dispatch(&self, observer: &mut dyn RunObserver) {
        if let Some(score) = self.score_changed {
            observer.on_score_changed(score);
        }
        if let Some(level) = self.level_changed {
            observer.on_level_changed(level);
        }
        if let Some(lives) = self.life_lost {
            observer.on_life_lost(lives);
        }
        if let Some(score) = self.game_over {
            observer.on_game_over(score);
        }
    }
}

/// Callbacks for run events. Every method defaults to doing nothing.
pub trait RunObserver {
    fn on_run_started(&mut self) {}
    fn on_score_changed(&mut self, _new_score: u32) {}
    fn on_level_changed(&mut self, _new_level: u32) {}
    fn on_life_lost(&mut self, _remaining_lives: u32) {}
    fn on_game_over(&mut self, _final_score: u32) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

// ── Status feed ───────────────────────────────────────────────────────────────

pub const IDLE_MESSAGE: &str = "Press start to begin infiltrating the net.";

/// Keeps the latest human-readable status line for the HUD.
#[derive(Clone, Debug)]
pub struct StatusFeed {
    message: String,
}

impl Default for StatusFeed {
    fn default() -> Self {
        Self { message: IDLE_MESSAGE.to_string() }
    }
}

impl StatusFeed {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl RunObserver for StatusFeed {
    fn on_run_started(&mut self) {
        self.message = "Collect routers to boost your bandwidth. Avoid red data spikes.".into();
    }

    fn on_score_changed(&mut self, new_score: u32) {
        self.message = format!("Bandwidth secured. Viral nodes purged: {new_score} Mbps.");
    }

    fn on_level_changed(&mut self, new_level: u32) {
        self.message = format!("Level {new_level}: deeper into the datastream.");
    }

    fn on_life_lost(&mut self, remaining_lives: u32) {
        if remaining_lives > 0 {
            self.message =
                format!("Firewall breached! Rerouting with {remaining_lives} attempts left.");
        }
    }

    fn on_game_over(&mut self, _final_score: u32) {
        self.message = "Connection severed. The net consumes the unprepared.".into();
    }
}
