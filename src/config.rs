//! Gameplay tuning and process configuration.
//!
//! `Tuning` holds every constant the simulation reads. Each group derives
//! `Default` with the stock values and is `#[serde(default)]`, so a RON file
//! only needs to name the fields it changes:
//!
//! ```ron
//! (
//!     hazards: (spawn: (initial_ms: 1000.0)),
//!     scoring: (level_threshold: 300),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ── Tuning groups ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
    /// Inset the hero is clamped to on every side.
    pub margin: f64,
    /// Inset used for random spawn x positions.
    pub spawn_inset: f64,
}

impl Default for Playfield {
    fn default() -> Self {
        Self { width: 720.0, height: 480.0, margin: 10.0, spawn_inset: 20.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroTuning {
    pub width: f64,
    pub height: f64,
    /// Distance from the bottom edge of the playfield at run start.
    pub start_offset_y: f64,
    pub start_lives: u32,
    /// World units per millisecond at level 0.
    pub base_speed: f64,
    /// Fractional speed gained per level.
    pub level_speed_bonus: f64,
    pub grace_ms: f64,
    /// Gap left between the hero and a zone it lands on.
    pub zone_clearance: f64,
}

impl Default for HeroTuning {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 70.0,
            start_offset_y: 90.0,
            start_lives: 3,
            base_speed: 0.3,
            level_speed_bonus: 0.08,
            grace_ms: 1200.0,
            zone_clearance: 2.0,
        }
    }
}

/// Interval schedule for one spawner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTuning {
    pub initial_ms: f64,
    pub step_ms: f64,
    pub floor_ms: f64,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self { initial_ms: 1000.0, step_ms: 0.0, floor_ms: 1000.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub spawn: SpawnerTuning,
    pub min_size: f64,
    pub size_range: f64,
    pub base_speed: f64,
    pub speed_jitter: f64,
    pub level_speed: f64,
    /// Full width of the horizontal drift range, centred on zero.
    pub drift: f64,
    pub spin_rate: f64,
    /// How far past the bottom edge a hazard travels before it is dropped.
    pub cull_margin: f64,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            spawn: SpawnerTuning { initial_ms: 1400.0, step_ms: 8.0, floor_ms: 450.0 },
            min_size: 26.0,
            size_range: 40.0,
            base_speed: 0.15,
            speed_jitter: 0.2,
            level_speed: 0.05,
            drift: 0.1,
            spin_rate: 0.003,
            cull_margin: 60.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    pub spawn: SpawnerTuning,
    pub size: f64,
    pub base_speed: f64,
    pub level_speed: f64,
    pub pulse_rate: f64,
    pub cull_margin: f64,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            spawn: SpawnerTuning { initial_ms: 2600.0, step_ms: 12.0, floor_ms: 1600.0 },
            size: 32.0,
            base_speed: 0.14,
            level_speed: 0.04,
            pulse_rate: 0.004,
            cull_margin: 40.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTuning {
    /// Fixed spawn period; zones do not speed up with level.
    pub period_ms: f64,
    pub width: f64,
    pub height: f64,
    pub lifetime_ms: f64,
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self { period_ms: 6800.0, width: 120.0, height: 20.0, lifetime_ms: 4200.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub base_reward: u32,
    pub level_reward_bonus: u32,
    /// Score needed per level.
    pub level_threshold: u32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self { base_reward: 75, level_reward_bonus: 15, level_threshold: 400 }
    }
}

// ── Tuning ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield: Playfield,
    pub hero: HeroTuning,
    pub hazards: HazardTuning,
    pub pickups: PickupTuning,
    pub zones: ZoneTuning,
    pub scoring: ScoringTuning,
}

impl Tuning {
    /// Parse and validate a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning =
            ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a RON tuning file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.playfield;
        positive("playfield.width", p.width)?;
        positive("playfield.height", p.height)?;
        non_negative("playfield.margin", p.margin)?;
        non_negative("playfield.spawn_inset", p.spawn_inset)?;

        let h = &self.hero;
        positive("hero.width", h.width)?;
        positive("hero.height", h.height)?;
        non_negative("hero.base_speed", h.base_speed)?;
        non_negative("hero.level_speed_bonus", h.level_speed_bonus)?;
        non_negative("hero.grace_ms", h.grace_ms)?;
        non_negative("hero.zone_clearance", h.zone_clearance)?;
        if h.start_lives == 0 {
            return Err(invalid("hero.start_lives must be at least 1"));
        }
        if h.width + 2.0 * p.margin > p.width || h.height + 2.0 * p.margin > p.height {
            return Err(invalid("hero does not fit inside the playfield margins"));
        }

        spawner("hazards.spawn", &self.hazards.spawn)?;
        spawner("pickups.spawn", &self.pickups.spawn)?;

        let z = &self.hazards;
        positive("hazards.min_size", z.min_size)?;
        non_negative("hazards.size_range", z.size_range)?;
        non_negative("hazards.cull_margin", z.cull_margin)?;
        fits_across(p, z.min_size + z.size_range, "hazards")?;

        positive("pickups.size", self.pickups.size)?;
        non_negative("pickups.cull_margin", self.pickups.cull_margin)?;
        fits_across(p, self.pickups.size, "pickups")?;

        let zones = &self.zones;
        positive("zones.period_ms", zones.period_ms)?;
        positive("zones.width", zones.width)?;
        positive("zones.height", zones.height)?;
        positive("zones.lifetime_ms", zones.lifetime_ms)?;
        fits_across(p, zones.width, "zones")?;
        if zones.height + 2.0 * p.spawn_inset > p.height {
            return Err(invalid("zones are taller than the playfield spawn area"));
        }

        if self.scoring.level_threshold == 0 {
            return Err(invalid("scoring.level_threshold must be at least 1"));
        }
        Ok(())
    }

    /// The zones' fixed period as a spawner schedule (no step, floor equal to
    /// the period).
    pub fn zone_spawner(&self) -> SpawnerTuning {
        SpawnerTuning {
            initial_ms: self.zones.period_ms,
            step_ms: 0.0,
            floor_ms: self.zones.period_ms,
        }
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a positive number, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be zero or more, got {value}")))
    }
}

fn spawner(name: &str, s: &SpawnerTuning) -> Result<(), ConfigError> {
    positive(&format!("{name}.initial_ms"), s.initial_ms)?;
    non_negative(&format!("{name}.step_ms"), s.step_ms)?;
    positive(&format!("{name}.floor_ms"), s.floor_ms)?;
    if s.floor_ms > s.initial_ms {
        return Err(invalid(format!(
            "{name}.floor_ms ({}) is above initial_ms ({})",
            s.floor_ms, s.initial_ms
        )));
    }
    Ok(())
}

fn fits_across(p: &Playfield, size: f64, what: &str) -> Result<(), ConfigError> {
    if size + 2.0 * p.spawn_inset > p.width {
        return Err(invalid(format!("{what} are wider than the playfield spawn area")));
    }
    Ok(())
}

// ── Process configuration ─────────────────────────────────────────────────────

/// Settings for the terminal host, read from CLI flags and the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// RON tuning file; the stock tuning is used when absent.
    pub tuning_path: Option<PathBuf>,
    pub log_file: PathBuf,
    pub high_score_path: PathBuf,
    pub fps: u32,
    /// Print the effective tuning as RON and exit.
    pub print_config: bool,
}

impl AppConfig {
    /// Load configuration from CLI arguments and environment variables.
    ///
    /// Environment variables:
    /// - `GAUNTLET_CONFIG` - Path to a RON tuning file
    /// - `GAUNTLET_LOG_FILE` - Log destination (default: `internet_gauntlet.log` in the temp dir)
    /// - `GAUNTLET_FPS` - Target frame rate (default: 60)
    /// - `HOME` - Directory holding the high-score file
    ///
    /// CLI flags:
    /// - `--config <PATH>` - Overrides `GAUNTLET_CONFIG`
    /// - `--print-config` - Dump the tuning and exit
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_args(&args, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with injected arguments and environment.
    pub fn from_args(args: &[String], env: impl Fn(&str) -> Option<String>) -> Self {
        let tuning_path = Self::parse_cli_value(args, "--config")
            .or_else(|| env("GAUNTLET_CONFIG"))
            .map(PathBuf::from);

        let log_file = env("GAUNTLET_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("internet_gauntlet.log"));

        let home = env("HOME").unwrap_or_else(|| ".".to_string());
        let high_score_path = PathBuf::from(home).join(".internet_gauntlet_score");

        let fps = env("GAUNTLET_FPS")
            .and_then(|v| v.parse().ok())
            .filter(|&fps: &u32| (1..=240).contains(&fps))
            .unwrap_or(60);

        AppConfig {
            tuning_path,
            log_file,
            high_score_path,
            fps,
            print_config: args.iter().any(|a| a == "--print-config"),
        }
    }

    /// The tuning named by `tuning_path`, or the defaults.
    pub fn tuning(&self) -> Result<Tuning, ConfigError> {
        match &self.tuning_path {
            Some(path) => Tuning::load(path),
            None => Ok(Tuning::default()),
        }
    }

    /// Parse a CLI flag value like `--config gauntlet.ron`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}
