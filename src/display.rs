//! Rendering layer. All terminal output goes through here.
//!
//! Each function receives a mutable writer and an immutable view of the run.
//! No game logic is performed; world coordinates are only scaled onto the
//! terminal grid.

use std::f64::consts::TAU;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use internet_gauntlet::config::Tuning;
use internet_gauntlet::entities::{HazardZone, Hazard, Hero, Pickup, RunState, RunStatus};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkCyan;
const C_HUD_SCORE: Color = Color::Cyan;
const C_HUD_LEVEL: Color = Color::Green;
const C_HUD_LIVES: Color = Color::Red;
const C_HERO: Color = Color::White;
const C_HERO_BLINK: Color = Color::DarkGrey;
const C_HAZARD: Color = Color::Red;
const C_PICKUP: Color = Color::Cyan;
const C_ZONE: Color = Color::Yellow;
const C_ZONE_FADING: Color = Color::DarkYellow;
const C_STATUS: Color = Color::DarkCyan;

const HAZARD_GLYPHS: [&str; 4] = ["✶", "✷", "✸", "✹"];

/// Everything the renderer needs besides the run state.
pub struct Frame<'a> {
    pub state: &'a RunState,
    pub tuning: &'a Tuning,
    pub status: &'a str,
    pub high_score: u32,
    pub width: u16,
    pub height: u16,
}

// ── World → terminal mapping ──────────────────────────────────────────────────

/// The playfield interior: columns `1..width-1`, rows `2..height-2`.
struct Viewport {
    world_w: f64,
    world_h: f64,
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn new(frame: &Frame) -> Self {
        Viewport {
            world_w: frame.tuning.playfield.width,
            world_h: frame.tuning.playfield.height,
            cols: frame.width.saturating_sub(2).max(1),
            rows: frame.height.saturating_sub(4).max(1),
        }
    }

    /// Terminal column for world x, or `None` when off-field.
    fn col(&self, x: f64) -> Option<u16> {
        let c = (x / self.world_w * self.cols as f64).floor();
        (c >= 0.0 && c < self.cols as f64).then(|| 1 + c as u16)
    }

    fn row(&self, y: f64) -> Option<u16> {
        let r = (y / self.world_h * self.rows as f64).floor();
        (r >= 0.0 && r < self.rows as f64).then(|| 2 + r as u16)
    }

    /// Cell span covered by `[start, start + len)`, at least one cell wide.
    fn col_span(&self, start: f64, len: f64) -> Option<(u16, u16)> {
        let first = self.col(start.max(0.0))?;
        let last = self.col((start + len).min(self.world_w - f64::EPSILON)).unwrap_or(first);
        Some((first, last.max(first)))
    }

    fn row_span(&self, start: f64, len: f64) -> Option<(u16, u16)> {
        let first = self.row(start.max(0.0))?;
        let last = self.row((start + len).min(self.world_h - f64::EPSILON)).unwrap_or(first);
        Some((first, last.max(first)))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, frame: &Frame) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let view = Viewport::new(frame);
    draw_border(out, frame)?;
    draw_hud(out, frame)?;

    let state = frame.state;
    for zone in &state.zones {
        draw_zone(out, &view, zone, frame.tuning.zones.lifetime_ms)?;
    }
    for pickup in &state.pickups {
        draw_pickup(out, &view, pickup)?;
    }
    for hazard in &state.hazards {
        draw_hazard(out, &view, hazard)?;
    }
    draw_hero(out, &view, &state.hero, state.clock_ms)?;
    draw_status(out, frame)?;

    if state.status == RunStatus::GameOver {
        draw_game_over(out, frame)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, frame.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, frame: &Frame) -> std::io::Result<()> {
    let w = frame.width as usize;
    let h = frame.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(frame.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, frame: &Frame) -> std::io::Result<()> {
    let state = frame.state;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    let best = frame.high_score.max(state.score);
    if best > 0 {
        out.queue(Print(format!("Score:{:>6}  Hi:{:>6}", state.score, best)))?;
    } else {
        out.queue(Print(format!("Score:{:>6}", state.score)))?;
    }

    let level_str = format!("[ LEVEL {} ]", state.level);
    let lx = (frame.width / 2).saturating_sub(level_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    let lives_str = format!("Stability:{}", "♥".repeat(state.lives as usize));
    let rx = frame
        .width
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_hero<W: Write>(
    out: &mut W,
    view: &Viewport,
    hero: &Hero,
    clock_ms: f64,
) -> std::io::Result<()> {
    let (Some((c0, c1)), Some((r0, r1))) = (
        view.col_span(hero.x, hero.width),
        view.row_span(hero.y, hero.height),
    ) else {
        return Ok(());
    };

    // Blink at ~6 Hz while the grace period runs
    let blink = hero.is_invulnerable() && (clock_ms / 80.0) as u64 % 2 == 1;
    out.queue(style::SetForegroundColor(if blink { C_HERO_BLINK } else { C_HERO }))?;

    let body = "█".repeat((c1 - c0 + 1) as usize);
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&body))?;
    }
    Ok(())
}

fn draw_hazard<W: Write>(out: &mut W, view: &Viewport, hazard: &Hazard) -> std::io::Result<()> {
    let cx = hazard.x + hazard.width / 2.0;
    let cy = hazard.y + hazard.height / 2.0;
    let (Some(col), Some(row)) = (view.col(cx), view.row(cy)) else {
        return Ok(());
    };
    let phase = (hazard.spin.rem_euclid(TAU) / TAU * HAZARD_GLYPHS.len() as f64) as usize;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_HAZARD))?;
    out.queue(Print(HAZARD_GLYPHS[phase % HAZARD_GLYPHS.len()]))?;
    Ok(())
}

fn draw_pickup<W: Write>(out: &mut W, view: &Viewport, pickup: &Pickup) -> std::io::Result<()> {
    let cx = pickup.x + pickup.width / 2.0;
    let cy = pickup.y + pickup.height / 2.0;
    let (Some(col), Some(row)) = (view.col(cx), view.row(cy)) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_PICKUP))?;
    out.queue(Print(if pickup.pulse.sin() >= 0.0 { "▣" } else { "□" }))?;
    Ok(())
}

fn draw_zone<W: Write>(
    out: &mut W,
    view: &Viewport,
    zone: &HazardZone,
    full_lifetime_ms: f64,
) -> std::io::Result<()> {
    let (Some((c0, c1)), Some(row)) = (view.col_span(zone.x, zone.width), view.row(zone.y)) else {
        return Ok(());
    };
    let fading = zone.lifetime_ms < full_lifetime_ms * 0.3;
    out.queue(cursor::MoveTo(c0, row))?;
    out.queue(style::SetForegroundColor(if fading { C_ZONE_FADING } else { C_ZONE }))?;
    out.queue(Print("▬".repeat((c1 - c0 + 1) as usize)))?;
    Ok(())
}

// ── Status feed (last row) ────────────────────────────────────────────────────

fn draw_status<W: Write>(out: &mut W, frame: &Frame) -> std::io::Result<()> {
    let max = frame.width.saturating_sub(2) as usize;
    let line: String = frame.status.chars().take(max).collect();
    out.queue(cursor::MoveTo(1, frame.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_STATUS))?;
    out.queue(Print(line))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, frame: &Frame) -> std::io::Result<()> {
    let score = frame.state.score;
    let new_best = score >= frame.high_score && score > 0;
    let score_line = format!("Final Score: {:>6}", score);
    let best_line = if new_best {
        format!("★ NEW BEST: {:>6} ★", score)
    } else {
        format!("Best Score:  {:>6}", frame.high_score.max(score))
    };

    let lines: &[(&str, Color)] = &[
        ("╔══════════════════════╗", Color::Red),
        ("║  CONNECTION SEVERED  ║", Color::Red),
        ("╚══════════════════════╝", Color::Red),
    ];
    let best_color = if new_best { Color::Yellow } else { Color::DarkGrey };

    let cx = frame.width / 2;
    let total_rows = lines.len() + 3;
    let start_row = (frame.height / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let score_row = start_row + lines.len() as u16;
    let rows: [(&str, u16, Color); 3] = [
        (score_line.as_str(), score_row, Color::Yellow),
        (best_line.as_str(), score_row + 1, best_color),
        ("R - Restart  M - Menu  Q - Quit", score_row + 2, Color::White),
    ];
    for (text, row, color) in rows {
        let col = cx.saturating_sub(text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(text))?;
    }

    Ok(())
}
