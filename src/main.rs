mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use log::{info, warn};

use internet_gauntlet::config::{AppConfig, Tuning};
use internet_gauntlet::engine::Engine;
use internet_gauntlet::entities::RunStatus;
use internet_gauntlet::error::GauntletError;
use internet_gauntlet::events::StatusFeed;
use internet_gauntlet::input::{self, HeldKeys};

use display::Frame;

// ── Frame pacing ──────────────────────────────────────────────────────────────

/// Longest frame fed to the engine; a stalled terminal must not teleport
/// entities across the playfield.
const MAX_FRAME_MS: f64 = 100.0;

// ── High-score persistence ────────────────────────────────────────────────────

fn load_high_score(path: &Path) -> u32 {
    match std::fs::read_to_string(path) {
        Ok(s) => s.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring malformed high score in {}", path.display());
            0
        }),
        Err(_) => 0,
    }
}

fn save_high_score(path: &Path, score: u32) {
    if let Err(e) = std::fs::write(path, score.to_string()) {
        warn!("cannot save high score to {}: {e}", path.display());
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    high_score: u32,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "▓▒░  INTERNET  GAUNTLET  ░▒▓";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if high_score > 0 {
        let hs_str = format!("High Score: {}", high_score);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(hs_str.chars().count() as u16 / 2),
            cy.saturating_sub(5),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&hs_str))?;
    }

    let legend: &[(&str, Color, &str)] = &[
        ("█", Color::White, " You: WASD / arrow keys to navigate"),
        ("▣", Color::Cyan, " Router: collect for bandwidth (score)"),
        ("✶", Color::Red, " Viral shard: costs one stability"),
        ("▬", Color::Yellow, " Firewall plate: a floor you can stand on"),
    ];
    for (i, (sym, color, desc)) in legend.iter().enumerate() {
        let row = cy.saturating_sub(3) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(20), row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*desc))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(20), cy + 3))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("[ENTER] Initiate Gauntlet   [Q] Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) => match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program, `false` → back to menu.
///
/// Input model: `held_keys` records the press, repeat and release events of
/// each key. Each frame the keys it still reports as held form the direction
/// set handed to the engine, so diagonals work by holding two keys.
fn game_loop<W: Write>(
    out: &mut W,
    engine: &mut Engine,
    high_score: &mut u32,
    config: &AppConfig,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let frame_budget = Duration::from_secs_f64(1.0 / config.fps as f64);
    let mut feed = StatusFeed::default();
    let mut held_keys = HeldKeys::new();

    engine.start_with(&mut feed);
    let mut previous = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            let code = input::normalize(code);
            match kind {
                KeyEventKind::Press => {
                    held_keys.press(code.clone(), frame_start);
                    match code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('r') => {
                            info!("restart requested");
                            engine.start_with(&mut feed);
                        }
                        KeyCode::Char('m') if engine.status() == RunStatus::GameOver => {
                            return Ok(false);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => held_keys.repeat(code, frame_start),
                KeyEventKind::Release => held_keys.release(code),
            }
        }

        // ── Advance the simulation by the real elapsed time ───────────────────
        let delta_ms = (frame_start.duration_since(previous).as_secs_f64() * 1000.0)
            .min(MAX_FRAME_MS);
        previous = frame_start;

        let held = held_keys.directions(frame_start);
        let events = engine.advance_with(delta_ms, held, &mut feed);

        if let Some(final_score) = events.game_over {
            if final_score > *high_score {
                *high_score = final_score;
                save_high_score(&config.high_score_path, final_score);
            }
        }

        let (width, height) = terminal::size()?;
        display::render(
            out,
            &Frame {
                state: engine.state(),
                tuning: engine.tuning(),
                status: feed.message(),
                high_score: *high_score,
                width,
                height,
            },
        )?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(config: &AppConfig) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    // The terminal is in raw alternate-screen mode, so logs go to a file.
    match File::create(&config.log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

fn main() -> Result<(), GauntletError> {
    let config = AppConfig::load();
    let tuning = config.tuning()?;

    if config.print_config {
        println!("{}", tuning.to_ron_string()?);
        return Ok(());
    }

    init_logging(&config);
    info!("starting with tuning from {:?}", config.tuning_path);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config, tuning);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.map_err(GauntletError::from)
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &AppConfig,
    tuning: Tuning,
) -> std::io::Result<()> {
    let mut high_score = load_high_score(&config.high_score_path);
    let mut engine = Engine::new(tuning);

    loop {
        match show_menu(out, rx, high_score)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let quit = game_loop(out, &mut engine, &mut high_score, config, rx)?;

                // A run abandoned mid-way still counts toward the best score
                if engine.score() > high_score {
                    high_score = engine.score();
                    save_high_score(&config.high_score_path, high_score);
                }

                if quit {
                    break;
                }
            }
        }
    }
    info!("exiting, high score {high_score}");
    Ok(())
}
