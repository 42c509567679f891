//! Moto Dodge entry point
//!
//! Loads settings and the leaderboard, then runs the active screen at its
//! fixed rate in the terminal until the player quits. Logs go to
//! `moto-dodge.log` in the data directory (filtered by `RUST_LOG`).

use std::time::{Duration, Instant};

use anyhow::Context;
use glam::IVec2;

use moto_dodge::highscores::{HighScoreStore, LEADERBOARD_FILE};
use moto_dodge::persistence;
use moto_dodge::platform::{Terminal, TerminalAudio};
use moto_dodge::render::{Anchor, DrawCommand, colors};
use moto_dodge::settings::{SETTINGS_FILE, Settings};
use moto_dodge::{Control, Game};

fn main() -> anyhow::Result<()> {
    init_logging();
    log::info!("Moto Dodge starting...");

    let settings = load_settings();
    let store = HighScoreStore::in_data_dir().unwrap_or_else(|e| {
        log::warn!("Falling back to ./{}: {}", LEADERBOARD_FILE, e);
        HighScoreStore::new(LEADERBOARD_FILE)
    });
    log::info!("Leaderboard file: {}", store.path().display());

    let mut terminal = Terminal::open().context("failed to set up the terminal")?;
    let audio = TerminalAudio::new(settings.muted);
    let mut game = Game::new(settings, store, audio);

    run(&mut terminal, &mut game)?;

    drop(terminal);
    log::info!("Goodbye");
    Ok(())
}

/// Route `RUST_LOG` output to the log file; the terminal is the game screen
fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    let log_path = persistence::data_dir().map(|dir| dir.join(persistence::LOG_FILE));
    match log_path.and_then(|path| persistence::open_log_file(&path)) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

/// Settings from the data directory, writing defaults on first run
fn load_settings() -> Settings {
    let settings = Settings::load();
    if let Ok(dir) = persistence::data_dir() {
        if !dir.join(SETTINGS_FILE).exists() {
            settings.save();
        }
    }
    settings
}

fn run(terminal: &mut Terminal, game: &mut Game<TerminalAudio>) -> anyhow::Result<()> {
    let mut frame_times: Vec<Instant> = Vec::with_capacity(60);
    let mut fps = 0;

    loop {
        let frame_start = Instant::now();
        let frame_dur = Duration::from_secs_f64(1.0 / game.tick_rate() as f64);

        let events = terminal.poll_events().context("failed to read input")?;
        if game.frame(&events) == Control::Exit {
            return Ok(());
        }

        let mut cmds = game.draw();
        if game.settings().show_fps {
            frame_times.push(frame_start);
            if frame_times.len() > 60 {
                frame_times.remove(0);
            }
            if let (Some(first), Some(last)) = (frame_times.first(), frame_times.last()) {
                let elapsed = last.duration_since(*first).as_secs_f64();
                if elapsed > 0.0 {
                    fps = ((frame_times.len() - 1) as f64 / elapsed).round() as u32;
                }
            }
            cmds.push(DrawCommand::text(
                format!("FPS {}", fps),
                IVec2::new(10, 50),
                24,
                colors::HINT,
                Anchor::TopLeft,
            ));
        }
        terminal.present(&cmds).context("failed to draw frame")?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
