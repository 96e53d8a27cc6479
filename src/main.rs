//! Chalk Runner headless driver
//!
//! Plays through a level set with scripted input and logs what a renderer
//! would draw. Usage: `chalk-runner [levels.json]` (built-in levels by default).
//! Set `RUST_LOG=debug` for per-frame output.

use std::error::Error;
use std::thread;
use std::time::{Duration, Instant};

use chalk_runner::sim::{GameEvent, GameState};
use chalk_runner::{
    Frame, FrameSink, GameLoop, InputFlags, LevelSet, Progression, Settings, SurfaceError,
};

/// Give up on a level that is not finished in this long
const LEVEL_TIMEOUT: Duration = Duration::from_secs(60);
/// Host-side poll cadence for events and scripted input
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Logs a summary line once a second of ticks
struct LogSink;

impl FrameSink for LogSink {
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), SurfaceError> {
        if frame.tick % 60 == 0 {
            let actor = frame.actor();
            log::debug!(
                "tick {} dt {:?}: player ({:.0}, {:.0}) grounded={} progress {:.0}, {} stars left",
                frame.tick,
                frame.dt,
                actor.pos.x,
                actor.pos.y,
                actor.grounded,
                frame.world().progress(),
                frame.collectibles().len()
            );
        }
        Ok(())
    }
}

/// Run right, hop periodically, grapple whenever an anchor is in reach
fn script_input(input: &InputFlags, polls: u64, anchor_in_reach: bool) {
    input.set_move_right(true);
    input.set_jump(polls % 45 < 3);
    if anchor_in_reach {
        input.tap_grapple();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let levels = match std::env::args().nth(1) {
        Some(path) => LevelSet::from_json(&std::fs::read_to_string(&path)?)?,
        None => LevelSet::builtin(),
    };
    let settings = Settings::default();
    let mut progression = Progression::new(levels);

    let first = GameState::from_level(progression.current(), &settings)?;
    let mut game = GameLoop::new(first, settings.clone(), LogSink);
    let input = game.input();
    game.start()?;

    let mut level_started = Instant::now();
    let mut polls = 0u64;
    loop {
        thread::sleep(POLL_INTERVAL);
        polls += 1;

        let anchor_in_reach = game.read(|s| !s.actor.is_grappling() && s.active_anchor().is_some());
        script_input(&input, polls, anchor_in_reach);

        let mut complete = false;
        for event in game.drain_events() {
            match event {
                GameEvent::CollectiblePicked { id } => log::info!("picked up star {id}"),
                GameEvent::LevelComplete => complete = true,
            }
        }

        if complete {
            let stars = game.read(|s| s.stars_collected);
            log::info!(
                "finished \"{}\" with {stars} stars in {:.1}s",
                progression.current().title,
                level_started.elapsed().as_secs_f32()
            );
            match progression.advance() {
                Some(next) => {
                    game.load_state(GameState::from_level(next, &settings)?);
                    level_started = Instant::now();
                }
                None => break,
            }
        } else if level_started.elapsed() > LEVEL_TIMEOUT {
            log::warn!("\"{}\" timed out", progression.current().title);
            break;
        }
    }

    game.stop()?;
    Ok(())
}
