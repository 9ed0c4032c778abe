//! Jumpi Quest entry point
//!
//! Headless demo runner: generates a level, lets the planning autopilot play
//! it to the end on a simulated 60 Hz frame clock and records the score.
//!
//! Usage: `jumpi-quest [difficulty] [seed]`

use std::error::Error;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use jumpi_quest::consts::SIM_DT;
use jumpi_quest::highscores::report_finished_run;
use jumpi_quest::platform::FrameClock;
use jumpi_quest::sim::{Autopilot, FrameResult, GameEvent, RunState};
use jumpi_quest::{Difficulty, HighScores, ScoreKeeper, ScoreSink, Settings};

/// Simulated display refresh driving the frame clock
const FRAME_SECS: f64 = 1.0 / 60.0;

fn data_dir() -> PathBuf {
    std::env::var_os("JUMPI_QUEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".jumpi-quest"))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn fresh_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = data_dir();
    let settings_path = dir.join("settings.json");
    let scores_path = dir.join("highscores.json");
    let settings = Settings::load(&settings_path);

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        Some(name) => Difficulty::from_str(&name).ok_or_else(|| format!("unknown difficulty '{name}'"))?,
        None => settings.difficulty,
    };
    let seed = match args.next() {
        Some(s) => s.parse::<u64>().map_err(|e| format!("bad seed '{s}': {e}"))?,
        None => settings.seed.unwrap_or_else(fresh_seed),
    };

    log::info!("Jumpi Quest starting: difficulty={}, seed={}", difficulty.as_str(), seed);

    let mut state = RunState::new(difficulty, seed)?;
    let mut keeper = ScoreKeeper::new(HighScores::load(&scores_path));
    let mut clock = FrameClock::new(settings.effective_max_frame_dt());
    let mut pilot = Autopilot::new();

    let mut now = 0.0f64;
    clock.advance(now);
    let mut outcome = FrameResult::Continue;

    'frames: while state.elapsed < settings.max_run_secs {
        now += FRAME_SECS;
        for _ in 0..clock.advance(now) {
            let intents = pilot.next_intents(&state);
            outcome = state.advance(SIM_DT, intents);

            for event in state.drain_events() {
                match event {
                    GameEvent::ItemCollected { .. } => keeper.score_changed(state.score),
                    GameEvent::Damaged { lives } => log::info!("Ouch! {} lives left", lives),
                    _ => {}
                }
            }
            if state.phase.is_over() {
                break 'frames;
            }
        }
    }

    match outcome {
        FrameResult::Won(score) => log::info!("Reached the goal in {:.1}s, score {}", state.elapsed, score),
        FrameResult::Lost(score) => log::info!("Out of lives at x={:.0}, score {}", state.player.pos.x, score),
        _ => log::warn!("Gave up after {:.0}s at x={:.0}", state.elapsed, state.player.pos.x),
    }

    if report_finished_run(&mut keeper, &state, difficulty, unix_now()) == Some(true) {
        println!("New high score: {}", keeper.high());
    }
    println!(
        "{} seed {}: {} with {} points ({} lives left)",
        difficulty.as_str(),
        seed,
        match outcome {
            FrameResult::Won(_) => "won",
            FrameResult::Lost(_) => "lost",
            _ => "unfinished",
        },
        state.score,
        state.player.lives(),
    );

    keeper.into_board().save(&scores_path)?;
    settings.save(&settings_path)?;
    Ok(())
}
