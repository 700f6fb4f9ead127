//! Horde Siege headless runner
//!
//! Drives the simulation without a renderer: useful for soak runs and for
//! checking that a seed plays out the same way every time.
//!
//! Usage: `horde-siege [settings.json]`

use std::path::Path;

use serde::Serialize;

use horde_siege::Settings;
use horde_siege::sim::{GameEvent, GameState, TickInput, World, tick, wave_status};

/// Final report printed as JSON
#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    frames: u64,
    seconds: f32,
    wave: u32,
    score: u64,
    kills: u32,
    health: f32,
    game_over: bool,
}

fn run(settings: &Settings) -> RunSummary {
    let mut state = GameState::with_world(settings.seed, World::city(), settings.max_particles());
    let input = TickInput {
        autopilot: settings.autopilot,
        ..Default::default()
    };

    for frame in 1..=settings.frames {
        tick(&mut state, &input, settings.frame_dt);

        for event in &state.events {
            if let GameEvent::WaveStarted { wave, boss } = event {
                log::info!("Reached wave {}{}", wave, if *boss { " (boss)" } else { "" });
            }
        }

        if settings.log_every > 0 && frame % settings.log_every == 0 {
            let status = wave_status(&state);
            log::info!(
                "frame {:>6} | wave {} | alive {:>3} | remaining {:>4} | hp {:>5.1} | score {}",
                frame,
                status.wave,
                status.alive,
                status.remaining,
                state.player.health,
                state.player.score
            );
        }

        if state.game_over {
            break;
        }
    }

    RunSummary {
        seed: settings.seed,
        frames: state.frame,
        seconds: state.frame as f32 * settings.frame_dt,
        wave: state.wave(),
        score: state.player.score,
        kills: state.kills,
        health: state.player.health,
        game_over: state.game_over,
    }
}

fn main() {
    env_logger::init();
    log::info!("Horde Siege (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };

    let summary = run(&settings);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not encode run summary: {}", e),
    }
}
