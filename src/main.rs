//! Headless demo runner.
//!
//! Generates a level from a seed, then drives the simulation with a
//! scripted input pattern (hold right, hop periodically) until the level is
//! won or the tick budget runs out. Useful for eyeballing generation and
//! for profiling the tick loop without a renderer.
//!
//! Usage: `plummet [seed] [config.ron]`

mod config;
mod game;

use std::env;
use std::process;

use log::{error, info};

use config::GameConfig;
use game::audio::NullAudio;
use game::input::{Control, ControlEdge};
use game::state::PlayState;

const TICK: f32 = 1.0 / 60.0;
/// Two simulated minutes.
const MAX_TICKS: u32 = 60 * 120;

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);

    let seed: u64 = match args.next() {
        Some(raw) => match raw.parse() {
            Ok(seed) => seed,
            Err(_) => {
                error!("seed must be an unsigned integer, got {raw:?}");
                process::exit(2);
            }
        },
        None => 48,
    };

    let config = match args.next() {
        Some(path) => match config::load_config(&path) {
            Ok(config) => {
                info!("loaded config from {path}");
                config
            }
            Err(err) => {
                error!("failed to load {path}: {err}");
                process::exit(2);
            }
        },
        None => GameConfig::default(),
    };

    let mut state = match PlayState::new(config, seed, Box::new(NullAudio)) {
        Ok(state) => state,
        Err(err) => {
            error!("failed to build play state: {err}");
            process::exit(1);
        }
    };

    state.handle_control(ControlEdge::Pressed(Control::MoveRight));

    let mut ticks = 0;
    let mut respawns = 0;
    let mut checkpoints = 0;
    while ticks < MAX_TICKS {
        if ticks % 45 == 20 {
            state.handle_control(ControlEdge::Pressed(Control::Jump));
        }

        state.tick(TICK);
        ticks += 1;
        respawns += state.events.respawn.len();
        checkpoints += state.events.checkpoint.len();

        if state.won() {
            break;
        }
    }

    info!(
        "finished after {ticks} ticks: won={}, respawns={respawns}, checkpoints={checkpoints}, \
         drawables={}",
        state.won(),
        state.draw_list().len()
    );
}
