//! Headless симуляция GoalRush
//!
//! Запуск: `goalrush_simulation [config.json]`
//! Поднимает маленький матч (игрок, два AI, ворота) и крутит 1000 тиков.

use std::process::ExitCode;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use goalrush_simulation::{
    create_headless_app_with_config, log_error, log_info, Health, MatchState, SimulationConfig, Team,
};

const TICKS: usize = 1000;

fn main() -> ExitCode {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                goalrush_simulation::init_logger();
                log_error(&format!("Config error: {err}"));
                return ExitCode::FAILURE;
            }
        },
        None => SimulationConfig::default(),
    };

    let step = Duration::from_secs_f64(1.0 / config.fixed_hz);
    let mut app = create_headless_app_with_config(config.clone());
    app.insert_resource(TimeUpdateStrategy::ManualDuration(step));

    log_info(&format!("Starting GoalRush headless simulation (seed: {})", config.seed));

    let world = app.world_mut();
    world.spawn(config.player_bundle(Team::Home, Vec3::ZERO));
    world.spawn(config.ai_bundle(Team::Neutral, Vec3::new(6.0, 0.0, 0.0)));
    world.spawn(config.ai_bundle(Team::Away, Vec3::new(-6.0, 0.0, 4.0)));
    world.spawn(config.goal_bundle(Team::Away, Vec3::new(0.0, 0.0, 20.0)));

    for tick in 0..TICKS {
        app.update();

        if tick % 100 == 0 {
            let world = app.world_mut();
            let alive = world
                .query::<&Health>()
                .iter(world)
                .filter(|health| health.is_alive())
                .count();
            let match_state = world.resource::<MatchState>();
            log_info(&format!(
                "Tick {}: {} alive, {:?} {}:{}",
                tick, alive, match_state.phase, match_state.home_score, match_state.away_score
            ));
        }
    }

    log_info("Simulation complete!");
    ExitCode::SUCCESS
}
