//! AI decision-making module
//!
//! AI = StateMachine<AiState, AiCondition> + AggroTracker.
//! Idle → Combat (агр от урона) → Return (потеря цели) → Idle (дома).
//! Death - вне таблицы, см. combat::death.

use bevy::prelude::*;

pub mod aggro;
pub mod fsm;
pub mod systems;

#[cfg(test)]
mod fsm_tests;

// Re-export основных типов
pub use aggro::{AggroTracker, ChaseQuery, TargetView, AGGRO_GRACE_PERIOD};
pub use fsm::{ai_state_machine, AiCondition, AiConfig, AiControl, AiState, AiStateMachine};
pub use systems::{tick_ai_state_machines, AiContext};

use crate::components::{Actor, Health, MovementCommand, NavAgent, SpawnPoint, StatBlock, Team};
use crate::SimulationSet;

/// Всё, что нужно AI entity (Actor дотягивает остальное через #[require])
pub fn ai_bundle(team: Team, position: Vec3, config: AiConfig, stats: StatBlock) -> impl Bundle {
    (
        Actor { team },
        Health::new(stats.hp),
        stats,
        config,
        Transform::from_translation(position),
        SpawnPoint(position),
        AggroTracker::default(),
        ai_state_machine(),
        MovementCommand::default(),
        NavAgent {
            speed: stats.speed,
            ..default()
        },
    )
}

/// AI Plugin
///
/// tick_ai_state_machines в Decide: после ввода/таймеров, до разрешения атак.
pub struct AiPlugin;

impl Plugin for AiPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AggroTracker>()
            .register_type::<AiConfig>()
            .add_systems(
                Update,
                tick_ai_state_machines
                    .in_set(SimulationSet::Decide)
                    // порядок intents в кадре фиксирован: игрок, затем AI
                    .after(crate::player::tick_player_state_machines),
            );
    }
}
