//! Player-controlled персонаж
//!
//! Содержит:
//! - input: сырой ввод → буферы → InputSnapshot
//! - fsm: PlayerState + PlayerControl capability
//! - systems: контекст машины поверх компонентов, tick/fixed_tick

use bevy::prelude::*;

pub mod fsm;
pub mod input;
pub mod systems;

#[cfg(test)]
mod fsm_tests;

// Re-export основных типов
pub use fsm::{player_state_machine, PlayerControl, PlayerState, PlayerStateMachine};
pub use input::{buffer_player_input, AttackTuning, InputSnapshot, PlayerController, PlayerInput};
pub use systems::{fixed_tick_player_state_machines, tick_player_state_machines, PlayerContext};

use crate::components::{Actor, Attacker, Health, Kinematics, MovementTuning, SpawnPoint, StatBlock, Team};
use crate::scoring::PlayerScoring;
use crate::SimulationSet;

/// Marker component для player-controlled entity
///
/// AI systems работают по AiStateMachine, поэтому фильтр нужен только
/// внешним слоям (камера, UI).
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(
    PlayerInput,
    PlayerController,
    Kinematics,
    MovementTuning,
    AttackTuning,
    Attacker,
    PlayerScoring
)]
pub struct Player;

/// Всё, что нужно игроку (остальное дотягивают #[require])
pub fn player_bundle(team: Team, position: Vec3, stats: StatBlock) -> impl Bundle {
    (
        Player,
        Actor { team },
        Health::new(stats.hp),
        stats,
        Transform::from_translation(position),
        SpawnPoint(position),
        player_state_machine(),
    )
}

/// Player Plugin
///
/// Update: buffer_player_input (Input) → tick_player_state_machines (Decide)
/// FixedUpdate: fixed_tick_player_state_machines (движение внутри состояний)
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlayerInput>()
            .register_type::<PlayerController>()
            .register_type::<AttackTuning>()
            .add_systems(Update, buffer_player_input.in_set(SimulationSet::Input))
            .add_systems(Update, tick_player_state_machines.in_set(SimulationSet::Decide))
            .add_systems(FixedUpdate, fixed_tick_player_state_machines);
    }
}
