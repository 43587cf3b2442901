//! Physics/navigation boundary (headless)
//!
//! Kinematic интегратор игрока и steering AI агентов.
//! Внешний движок может заменить оба: ядро читает только Kinematics.grounded
//! и пишет MovementCommand.

use bevy::prelude::*;

pub mod movement;

// Re-export основных типов
pub use movement::{
    integrate_kinematics, steer_nav_agents, steer_towards, GROUNDED_STICK_VELOCITY, GROUND_HEIGHT,
};

use crate::components::{Kinematics, MovementCommand, MovementTuning, NavAgent};

/// Plugin для headless движения
///
/// FixedUpdate: steer_nav_agents. Интеграция игрока вызывается из
/// fixed_update состояний (player::fixed_tick_player_state_machines).
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Kinematics>()
            .register_type::<MovementTuning>()
            .register_type::<MovementCommand>()
            .register_type::<NavAgent>()
            .add_systems(FixedUpdate, steer_nav_agents);
    }
}
