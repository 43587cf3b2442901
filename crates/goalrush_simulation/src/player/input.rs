//! Input boundary игрока
//!
//! Внешний input слой пишет сырое состояние кнопок в PlayerInput.
//! Ядро ловит фронты нажатий в PlayerController (буфер прыжка, latch атаки)
//! и отдаёт состояниям неизменяемый InputSnapshot.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::TargetPriority;
use crate::components::MovementTuning;

/// Сырое состояние устройств за кадр (пишет input слой)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    /// x → мир X, y → мир Z
    pub move_vector: Vec2,
    pub jump_held: bool,
    pub attack_held: bool,
    pub score_held: bool,
}

/// Снимок ввода для одного tick машины
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub move_vector: Vec2,
    pub jump_held: bool,
    /// Нажатие прыжка в пределах окна буфера, ещё не потраченное
    pub jump_buffered: bool,
    /// Нажатие атаки, ещё не потраченное
    pub attack_pressed: bool,
    pub score_pressed: bool,
}

impl InputSnapshot {
    pub fn has_move_input(&self) -> bool {
        self.move_vector != Vec2::ZERO
    }
}

/// Буферы ввода игрока
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerController {
    jump_buffer_timer: f32,
    attack_latched: bool,
    jump_was_held: bool,
    attack_was_held: bool,
}

impl PlayerController {
    /// Продвигает буферы на кадр и ловит фронты нажатий
    pub fn observe(&mut self, input: &PlayerInput, jump_buffer_time: f32, delta: f32) {
        self.jump_buffer_timer = (self.jump_buffer_timer - delta).max(0.0);

        if input.jump_held && !self.jump_was_held {
            self.jump_buffer_timer = jump_buffer_time;
        }
        if input.attack_held && !self.attack_was_held {
            self.attack_latched = true;
        }

        self.jump_was_held = input.jump_held;
        self.attack_was_held = input.attack_held;
    }

    pub fn snapshot(&self, input: &PlayerInput) -> InputSnapshot {
        InputSnapshot {
            move_vector: input.move_vector,
            jump_held: input.jump_held,
            jump_buffered: self.jump_buffer_timer > 0.0,
            attack_pressed: self.attack_latched,
            score_pressed: input.score_held,
        }
    }

    /// true если буфер был активен; буфер обнуляется в любом случае
    pub fn consume_jump_buffer(&mut self) -> bool {
        let buffered = self.jump_buffer_timer > 0.0;
        self.jump_buffer_timer = 0.0;
        buffered
    }

    pub fn consume_attack_press(&mut self) -> bool {
        std::mem::take(&mut self.attack_latched)
    }
}

/// Параметры атаки игрока
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AttackTuning {
    /// Длительность состояния Attack (сек)
    pub duration: f32,
    /// Множитель скорости в начале атаки (линейно возвращается к 1.0)
    pub move_speed_multiplier: f32,
    pub melee_radius: f32,
    /// Радиус наведения усиленного выстрела
    pub targeting_range: f32,
    pub target_priority: TargetPriority,
    /// Сколько атака из травы держит игрока раскрытым
    pub reveal_duration: f32,
}

impl Default for AttackTuning {
    fn default() -> Self {
        Self {
            duration: 0.5,
            move_speed_multiplier: 0.5,
            melee_radius: 2.0,
            targeting_range: 10.0,
            target_priority: TargetPriority::LowestPercentageHp,
            reveal_duration: 2.0,
        }
    }
}

/// System: фронты нажатий → буферы (SimulationSet::Input)
pub fn buffer_player_input(
    time: Res<Time>,
    mut players: Query<(&PlayerInput, &mut PlayerController, &MovementTuning)>,
) {
    let delta = time.delta_secs();

    for (input, mut controller, tuning) in players.iter_mut() {
        controller.observe(input, tuning.jump_buffer_time, delta);
    }
}
