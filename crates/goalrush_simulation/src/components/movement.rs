//! Movement компоненты: навигация AI, кинематика игрока, параметры прыжка

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Команда навигации для AI (выполняется navigation collaborator)
///
/// Архитектура:
/// - AI состояния пишут MovementCommand (high-level intent)
/// - Навигация (внешний NavMesh агент или headless steering) читает и двигает entity
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum MovementCommand {
    /// Нет пути (resetPath)
    #[default]
    Idle,
    /// Двигаться к позиции (setDestination)
    MoveToPosition { target: Vec3 },
    /// Остановиться немедленно (stop)
    Stop,
}

/// Навигационный агент AI
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    /// Стоит ли агент на navmesh (иначе команды навигации не отдаются)
    pub on_nav_mesh: bool,
    /// м/с (из StatBlock::speed)
    pub speed: f32,
    /// Дистанция, на которой агент считает цель достигнутой
    pub stopping_distance: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            on_nav_mesh: true,
            speed: 3.5,
            stopping_distance: 0.0,
        }
    }
}

/// Кинематика игрока (результат movement integrator)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Kinematics {
    pub velocity: Vec3,
    /// Контакт с землёй (isGrounded)
    pub grounded: bool,
    /// Прыжков в воздухе до следующего касания земли
    pub jumps_remaining: u8,
    /// Куда смотрит персонаж (XZ, normalized)
    pub facing: Vec3,
}

impl Default for Kinematics {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            grounded: true,
            jumps_remaining: 1,
            facing: Vec3::Z,
        }
    }
}

/// Параметры прыжка и гравитации
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct MovementTuning {
    /// Высота апекса первого прыжка (м)
    pub jump_height: f32,
    /// Вертикальная скорость двойного прыжка (м/с)
    pub double_jump_velocity: f32,
    /// Сколько секунд удержание кнопки ослабляет гравитацию
    pub jump_hold_duration: f32,
    /// [0, 1]: доля дополнительной гравитации после отпускания кнопки
    pub jump_cut_off_multiplier: f32,
    /// м/с² (отрицательная)
    pub gravity: f32,
    /// Окно буфера прыжка (сек)
    pub jump_buffer_time: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            jump_height: 2.0,
            double_jump_velocity: 5.0,
            jump_hold_duration: 0.25,
            jump_cut_off_multiplier: 0.75,
            gravity: -30.0,
            jump_buffer_time: 0.15,
        }
    }
}

impl MovementTuning {
    /// Скорость отрыва, при которой апекс ровно jump_height: sqrt(h · 2 · |g|)
    pub fn launch_velocity(&self) -> f32 {
        (self.jump_height * 2.0 * self.gravity.abs()).sqrt()
    }
}
