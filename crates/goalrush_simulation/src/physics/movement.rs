//! Headless movement integrator и steering для navigation agents
//!
//! Архитектура:
//! - Игрок: состояния вызывают integrate_kinematics из fixed_update
//!   (горизонталь из ввода, гравитация × scale от состояния)
//! - AI: steer_nav_agents исполняет MovementCommand (setDestination/stop/resetPath)
//! - Земля - плоскость y = GROUND_HEIGHT; внешний physics слой может заменить оба
//!
//! Детерминизм: только FixedUpdate, без RNG.

use bevy::prelude::*;

use crate::components::{Dead, Kinematics, MovementCommand, NavAgent};

/// Высота плоскости земли
pub const GROUND_HEIGHT: f32 = 0.0;

/// Вертикальная скорость, которой персонаж прижимается к земле
pub const GROUNDED_STICK_VELOCITY: f32 = -2.0;

/// Один шаг интеграции (integrateMovement)
///
/// 1. Гравитация (в воздухе или на взлёте с земли)
/// 2. Горизонтальная скорость = ввод × speed
/// 3. position += velocity · dt
/// 4. Ground check по плоскости, прижатие к земле
pub fn integrate_kinematics(
    kinematics: &mut Kinematics,
    position: &mut Vec3,
    input: Vec2,
    speed: f32,
    gravity: f32,
    delta: f32,
) {
    // grounded ещё true в шаге прыжка: гравитация с первого шага, иначе прыжок выше launch
    if !kinematics.grounded || kinematics.velocity.y > 0.0 {
        kinematics.velocity.y += gravity * delta;
    }

    let horizontal = Vec3::new(input.x, 0.0, input.y) * speed;
    kinematics.velocity.x = horizontal.x;
    kinematics.velocity.z = horizontal.z;

    *position += kinematics.velocity * delta;

    if let Some(facing) = horizontal.try_normalize() {
        kinematics.facing = facing;
    }

    if position.y <= GROUND_HEIGHT {
        position.y = GROUND_HEIGHT;
        kinematics.grounded = true;
        if kinematics.velocity.y < 0.0 {
            kinematics.velocity.y = GROUNDED_STICK_VELOCITY;
        }
    } else {
        kinematics.grounded = false;
    }
}

/// Один шаг агента к точке (по XZ), остановка на stopping_distance
///
/// Возвращает true если агент уже у цели.
pub fn steer_towards(position: &mut Vec3, target: Vec3, agent: &NavAgent, delta: f32) -> bool {
    let offset = (target - *position).with_y(0.0);
    let distance = offset.length();
    let remaining = distance - agent.stopping_distance;

    if remaining <= f32::EPSILON {
        return true;
    }

    let step = (agent.speed * delta).min(remaining);
    *position += offset / distance * step;
    step >= remaining
}

/// System: headless navigation (FixedUpdate)
pub fn steer_nav_agents(
    time: Res<Time>,
    mut agents: Query<(&MovementCommand, &NavAgent, &mut Transform), Without<Dead>>,
) {
    let delta = time.delta_secs();

    for (command, agent, mut transform) in agents.iter_mut() {
        if !agent.on_nav_mesh {
            continue;
        }

        if let MovementCommand::MoveToPosition { target } = *command {
            steer_towards(&mut transform.translation, target, agent, delta);
        }
    }
}
