//! AI FSM: Idle → Combat → Return → Idle
//!
//! Таблица переходов (проверяется после update активного состояния):
//! - Idle → Combat:   is_aggroed && should_chase
//! - Combat → Return: !should_chase
//! - Return → Idle:   distance(self, spawn) < RETURN_EPSILON
//!
//! Death - вне таблицы (см. combat::death).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::DebugColor;
use crate::state_machine::{Predicate, State, StateMachine};

/// Return считается завершённым ближе этого расстояния до спавна
pub const RETURN_EPSILON: f32 = 1.0;

/// Доля attack_radius, на которой агент останавливается перед целью
pub const COMBAT_STOPPING_FACTOR: f32 = 0.8;

/// Параметры AI
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AiConfig {
    /// Может ли вообще преследовать (турели - нет)
    pub can_follow: bool,
    /// Радиус от спавна, в котором AI продолжает погоню
    pub leash_radius: f32,
    pub attack_radius: f32,
    /// Сколько монет выпадает при смерти
    pub coin_drop_amount: u32,
    /// Длительность fade-out трупа (сек)
    pub death_fade_duration: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            can_follow: true,
            leash_radius: 15.0,
            attack_radius: 2.0,
            coin_drop_amount: 3,
            death_fade_duration: 1.5,
        }
    }
}

/// Capability interface AI entity для состояний и условий
pub trait AiControl {
    fn delta(&self) -> f32;

    fn config(&self) -> &AiConfig;

    fn is_aggroed(&self) -> bool;

    /// AggroTracker::should_chase с текущей целью
    fn should_chase(&mut self) -> bool;

    fn lose_aggro(&mut self);

    fn spawn_point(&self) -> Vec3;

    fn distance_to_spawn(&self) -> f32;

    fn target_position(&self) -> Option<Vec3>;

    fn target_in_radius(&self, radius: f32) -> bool;

    /// Секунд между атаками (1 / AttackSpeed)
    fn attack_interval(&self) -> f32;

    // Navigation collaborator
    fn is_on_nav_mesh(&self) -> bool;
    fn set_destination(&mut self, point: Vec3);
    fn set_stopping_distance(&mut self, distance: f32);
    fn stop(&mut self);
    fn reset_path(&mut self);

    /// Одна атака по текущей цели (empowered по счётчику, затем учёт в счётчике)
    fn strike_target(&mut self);

    fn set_debug_color(&mut self, color: DebugColor);
}

#[derive(Debug, Clone, PartialEq)]
pub enum AiState {
    Idle,
    Combat {
        /// До следующей атаки (может уйти в минус, пока цель вне радиуса)
        attack_timer: f32,
        attack_interval: f32,
    },
    Return,
}

impl AiState {
    pub fn combat() -> Self {
        AiState::Combat {
            attack_timer: 0.0,
            attack_interval: 0.0,
        }
    }
}

impl<C: AiControl> State<C> for AiState {
    type Input = ();

    fn name(&self) -> &'static str {
        match self {
            AiState::Idle => "AI Idle",
            AiState::Combat { .. } => "AI Combat",
            AiState::Return => "AI Return",
        }
    }

    fn on_enter(&mut self, ctx: &mut C) {
        match self {
            AiState::Idle => {
                ctx.set_debug_color(DebugColor::Gray);
                if ctx.is_on_nav_mesh() {
                    ctx.stop();
                }
                ctx.lose_aggro();
            }
            AiState::Combat {
                attack_timer,
                attack_interval,
            } => {
                ctx.set_debug_color(DebugColor::Magenta);
                *attack_interval = ctx.attack_interval();
                *attack_timer = 0.0;
                if ctx.is_on_nav_mesh() {
                    let stopping = ctx.config().attack_radius * COMBAT_STOPPING_FACTOR;
                    ctx.set_stopping_distance(stopping);
                }
            }
            AiState::Return => {
                ctx.lose_aggro();
                ctx.set_debug_color(DebugColor::Orange);
                if ctx.is_on_nav_mesh() {
                    ctx.set_stopping_distance(0.0);
                    let spawn = ctx.spawn_point();
                    ctx.set_destination(spawn);
                }
            }
        }
    }

    fn update(&mut self, ctx: &mut C, _input: &()) -> Option<Self> {
        if let AiState::Combat {
            attack_timer,
            attack_interval,
        } = self
        {
            if let Some(target) = ctx.target_position() {
                if ctx.is_on_nav_mesh() {
                    ctx.set_destination(target);
                }
            }

            *attack_timer -= ctx.delta();
            let attack_radius = ctx.config().attack_radius;
            if *attack_timer <= 0.0 && ctx.target_in_radius(attack_radius) {
                ctx.strike_target();
                *attack_timer = *attack_interval;
            }
        }

        // Переходы AI - только через таблицу
        None
    }

    fn on_exit(&mut self, ctx: &mut C) {
        if let AiState::Combat { .. } = self {
            if ctx.is_on_nav_mesh() {
                ctx.reset_path();
            }
        }
    }
}

/// Условия таблицы переходов AI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AiCondition {
    AggroedAndChasing,
    StoppedChasing,
    ReachedSpawn,
}

impl<C: AiControl> Predicate<C> for AiCondition {
    fn evaluate(&self, ctx: &mut C) -> bool {
        match self {
            AiCondition::AggroedAndChasing => ctx.is_aggroed() && ctx.should_chase(),
            AiCondition::StoppedChasing => !ctx.should_chase(),
            AiCondition::ReachedSpawn => ctx.distance_to_spawn() < RETURN_EPSILON,
        }
    }
}

pub type AiStateMachine = StateMachine<AiState, AiCondition>;

/// Машина AI с таблицей переходов, стартует в Idle
pub fn ai_state_machine() -> AiStateMachine {
    StateMachine::starting_in(AiState::Idle)
        .with_transition(&AiState::Idle, AiState::combat(), AiCondition::AggroedAndChasing)
        .with_transition(&AiState::combat(), AiState::Return, AiCondition::StoppedChasing)
        .with_transition(&AiState::Return, AiState::Idle, AiCondition::ReachedSpawn)
}
